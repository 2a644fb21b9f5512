//! The page's address fragment
//!
//! The only shareable state: a fragment naming an experience id opens that
//! record's drawer, an empty fragment closes it.

use std::fmt;

use crate::core::types::ExperienceId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(Option<ExperienceId>);

impl Fragment {
    pub fn empty() -> Self {
        Self(None)
    }

    /// Parse `#id`, `id` or an empty string
    pub fn parse(text: &str) -> Self {
        let id = text.trim();
        let id = id.strip_prefix('#').unwrap_or(id).trim();
        if id.is_empty() {
            Self(None)
        } else {
            Self(Some(ExperienceId::from(id)))
        }
    }

    pub fn id(&self) -> Option<&ExperienceId> {
        self.0.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn set(&mut self, id: ExperienceId) {
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl From<ExperienceId> for Fragment {
    fn from(id: ExperienceId) -> Self {
        Self(Some(id))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(id) => write!(f, "#{id}"),
            None => Ok(()),
        }
    }
}
