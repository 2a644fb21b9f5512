//! Project detail drawer, driven by the address fragment
//!
//! The drawer never opens on its own: the session changes the fragment and
//! the drawer follows it. A known id opens the drawer (or swaps its content
//! when already open), an empty fragment closes it, and an unknown id closes
//! it with a warning.

use crate::core::types::{ExperienceId, SectionTheme};
use crate::data::experience::ExperienceRecord;
use crate::data::loader::Dataset;
use crate::skills::resolution::{resolve_skill_chip, resolve_tool_chip, JumpTarget};
use crate::ui::fragment::Fragment;

/// What a fragment change did to the drawer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerEvent {
    Opened(ExperienceId),
    Swapped { from: ExperienceId, to: ExperienceId },
    Closed,
    /// The fragment named no known record
    Rejected(ExperienceId),
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipKind {
    Skill,
    Tool,
}

/// A clickable skill or tool name inside the drawer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub theme: SectionTheme,
    pub kind: ChipKind,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drawer {
    open: Option<ExperienceId>,
    /// Content scroll offset in lines
    pub scroll: u16,
    /// Focused chip index within `chips()`
    pub chip_cursor: usize,
}

impl Drawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_id(&self) -> Option<&ExperienceId> {
        self.open.as_ref()
    }

    pub fn record<'a>(&self, dataset: &'a Dataset) -> Option<&'a ExperienceRecord> {
        self.open.as_ref().and_then(|id| dataset.experience(id))
    }

    fn reset_view(&mut self) {
        self.scroll = 0;
        self.chip_cursor = 0;
    }

    /// Follow the fragment
    ///
    /// An id with no record is rejected and leaves the drawer as it was.
    pub fn on_fragment_change(&mut self, dataset: &Dataset, fragment: &Fragment) -> DrawerEvent {
        if let Some(id) = fragment.id().filter(|id| !dataset.contains(id)) {
            tracing::warn!(id = %id, open = ?self.open, "fragment names no experience record");
            return DrawerEvent::Rejected(id.clone());
        }

        let event = match (fragment.id(), self.open.take()) {
            (None, None) => DrawerEvent::Unchanged,
            (None, Some(_)) => DrawerEvent::Closed,
            (Some(id), Some(previous)) if &previous == id => {
                self.open = Some(previous);
                return DrawerEvent::Unchanged;
            }
            (Some(id), Some(previous)) => {
                self.open = Some(id.clone());
                DrawerEvent::Swapped {
                    from: previous,
                    to: id.clone(),
                }
            }
            (Some(id), None) => {
                self.open = Some(id.clone());
                DrawerEvent::Opened(id.clone())
            }
        };

        if event != DrawerEvent::Unchanged {
            self.reset_view();
            tracing::debug!(event = ?event, "drawer");
        }
        event
    }

    /// Skill and tool chips of the open record, in display order
    pub fn chips(&self, dataset: &Dataset) -> Vec<Chip> {
        let Some(record) = self.record(dataset) else {
            return Vec::new();
        };
        record
            .sections
            .iter()
            .flat_map(|(theme, section)| {
                let skills = section.skills.iter().map(move |name| Chip {
                    theme,
                    kind: ChipKind::Skill,
                    name: name.clone(),
                });
                let tools = section.tools.iter().map(move |name| Chip {
                    theme,
                    kind: ChipKind::Tool,
                    name: name.clone(),
                });
                skills.chain(tools)
            })
            .collect()
    }

    /// Resolve a chip click; on success the drawer closes
    ///
    /// Unresolvable names are a silent no-op for the visitor (logged at warn)
    /// and leave the drawer open.
    pub fn chip_clicked(&mut self, dataset: &Dataset, chip: &Chip) -> Option<JumpTarget> {
        let record = self.record(dataset)?;
        let taxonomy = dataset.taxonomy();
        let target = match chip.kind {
            ChipKind::Skill => resolve_skill_chip(taxonomy, &chip.name),
            ChipKind::Tool => {
                let section = record.sections.get(chip.theme)?;
                resolve_tool_chip(taxonomy, section, &chip.name)
            }
        };

        match target {
            Some(target) => {
                tracing::debug!(chip = %chip.name, target = ?target, "drawer chip handoff");
                self.open = None;
                self.reset_view();
                Some(target)
            }
            None => {
                tracing::warn!(
                    chip = %chip.name,
                    kind = ?chip.kind,
                    experience = %record.id,
                    "chip does not resolve against the taxonomy"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_toml_strs(
            r#"
[[experiences]]
id = "agency"
title = "Agency"
org = "Org"
role = "Buyer"
start = "Jan 2020"
end = "Dec 2020"
category = "flagship"
summary = "Ads."

[experiences.sections.growth]
skills = ["Paid Social", "Growth Hacking"]
tools = ["Meta Ads"]

[[experiences]]
id = "shop"
title = "Shop"
org = "Org"
role = "Marketer"
start = "Jan 2021"
end = "Jun 2021"
category = "personal"
summary = "Store."
"#,
            r#"
[[branches]]
id = "growth"
name = "Growth"
description = "Demand."

[[branches.groups]]
id = "paid-growth"
name = "Paid Growth"
description = "Paid media."

[[branches.groups.skills]]
id = "paid-social"
name = "Paid Social"
description = "Social ads."
tools = ["Meta Ads"]
"#,
            "",
        )
        .unwrap()
    }

    #[test]
    fn test_open_swap_close() {
        let ds = dataset();
        let mut drawer = Drawer::new();

        let event = drawer.on_fragment_change(&ds, &Fragment::parse("#agency"));
        assert_eq!(event, DrawerEvent::Opened("agency".into()));

        drawer.scroll = 4;
        let event = drawer.on_fragment_change(&ds, &Fragment::parse("#shop"));
        assert_eq!(
            event,
            DrawerEvent::Swapped {
                from: "agency".into(),
                to: "shop".into()
            }
        );
        assert_eq!(drawer.scroll, 0);

        assert_eq!(drawer.on_fragment_change(&ds, &Fragment::parse("#shop")), DrawerEvent::Unchanged);
        assert_eq!(drawer.on_fragment_change(&ds, &Fragment::empty()), DrawerEvent::Closed);
        assert!(!drawer.is_open());
    }

    #[test]
    fn test_unknown_id_keeps_current_record() {
        let ds = dataset();
        let mut drawer = Drawer::new();
        assert_eq!(
            drawer.on_fragment_change(&ds, &Fragment::parse("#ghost")),
            DrawerEvent::Rejected("ghost".into())
        );
        assert!(!drawer.is_open());

        drawer.on_fragment_change(&ds, &Fragment::parse("agency"));
        drawer.scroll = 3;
        let event = drawer.on_fragment_change(&ds, &Fragment::parse("#ghost"));
        assert_eq!(event, DrawerEvent::Rejected("ghost".into()));
        assert_eq!(drawer.open_id().map(|id| id.as_str()), Some("agency"));
        assert_eq!(drawer.scroll, 3);
    }

    #[test]
    fn test_chips_in_section_order() {
        let ds = dataset();
        let mut drawer = Drawer::new();
        drawer.on_fragment_change(&ds, &Fragment::parse("agency"));
        let chips = drawer.chips(&ds);
        let names: Vec<_> = chips.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Paid Social", "Growth Hacking", "Meta Ads"]);
        assert_eq!(chips[2].kind, ChipKind::Tool);
    }

    #[test]
    fn test_chip_click_closes_and_hands_off() {
        let ds = dataset();
        let mut drawer = Drawer::new();
        drawer.on_fragment_change(&ds, &Fragment::parse("agency"));
        let chips = drawer.chips(&ds);

        let target = drawer.chip_clicked(&ds, &chips[2]).unwrap();
        assert_eq!(target.tool(), Some("Meta Ads"));
        assert_eq!(target.location().skill.as_str(), "paid-social");
        assert!(!drawer.is_open());
    }

    #[test]
    fn test_unresolved_chip_is_noop() {
        let ds = dataset();
        let mut drawer = Drawer::new();
        drawer.on_fragment_change(&ds, &Fragment::parse("agency"));
        let chips = drawer.chips(&ds);
        assert!(drawer.chip_clicked(&ds, &chips[1]).is_none());
        assert!(drawer.is_open());
    }
}
