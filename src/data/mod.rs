//! Static portfolio content: records, taxonomy, profile

pub mod experience;
pub mod loader;
pub mod profile;
pub mod taxonomy;
pub mod validation;

pub use experience::{Category, ExperienceRecord, Section, Sections};
pub use loader::Dataset;
pub use profile::{Highlight, HighlightTarget, Profile};
pub use taxonomy::{Branch, Skill, SkillGroup, SkillLocation, SkillTaxonomy};
pub use validation::{validate, Finding, ValidationReport};
