//! Skill filtering and aggregation
//!
//! Given a taxonomy selection, find the matching experience records and the
//! deduplicated months they represent, at every expanded level at once.

pub mod aggregate;
pub mod display;
pub mod matching;
pub mod resolution;
pub mod selection;

pub use aggregate::{Aggregate, AggregationView, Aggregator, LevelMeters, NodeMeter};
pub use display::{meter_fill, render_bar, result_summary, MeterLabel};
pub use matching::{matching_experience_ids, total_months, MatchSet};
pub use resolution::{resolve_skill_chip, resolve_tool_chip, JumpTarget};
pub use selection::FilterSelection;
