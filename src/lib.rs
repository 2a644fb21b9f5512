//! Career Dashboard - career portfolio with a filterable skill taxonomy
//!
//! `data` loads and checks the experience records, taxonomy and profile;
//! `skills` aggregates records against taxonomy selections; `ui` holds the
//! page session and its terminal rendering.

pub mod core;
pub mod data;
pub mod skills;
pub mod ui;
