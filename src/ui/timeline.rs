//! Reverse-chronological timeline of experience records

use std::cmp::Reverse;

use serde::Serialize;

use crate::core::calendar::{classify_period, format_duration, try_parse_period_at, PeriodShape, YearMonth};
use crate::core::types::ExperienceId;
use crate::data::experience::ExperienceRecord;
use crate::data::loader::Dataset;
use crate::skills::matching::MatchSet;

/// Sort key for a start period; undated starts order as most recent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum StartKey {
    Dated(YearMonth),
    Undated,
}

fn start_key(record: &ExperienceRecord, today: YearMonth) -> StartKey {
    if matches!(classify_period(&record.start), Ok(PeriodShape::Present)) {
        return StartKey::Undated;
    }
    match try_parse_period_at(&record.start, today) {
        Ok(month) => StartKey::Dated(month),
        Err(_) => StartKey::Undated,
    }
}

/// Records sorted by start, most recent first, optionally filtered
///
/// The sort is stable: records with the same start keep dataset order.
pub fn timeline<'a>(dataset: &'a Dataset, filter: Option<&MatchSet>, today: YearMonth) -> Vec<&'a ExperienceRecord> {
    let mut records: Vec<&ExperienceRecord> = dataset
        .experiences()
        .iter()
        .filter(|record| filter.map_or(true, |set| set.contains(&record.id)))
        .collect();
    records.sort_by_key(|record| Reverse(start_key(record, today)));
    records
}

/// Display row for one timeline record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub id: ExperienceId,
    pub title: String,
    pub org: String,
    pub role: String,
    pub period: String,
    pub duration: String,
    pub badge: &'static str,
}

impl TimelineEntry {
    pub fn new(record: &ExperienceRecord, today: YearMonth) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            org: record.org.clone(),
            role: record.role.clone(),
            period: record.period_label(),
            duration: format_duration(record.duration_months_at(today)),
            badge: record.category.badge(),
        }
    }
}

pub fn timeline_entries(dataset: &Dataset, filter: Option<&MatchSet>, today: YearMonth) -> Vec<TimelineEntry> {
    timeline(dataset, filter, today)
        .into_iter()
        .map(|record| TimelineEntry::new(record, today))
        .collect()
}
