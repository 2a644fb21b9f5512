//! Content-authoring integrity pass
//!
//! Every check here is a warning, never an error: the page keeps working with
//! unresolved names (they match nothing) and bad periods (they read as the
//! current month). The report makes those degraded-data cases visible to
//! `career-dashboard validate` and to the test suite.

use serde::Serialize;

use crate::core::calendar::{classify_period, try_parse_period_at, PeriodShape, YearMonth};
use crate::core::types::{ExperienceId, SectionTheme};
use crate::data::loader::Dataset;
use crate::data::profile::Highlight;

/// Which end of a record's period a finding refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodField {
    Start,
    End,
}

impl std::fmt::Display for PeriodField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PeriodField::Start => "start",
            PeriodField::End => "end",
        })
    }
}

/// A single integrity warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    UnresolvedSkill {
        experience: ExperienceId,
        section: SectionTheme,
        name: String,
    },
    UnresolvedTool {
        experience: ExperienceId,
        section: SectionTheme,
        name: String,
    },
    UnparseablePeriod {
        experience: ExperienceId,
        field: PeriodField,
        text: String,
        error: String,
    },
    NonCanonicalPeriod {
        experience: ExperienceId,
        field: PeriodField,
        text: String,
    },
    StartAfterEnd {
        experience: ExperienceId,
        start: String,
        end: String,
    },
    HighlightUnknownRole {
        highlight: usize,
        id: ExperienceId,
    },
    HighlightUnknownFilter {
        highlight: usize,
        path: String,
    },
    HighlightTarget {
        highlight: usize,
        problem: String,
    },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::UnresolvedSkill { experience, section, name } => write!(
                f,
                "{experience}: skill '{name}' in {} section is not a taxonomy skill",
                section.title()
            ),
            Finding::UnresolvedTool { experience, section, name } => write!(
                f,
                "{experience}: tool '{name}' in {} section is not listed by any taxonomy skill",
                section.title()
            ),
            Finding::UnparseablePeriod { experience, field, text, error } => {
                write!(f, "{experience}: {field} period '{text}' does not parse ({error})")
            }
            Finding::NonCanonicalPeriod { experience, field, text } => write!(
                f,
                "{experience}: {field} period '{text}' is not in canonical 'Mon YYYY' form"
            ),
            Finding::StartAfterEnd { experience, start, end } => {
                write!(f, "{experience}: start '{start}' is after end '{end}'")
            }
            Finding::HighlightUnknownRole { highlight, id } => {
                write!(f, "highlight #{}: target role '{id}' does not exist", highlight + 1)
            }
            Finding::HighlightUnknownFilter { highlight, path } => {
                write!(f, "highlight #{}: target filter '{path}' does not exist", highlight + 1)
            }
            Finding::HighlightTarget { highlight, problem } => {
                write!(f, "highlight #{}: {problem}", highlight + 1)
            }
        }
    }
}

/// All findings from one pass, in dataset order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub experiences_checked: usize,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Emit each finding as a warning
    pub fn log(&self) {
        for finding in &self.findings {
            tracing::warn!(target: "career_dashboard::validation", "{}", finding);
        }
        tracing::info!(
            checked = self.experiences_checked,
            findings = self.findings.len(),
            "dataset integrity pass complete"
        );
    }
}

fn check_period(
    experience: &ExperienceId,
    field: PeriodField,
    text: &str,
    findings: &mut Vec<Finding>,
) {
    match classify_period(text) {
        Err(err) => findings.push(Finding::UnparseablePeriod {
            experience: experience.clone(),
            field,
            text: text.to_string(),
            error: err.to_string(),
        }),
        Ok(PeriodShape::Month { canonical: true }) => {}
        Ok(PeriodShape::Present) if field == PeriodField::End => {}
        Ok(_) => findings.push(Finding::NonCanonicalPeriod {
            experience: experience.clone(),
            field,
            text: text.to_string(),
        }),
    }
}

fn check_highlight(position: usize, highlight: &Highlight, dataset: &Dataset, findings: &mut Vec<Finding>) {
    match (&highlight.target_role, &highlight.target_filter) {
        (None, None) => findings.push(Finding::HighlightTarget {
            highlight: position,
            problem: "has no target".to_string(),
        }),
        (Some(_), Some(_)) => findings.push(Finding::HighlightTarget {
            highlight: position,
            problem: "sets both target_role and target_filter".to_string(),
        }),
        _ => {}
    }

    if let Some(role) = &highlight.target_role {
        if !dataset.contains(role) {
            findings.push(Finding::HighlightUnknownRole {
                highlight: position,
                id: role.clone(),
            });
        }
    }

    if let Some(filter) = &highlight.target_filter {
        if dataset.taxonomy().resolve(filter).is_none() {
            findings.push(Finding::HighlightUnknownFilter {
                highlight: position,
                path: format!("{}/{}/{}", filter.branch, filter.group, filter.skill),
            });
        }
    }
}

/// Run every integrity check against `dataset`
///
/// `today` only matters for "Present" when comparing start and end.
pub fn validate(dataset: &Dataset, today: YearMonth) -> ValidationReport {
    let taxonomy = dataset.taxonomy();
    let skill_names = taxonomy.skill_names();
    let tool_names = taxonomy.tool_names();
    let mut findings = Vec::new();

    for record in dataset.experiences() {
        for (theme, section) in record.sections.iter() {
            for skill in &section.skills {
                if !skill_names.contains(skill.as_str()) {
                    findings.push(Finding::UnresolvedSkill {
                        experience: record.id.clone(),
                        section: theme,
                        name: skill.clone(),
                    });
                }
            }
            for tool in &section.tools {
                if !tool_names.contains(tool.as_str()) {
                    findings.push(Finding::UnresolvedTool {
                        experience: record.id.clone(),
                        section: theme,
                        name: tool.clone(),
                    });
                }
            }
        }

        check_period(&record.id, PeriodField::Start, &record.start, &mut findings);
        check_period(&record.id, PeriodField::End, &record.end, &mut findings);

        if let (Ok(start), Ok(end)) = (
            try_parse_period_at(&record.start, today),
            try_parse_period_at(&record.end, today),
        ) {
            if start > end {
                findings.push(Finding::StartAfterEnd {
                    experience: record.id.clone(),
                    start: record.start.clone(),
                    end: record.end.clone(),
                });
            }
        }
    }

    for (position, highlight) in dataset.profile().highlights.iter().enumerate() {
        check_highlight(position, highlight, dataset, &mut findings);
    }

    ValidationReport {
        experiences_checked: dataset.len(),
        findings,
    }
}
