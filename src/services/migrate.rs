//! One-time repair migration and strict validation of a catalog file.

use crate::models::episode::{Episode, Violation};
use crate::parser::{Layout, ParseError, RecordParser, repair_text, serialize_with};

/// One repaired field of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub episode_id: String,
    pub field: &'static str,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairPlan {
    pub episodes: Vec<Episode>,
    pub changes: Vec<FieldChange>,
    pub dropped: Vec<String>,
    pub duplicates: Vec<String>,
    /// Canonical text of the repaired catalog.
    pub output: String,
}

impl RepairPlan {
    /// True when writing `output` would change the file.
    #[must_use]
    pub fn differs_from(&self, original: &str) -> bool {
        self.output != original
    }
}

/// Reads the catalog as written, applies text repair to title and premise,
/// and renders the result canonically.
pub fn plan_repair(text: &str, layout: &Layout) -> Result<RepairPlan, ParseError> {
    let decoded = RecordParser::new(layout.clone())
        .without_repair()
        .decode(text)?;

    let mut changes = Vec::new();
    let episodes: Vec<Episode> = decoded
        .episodes
        .into_iter()
        .map(|episode| {
            let title = repair_field(&episode, "title", &episode.title, &mut changes);
            let premise = repair_field(&episode, "premise", &episode.premise, &mut changes);
            Episode {
                title,
                premise,
                ..episode
            }
        })
        .collect();

    let output = serialize_with(&episodes, layout);

    Ok(RepairPlan {
        episodes,
        changes,
        dropped: decoded.incomplete,
        duplicates: decoded.duplicates,
        output,
    })
}

fn repair_field(
    episode: &Episode,
    field: &'static str,
    value: &str,
    changes: &mut Vec<FieldChange>,
) -> String {
    let repaired = repair_text(value);
    if repaired != value {
        changes.push(FieldChange {
            episode_id: episode.id.clone(),
            field,
            before: value.to_string(),
            after: repaired.clone(),
        });
    }
    repaired
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub episode_id: String,
    pub violation: Violation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub records: usize,
    pub findings: Vec<Finding>,
    pub incomplete: Vec<String>,
    pub duplicates: Vec<String>,
    /// Hero records after the first one, which is the one shown.
    pub extra_heroes: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
            && self.incomplete.is_empty()
            && self.duplicates.is_empty()
            && self.extra_heroes.is_empty()
    }
}

/// Strict validation: nothing is repaired, everything questionable is reported.
pub fn validate_catalog(text: &str, layout: &Layout) -> Result<ValidationReport, ParseError> {
    let decoded = RecordParser::new(layout.clone())
        .without_repair()
        .decode(text)?;

    let findings = decoded
        .episodes
        .iter()
        .flat_map(|episode| {
            episode.violations().into_iter().map(|violation| Finding {
                episode_id: episode.id.clone(),
                violation,
            })
        })
        .collect();

    let extra_heroes = decoded
        .episodes
        .iter()
        .filter(|episode| episode.is_hero())
        .skip(1)
        .map(|episode| episode.id.clone())
        .collect();

    Ok(ValidationReport {
        records: decoded.episodes.len(),
        findings,
        incomplete: decoded.incomplete,
        duplicates: decoded.duplicates,
        extra_heroes,
    })
}
