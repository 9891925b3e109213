use crate::models::metadata::VideoMetadata;
use crate::parser::duration::is_runtime;
use crate::parser::repair::repair_text;
use crate::parser::video_id::extract_video_id;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single catalog entry: one video in the series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub premise: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// ISO-8601 date. When absent the record's array position is its chronology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A strict-validation finding for one record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),

    #[error("runtime `{0}` is not in M:SS or H:MM:SS form")]
    MalformedRuntime(String),

    #[error("publish date `{0}` is not a valid date")]
    InvalidPublishDate(String),

    #[error("video URL `{0}` does not contain an 11-character video id")]
    UnresolvableVideoUrl(String),

    #[error("field `{0}` carries duplicated or truncated text")]
    NeedsRepair(&'static str),
}

impl Episode {
    /// A record is includable only when its required fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty()
            && !self.title.trim().is_empty()
            && !self.premise.trim().is_empty()
            && !self.video_url.trim().is_empty()
    }

    #[must_use]
    pub fn video_id(&self) -> Option<String> {
        extract_video_id(&self.video_url)
    }

    #[must_use]
    pub fn is_featured(&self) -> bool {
        self.featured == Some(true)
    }

    #[must_use]
    pub fn is_hero(&self) -> bool {
        self.hero == Some(true)
    }

    /// Parsed publish date; invalid or missing dates yield `None`.
    #[must_use]
    pub fn published_on(&self) -> Option<NaiveDate> {
        self.publish_date.as_deref().and_then(parse_publish_date)
    }

    /// Everything strict validation would reject. Records straight out of a
    /// repaired parse can still report `MalformedRuntime` and friends.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (name, value) in [
            ("id", &self.id),
            ("title", &self.title),
            ("premise", &self.premise),
            ("videoUrl", &self.video_url),
        ] {
            if value.trim().is_empty() {
                violations.push(Violation::MissingField(name));
            }
        }

        for (name, value) in [("title", &self.title), ("premise", &self.premise)] {
            if !value.trim().is_empty() && repair_text(value) != *value {
                violations.push(Violation::NeedsRepair(name));
            }
        }

        if let Some(runtime) = &self.runtime
            && !is_runtime(runtime)
        {
            violations.push(Violation::MalformedRuntime(runtime.clone()));
        }

        if let Some(date) = &self.publish_date
            && parse_publish_date(date).is_none()
        {
            violations.push(Violation::InvalidPublishDate(date.clone()));
        }

        if !self.video_url.trim().is_empty() && self.video_id().is_none() {
            violations.push(Violation::UnresolvableVideoUrl(self.video_url.clone()));
        }

        violations
    }

    /// Builds the enriched record. Empty metadata values never replace
    /// existing ones, so a complete record stays complete.
    #[must_use]
    pub fn with_metadata(self, metadata: &VideoMetadata) -> Self {
        let title = metadata
            .title
            .as_deref()
            .map(repair_text)
            .filter(|t| !t.is_empty());

        let premise = metadata
            .description
            .as_deref()
            .and_then(first_paragraph)
            .map(repair_text)
            .filter(|p| !p.is_empty());

        Self {
            title: title.unwrap_or(self.title),
            premise: premise.unwrap_or(self.premise),
            runtime: metadata.runtime.clone().or(self.runtime),
            publish_date: metadata.publish_date.clone().or(self.publish_date),
            thumbnail_url: metadata.thumbnail_url.clone().or(self.thumbnail_url),
            ..self
        }
    }
}

fn parse_publish_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn first_paragraph(description: &str) -> Option<&str> {
    description
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
}
