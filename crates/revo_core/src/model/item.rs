//! Diary entry domain model.
//!
//! # Responsibility
//! - Define the `Item` record displayed by carousels and the week strip.
//! - Parse emotion labels coming from the recording backend.
//! - Normalize comma-separated keyword lists.
//!
//! # Invariants
//! - `id` is positive and never reused for another entry.
//! - `district`, when present, is non-blank.
//! - `keywords` never contain blank or duplicate entries.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static KEYWORD_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,\n]\s*").expect("valid keyword separator regex"));

/// Stable identifier of one diary entry, assigned by the recording backend.
pub type ItemId = i64;

/// Emotion classified for one recording.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sadness,
    Surprise,
    Excitement,
    Anger,
    Normal,
    Confusion,
}

impl Emotion {
    /// All emotions in declaration order.
    ///
    /// Declaration order is the tie-break order for archive statistics.
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sadness,
        Emotion::Surprise,
        Emotion::Excitement,
        Emotion::Anger,
        Emotion::Normal,
        Emotion::Confusion,
    ];

    /// Stable snake_case name used in storage and FFI payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sadness => "sadness",
            Self::Surprise => "surprise",
            Self::Excitement => "excitement",
            Self::Anger => "anger",
            Self::Normal => "normal",
            Self::Confusion => "confusion",
        }
    }

    /// Korean display label used by the recording backend.
    pub fn label(self) -> &'static str {
        match self {
            Self::Happy => "행복",
            Self::Sadness => "슬픔",
            Self::Surprise => "놀람",
            Self::Excitement => "신남",
            Self::Anger => "화남",
            Self::Normal => "보통",
            Self::Confusion => "당황",
        }
    }

    /// Parses either a Korean label or a snake_case name.
    ///
    /// `기쁨` is accepted as an alias of `Happy`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        match trimmed {
            "행복" | "기쁨" => return Some(Self::Happy),
            "슬픔" => return Some(Self::Sadness),
            "놀람" => return Some(Self::Surprise),
            "신남" => return Some(Self::Excitement),
            "화남" => return Some(Self::Anger),
            "보통" => return Some(Self::Normal),
            "당황" => return Some(Self::Confusion),
            _ => {}
        }
        let lowered = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == lowered)
    }
}

impl Display for Emotion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diary/recording entry displayed in a carousel.
///
/// Owned by the item source. Interactive components only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub emotion: Emotion,
    /// Local wall-clock time of the recording.
    pub recorded_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl Item {
    /// Creates an entry with no district and no keywords.
    pub fn new(id: ItemId, emotion: Emotion, recorded_at: NaiveDateTime) -> Self {
        Self {
            id,
            emotion,
            recorded_at,
            district: None,
            keywords: Vec::new(),
        }
    }

    /// Sets the district, dropping blank values.
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        let district = district.into();
        let trimmed = district.trim();
        self.district = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Sets keywords from a comma-separated string.
    pub fn with_keywords(mut self, raw: &str) -> Self {
        self.keywords = normalize_keywords(raw);
        self
    }

    /// Calendar day the entry was recorded on.
    pub fn recorded_on(&self) -> NaiveDate {
        self.recorded_at.date()
    }

    /// Validates entry invariants.
    ///
    /// # Errors
    /// - `NonPositiveId` when `id <= 0`.
    /// - `BlankDistrict` when `district` is `Some` but blank.
    /// - `InvalidKeyword` when a keyword is blank or duplicated.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id <= 0 {
            return Err(ItemValidationError::NonPositiveId(self.id));
        }
        if let Some(district) = &self.district {
            if district.trim().is_empty() {
                return Err(ItemValidationError::BlankDistrict);
            }
        }
        let mut seen = BTreeSet::new();
        for keyword in &self.keywords {
            if keyword.trim().is_empty() || !seen.insert(keyword.as_str()) {
                return Err(ItemValidationError::InvalidKeyword(keyword.clone()));
            }
        }
        Ok(())
    }
}

/// Entry invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    NonPositiveId(ItemId),
    BlankDistrict,
    InvalidKeyword(String),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "item id must be positive, got {id}"),
            Self::BlankDistrict => write!(f, "item district must not be blank"),
            Self::InvalidKeyword(value) => write!(f, "invalid keyword: `{value}`"),
        }
    }
}

impl Error for ItemValidationError {}

/// Splits a comma-separated keyword string into trimmed, unique entries.
///
/// Input order is preserved; the first occurrence of a duplicate wins.
pub fn normalize_keywords(raw: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    KEYWORD_SEPARATOR_RE
        .split(raw.trim())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.to_string()))
        .map(str::to_string)
        .collect()
}
