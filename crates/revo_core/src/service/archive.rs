//! Archive tab statistics.
//!
//! # Invariants
//! - Every emotion appears in `emotion_counts`, in declaration order.
//! - `dominant_emotion` ties resolve to the earliest declared emotion.
//! - Items without a district are not counted per district.

use crate::model::item::{Emotion, Item};
use crate::repo::item_repo::ViewPeriod;
use serde::Serialize;
use std::collections::BTreeMap;

/// Minutes credited per recording when no duration is stored.
pub const MINUTES_PER_RECORDING: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionCount {
    pub emotion: Emotion,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictCount {
    pub district: String,
    pub count: usize,
}

/// Aggregates shown on the archive screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub period: ViewPeriod,
    pub total_records: usize,
    pub total_minutes: u64,
    pub emotion_counts: Vec<EmotionCount>,
    pub dominant_emotion: Option<Emotion>,
    /// Highest count first, then district name.
    pub district_counts: Vec<DistrictCount>,
}

impl ArchiveSummary {
    pub fn count_for(&self, emotion: Emotion) -> usize {
        self.emotion_counts
            .iter()
            .find(|entry| entry.emotion == emotion)
            .map_or(0, |entry| entry.count)
    }
}

/// Summarizes the items that fall inside `period`.
pub fn summarize(items: &[Item], period: ViewPeriod) -> ArchiveSummary {
    let mut per_emotion = [0usize; Emotion::ALL.len()];
    let mut per_district: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0usize;

    for item in items.iter().filter(|item| period.contains(item.recorded_at)) {
        total += 1;
        if let Some(slot) = Emotion::ALL.iter().position(|e| *e == item.emotion) {
            per_emotion[slot] += 1;
        }
        if let Some(district) = item.district.as_deref() {
            *per_district.entry(district).or_default() += 1;
        }
    }

    let emotion_counts = Emotion::ALL
        .iter()
        .zip(per_emotion)
        .map(|(emotion, count)| EmotionCount {
            emotion: *emotion,
            count,
        })
        .collect::<Vec<_>>();

    // `max_by_key` keeps the last maximum, so scan in reverse.
    let dominant_emotion = emotion_counts
        .iter()
        .rev()
        .filter(|entry| entry.count > 0)
        .max_by_key(|entry| entry.count)
        .map(|entry| entry.emotion);

    let mut district_counts = per_district
        .into_iter()
        .map(|(district, count)| DistrictCount {
            district: district.to_string(),
            count,
        })
        .collect::<Vec<_>>();
    district_counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.district.cmp(&b.district)));

    ArchiveSummary {
        period,
        total_records: total,
        total_minutes: total as u64 * MINUTES_PER_RECORDING,
        emotion_counts,
        dominant_emotion,
        district_counts,
    }
}
