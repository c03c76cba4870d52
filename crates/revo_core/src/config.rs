//! Motion and timing configuration for the interactive core.
//!
//! # Responsibility
//! - Carry the tunable constants used by gestures, transitions and waves.
//! - Validate host-supplied overrides before any component uses them.
//!
//! # Invariants
//! - `MotionConfig::default()` always passes `validate()`.
//! - `WaveformAnimationEngine` and `CarouselScreen` validate on construction;
//!   other components assume validated ranges and degrade rather than panic.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_SWIPE_THRESHOLD_PX: f32 = 50.0;
pub const DEFAULT_SLIDE_DURATION_MS: u64 = 300;
pub const DEFAULT_ITEM_WIDTH_PX: f32 = 231.0;
pub const DEFAULT_WAVE_TICK_MS: u64 = 33;
pub const DEFAULT_WAVE_PHASE_PER_TICK: f32 = 2.0;
pub const DEFAULT_WAVE_PERIOD: f32 = 240.0;
pub const DEFAULT_DETAIL_WAVELENGTH: f32 = 160.0;
pub const DEFAULT_WAVE_AMPLITUDE: f32 = 6.0;
pub const DEFAULT_WAVE_SAMPLE_STEP: f32 = 4.0;
pub const DEFAULT_BLINK_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_MAX_FRAME_GAP_MS: u64 = 132;

/// Tunable timing and geometry constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Minimum horizontal travel before a swipe fires.
    pub swipe_threshold_px: f32,
    pub slide_duration_ms: u64,
    /// Distance one slide transition travels.
    pub item_width_px: f32,
    /// Nominal frame cadence of the wave clock.
    pub wave_tick_ms: u64,
    /// Phase units the wave clock advances per nominal tick.
    pub wave_phase_per_tick: f32,
    /// Modulo period of the global wave phase.
    pub wave_period: f32,
    pub detail_wavelength: f32,
    /// Wavelength choices for summary waves, picked by item id.
    pub summary_wavelengths: Vec<f32>,
    pub wave_amplitude: f32,
    /// Horizontal distance between wave samples.
    pub wave_sample_step: f32,
    pub blink_interval_ms: u64,
    /// Discrete fill levels in percent of item height.
    pub height_levels: Vec<u8>,
    /// Frame gaps longer than this are clamped before phase integration.
    pub max_frame_gap_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            slide_duration_ms: DEFAULT_SLIDE_DURATION_MS,
            item_width_px: DEFAULT_ITEM_WIDTH_PX,
            wave_tick_ms: DEFAULT_WAVE_TICK_MS,
            wave_phase_per_tick: DEFAULT_WAVE_PHASE_PER_TICK,
            wave_period: DEFAULT_WAVE_PERIOD,
            detail_wavelength: DEFAULT_DETAIL_WAVELENGTH,
            summary_wavelengths: vec![60.0, 80.0, 120.0],
            wave_amplitude: DEFAULT_WAVE_AMPLITUDE,
            wave_sample_step: DEFAULT_WAVE_SAMPLE_STEP,
            blink_interval_ms: DEFAULT_BLINK_INTERVAL_MS,
            height_levels: vec![10, 30, 50, 70],
            max_frame_gap_ms: DEFAULT_MAX_FRAME_GAP_MS,
        }
    }
}

impl MotionConfig {
    /// Parses a JSON override document; missing fields keep their defaults.
    ///
    /// # Errors
    /// - `Parse` when the document is not valid JSON for this shape.
    /// - Any `validate()` error for out-of-range values.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every constant is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("swipe_threshold_px", self.swipe_threshold_px)?;
        positive("item_width_px", self.item_width_px)?;
        positive("wave_phase_per_tick", self.wave_phase_per_tick)?;
        positive("wave_period", self.wave_period)?;
        positive("detail_wavelength", self.detail_wavelength)?;
        positive("wave_amplitude", self.wave_amplitude)?;
        positive("wave_sample_step", self.wave_sample_step)?;
        nonzero("slide_duration_ms", self.slide_duration_ms)?;
        nonzero("wave_tick_ms", self.wave_tick_ms)?;
        nonzero("blink_interval_ms", self.blink_interval_ms)?;
        if self.max_frame_gap_ms < self.wave_tick_ms {
            return Err(ConfigError::OutOfRange {
                field: "max_frame_gap_ms",
                value: self.max_frame_gap_ms as f64,
            });
        }

        if self.summary_wavelengths.is_empty() {
            return Err(ConfigError::Empty("summary_wavelengths"));
        }
        for wavelength in &self.summary_wavelengths {
            positive("summary_wavelengths", *wavelength)?;
        }

        if self.height_levels.is_empty() {
            return Err(ConfigError::Empty("height_levels"));
        }
        if let Some(level) = self
            .height_levels
            .iter()
            .find(|level| **level == 0 || **level > 100)
        {
            return Err(ConfigError::OutOfRange {
                field: "height_levels",
                value: f64::from(*level),
            });
        }
        Ok(())
    }

    /// Phase units advanced per elapsed millisecond.
    pub fn phase_per_ms(&self) -> f32 {
        self.wave_phase_per_tick / self.wave_tick_ms as f32
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: f64::from(value),
        })
    }
}

fn nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::OutOfRange { field, value: 0.0 })
    } else {
        Ok(())
    }
}

/// Configuration rejection reasons.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Empty(&'static str),
    OutOfRange { field: &'static str, value: f64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid motion config: {message}"),
            Self::Empty(field) => write!(f, "motion config `{field}` must not be empty"),
            Self::OutOfRange { field, value } => {
                write!(f, "motion config `{field}` is out of range: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, MotionConfig};

    #[test]
    fn default_config_is_valid() {
        MotionConfig::default()
            .validate()
            .expect("defaults must validate");
    }

    #[test]
    fn json_overrides_keep_missing_defaults() {
        let config = MotionConfig::from_json_str(r#"{"swipe_threshold_px": 64.0}"#)
            .expect("partial override should parse");
        assert_eq!(config.swipe_threshold_px, 64.0);
        assert_eq!(config.slide_duration_ms, 300);
        assert_eq!(config.height_levels, vec![10, 30, 50, 70]);
    }

    #[test]
    fn rejects_zero_threshold_and_empty_levels() {
        let mut config = MotionConfig::default();
        config.swipe_threshold_px = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "swipe_threshold_px",
                ..
            })
        ));

        let mut config = MotionConfig::default();
        config.height_levels.clear();
        assert_eq!(config.validate(), Err(ConfigError::Empty("height_levels")));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = MotionConfig::from_json_str("{not json").expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn phase_rate_matches_nominal_tick() {
        let config = MotionConfig::default();
        let per_tick = config.phase_per_ms() * config.wave_tick_ms as f32;
        assert!((per_tick - 2.0).abs() < 1e-5);
    }
}
