//! Procedural sine-wave geometry.
//!
//! # Responsibility
//! - Derive per-item wave parameters deterministically from the item id.
//! - Sample the wave and build stroke and fill path descriptors.
//!
//! # Invariants
//! - The same id always yields the same `WaveformItem` (no randomness).
//! - `sample(x, phase) == sample(x, phase + period)` for every `x`.
//! - Path descriptors are SVG path data in item-local coordinates.

use crate::config::MotionConfig;
use crate::model::item::{Emotion, Item, ItemId};
use crate::model::palette::{wave_palette, Rgb};
use std::f32::consts::TAU;
use std::fmt::Write as _;

const PHASE_SEED_MODULUS: i64 = 60;
const PHASE_SEED_STEP: i64 = 4;
const HEIGHT_LEVEL_MULTIPLIER: i64 = 7_919;
/// Upper bound on segments per wave, whatever the drawable width.
pub const MAX_WAVE_SAMPLES: usize = 2_048;

/// Which screen the wave is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveKind {
    /// Large circle on the emotion/location detail carousels.
    Detail,
    /// Small bubbles on the archive summary.
    Summary,
}

/// Phase offset that desynchronizes otherwise identical waves.
pub fn phase_seed(id: ItemId) -> f32 {
    (id.rem_euclid(PHASE_SEED_MODULUS) * PHASE_SEED_STEP) as f32
}

/// Index into the height level table for `id`.
pub fn height_level_index(id: ItemId, level_count: usize) -> usize {
    let count = level_count.max(1) as i64;
    let index = (id.rem_euclid(count) * HEIGHT_LEVEL_MULTIPLIER).rem_euclid(count);
    index as usize
}

/// Index into the emotion wave palette for `id`.
pub fn color_index(id: ItemId, palette_len: usize) -> usize {
    id.rem_euclid(palette_len.max(1) as i64) as usize
}

/// Per-item wave parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformItem {
    pub id: ItemId,
    pub emotion: Emotion,
    pub phase_seed: f32,
    pub amplitude: f32,
    /// Fill level in percent of the item height.
    pub height_level: u8,
    pub color_index: usize,
    pub wavelength: f32,
}

impl WaveformItem {
    /// Derives the wave for `id` from the configured constants.
    pub fn derive(id: ItemId, emotion: Emotion, kind: WaveKind, config: &MotionConfig) -> Self {
        let levels = &config.height_levels;
        let height_level = levels
            .get(height_level_index(id, levels.len()))
            .copied()
            .unwrap_or(50);
        let wavelength = match kind {
            WaveKind::Detail => config.detail_wavelength,
            WaveKind::Summary => config
                .summary_wavelengths
                .get(id.rem_euclid(config.summary_wavelengths.len().max(1) as i64) as usize)
                .copied()
                .unwrap_or(config.detail_wavelength),
        };
        Self {
            id,
            emotion,
            phase_seed: phase_seed(id),
            amplitude: config.wave_amplitude,
            height_level,
            color_index: color_index(id, wave_palette(emotion).len()),
            wavelength,
        }
    }

    pub fn from_item(item: &Item, kind: WaveKind, config: &MotionConfig) -> Self {
        Self::derive(item.id, item.emotion, kind, config)
    }

    /// Fill color picked from the emotion palette.
    pub fn color(&self) -> Rgb {
        let palette = wave_palette(self.emotion);
        palette[self.color_index % palette.len()]
    }

    /// Resting y coordinate of the wave inside an item of `height`.
    pub fn baseline(&self, height: f32) -> f32 {
        height * (1.0 - f32::from(self.height_level) / 100.0)
    }
}

/// Size of the drawable an item's wave is written to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveGeometry {
    pub width: f32,
    pub height: f32,
}

impl WaveGeometry {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Stroke and fill descriptors built from one set of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct WavePaths {
    /// Open wave line.
    pub stroke: String,
    /// Wave line closed down to the item's bottom edge.
    pub fill: String,
}

/// Phase of one item given the shared clock value.
pub fn item_phase(global_phase: f32, seed: f32, period: f32) -> f32 {
    (global_phase + seed).rem_euclid(period)
}

/// Wave height at `x` for `phase`; `phase` is reduced modulo `period` first.
pub fn sample(
    x: f32,
    phase: f32,
    baseline: f32,
    amplitude: f32,
    wavelength: f32,
    period: f32,
) -> f32 {
    let phase = phase.rem_euclid(period);
    let position = (x + phase).rem_euclid(wavelength);
    baseline - amplitude * (TAU * position / wavelength).sin()
}

/// Samples the wave across `geometry.width` at `wave_sample_step` increments.
///
/// The last sample always lands exactly on the right edge. Wide drawables
/// get a coarser step so a wave never exceeds `MAX_WAVE_SAMPLES` segments;
/// a non-finite or negative width collapses to the left edge.
pub fn sample_points(
    item: &WaveformItem,
    geometry: WaveGeometry,
    global_phase: f32,
    config: &MotionConfig,
) -> Vec<(f32, f32)> {
    let phase = item_phase(global_phase, item.phase_seed, config.wave_period);
    let baseline = item.baseline(geometry.height);
    let width = if geometry.width.is_finite() {
        geometry.width.max(0.0)
    } else {
        0.0
    };
    let step = config
        .wave_sample_step
        .max(width / MAX_WAVE_SAMPLES as f32);
    let steps = ((width / step).ceil() as usize).clamp(1, MAX_WAVE_SAMPLES);

    (0..=steps)
        .map(|index| {
            if index == steps {
                width
            } else {
                (index as f32 * step).min(width)
            }
        })
        .map(|x| {
            let y = sample(
                x,
                phase,
                baseline,
                item.amplitude,
                item.wavelength,
                config.wave_period,
            );
            (x, y)
        })
        .collect()
}

/// Builds both path descriptors for one item at `global_phase`.
pub fn build_paths(
    item: &WaveformItem,
    geometry: WaveGeometry,
    global_phase: f32,
    config: &MotionConfig,
) -> WavePaths {
    let points = sample_points(item, geometry, global_phase, config);
    let mut stroke = String::with_capacity(points.len() * 16);
    for (index, (x, y)) in points.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        if index > 0 {
            stroke.push(' ');
        }
        let _ = write!(stroke, "{command}{x:.2},{y:.2}");
    }

    let mut fill = stroke.clone();
    let _ = write!(
        fill,
        " L{:.2},{:.2} L0.00,{:.2} Z",
        geometry.width, geometry.height, geometry.height
    );
    WavePaths { stroke, fill }
}
