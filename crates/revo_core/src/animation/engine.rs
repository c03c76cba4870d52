//! Shared wave clock that writes geometry straight to render nodes.
//!
//! # Responsibility
//! - Advance one global phase per frame, scaled by elapsed time.
//! - Rebuild every visible item's wave and write it to that item's node.
//! - Start, stop and degrade cleanly as the visible set or host changes.
//!
//! # Invariants
//! - At most one frame request is pending at any time.
//! - Writes go through `RenderSurface`, never through the view model.
//! - Without a frame primitive the last computed geometry stays on screen.
//!
//! # See also
//! - `animation::wave` for the geometry itself.

use crate::animation::clock::{FrameScheduler, FrameToken};
use crate::animation::wave::{build_paths, WaveGeometry, WavePaths, WaveformItem};
use crate::config::{ConfigError, MotionConfig};
use log::{info, trace, warn};
use std::collections::BTreeMap;

/// Stable handle of a mounted drawable, obtained once when the item mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(pub u64);

/// Imperative write target for wave geometry.
pub trait RenderSurface {
    /// Replaces the stroke and fill geometry of `node`.
    fn write_wave(&mut self, node: NodeHandle, paths: &WavePaths);
}

/// Surface that keeps every write, for hosts that diff later and for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub writes: Vec<(NodeHandle, WavePaths)>,
    latest: BTreeMap<NodeHandle, WavePaths>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent geometry written to `node`.
    pub fn latest(&self, node: NodeHandle) -> Option<&WavePaths> {
        self.latest.get(&node)
    }

    pub fn write_count(&self, node: NodeHandle) -> usize {
        self.writes.iter().filter(|(handle, _)| *handle == node).count()
    }
}

impl RenderSurface for RecordingSurface {
    fn write_wave(&mut self, node: NodeHandle, paths: &WavePaths) {
        self.writes.push((node, paths.clone()));
        self.latest.insert(node, paths.clone());
    }
}

/// One wave currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleWave {
    pub item: WaveformItem,
    pub node: NodeHandle,
    pub geometry: WaveGeometry,
}

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Running,
    /// No frame primitive; geometry is static.
    Degraded,
}

/// Per-frame wave animator shared by all visible items of a screen.
#[derive(Debug, Clone)]
pub struct WaveformAnimationEngine {
    config: MotionConfig,
    global_phase: f32,
    last_frame_ms: Option<u64>,
    visible: Vec<VisibleWave>,
    pending: Option<FrameToken>,
    state: EngineState,
}

impl WaveformAnimationEngine {
    /// Creates a stopped engine.
    ///
    /// # Errors
    /// - Any `MotionConfig::validate` error; the engine divides by the
    ///   period, tick length and sample step.
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            global_phase: 0.0,
            last_frame_ms: None,
            visible: Vec::new(),
            pending: None,
            state: EngineState::Stopped,
        })
    }

    pub fn global_phase(&self) -> f32 {
        self.global_phase
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn visible(&self) -> &[VisibleWave] {
        &self.visible
    }

    /// Replaces the visible set.
    ///
    /// New geometry is written immediately. An empty set stops the engine; a
    /// non-empty set starts it when stopped.
    pub fn set_visible(
        &mut self,
        waves: Vec<VisibleWave>,
        now_ms: u64,
        scheduler: &mut dyn FrameScheduler,
        surface: &mut dyn RenderSurface,
    ) {
        self.visible = waves;
        if self.visible.is_empty() {
            self.stop(scheduler);
            return;
        }
        self.render_all(surface);
        if self.state == EngineState::Stopped {
            self.start(now_ms, scheduler, surface);
        }
    }

    /// Starts the frame loop. Falls back to static geometry without a frame primitive.
    pub fn start(
        &mut self,
        now_ms: u64,
        scheduler: &mut dyn FrameScheduler,
        surface: &mut dyn RenderSurface,
    ) {
        if self.is_running() {
            return;
        }
        self.last_frame_ms = Some(now_ms);
        match scheduler.request_frame() {
            Some(token) => {
                self.pending = Some(token);
                self.state = EngineState::Running;
                info!(
                    "event=wave_start module=animation status=ok visible={}",
                    self.visible.len()
                );
            }
            None => self.degrade(surface),
        }
    }

    /// Handles one frame callback.
    ///
    /// Returns `false` for stale or cancelled tokens, which are ignored.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        now_ms: u64,
        scheduler: &mut dyn FrameScheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        if self.pending != Some(token) {
            trace!("event=wave_frame module=animation status=ignored reason=stale");
            return false;
        }
        self.pending = None;

        let last = self.last_frame_ms.unwrap_or(now_ms);
        let elapsed = now_ms.saturating_sub(last).min(self.config.max_frame_gap_ms);
        self.advance(elapsed);
        self.last_frame_ms = Some(now_ms);
        self.render_all(surface);

        match scheduler.request_frame() {
            Some(next) => self.pending = Some(next),
            None => self.degrade(surface),
        }
        true
    }

    /// Cancels the pending frame and stops the loop. Idempotent.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(token) = self.pending.take() {
            scheduler.cancel_frame(token);
        }
        if self.state != EngineState::Stopped {
            info!("event=wave_stop module=animation status=ok");
        }
        self.state = EngineState::Stopped;
        self.last_frame_ms = None;
    }

    fn advance(&mut self, elapsed_ms: u64) {
        let delta = self.config.phase_per_ms() * elapsed_ms as f32;
        self.global_phase = (self.global_phase + delta).rem_euclid(self.config.wave_period);
    }

    fn degrade(&mut self, surface: &mut dyn RenderSurface) {
        warn!(
            "event=wave_start module=animation status=degraded reason=no_frame_primitive visible={}",
            self.visible.len()
        );
        self.pending = None;
        self.state = EngineState::Degraded;
        self.render_all(surface);
    }

    fn render_all(&self, surface: &mut dyn RenderSurface) {
        for wave in &self.visible {
            let paths = build_paths(&wave.item, wave.geometry, self.global_phase, &self.config);
            surface.write_wave(wave.node, &paths);
        }
        trace!(
            "event=wave_render module=animation status=ok visible={} phase={:.2}",
            self.visible.len(),
            self.global_phase
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineState, NodeHandle, RecordingSurface, VisibleWave, WaveformAnimationEngine};
    use crate::animation::clock::{FrameScheduler, ManualFrameScheduler};
    use crate::animation::wave::{WaveGeometry, WaveKind, WaveformItem};
    use crate::config::{ConfigError, MotionConfig};
    use crate::model::item::Emotion;

    fn default_engine() -> WaveformAnimationEngine {
        WaveformAnimationEngine::new(MotionConfig::default()).expect("valid config")
    }

    fn waves(ids: &[i64]) -> Vec<VisibleWave> {
        let config = MotionConfig::default();
        ids.iter()
            .map(|id| VisibleWave {
                item: WaveformItem::derive(*id, Emotion::Happy, WaveKind::Detail, &config),
                node: NodeHandle(*id as u64),
                geometry: WaveGeometry::new(231.0, 231.0),
            })
            .collect()
    }

    #[test]
    fn frames_advance_phase_by_elapsed_time() {
        let mut engine = default_engine();
        let mut scheduler = ManualFrameScheduler::new();
        let mut surface = RecordingSurface::new();
        engine.set_visible(waves(&[1, 2, 3]), 0, &mut scheduler, &mut surface);
        assert!(engine.is_running());
        assert_eq!(surface.writes.len(), 3);

        let token = engine.pending_frame().expect("frame requested");
        assert!(scheduler.fire(token));
        assert!(engine.on_frame(token, 33, &mut scheduler, &mut surface));
        assert!((engine.global_phase() - 2.0).abs() < 1e-4);
        assert_eq!(surface.writes.len(), 6);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn long_gaps_are_clamped_and_phase_wraps() {
        let config = MotionConfig::default();
        let max_gap = config.max_frame_gap_ms;
        let mut engine = WaveformAnimationEngine::new(config.clone()).expect("valid config");
        let mut scheduler = ManualFrameScheduler::new();
        let mut surface = RecordingSurface::new();
        engine.set_visible(waves(&[1]), 0, &mut scheduler, &mut surface);

        let per_frame = config.phase_per_ms() * max_gap as f32;
        let mut now = 0;
        for frame in 0..200 {
            let token = engine.pending_frame().expect("running");
            scheduler.fire(token);
            now += 10_000;
            engine.on_frame(token, now, &mut scheduler, &mut surface);
            if frame == 0 {
                assert!((engine.global_phase() - per_frame).abs() < 1e-3);
            }
            assert!(engine.global_phase() >= 0.0 && engine.global_phase() < config.wave_period);
        }
    }

    #[test]
    fn stale_tokens_are_ignored() {
        let mut engine = default_engine();
        let mut scheduler = ManualFrameScheduler::new();
        let mut surface = RecordingSurface::new();
        engine.set_visible(waves(&[1]), 0, &mut scheduler, &mut surface);
        let token = engine.pending_frame().expect("running");
        engine.stop(&mut scheduler);

        assert!(!engine.on_frame(token, 33, &mut scheduler, &mut surface));
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn missing_frame_primitive_renders_once_and_degrades() {
        let mut engine = default_engine();
        let mut scheduler = ManualFrameScheduler::unavailable();
        let mut surface = RecordingSurface::new();
        engine.set_visible(waves(&[5]), 0, &mut scheduler, &mut surface);

        assert_eq!(engine.state(), EngineState::Degraded);
        assert!(surface.latest(NodeHandle(5)).is_some());
        assert!(scheduler.request_frame().is_none());
    }

    #[test]
    fn empty_visible_set_stops_and_cancels() {
        let mut engine = default_engine();
        let mut scheduler = ManualFrameScheduler::new();
        let mut surface = RecordingSurface::new();
        engine.set_visible(waves(&[1, 2]), 0, &mut scheduler, &mut surface);
        engine.set_visible(Vec::new(), 10, &mut scheduler, &mut surface);

        assert_eq!(engine.state(), EngineState::Stopped);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn replacing_visible_set_keeps_single_pending_frame() {
        let mut engine = default_engine();
        let mut scheduler = ManualFrameScheduler::new();
        let mut surface = RecordingSurface::new();
        engine.set_visible(waves(&[1, 2, 3]), 0, &mut scheduler, &mut surface);
        engine.set_visible(waves(&[2, 3, 4]), 5, &mut scheduler, &mut surface);

        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(surface.write_count(NodeHandle(4)), 1);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = MotionConfig::default();
        config.wave_sample_step = 0.0;
        assert!(matches!(
            WaveformAnimationEngine::new(config),
            Err(ConfigError::OutOfRange {
                field: "wave_sample_step",
                ..
            })
        ));

        let mut config = MotionConfig::default();
        config.wave_period = 0.0;
        assert!(WaveformAnimationEngine::new(config).is_err());
    }
}
