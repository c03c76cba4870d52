//! Carousel screen lifecycle.
//!
//! # Responsibility
//! - Wire the carousel controller, wave engine and blink ticker together.
//! - Keep the wave engine's visible set in step with committed indexes.
//! - Release every timer, frame request and gesture session on unmount.
//!
//! # Invariants
//! - A screen only exists for a config that passed `MotionConfig::validate`.
//! - Each item keeps the same `NodeHandle` for the lifetime of the screen.
//! - After `unmount`, no frame is pending, the screen's blink face is
//!   released and no gesture session is open. The blink timer itself stops
//!   once no other screen sharing it is mounted.

use crate::animation::blink::{EyeState, SharedBlink};
use crate::animation::clock::{FrameScheduler, FrameToken, IntervalScheduler, TimerToken};
use crate::animation::engine::{NodeHandle, RenderSurface, VisibleWave, WaveformAnimationEngine};
use crate::animation::wave::{WaveGeometry, WaveKind, WaveformItem};
use crate::carousel::controller::CarouselController;
use crate::carousel::index::WrapMode;
use crate::carousel::transition::SlideFrame;
use crate::config::{ConfigError, MotionConfig};
use crate::gesture::tracker::{GestureEnd, PointerEvent, SwipeDirection};
use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{ItemQuery, ItemSource, RepoError};
use crate::selection::SelectionSink;
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Screen construction failure.
#[derive(Debug)]
pub enum ScreenError {
    Config(ConfigError),
    Source(RepoError),
}

impl Display for ScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "screen config rejected: {err}"),
            Self::Source(err) => write!(f, "screen items unavailable: {err}"),
        }
    }
}

impl Error for ScreenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Source(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ScreenError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for ScreenError {
    fn from(value: RepoError) -> Self {
        Self::Source(value)
    }
}

/// Static shape of a carousel screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    pub mode: WrapMode,
    pub kind: WaveKind,
    pub geometry: WaveGeometry,
}

impl ScreenLayout {
    /// Emotion/location detail: wrap-around circles.
    pub fn detail() -> Self {
        Self {
            mode: WrapMode::Wrap,
            kind: WaveKind::Detail,
            geometry: WaveGeometry::new(231.0, 231.0),
        }
    }

    /// Feed: bounded paging, no wrap-around.
    pub fn feed() -> Self {
        Self {
            mode: WrapMode::Clamp,
            ..Self::detail()
        }
    }
}

/// Host services injected into a screen.
///
/// `blink` is process-scoped: hand every screen a clone of the same
/// `SharedBlink` so all faces blink together on one timer.
#[derive(Debug, Clone, Default)]
pub struct ScreenServices<F, I, R> {
    pub frames: F,
    pub blink: SharedBlink<I>,
    pub surface: R,
}

/// One mounted carousel screen.
#[derive(Debug)]
pub struct CarouselScreen<F, I, R> {
    config: MotionConfig,
    layout: ScreenLayout,
    controller: CarouselController<Item>,
    engine: WaveformAnimationEngine,
    services: ScreenServices<F, I, R>,
    nodes: BTreeMap<ItemId, NodeHandle>,
    next_node: u64,
    mounted: bool,
}

impl<F, I, R> CarouselScreen<F, I, R>
where
    F: FrameScheduler,
    I: IntervalScheduler,
    R: RenderSurface,
{
    /// Builds an unmounted screen.
    ///
    /// # Errors
    /// - `ScreenError::Config` when `config` fails validation.
    pub fn new(
        items: Vec<Item>,
        layout: ScreenLayout,
        config: MotionConfig,
        services: ScreenServices<F, I, R>,
    ) -> Result<Self, ScreenError> {
        let engine = WaveformAnimationEngine::new(config.clone()).map_err(|err| {
            warn!("event=screen_open module=screen status=error reason=invalid_config");
            err
        })?;
        Ok(Self {
            controller: CarouselController::new(items, layout.mode, &config),
            engine,
            config,
            layout,
            services,
            nodes: BTreeMap::new(),
            next_node: 1,
            mounted: false,
        })
    }

    /// Builds a screen from the item source.
    ///
    /// # Errors
    /// - `ScreenError::Source` when the query fails.
    /// - `ScreenError::Config` when `config` fails validation.
    pub fn from_source(
        source: &dyn ItemSource,
        query: &ItemQuery,
        layout: ScreenLayout,
        config: MotionConfig,
        services: ScreenServices<F, I, R>,
    ) -> Result<Self, ScreenError> {
        let items = source.fetch_items(query)?;
        Self::new(items, layout, config, services)
    }

    pub fn controller(&self) -> &CarouselController<Item> {
        &self.controller
    }

    pub fn engine(&self) -> &WaveformAnimationEngine {
        &self.engine
    }

    pub fn blink(&self) -> &SharedBlink<I> {
        &self.services.blink
    }

    pub fn services(&self) -> &ScreenServices<F, I, R> {
        &self.services
    }

    /// Host access to the injected services, e.g. to fire a frame.
    pub fn services_mut(&mut self) -> &mut ScreenServices<F, I, R> {
        &mut self.services
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Handle assigned to `id` when it first became visible.
    pub fn node_for(&self, id: ItemId) -> Option<NodeHandle> {
        self.nodes.get(&id).copied()
    }

    /// Starts the blink timer and the wave loop for the visible items.
    pub fn mount(&mut self, now_ms: u64) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.services.blink.mount_face();
        self.sync_visible(now_ms);
        info!(
            "event=screen_mount module=screen status=ok len={}",
            self.controller.state().items().len()
        );
    }

    /// Cancels the frame loop, releases the blink face and drops any gesture.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.controller.teardown();
        self.engine.stop(&mut self.services.frames);
        self.services.blink.unmount_face();
        self.mounted = false;
        info!("event=screen_unmount module=screen status=ok");
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        self.mounted && self.controller.pointer_down(event)
    }

    pub fn pointer_move(&mut self, event: &PointerEvent, now_ms: u64) -> Option<SwipeDirection> {
        if !self.mounted {
            return None;
        }
        self.controller.pointer_move(event, now_ms)
    }

    pub fn pointer_up(&mut self) -> GestureEnd {
        self.controller.pointer_up()
    }

    /// Advances the slide transition; a commit refreshes the wave set.
    pub fn tick<S>(&mut self, now_ms: u64, sink: &mut S) -> SlideFrame
    where
        S: SelectionSink + ?Sized,
    {
        let frame = self.controller.tick(now_ms, sink);
        if frame.committed.is_some() && self.mounted {
            self.sync_visible(now_ms);
        }
        frame
    }

    /// Forwards a frame callback to the wave engine.
    pub fn on_frame(&mut self, token: FrameToken, now_ms: u64) -> bool {
        self.engine.on_frame(
            token,
            now_ms,
            &mut self.services.frames,
            &mut self.services.surface,
        )
    }

    /// Forwards a blink interval callback to the shared ticker.
    pub fn on_blink(&mut self, token: TimerToken) -> Option<EyeState> {
        self.services.blink.on_interval(token)
    }

    /// Rebuilds the carousel after the item list changed (e.g. a delete).
    pub fn replace_items(&mut self, items: Vec<Item>, now_ms: u64) {
        self.controller.replace_items(items);
        self.nodes
            .retain(|id, _| self.controller.state().items().iter().any(|item| item.id == *id));
        if self.mounted {
            self.sync_visible(now_ms);
        }
    }

    fn sync_visible(&mut self, now_ms: u64) {
        let waves = self.visible_waves();
        self.engine.set_visible(
            waves,
            now_ms,
            &mut self.services.frames,
            &mut self.services.surface,
        );
    }

    fn visible_waves(&mut self) -> Vec<VisibleWave> {
        let visible = self.controller.visible();
        let mut items: Vec<&Item> = Vec::with_capacity(3);
        for item in [visible.previous, visible.current, visible.next]
            .into_iter()
            .flatten()
        {
            if !items.iter().any(|seen| seen.id == item.id) {
                items.push(item);
            }
        }
        let derived = items
            .into_iter()
            .map(|item| WaveformItem::from_item(item, self.layout.kind, &self.config))
            .collect::<Vec<_>>();

        derived
            .into_iter()
            .map(|item| {
                let node = *self.nodes.entry(item.id).or_insert_with(|| {
                    let node = NodeHandle(self.next_node);
                    self.next_node += 1;
                    node
                });
                VisibleWave {
                    item,
                    node,
                    geometry: self.layout.geometry,
                }
            })
            .collect()
    }
}
