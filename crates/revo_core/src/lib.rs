//! Interaction core for the voice diary app.
//!
//! Owns the carousel, week navigation, waveform and blink state machines, plus
//! the SQLite-backed item source that feeds them. Hosts inject time, frame
//! scheduling and rendering through the traits in `animation` and `selection`.

pub mod animation;
pub mod calendar;
pub mod carousel;
pub mod config;
pub mod db;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screen;
pub mod selection;
pub mod service;

pub use animation::blink::{EyeBlinkTicker, EyeState, SharedBlink};
pub use animation::clock::{
    Clock, FixedClock, FrameScheduler, FrameToken, IntervalScheduler, ManualFrameScheduler,
    ManualIntervalScheduler, SystemClock, TimerToken,
};
pub use animation::engine::{
    EngineState, NodeHandle, RecordingSurface, RenderSurface, VisibleWave,
    WaveformAnimationEngine,
};
pub use animation::wave::{build_paths, WaveGeometry, WaveKind, WavePaths, WaveformItem};
pub use calendar::week::{DayCell, WeekPage, WeekWindow, WeeklyDateNavigator};
pub use carousel::controller::CarouselController;
pub use carousel::index::{CarouselIndexModel, CarouselState, VisibleItems, WrapMode};
pub use carousel::transition::{SlideFrame, SlidePhase, SlideTransitionAnimator};
pub use config::{ConfigError, MotionConfig};
pub use gesture::tracker::{
    AxisPolicy, GestureEnd, GestureTracker, Point, PointerEvent, SwipeDirection,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::item::{Emotion, Item, ItemId, ItemValidationError};
pub use model::palette::{emotion_color, wave_palette, Rgb};
pub use repo::item_repo::{
    ItemQuery, ItemRepository, ItemSource, RepoError, RepoResult, SqliteItemRepository,
    ViewPeriod,
};
pub use screen::{CarouselScreen, ScreenError, ScreenLayout, ScreenServices};
pub use selection::{NoopSink, SelectionEvent, SelectionLog, SelectionSink};
pub use service::archive::{summarize, ArchiveSummary};
pub use service::item_service::ItemService;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
