//! Flutter-facing API over the interaction core.
//!
//! # Responsibility
//! - Expose carousel sessions, wave geometry and week cells as sync calls.
//! - Expose recording queries backed by the SQLite item source.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Unknown or closed carousel handles produce inert responses.
//! - Sessions carry item ids only; item text never crosses into logs.

use chrono::NaiveDate;
use log::{debug, warn};
use once_cell::sync::Lazy;
use revo_core::animation::wave::{build_paths, phase_seed, WaveGeometry, WaveKind, WaveformItem};
use revo_core::calendar::week::{day_cells_for_dates, WeekWindow};
use revo_core::db::open_db;
use revo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CarouselController, Emotion, GestureEnd, ItemQuery, ItemService, MotionConfig, Point,
    PointerEvent, SelectionLog, SqliteItemRepository, ViewPeriod, WrapMode,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

const DB_FILE_NAME: &str = "revo_recordings.sqlite3";
const DATE_FORMAT: &str = "%Y-%m-%d";
const LIST_DEFAULT_LIMIT: u32 = 100;
const LIST_LIMIT_MAX: u32 = 500;
/// Largest drawable edge accepted by `wave_paths`, in logical pixels.
const MAX_WAVE_EXTENT_PX: f64 = 4_096.0;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);
static SESSIONS: Lazy<Mutex<BTreeMap<u64, CarouselController<i64>>>> =
    Lazy::new(|| Mutex::new(BTreeMap::new()));

/// Health check.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Starts rolling file logs.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Carousel snapshot returned by every session call.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselSnapshot {
    /// `false` when the handle is unknown or closed.
    pub ok: bool,
    pub handle: u64,
    pub len: u32,
    pub current_index: u32,
    pub previous_id: Option<i64>,
    pub current_id: Option<i64>,
    pub next_id: Option<i64>,
    pub animating: bool,
    /// Horizontal slide offset in px; `0` when idle.
    pub offset: f64,
    /// Index committed by this call, if any.
    pub committed_index: Option<u32>,
}

impl CarouselSnapshot {
    fn inert(handle: u64) -> Self {
        Self {
            ok: false,
            handle,
            len: 0,
            current_index: 0,
            previous_id: None,
            current_id: None,
            next_id: None,
            animating: false,
            offset: 0.0,
            committed_index: None,
        }
    }

    fn of(handle: u64, controller: &CarouselController<i64>) -> Self {
        let visible = controller.visible();
        Self {
            ok: true,
            handle,
            len: to_u32(controller.state().items().len()),
            current_index: to_u32(controller.current_index()),
            previous_id: visible.previous.copied(),
            current_id: visible.current.copied(),
            next_id: visible.next.copied(),
            animating: controller.is_animating(),
            offset: 0.0,
            committed_index: None,
        }
    }
}

/// Opens a carousel session over `item_ids`.
///
/// `wrap = false` selects bounded paging (feed screen).
#[flutter_rust_bridge::frb(sync)]
pub fn carousel_open(item_ids: Vec<i64>, wrap: bool) -> CarouselSnapshot {
    let mode = if wrap { WrapMode::Wrap } else { WrapMode::Clamp };
    let controller = CarouselController::new(item_ids, mode, &MotionConfig::default());
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    let snapshot = CarouselSnapshot::of(handle, &controller);

    match SESSIONS.lock() {
        Ok(mut sessions) => {
            sessions.insert(handle, controller);
            debug!(
                "event=carousel_open module=ffi status=ok handle={handle} len={}",
                snapshot.len
            );
            snapshot
        }
        Err(_) => {
            warn!("event=carousel_open module=ffi status=error reason=registry_poisoned");
            CarouselSnapshot::inert(handle)
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn carousel_pointer_down(handle: u64, x: f64, y: f64) -> bool {
    with_session(handle, |controller| {
        controller.pointer_down(&mouse(x, y))
    })
    .unwrap_or(false)
}

/// Returns `advance`, `retreat` or an empty string when no transition started.
#[flutter_rust_bridge::frb(sync)]
pub fn carousel_pointer_move(handle: u64, x: f64, y: f64, now_ms: u64) -> String {
    with_session(handle, |controller| {
        controller
            .pointer_move(&mouse(x, y), now_ms)
            .map(|direction| direction.as_str().to_string())
    })
    .flatten()
    .unwrap_or_default()
}

/// Returns `idle`, `swiped` or `tap`.
#[flutter_rust_bridge::frb(sync)]
pub fn carousel_pointer_up(handle: u64) -> String {
    let end = with_session(handle, CarouselController::pointer_up).unwrap_or(GestureEnd::Idle);
    match end {
        GestureEnd::Idle => "idle",
        GestureEnd::Swiped => "swiped",
        GestureEnd::Tap(_) => "tap",
    }
    .to_string()
}

/// Advances the slide transition to `now_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn carousel_tick(handle: u64, now_ms: u64) -> CarouselSnapshot {
    with_session(handle, |controller| {
        let mut sink = SelectionLog::default();
        let frame = controller.tick(now_ms, &mut sink);
        let mut snapshot = CarouselSnapshot::of(handle, controller);
        snapshot.offset = f64::from(frame.offset);
        snapshot.committed_index = frame.committed.map(to_u32);
        snapshot
    })
    .unwrap_or_else(|| CarouselSnapshot::inert(handle))
}

/// Closes a session. Closing an unknown handle returns `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn carousel_close(handle: u64) -> bool {
    let Ok(mut sessions) = SESSIONS.lock() else {
        return false;
    };
    match sessions.remove(&handle) {
        Some(mut controller) => {
            controller.teardown();
            debug!("event=carousel_close module=ffi status=ok handle={handle}");
            true
        }
        None => false,
    }
}

/// Deterministic wave parameters for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSeed {
    pub id: i64,
    pub phase_seed: f64,
    pub height_level: u32,
}

#[flutter_rust_bridge::frb(sync)]
pub fn wave_seed(id: i64) -> WaveSeed {
    let config = MotionConfig::default();
    let item = WaveformItem::derive(id, Emotion::Normal, WaveKind::Detail, &config);
    WaveSeed {
        id,
        phase_seed: f64::from(phase_seed(id)),
        height_level: u32::from(item.height_level),
    }
}

/// Wave geometry envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavePathsResponse {
    pub ok: bool,
    pub stroke: String,
    pub fill: String,
    /// `#rrggbb` fill color.
    pub color: String,
    pub message: String,
}

impl WavePathsResponse {
    fn rejected(message: String) -> Self {
        Self {
            ok: false,
            stroke: String::new(),
            fill: String::new(),
            color: String::new(),
            message,
        }
    }
}

/// Builds stroke and fill paths for one detail wave at `global_phase`.
///
/// # FFI contract
/// - `width` and `height` must be finite and at most `MAX_WAVE_EXTENT_PX`.
/// - `global_phase` must be finite; any finite value wraps into the period.
#[flutter_rust_bridge::frb(sync)]
pub fn wave_paths(
    id: i64,
    emotion: String,
    global_phase: f64,
    width: f64,
    height: f64,
) -> WavePathsResponse {
    let Some(emotion) = Emotion::parse(&emotion) else {
        return WavePathsResponse::rejected(format!("unknown emotion `{}`", emotion.trim()));
    };
    if !global_phase.is_finite() {
        return WavePathsResponse::rejected("global_phase must be finite".to_string());
    }
    if !within_extent(width) || !within_extent(height) {
        return WavePathsResponse::rejected(format!(
            "width and height must be finite and in (0, {MAX_WAVE_EXTENT_PX}]"
        ));
    }

    let config = MotionConfig::default();
    let item = WaveformItem::derive(id, emotion, WaveKind::Detail, &config);
    let geometry = WaveGeometry::new(width as f32, height as f32);
    let paths = build_paths(&item, geometry, global_phase as f32, &config);
    WavePathsResponse {
        ok: true,
        stroke: paths.stroke,
        fill: paths.fill,
        color: item.color().to_hex(),
        message: String::new(),
    }
}

/// One week strip cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCellView {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub is_selected: bool,
    pub is_today: bool,
    pub is_future: bool,
    pub has_recording: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekCellsResponse {
    pub ok: bool,
    pub cells: Vec<DayCellView>,
    pub message: String,
}

/// Builds the seven cells of the week containing `start_of_week`.
///
/// Dates use `YYYY-MM-DD`; `today` is also the selected day. Malformed
/// recorded dates are skipped.
#[flutter_rust_bridge::frb(sync)]
pub fn week_cells(
    today: String,
    start_of_week: String,
    recorded_dates: Vec<String>,
) -> WeekCellsResponse {
    let parsed = parse_date(&today).and_then(|today| Ok((today, parse_date(&start_of_week)?)));
    let (today, start) = match parsed {
        Ok(dates) => dates,
        Err(message) => {
            return WeekCellsResponse {
                ok: false,
                cells: Vec::new(),
                message,
            }
        }
    };

    let recorded = recorded_dates
        .iter()
        .filter_map(|raw| parse_date(raw).ok())
        .collect::<BTreeSet<_>>();
    let window = WeekWindow::new(start, today);
    let cells = day_cells_for_dates(&window, today, &recorded)
        .into_iter()
        .map(|cell| DayCellView {
            date: cell.date.format(DATE_FORMAT).to_string(),
            is_selected: cell.is_selected,
            is_today: cell.is_today,
            is_future: cell.is_future,
            has_recording: cell.has_recording,
        })
        .collect();
    WeekCellsResponse {
        ok: true,
        cells,
        message: String::new(),
    }
}

/// One recording row for list and carousel screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingView {
    pub id: i64,
    pub emotion: String,
    /// `YYYY-MM-DD HH:MM:SS`, local time.
    pub recorded_at: String,
    pub district: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingListResponse {
    pub ok: bool,
    pub items: Vec<RecordingView>,
    pub applied_limit: u32,
    pub message: String,
}

/// Lists recordings in carousel order.
///
/// `year` and `month` must be given together to filter by month.
#[flutter_rust_bridge::frb(sync)]
pub fn recording_list(
    emotion: Option<String>,
    district: Option<String>,
    year: Option<i32>,
    month: Option<u32>,
    limit: Option<u32>,
) -> RecordingListResponse {
    let applied_limit = normalize_limit(limit);
    let failure = |message: String| RecordingListResponse {
        ok: false,
        items: Vec::new(),
        applied_limit,
        message,
    };

    let emotion = match emotion.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match Emotion::parse(raw) {
            Some(emotion) => Some(emotion),
            None => return failure(format!("unknown emotion `{raw}`")),
        },
        None => None,
    };
    let query = ItemQuery {
        emotion,
        district: district.filter(|value| !value.trim().is_empty()),
        period: period_of(year, month),
        limit: Some(applied_limit),
    };

    match with_item_service(|service| service.items(&query)) {
        Ok(items) => RecordingListResponse {
            ok: true,
            items: items
                .into_iter()
                .map(|item| RecordingView {
                    id: item.id,
                    emotion: item.emotion.as_str().to_string(),
                    recorded_at: item.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    district: item.district,
                    keywords: item.keywords,
                })
                .collect(),
            applied_limit,
            message: String::new(),
        },
        Err(message) => failure(message),
    }
}

/// Deletes one recording. Returns an empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn recording_delete(id: i64) -> String {
    match with_item_service(|service| service.delete(id)) {
        Ok(()) => String::new(),
        Err(message) => message,
    }
}

/// Archive statistics envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummaryView {
    pub ok: bool,
    pub total_records: u32,
    pub total_minutes: u64,
    /// `(emotion, count)` in emotion declaration order.
    pub emotion_counts: Vec<(String, u32)>,
    pub dominant_emotion: Option<String>,
    pub district_counts: Vec<(String, u32)>,
    pub message: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn archive_summary(year: Option<i32>, month: Option<u32>) -> ArchiveSummaryView {
    match with_item_service(|service| service.archive_summary(period_of(year, month))) {
        Ok(summary) => ArchiveSummaryView {
            ok: true,
            total_records: to_u32(summary.total_records),
            total_minutes: summary.total_minutes,
            emotion_counts: summary
                .emotion_counts
                .iter()
                .map(|entry| (entry.emotion.as_str().to_string(), to_u32(entry.count)))
                .collect(),
            dominant_emotion: summary
                .dominant_emotion
                .map(|emotion| emotion.as_str().to_string()),
            district_counts: summary
                .district_counts
                .into_iter()
                .map(|entry| (entry.district, to_u32(entry.count)))
                .collect(),
            message: String::new(),
        },
        Err(message) => ArchiveSummaryView {
            ok: false,
            total_records: 0,
            total_minutes: 0,
            emotion_counts: Vec::new(),
            dominant_emotion: None,
            district_counts: Vec::new(),
            message,
        },
    }
}

fn with_session<T>(handle: u64, f: impl FnOnce(&mut CarouselController<i64>) -> T) -> Option<T> {
    let mut sessions = match SESSIONS.lock() {
        Ok(sessions) => sessions,
        Err(_) => {
            warn!("event=carousel_call module=ffi status=error reason=registry_poisoned");
            return None;
        }
    };
    match sessions.get_mut(&handle) {
        Some(controller) => Some(f(controller)),
        None => {
            debug!("event=carousel_call module=ffi status=ignored reason=unknown_handle handle={handle}");
            None
        }
    }
}

fn with_item_service<T>(
    f: impl FnOnce(&ItemService<SqliteItemRepository<'_>>) -> revo_core::RepoResult<T>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("recordings DB open failed: {err}"))?;
    let service = ItemService::new(SqliteItemRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("REVO_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn period_of(year: Option<i32>, month: Option<u32>) -> ViewPeriod {
    match (year, month) {
        (Some(year), Some(month)) => ViewPeriod::Monthly { year, month },
        _ => ViewPeriod::All,
    }
}

fn normalize_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => LIST_DEFAULT_LIMIT,
        Some(value) => value.min(LIST_LIMIT_MAX),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date `{}`; expected YYYY-MM-DD", raw.trim()))
}

fn mouse(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Mouse(Point::new(x as f32, y as f32))
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn within_extent(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= MAX_WAVE_EXTENT_PX
}

#[cfg(test)]
mod tests {
    use super::{
        carousel_close, carousel_open, carousel_pointer_down, carousel_pointer_move,
        carousel_pointer_up, carousel_tick, core_version, init_logging, normalize_limit, ping,
        wave_paths, wave_seed, week_cells,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/revo-logs".to_string()).is_empty());
    }

    #[test]
    fn carousel_session_swipes_and_commits() {
        let opened = carousel_open(vec![11, 22, 33], true);
        assert!(opened.ok);
        assert_eq!(opened.current_id, Some(11));
        assert_eq!(opened.previous_id, Some(33));

        let handle = opened.handle;
        assert!(carousel_pointer_down(handle, 200.0, 10.0));
        assert_eq!(carousel_pointer_move(handle, 120.0, 12.0, 1_000), "advance");
        assert_eq!(carousel_pointer_up(handle), "swiped");

        let mid = carousel_tick(handle, 1_150);
        assert!(mid.animating);
        assert!(mid.offset < 0.0);

        let done = carousel_tick(handle, 1_300);
        assert_eq!(done.committed_index, Some(1));
        assert_eq!(done.current_id, Some(22));
        assert_eq!(done.offset, 0.0);

        assert!(carousel_close(handle));
        assert!(!carousel_close(handle));
    }

    #[test]
    fn unknown_handle_is_inert() {
        assert!(!carousel_pointer_down(u64::MAX, 0.0, 0.0));
        assert_eq!(carousel_pointer_move(u64::MAX, 90.0, 0.0, 0), "");
        assert_eq!(carousel_pointer_up(u64::MAX), "idle");
        assert!(!carousel_tick(u64::MAX, 0).ok);
    }

    #[test]
    fn bounded_session_ignores_swipe_past_start() {
        let opened = carousel_open(vec![1, 2], false);
        let handle = opened.handle;
        carousel_pointer_down(handle, 100.0, 0.0);
        assert_eq!(carousel_pointer_move(handle, 180.0, 0.0, 0), "");
        carousel_close(handle);
    }

    #[test]
    fn wave_seed_and_paths_are_deterministic() {
        let seed = wave_seed(7);
        assert_eq!(seed.phase_seed, 28.0);
        assert_eq!(seed.height_level, 30);

        let first = wave_paths(7, "슬픔".to_string(), 12.0, 231.0, 231.0);
        let second = wave_paths(7, "sadness".to_string(), 12.0, 231.0, 231.0);
        assert!(first.ok);
        assert_eq!(first, second);
        assert!(first.fill.ends_with('Z'));

        assert!(!wave_paths(7, "bored".to_string(), 0.0, 10.0, 10.0).ok);
        assert!(!wave_paths(7, "happy".to_string(), 0.0, 0.0, 10.0).ok);
    }

    #[test]
    fn wave_paths_rejects_non_finite_and_oversized_geometry() {
        let infinite = wave_paths(7, "슬픔".to_string(), 0.0, f64::INFINITY, 231.0);
        assert!(!infinite.ok);
        assert!(infinite.stroke.is_empty());
        assert!(!wave_paths(7, "슬픔".to_string(), 0.0, 231.0, f64::NAN).ok);
        assert!(!wave_paths(7, "슬픔".to_string(), 0.0, 4.0e7, 231.0).ok);

        let phase = wave_paths(7, "슬픔".to_string(), f64::NAN, 231.0, 231.0);
        assert!(!phase.ok);
        assert!(phase.message.contains("global_phase"));
        assert!(!wave_paths(7, "슬픔".to_string(), f64::NEG_INFINITY, 231.0, 231.0).ok);
    }

    #[test]
    fn wave_paths_output_stays_bounded_at_max_extent() {
        let widest = wave_paths(7, "happy".to_string(), 1.0e9, 4_096.0, 4_096.0);
        assert!(widest.ok);
        assert!(widest.stroke.len() < 64 * 1024);
        assert!(widest.fill.ends_with(" L4096.00,4096.00 L0.00,4096.00 Z"));
    }

    #[test]
    fn week_cells_marks_recordings_and_future_days() {
        let response = week_cells(
            "2026-10-15".to_string(),
            "2026-10-11".to_string(),
            vec!["2026-10-13".to_string(), "garbage".to_string()],
        );
        assert!(response.ok);
        assert_eq!(response.cells.len(), 7);
        assert!(response.cells[2].has_recording);
        assert!(response.cells[4].is_today);
        assert!(response.cells[6].is_future);

        assert!(!week_cells("tomorrow".to_string(), "2026-10-11".to_string(), Vec::new()).ok);
    }

    #[test]
    fn list_limit_is_normalized() {
        assert_eq!(normalize_limit(None), 100);
        assert_eq!(normalize_limit(Some(0)), 100);
        assert_eq!(normalize_limit(Some(9_999)), 500);
        assert_eq!(normalize_limit(Some(20)), 20);
    }
}
