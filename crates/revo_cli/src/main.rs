//! CLI smoke probe.
//!
//! # Responsibility
//! - Verify `revo_core` linkage without the Flutter host.
//! - Print a deterministic carousel and wave trace driven by a fixed clock.

use chrono::NaiveDate;
use revo_core::{
    build_paths, CarouselScreen, Clock, Emotion, FixedClock, Item, ItemQuery, ItemSource,
    ManualFrameScheduler, ManualIntervalScheduler, MotionConfig, Point, PointerEvent,
    RecordingSurface, ScreenLayout, ScreenServices, SelectionLog, SharedBlink, WaveGeometry,
    WaveKind, WaveformItem,
};

fn main() {
    println!("revo_core ping={}", revo_core::ping());
    println!("revo_core version={}", revo_core::core_version());

    let Some(today) = NaiveDate::from_ymd_opt(2026, 10, 15) else {
        return;
    };
    let items = sample_items(today);
    let config = MotionConfig::default();

    let detail = match items.fetch_items(&ItemQuery::for_emotion(Emotion::Sadness)) {
        Ok(detail) => detail,
        Err(err) => {
            eprintln!("revo_core fetch failed: {err}");
            return;
        }
    };
    let mut clock = FixedClock::new(0, today);
    let services = ScreenServices {
        frames: ManualFrameScheduler::new(),
        blink: SharedBlink::new(config.blink_interval_ms, ManualIntervalScheduler::new()),
        surface: RecordingSurface::new(),
    };
    let mut screen =
        match CarouselScreen::new(detail, ScreenLayout::detail(), config.clone(), services) {
            Ok(screen) => screen,
            Err(err) => {
                eprintln!("revo_core screen failed: {err}");
                return;
            }
        };
    let mut sink = SelectionLog::default();

    screen.mount(clock.now_ms());
    screen.pointer_down(&PointerEvent::Mouse(Point::new(200.0, 40.0)));
    let direction = screen.pointer_move(&PointerEvent::Mouse(Point::new(120.0, 42.0)), clock.now_ms());
    screen.pointer_up();
    println!(
        "swipe direction={}",
        direction.map_or("none", |direction| direction.as_str())
    );

    while screen.controller().is_animating() {
        clock.advance(config.wave_tick_ms);
        let frame = screen.tick(clock.now_ms(), &mut sink);
        if let Some(token) = screen.engine().pending_frame() {
            screen.services_mut().frames.fire(token);
            screen.on_frame(token, clock.now_ms());
        }
        println!(
            "t={} offset={:.2} committed={:?}",
            clock.now_ms(),
            frame.offset,
            frame.committed
        );
    }
    println!(
        "current_index={} phase={:.2}",
        screen.controller().current_index(),
        screen.engine().global_phase()
    );
    screen.unmount();

    let wave = WaveformItem::derive(7, Emotion::Sadness, WaveKind::Detail, &config);
    let paths = build_paths(&wave, WaveGeometry::new(24.0, 24.0), 0.0, &config);
    println!(
        "wave id=7 seed={} level={} color={} stroke={}",
        wave.phase_seed,
        wave.height_level,
        wave.color().to_hex(),
        paths.stroke
    );
}

fn sample_items(today: NaiveDate) -> Vec<Item> {
    [(1, Emotion::Sadness, 8), (2, Emotion::Happy, 9), (3, Emotion::Sadness, 12), (4, Emotion::Sadness, 20)]
        .into_iter()
        .filter_map(|(id, emotion, hour)| {
            let at = today.and_hms_opt(hour, 0, 0)?;
            Some(Item::new(id, emotion, at))
        })
        .collect()
}
