use chrono::{Datelike, NaiveDate, Weekday};
use revo_core::calendar::week::day_cells;
use revo_core::{
    Emotion, Item, MotionConfig, Point, PointerEvent, SelectionEvent, SelectionLog,
    SwipeDirection, WeeklyDateNavigator,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

fn drag(nav: &mut WeeklyDateNavigator, dx: f32, dy: f32, today: NaiveDate) -> Option<SwipeDirection> {
    nav.pointer_down(&PointerEvent::Mouse(Point::new(150.0, 20.0)));
    let page = nav.pointer_move(&PointerEvent::Mouse(Point::new(150.0 + dx, 20.0 + dy)), today);
    nav.pointer_up(None, today, &mut SelectionLog::default());
    page.map(|page| page.direction)
}

#[test]
fn paging_back_then_forward_never_passes_current_week() {
    let today = date(10, 15);
    let mut nav = WeeklyDateNavigator::new(today, &MotionConfig::default());

    for _ in 0..3 {
        assert_eq!(drag(&mut nav, 90.0, 0.0, today), Some(SwipeDirection::Retreat));
    }
    assert_eq!(nav.window().start_of_week(), date(9, 20));

    let mut forward = 0;
    while drag(&mut nav, -90.0, 0.0, today).is_some() {
        forward += 1;
    }
    assert_eq!(forward, 3);
    assert_eq!(nav.window().start_of_week(), date(10, 11));
    assert_eq!(nav.window().start_of_week().weekday(), Weekday::Sun);
}

#[test]
fn mostly_vertical_drag_is_ignored() {
    let today = date(10, 15);
    let mut nav = WeeklyDateNavigator::new(today, &MotionConfig::default());
    assert_eq!(drag(&mut nav, 60.0, 80.0, today), None);
    assert_eq!(nav.window().start_of_week(), date(10, 11));
}

#[test]
fn tapped_day_in_past_week_is_selected_and_reported() {
    let today = date(10, 15);
    let mut nav = WeeklyDateNavigator::new(today, &MotionConfig::default());
    let mut sink = SelectionLog::default();
    nav.page_back();

    nav.pointer_down(&PointerEvent::Touch(vec![Point::new(30.0, 10.0)]));
    let selected = nav.pointer_up(Some(6), today, &mut sink);
    assert_eq!(selected, Some(date(10, 10)));
    assert_eq!(sink.events, vec![SelectionEvent::DateSelected(date(10, 10))]);

    let cells = nav.day_cells(today, &[]);
    assert!(cells[6].is_selected);
    assert!(cells.iter().all(|cell| !cell.is_today && !cell.is_future));
}

#[test]
fn cells_reflect_recordings_across_month_boundary() {
    let today = date(10, 2);
    let nav = WeeklyDateNavigator::new(today, &MotionConfig::default());
    let items = vec![
        Item::new(1, Emotion::Happy, date(9, 29).and_hms_opt(23, 59, 59).unwrap()),
        Item::new(2, Emotion::Anger, date(10, 1).and_hms_opt(0, 0, 0).unwrap()),
        Item::new(3, Emotion::Anger, date(10, 5).and_hms_opt(12, 0, 0).unwrap()),
    ];

    let cells = day_cells(nav.window(), today, &items);
    assert_eq!(cells[0].date, date(9, 27));
    let recorded = cells
        .iter()
        .filter(|cell| cell.has_recording)
        .map(|cell| cell.date)
        .collect::<Vec<_>>();
    assert_eq!(recorded, vec![date(9, 29), date(10, 1)]);
    assert!(cells[5].is_today);
    assert!(cells[6].is_future);
}
