// tests/session_elapsed.rs

use std::time::{Duration, Instant};

use pomobutton::engine::{format_elapsed, Session, ZERO_ELAPSED};

#[test]
fn format_uses_shortest_round_trip_digits() {
    assert_eq!(format_elapsed(0.0), "0");
    assert_eq!(format_elapsed(2.5), "2.5");
    assert_eq!(format_elapsed(1500.0), "1500");
    assert_eq!(format_elapsed(0.1), "0.1");

    let odd = 1.000_000_001_f64;
    assert_eq!(format_elapsed(odd).parse::<f64>().unwrap(), odd);
}

#[test]
fn session_accumulates_closed_segments() {
    let t0 = Instant::now();
    let mut session = Session::new();
    assert_eq!(session.elapsed_text(), ZERO_ELAPSED);
    assert_eq!(session.segment_elapsed(t0), None);

    session.start_segment(t0);
    assert_eq!(session.close_segment(t0 + Duration::from_millis(1250)), 1.25);

    session.start_segment(t0 + Duration::from_secs(2));
    assert_eq!(session.close_segment(t0 + Duration::from_secs(5)), 3.0);

    assert_eq!(session.accumulated(), 4.25);
    assert_eq!(session.elapsed_text(), "3");

    session.reset();
    assert_eq!(session.accumulated(), 0.0);
    assert_eq!(session.elapsed_text(), "0");
    assert_eq!(session.start_time(), None);
}

#[test]
fn clock_going_backwards_counts_as_zero() {
    let t0 = Instant::now() + Duration::from_secs(10);
    let mut session = Session::new();
    session.start_segment(t0);

    assert_eq!(session.close_segment(t0 - Duration::from_secs(1)), 0.0);
    assert_eq!(session.elapsed_text(), "0");
}
