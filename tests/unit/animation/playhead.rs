use super::*;

#[test]
fn autoplay_waits_out_its_delay() {
    let mut ph = Playhead::autoplay(1.0, 0.3);
    assert!(ph.advance(0.2));
    assert_eq!(ph.time(), 0.0);
    assert!(ph.advance(0.2));
    assert!((ph.time() - 0.1).abs() < 1e-12);
    assert!(ph.advance(5.0));
    assert_eq!(ph.time(), 1.0);
    assert!(!ph.is_running());
    assert!(!ph.advance(1.0));
}

#[test]
fn reverse_runs_back_from_current_time() {
    let mut ph = Playhead::paused(1.0);
    ph.play();
    ph.advance(0.6);
    ph.reverse();
    assert_eq!(ph.direction(), Direction::Backward);
    assert!(ph.advance(0.25));
    assert!((ph.time() - 0.35).abs() < 1e-12);
    ph.advance(1.0);
    assert_eq!(ph.time(), 0.0);
    assert!(!ph.is_running());
}

#[test]
fn reverse_at_zero_stays_halted() {
    let mut ph = Playhead::paused(0.6);
    ph.reverse();
    assert!(!ph.is_running());
    assert!(ph.advance(0.1));
    assert!(!ph.advance(0.1));
}

#[test]
fn pause_and_resume_keep_direction() {
    let mut ph = Playhead::paused(2.0);
    ph.complete();
    ph.reverse();
    ph.advance(0.5);
    ph.pause();
    assert!(!ph.advance(0.5));
    assert_eq!(ph.time(), 1.5);
    ph.resume();
    ph.advance(0.5);
    assert_eq!(ph.time(), 1.0);
}

#[test]
fn restart_reset_and_complete_jump() {
    let mut ph = Playhead::paused(1.0);
    ph.complete();
    assert!(ph.advance(0.0));
    assert_eq!(ph.time(), 1.0);
    ph.restart();
    assert_eq!(ph.time(), 0.0);
    assert!(ph.is_running());
    ph.advance(0.5);
    ph.reset();
    assert_eq!(ph.time(), 0.0);
    assert!(!ph.is_running());
    assert!(ph.advance(0.1));
    assert_eq!(ph.time(), 0.0);
}
