//! Tests for SimClock

use sched_sim_core_rs::SimClock;

#[test]
fn test_clock_new() {
    let clock = SimClock::new(50);
    assert_eq!(clock.elapsed_ms(), 0);
    assert_eq!(clock.tick_size_ms(), 50);
    assert!(!clock.is_running());
}

#[test]
fn test_tick_advances_by_exactly_tick_size() {
    let mut clock = SimClock::new(16);
    clock.start();

    clock.tick();
    assert_eq!(clock.elapsed_ms(), 16);

    clock.tick();
    assert_eq!(clock.elapsed_ms(), 32);
    assert_eq!(clock.ticks_elapsed(), 2);
}

#[test]
fn test_elapsed_is_monotonic() {
    let mut clock = SimClock::new(50);
    clock.start();

    let mut previous = clock.elapsed_ms();
    for _ in 0..100 {
        clock.tick();
        assert!(clock.elapsed_ms() > previous);
        previous = clock.elapsed_ms();
    }
}

#[test]
fn test_reset() {
    let mut clock = SimClock::new(50);
    clock.start();
    for _ in 0..10 {
        clock.tick();
    }

    clock.reset();
    assert_eq!(clock.elapsed_ms(), 0);
    assert_eq!(clock.ticks_elapsed(), 0);
    assert!(!clock.is_running());
}
