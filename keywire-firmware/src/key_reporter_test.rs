use keywire_common::boot_protocol::KEY_SLOTS;
use keywire_common::keycodes::key_range::{ERROR_ROLL_OVER, MODIFIER_MIN};

use super::*;

fn feed(reporter: &mut Reporter, events: &[(u8, bool)]) -> ReportUpdate {
    let mut update = reporter.on_event(KeyEvent {
        code: events[0].0,
        pressed: events[0].1,
    });
    for (code, pressed) in &events[1..] {
        update = reporter.on_event(KeyEvent {
            code: *code,
            pressed: *pressed,
        });
    }
    update
}

#[test]
fn press_and_release() {
    let mut reporter = Reporter::new();

    let update = reporter.on_event(KeyEvent::press(4));
    assert!(update.changed);
    assert_eq!(update.report.as_bytes(), &[0, 0, 4, 0, 0, 0, 0, 0]);

    let update = reporter.on_event(KeyEvent::press(5));
    assert!(update.changed);
    assert_eq!(update.report.keys(), &[4, 5, 0, 0, 0, 0]);

    let update = reporter.on_event(KeyEvent::release(4));
    assert!(update.changed);
    assert_eq!(update.report.keys(), &[5, 0, 0, 0, 0, 0]);
}

#[test]
fn order_preserved_after_removal() {
    // A down, B down, A up, C down leaves B before C
    let mut reporter = Reporter::new();
    let update = feed(
        &mut reporter,
        &[(4, true), (5, true), (4, false), (6, true)],
    );
    assert_eq!(update.report.keys(), &[5, 6, 0, 0, 0, 0]);
}

#[test]
fn releasing_an_absent_key_changes_nothing() {
    let mut reporter = Reporter::new();
    reporter.on_event(KeyEvent::press(4));

    let update = reporter.on_event(KeyEvent::release(9));
    assert!(!update.changed);
    assert_eq!(update.report.keys(), &[4, 0, 0, 0, 0, 0]);

    // a duplicate release after a real one is also a no-op
    reporter.on_event(KeyEvent::release(4));
    let update = reporter.on_event(KeyEvent::release(4));
    assert!(!update.changed);
}

#[test]
fn repeated_press_is_unchanged() {
    let mut reporter = Reporter::new();
    reporter.on_event(KeyEvent::press(4));
    let update = reporter.on_event(KeyEvent::press(4));
    assert!(!update.changed);
    assert_eq!(update.report.keys(), &[4, 0, 0, 0, 0, 0]);
}

#[test]
fn modifiers_use_the_mask_not_the_slots() {
    let mut reporter = Reporter::new();

    let update = reporter.on_event(KeyEvent::press(MODIFIER_MIN));
    assert_eq!(update.report.modifiers(), 0b0000_0001);
    assert_eq!(update.report.keys(), &[0; KEY_SLOTS]);

    let update = reporter.on_event(KeyEvent::press(0xe7));
    assert_eq!(update.report.modifiers(), 0b1000_0001);

    let update = reporter.on_event(KeyEvent::release(MODIFIER_MIN));
    assert_eq!(update.report.modifiers(), 0b1000_0000);
    assert_eq!(update.report.keys(), &[0; KEY_SLOTS]);
}

#[test]
fn modifiers_never_count_toward_rollover() {
    let mut reporter = Reporter::new();
    for code in 4..10 {
        reporter.on_event(KeyEvent::press(code));
    }
    // six keys held; every modifier down on top of them stays in the mask
    for code in MODIFIER_MIN..=0xe7 {
        let update = reporter.on_event(KeyEvent::press(code));
        assert_eq!(update.report.keys(), &[4, 5, 6, 7, 8, 9]);
    }
}

#[test]
fn seventh_key_triggers_rollover() {
    let mut reporter = Reporter::new();
    for code in 4..10 {
        let update = reporter.on_event(KeyEvent::press(code));
        assert!(!update.report.keys().contains(&ERROR_ROLL_OVER));
    }

    let update = reporter.on_event(KeyEvent::press(10));
    assert!(update.changed);
    assert_eq!(update.report.keys(), &[ERROR_ROLL_OVER; KEY_SLOTS]);

    // releasing any one of the seven restores per-key reporting
    let update = reporter.on_event(KeyEvent::release(4));
    assert!(update.changed);
    assert_eq!(update.report.keys(), &[5, 6, 7, 8, 9, 10]);
}

#[test]
fn rollover_keeps_modifiers() {
    let mut reporter = Reporter::new();
    reporter.on_event(KeyEvent::press(0xe1));
    for code in 4..11 {
        reporter.on_event(KeyEvent::press(code));
    }
    let update = reporter.on_event(KeyEvent::release(9));
    assert_eq!(update.report.modifiers(), 0b0000_0010);
    assert_eq!(update.report.keys(), &[ERROR_ROLL_OVER; KEY_SLOTS]);
}

#[test]
fn reserved_codes_are_ignored() {
    let mut reporter = Reporter::new();
    reporter.on_event(KeyEvent::press(4));
    for code in 0..4 {
        let update = reporter.on_event(KeyEvent::press(code));
        assert!(!update.changed);
        assert_eq!(update.report.keys(), &[4, 0, 0, 0, 0, 0]);
    }
}

#[test]
fn replay_is_deterministic() {
    let events = [
        (4, true),
        (0xe0, true),
        (5, true),
        (5, false),
        (6, true),
        (0xe0, false),
        (4, false),
    ];
    let mut first = Reporter::new();
    let mut second = Reporter::new();
    for (code, pressed) in events {
        let event = KeyEvent { code, pressed };
        let a = first.on_event(event);
        let b = second.on_event(event);
        assert_eq!(a.report, b.report);
        assert_eq!(a.changed, b.changed);
    }
}
