//! Driver lifecycle tests against the mock HID port: connect, command
//! writes, animation supersession, unplug/replug recovery.

use std::time::{Duration, Instant};

use busylight_curves::{Color, GammaLut};
use busylight_driver::{Busylight, ConnectionEvent, ConnectionState, DriverConfig, DriverFault};
use busylight_hid_common::HidDeviceInfo;
use busylight_hid_common::mock::MockHidPort;
use crossbeam::channel::Receiver;
use hid_kuando_protocol::verify_checksum;

fn fast_config() -> DriverConfig {
    DriverConfig {
        tick: Duration::from_millis(10),
        // Long enough that keep-alive never interferes with counting.
        keepalive: Duration::from_secs(60),
        reconnect_backoff: Duration::from_millis(25),
        gamma_exponent: 2.2,
    }
}

fn extended_info() -> HidDeviceInfo {
    HidDeviceInfo::new(0x27bb, 0x3bca, "mock://alpha").with_product("Busylight UC Alpha")
}

fn legacy_info() -> HidDeviceInfo {
    HidDeviceInfo::new(0x04d8, 0xf848, "mock://legacy").with_product("Busylight")
}

fn wait_for(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(3);
    while !cond() {
        if Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn next_event(events: &Receiver<ConnectionEvent>) -> ConnectionEvent {
    events
        .recv_timeout(Duration::from_secs(3))
        .expect("expected an event within the timeout")
}

fn rgb_of(report: &[u8]) -> (u8, u8, u8) {
    (report[3], report[4], report[5])
}

#[test]
fn test_connect_emits_event_and_pushes_initial_state() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    let mut driver = Busylight::open(Box::new(port), fast_config());
    let events = driver.events();

    match next_event(&events) {
        ConnectionEvent::Connected(info) => {
            assert!(info.matches(0x27bb, 0x3bca));
            assert_eq!(info.product.as_deref(), Some("Busylight UC Alpha"));
        }
        other => panic!("expected Connected, got {other:?}"),
    }

    wait_for("initial buffer push", || device.write_count() >= 1);
    let report = device.last_write().expect("one write");
    assert_eq!(report.len(), 65);
    assert!(verify_checksum(&report));
    assert_eq!(rgb_of(&report), (0, 0, 0));

    assert_eq!(driver.state(), ConnectionState::Connected);
    assert!(driver.device_info().is_some());
    driver.close();
}

#[test]
fn test_light_writes_gamma_corrected_legacy_report() {
    let port = MockHidPort::new();
    let device = port.plug(legacy_info());
    let mut driver = Busylight::open(Box::new(port), fast_config());
    let lut = GammaLut::new();

    wait_for("connect", || driver.state() == ConnectionState::Connected);
    driver.light(Color::new(255, 128, 64));

    let expected = (255, lut.correct(128), lut.correct(64));
    wait_for("light write", || {
        device
            .last_write()
            .is_some_and(|r| r.len() == 9 && rgb_of(&r) == expected)
    });

    let report = device.last_write().expect("write present");
    assert_eq!(report[0], 0);
    assert_eq!(report[8], 128);
    driver.close();
}

#[test]
fn test_missing_device_emits_one_disconnected_then_connects_on_plug() {
    let port = MockHidPort::new();
    let test_port = port.clone();
    let mut driver = Busylight::open(Box::new(port), fast_config());
    let events = driver.events();

    assert_eq!(next_event(&events), ConnectionEvent::Disconnected);

    // Several backoff cycles pass with no device; the outage must not be
    // re-announced per retry.
    assert!(
        events.recv_timeout(Duration::from_millis(150)).is_err(),
        "duplicate event during a single outage"
    );
    assert_eq!(driver.state(), ConnectionState::Connecting);

    let device = test_port.plug(extended_info());
    match next_event(&events) {
        ConnectionEvent::Connected(info) => assert_eq!(info.path, "mock://alpha"),
        other => panic!("expected Connected, got {other:?}"),
    }
    wait_for("buffer push after plug", || device.write_count() >= 1);
    driver.close();
}

#[test]
fn test_connect_request_shortcuts_reconnect_backoff() {
    let port = MockHidPort::new();
    let test_port = port.clone();
    let mut config = fast_config();
    // Backoff far beyond the test horizon so only an explicit connect
    // request can succeed.
    config.reconnect_backoff = Duration::from_secs(60);
    let mut driver = Busylight::open(Box::new(port), config);
    let events = driver.events();

    assert_eq!(next_event(&events), ConnectionEvent::Disconnected);

    let device = test_port.plug(extended_info());
    driver.connect();
    match next_event(&events) {
        ConnectionEvent::Connected(info) => assert_eq!(info.path, "mock://alpha"),
        other => panic!("expected Connected, got {other:?}"),
    }
    wait_for("buffer push", || device.write_count() >= 1);

    // While connected the request is a no-op: no events, no churn.
    let settled = device.write_count();
    driver.connect();
    assert!(
        events.recv_timeout(Duration::from_millis(150)).is_err(),
        "connect while connected must not emit"
    );
    assert_eq!(driver.state(), ConnectionState::Connected);
    assert_eq!(device.write_count(), settled);
    driver.close();
}

#[test]
fn test_keepalive_resends_unchanged_buffer() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    let mut config = fast_config();
    config.keepalive = Duration::from_millis(50);
    let mut driver = Busylight::open(Box::new(port), config);

    wait_for("connect", || driver.state() == ConnectionState::Connected);
    driver.light(Color::new(0, 0, 255));
    wait_for("solid write", || {
        device.last_write().is_some_and(|r| rgb_of(&r) == (0, 0, 255))
    });
    let baseline = device.write_count();

    // Command silence; the deadline re-arms after every send, so at
    // least two further writes must land on their own.
    wait_for("keep-alive re-sends", || device.write_count() >= baseline + 2);

    let writes = device.writes();
    let reference = &writes[baseline - 1];
    for resend in &writes[baseline..] {
        assert_eq!(resend, reference, "keep-alive altered the buffer");
    }
    driver.close();
}

#[test]
fn test_write_failure_retries_immediately() {
    let port = MockHidPort::new();
    let test_port = port.clone();
    let device = port.plug(extended_info());
    let mut config = fast_config();
    // A retry gated on the backoff could never land inside the test.
    config.reconnect_backoff = Duration::from_secs(60);
    let mut driver = Busylight::open(Box::new(port), config);
    let events = driver.events();

    match next_event(&events) {
        ConnectionEvent::Connected(_) => {}
        other => panic!("expected Connected, got {other:?}"),
    }

    // Swap the device behind the driver's back: the old handle fails on
    // the next write while a replacement is already enumerable.
    device.unplug();
    let replacement = test_port.plug(legacy_info());
    driver.light(Color::new(255, 0, 0));

    match next_event(&events) {
        ConnectionEvent::Error(DriverFault::WriteFailure(_)) => {}
        other => panic!("expected WriteFailure, got {other:?}"),
    }
    assert_eq!(next_event(&events), ConnectionEvent::Disconnected);

    // The failed write triggers one immediate reconnect attempt, which
    // finds the replacement well inside the 60 s backoff.
    match next_event(&events) {
        ConnectionEvent::Connected(info) => assert_eq!(info.path, "mock://legacy"),
        other => panic!("expected Connected, got {other:?}"),
    }
    wait_for("buffer push to replacement", || replacement.write_count() >= 1);
    driver.close();
}

#[test]
fn test_light_supersedes_pulse_and_animation_stops() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    let mut driver = Busylight::open(Box::new(port), fast_config());

    wait_for("connect", || driver.state() == ConnectionState::Connected);
    driver.pulse(
        &[Color::new(255, 0, 0), Color::OFF],
        Duration::from_millis(160),
    );
    wait_for("animation frames", || device.write_count() >= 5);

    driver.light(Color::new(0, 0, 255));
    wait_for("superseding solid write", || {
        device.last_write().is_some_and(|r| rgb_of(&r) == (0, 0, 255))
    });

    // No further animation-driven writes may land after the supersede.
    let settled = device.write_count();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(device.write_count(), settled, "animation kept writing");
    driver.close();
}

#[test]
fn test_pulse_dim_floor_substitutes_minimal_value() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    let mut driver = Busylight::open(Box::new(port), fast_config());

    wait_for("connect", || driver.state() == ConnectionState::Connected);
    // (1,1,1) gamma-corrects to black; the low end must dim to (0,0,1)
    // instead of switching off.
    driver.pulse(
        &[Color::new(255, 0, 0), Color::new(1, 1, 1)],
        Duration::from_millis(40),
    );

    wait_for("dim floor frame", || {
        device.writes().iter().any(|r| rgb_of(r) == (0, 0, 1))
    });
    driver.close();
}

#[test]
fn test_pulse_with_too_few_colors_is_rejected() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    let mut driver = Busylight::open(Box::new(port), fast_config());

    wait_for("connect", || driver.state() == ConnectionState::Connected);
    wait_for("initial push", || device.write_count() >= 1);
    let baseline = device.write_count();

    driver.pulse(&[Color::new(255, 0, 0)], Duration::from_millis(40));
    std::thread::sleep(Duration::from_millis(100));

    assert_eq!(device.write_count(), baseline, "misuse must not write");
    assert_eq!(driver.state(), ConnectionState::Connected);
    driver.close();
}

#[test]
fn test_unplug_degrades_and_replug_recovers_color() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    let mut driver = Busylight::open(Box::new(port), fast_config());
    let events = driver.events();
    let lut = GammaLut::new();

    match next_event(&events) {
        ConnectionEvent::Connected(_) => {}
        other => panic!("expected Connected, got {other:?}"),
    }

    device.unplug();
    // The failure surfaces on the next write attempt.
    driver.light(Color::new(0, 255, 0));

    match next_event(&events) {
        ConnectionEvent::Error(DriverFault::WriteFailure(_)) => {}
        other => panic!("expected WriteFailure, got {other:?}"),
    }
    assert_eq!(next_event(&events), ConnectionEvent::Disconnected);
    assert!(driver.device_info().is_none());

    device.replug();
    match next_event(&events) {
        ConnectionEvent::Connected(_) => {}
        other => panic!("expected Connected, got {other:?}"),
    }

    // The buffer still holds the green requested mid-outage and is
    // pushed on reconnect.
    let expected = (0, lut.correct(255), 0);
    wait_for("color restored after replug", || {
        device.last_write().is_some_and(|r| rgb_of(&r) == expected)
    });
    driver.close();
}

#[test]
fn test_off_and_close() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    let mut driver = Busylight::open(Box::new(port), fast_config());
    let events = driver.events();

    match next_event(&events) {
        ConnectionEvent::Connected(_) => {}
        other => panic!("expected Connected, got {other:?}"),
    }

    driver.light(Color::new(10, 20, 30));
    driver.off();
    wait_for("off write", || {
        device.last_write().is_some_and(|r| rgb_of(&r) == (0, 0, 0))
    });

    driver.close();
    assert_eq!(driver.state(), ConnectionState::Disconnected);
    assert_eq!(next_event(&events), ConnectionEvent::Disconnected);

    // Idempotent: closing again (and the eventual Drop) is a no-op.
    driver.close();
}

#[test]
fn test_drop_without_close_shuts_down_cleanly() {
    let port = MockHidPort::new();
    let device = port.plug(extended_info());
    {
        let driver = Busylight::open(Box::new(port), fast_config());
        wait_for("connect", || driver.state() == ConnectionState::Connected);
    }
    // Worker joined on drop; no more writes can happen.
    let settled = device.write_count();
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(device.write_count(), settled);
}
