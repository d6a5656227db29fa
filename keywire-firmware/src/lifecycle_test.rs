use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use super::*;
use crate::transport_test_stub::StubTransport;

fn lifecycle() -> DeviceLifecycle<NoopRawMutex> {
    DeviceLifecycle::new(LifecycleConfig::default())
}

#[test]
fn initial_state() {
    let lifecycle = lifecycle();
    let state = lifecycle.state();
    assert!(!state.ready);
    assert!(!state.bus_powered);
    assert!(!state.enabled);
    assert_eq!(state.protocol, ProtocolMode::Boot);
    assert_eq!(state.idle_ms, 0);
    assert!(!lifecycle.may_transmit());
}

#[test]
fn bus_power_prompts_manual_enable() {
    let lifecycle = lifecycle();
    assert!(lifecycle.on_bus_power_detected());
    assert!(lifecycle.state().bus_powered);
    assert!(lifecycle.on_bus_power_removed());
    assert!(!lifecycle.state().bus_powered);

    let auto = DeviceLifecycle::<NoopRawMutex>::new(LifecycleConfig {
        autonomous_bus_sensing: true,
    });
    assert!(!auto.on_bus_power_detected());
    assert!(auto.state().bus_powered);
    assert!(!auto.on_bus_power_removed());
}

#[test]
fn enable_failure_leaves_state_unchanged() {
    block_on(async {
        let lifecycle = lifecycle();
        let mut transport = StubTransport::default();
        transport.refuse.set(true);
        assert_eq!(
            lifecycle.enable(&mut transport).await,
            Err(TransportError::Refused)
        );
        assert!(!lifecycle.state().enabled);

        transport.refuse.set(false);
        lifecycle.enable(&mut transport).await.unwrap();
        assert!(lifecycle.state().enabled);
        assert!(transport.enabled.get());

        // already enabled, second call does not touch the transport
        transport.refuse.set(true);
        lifecycle.enable(&mut transport).await.unwrap();

        assert_eq!(
            lifecycle.disable(&mut transport).await,
            Err(TransportError::Refused)
        );
        assert!(lifecycle.state().enabled);

        transport.refuse.set(false);
        lifecycle.disable(&mut transport).await.unwrap();
        assert!(!lifecycle.state().enabled);
        assert!(!transport.enabled.get());
    });
}

#[test]
fn transmission_needs_ready_and_enabled() {
    block_on(async {
        let lifecycle = lifecycle();
        lifecycle.on_interface_ready(true);
        assert!(!lifecycle.may_transmit());

        lifecycle.enable(&mut StubTransport::default()).await.unwrap();
        assert!(lifecycle.may_transmit());

        lifecycle.on_interface_ready(false);
        assert!(!lifecycle.may_transmit());
    });
}

#[test]
fn protocol_and_idle_are_recorded() {
    let lifecycle = lifecycle();
    lifecycle.set_protocol(1);
    assert_eq!(lifecycle.state().protocol, ProtocolMode::Report);
    lifecycle.set_protocol(0x5a);
    assert_eq!(lifecycle.state().protocol, ProtocolMode::Report);
    lifecycle.set_protocol(0);
    assert_eq!(lifecycle.state().protocol, ProtocolMode::Boot);

    lifecycle.set_idle(0, 500);
    assert_eq!(lifecycle.idle_ms(0), 500);
    lifecycle.set_idle(0, 0);
    assert_eq!(lifecycle.idle_ms(0), 0);
}

#[test]
fn output_report_updates_indicators() {
    let lifecycle = lifecycle();
    lifecycle.on_output_report(&[0b0000_0101]).unwrap();
    let leds = lifecycle.indicators();
    assert!(leds.num_lock());
    assert!(leds.scroll_lock());
    assert!(!leds.caps_lock());

    assert_eq!(
        lifecycle.on_output_report(&[1, 2]),
        Err(DecodeError::UnsupportedLength)
    );
    // state untouched by the rejected report
    assert_eq!(lifecycle.indicators(), leds);
}
