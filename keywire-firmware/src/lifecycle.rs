use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use keywire_common::boot_protocol::PROTOCOL_BOOT;

use crate::{
    indicators::{decode_output_report, DecodeError, IndicatorState},
    info,
    transport::{Transport, TransportError},
    warn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolMode {
    Boot,
    Report,
}

/// Transport-facing device state. `protocol` and `idle_ms` only mirror what
/// the host negotiated; neither changes the wire format of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LifecycleState {
    pub ready: bool,
    pub protocol: ProtocolMode,
    /// Host idle rate in milliseconds, 0 meaning indefinite.
    pub idle_ms: u32,
    pub bus_powered: bool,
    pub enabled: bool,
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self {
            ready: false,
            protocol: ProtocolMode::Boot,
            idle_ms: 0,
            bus_powered: false,
            enabled: false,
        }
    }
}

/// How the transport reacts to bus power. When it senses VBUS itself the
/// lifecycle only mirrors the flag; otherwise the power callbacks tell the
/// caller to drive [`DeviceLifecycle::enable`] and
/// [`DeviceLifecycle::disable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleConfig {
    pub autonomous_bus_sensing: bool,
}

struct Inner {
    state: LifecycleState,
    indicators: IndicatorState,
}

/// Single authoritative record of the device lifecycle, shared between the
/// report task and the transport callbacks.
///
/// The lock is held only for the read or mutate itself, never across an
/// await or a [`Transport`] call.
pub struct DeviceLifecycle<M: RawMutex> {
    inner: Mutex<M, RefCell<Inner>>,
    config: LifecycleConfig,
}

impl<M: RawMutex> DeviceLifecycle<M> {
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state: LifecycleState::default(),
                indicators: IndicatorState::default(),
            })),
            config,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.lock(|inner| inner.borrow().state)
    }

    pub fn indicators(&self) -> IndicatorState {
        self.inner.lock(|inner| inner.borrow().indicators)
    }

    /// Reports may only go out while the interface is ready and the
    /// transport is enabled.
    pub fn may_transmit(&self) -> bool {
        let state = self.state();
        state.ready && state.enabled
    }

    /// Returns true when the caller must follow up with [`Self::enable`]
    /// because the transport has no bus-power sensing of its own.
    pub fn on_bus_power_detected(&self) -> bool {
        self.inner.lock(|inner| inner.borrow_mut().state.bus_powered = true);
        !self.config.autonomous_bus_sensing
    }

    pub fn on_bus_power_removed(&self) -> bool {
        self.inner.lock(|inner| inner.borrow_mut().state.bus_powered = false);
        !self.config.autonomous_bus_sensing
    }

    /// Attempts to enable the transport. On failure the recorded state is
    /// unchanged and whether to retry is the caller's decision.
    pub async fn enable<T: Transport>(&self, transport: &mut T) -> Result<(), TransportError> {
        if self.state().enabled {
            return Ok(());
        }
        transport.enable().await?;
        self.inner.lock(|inner| inner.borrow_mut().state.enabled = true);
        info!("transport enabled");
        Ok(())
    }

    pub async fn disable<T: Transport>(&self, transport: &mut T) -> Result<(), TransportError> {
        if !self.state().enabled {
            return Ok(());
        }
        transport.disable().await?;
        self.inner.lock(|inner| inner.borrow_mut().state.enabled = false);
        info!("transport disabled");
        Ok(())
    }

    pub fn on_interface_ready(&self, ready: bool) {
        info!("interface is {}", if ready { "ready" } else { "not ready" });
        self.inner.lock(|inner| inner.borrow_mut().state.ready = ready);
    }

    pub fn set_protocol(&self, protocol: u8) {
        let mode = if protocol == PROTOCOL_BOOT {
            ProtocolMode::Boot
        } else {
            ProtocolMode::Report
        };
        info!("protocol changed to {:?}", mode);
        self.inner.lock(|inner| inner.borrow_mut().state.protocol = mode);
    }

    /// Records the host idle rate for the keyboard report. Only one input
    /// report exists, so `id` is logged and otherwise ignored. No periodic
    /// retransmission happens here.
    pub fn set_idle(&self, id: u8, duration_ms: u32) {
        info!("set idle {} to {}ms", id, duration_ms);
        self.inner.lock(|inner| inner.borrow_mut().state.idle_ms = duration_ms);
    }

    pub fn idle_ms(&self, id: u8) -> u32 {
        let _ = id;
        self.state().idle_ms
    }

    /// Applies a host output report (indicator LEDs). Malformed reports are
    /// rejected and leave the indicator state untouched.
    pub fn on_output_report(&self, data: &[u8]) -> Result<(), DecodeError> {
        match decode_output_report(data) {
            Ok(leds) => {
                self.inner.lock(|inner| inner.borrow_mut().indicators = leds);
                Ok(())
            }
            Err(e) => {
                warn!("rejected output report of {} bytes", data.len());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
extern crate std;

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod test;
