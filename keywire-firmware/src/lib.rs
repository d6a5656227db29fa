//! Event-to-report pipeline for a boot-protocol USB HID keyboard.
//!
//! Key transitions produced in interrupt context flow through a bounded
//! queue into a report task which folds them into the fixed 8-byte boot
//! report and submits it to the transport while the device lifecycle allows
//! transmission. Host-set state (indicator LEDs, idle rate, protocol mode)
//! is mirrored by [`lifecycle::DeviceLifecycle`].
#![no_std]
pub mod hid;
pub mod indicators;
pub mod key_event;
pub mod key_reporter;
pub mod lifecycle;
pub mod pipeline;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod transport_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod usb_test_stub;

#[macro_use]
mod macros;
