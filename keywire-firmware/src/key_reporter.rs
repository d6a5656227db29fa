use heapless::Vec;
use keywire_common::{
    boot_protocol::{BOOT_REPORT_LEN, KEY_SLOTS, KEY_SLOTS_OFFSET},
    keycodes::key_range::{self, ERROR_ROLL_OVER},
};

use crate::{key_event::KeyEvent, warn};

/// Keys tracked beyond the six wire slots so a rollover can recover once
/// enough of them are released.
const HELD_MAX: usize = 16;

/// The fixed 8-byte boot-protocol input report: modifier mask, reserved
/// byte, six key slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport([u8; BOOT_REPORT_LEN]);

impl BootReport {
    pub const fn empty() -> Self {
        Self([0; BOOT_REPORT_LEN])
    }

    pub fn as_bytes(&self) -> &[u8; BOOT_REPORT_LEN] {
        &self.0
    }

    pub fn modifiers(&self) -> u8 {
        self.0[0]
    }

    pub fn keys(&self) -> &[u8] {
        &self.0[KEY_SLOTS_OFFSET..]
    }
}

pub struct ReportUpdate {
    pub report: BootReport,
    /// False when the report is byte-identical to the previous emission; the
    /// caller may skip the transmission.
    pub changed: bool,
}

/// Folds key transitions into the current boot report.
///
/// The emitted sequence is fully determined by event order: no timers, no
/// randomness, replaying a sequence reproduces the same reports.
pub struct Reporter {
    held: Vec<u8, HELD_MAX>,
    modifiers: u8,
    last: BootReport,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    pub const fn new() -> Self {
        Self {
            held: Vec::new(),
            modifiers: 0,
            last: BootReport::empty(),
        }
    }

    pub fn on_event(&mut self, event: KeyEvent) -> ReportUpdate {
        let KeyEvent { code, pressed } = event;
        if key_range::is_modifier(code) {
            let bit = 1 << (code - key_range::MODIFIER_MIN);
            if pressed {
                self.modifiers |= bit;
            } else {
                self.modifiers &= !bit;
            }
        } else if key_range::is_reserved(code) {
            // protocol condition codes, never real keys
        } else if pressed {
            self.press(code);
        } else {
            self.release(code);
        }

        let report = self.serialize();
        let changed = report != self.last;
        self.last = report;
        ReportUpdate { report, changed }
    }

    fn press(&mut self, code: u8) {
        if self.held.contains(&code) {
            return;
        }
        if self.held.push(code).is_err() {
            // the report is already ErrorRollOver well before this point
            warn!("held-key overflow, key {} lost", code);
        }
    }

    fn release(&mut self, code: u8) {
        // absent codes absorb duplicate or out-of-order releases
        if let Some(i) = self.held.iter().position(|c| *c == code) {
            self.held.remove(i);
        }
    }

    fn serialize(&self) -> BootReport {
        let mut bytes = [0u8; BOOT_REPORT_LEN];
        bytes[0] = self.modifiers;
        let slots = &mut bytes[KEY_SLOTS_OFFSET..];
        if self.held.len() > KEY_SLOTS {
            slots.fill(ERROR_ROLL_OVER);
        } else {
            for (slot, code) in slots.iter_mut().zip(self.held.iter()) {
                *slot = *code;
            }
        }
        BootReport(bytes)
    }
}

#[cfg(test)]
#[path = "key_reporter_test.rs"]
mod test;
