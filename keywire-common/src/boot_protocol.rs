//! Layout of the fixed boot-protocol keyboard report and the host-to-device
//! output report. These values are wire format; they never change with the
//! negotiated protocol mode.

/// Total length of the boot keyboard input report.
pub const BOOT_REPORT_LEN: usize = 8;

/// Number of non-modifier key slots in the report.
pub const KEY_SLOTS: usize = 6;

/// Offset of the first key slot, after the modifier and reserved bytes.
pub const KEY_SLOTS_OFFSET: usize = 2;

pub const PROTOCOL_BOOT: u8 = 0;
pub const PROTOCOL_REPORT: u8 = 1;

/// The host negotiates the idle rate in units of 4ms.
pub const IDLE_TICK_MS: u32 = 4;

/// Bit positions of the indicator LEDs in the single-byte output report.
pub mod led {
    pub const NUM_LOCK: u8 = 1 << 0;
    pub const CAPS_LOCK: u8 = 1 << 1;
    pub const SCROLL_LOCK: u8 = 1 << 2;
    pub const COMPOSE: u8 = 1 << 3;
    pub const KANA: u8 = 1 << 4;

    /// Bits the output report may carry; the remaining three are padding.
    pub const MASK: u8 = 0x1f;
}
