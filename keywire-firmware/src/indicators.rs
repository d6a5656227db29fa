use keywire_common::boot_protocol::led;

/// Keyboard indicator LEDs as last set by the host. Read-only snapshot for
/// whatever drives the physical LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorState(u8);

impl IndicatorState {
    pub fn num_lock(&self) -> bool {
        self.0 & led::NUM_LOCK != 0
    }

    pub fn caps_lock(&self) -> bool {
        self.0 & led::CAPS_LOCK != 0
    }

    pub fn scroll_lock(&self) -> bool {
        self.0 & led::SCROLL_LOCK != 0
    }

    pub fn compose(&self) -> bool {
        self.0 & led::COMPOSE != 0
    }

    pub fn kana(&self) -> bool {
        self.0 & led::KANA != 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The boot keyboard output report is exactly one byte.
    UnsupportedLength,
}

/// Decodes a host output report. Bits above the five defined LEDs are
/// padding and dropped.
pub fn decode_output_report(data: &[u8]) -> Result<IndicatorState, DecodeError> {
    match data {
        [bits] => Ok(IndicatorState(bits & led::MASK)),
        _ => Err(DecodeError::UnsupportedLength),
    }
}

#[cfg(test)]
#[path = "indicators_test.rs"]
mod test;
