pub mod key_range {
    pub const NO_EVENT: u8 = 0x00;
    pub const ERROR_ROLL_OVER: u8 = 0x01;
    pub const POST_FAIL: u8 = 0x02;
    pub const ERROR_UNDEFINED: u8 = 0x03;

    pub const BASIC_MIN: u8 = 0x04;
    pub const BASIC_A: u8 = 0x04;
    pub const BASIC_1: u8 = 0x1e;
    pub const BASIC_0: u8 = 0x27;

    pub const MODIFIER_MIN: u8 = 0xe0;
    pub const MODIFIER_MAX: u8 = 0xe7;

    /// ```
    /// use keywire_common::keycodes::key_range::is_modifier;
    /// assert!(is_modifier(0xe0));
    /// assert!(!is_modifier(0x04));
    /// ```
    pub fn is_modifier(code: u8) -> bool {
        (MODIFIER_MIN..=MODIFIER_MAX).contains(&code)
    }

    /// Usages 0x00-0x03 carry protocol conditions, not keys.
    pub fn is_reserved(code: u8) -> bool {
        code < BASIC_MIN
    }
}
