#![no_std]
pub mod boot_protocol;
pub mod keycodes;
