//! Game Boy cartridge emulation.
//!
//! A [`Cartridge`] owns a ROM image, decodes its header and routes CPU bus
//! accesses through the memory bank controller the header names. Battery
//! backed RAM (and the MBC3 clock) can be saved to and restored from any
//! `std::io` byte stream.

pub mod cartridge;
pub mod clock;
pub mod error;
pub mod header;
mod mbc;
mod persistence;
mod registers;
mod rtc;
mod storage;

#[cfg(test)]
mod test_rom;

pub use cartridge::{Cartridge, CartridgeOptions};
pub use clock::{ManualClock, RtcClock, SystemClock};
pub use error::{CartridgeError, Result};
pub use header::{CartridgeFeatures, GameType, Header, MbcKind};
pub use rtc::RtcRegister;

/// Size of one switchable ROM bank (16 KiB).
pub const ROM_BANK_SIZE: usize = 0x4000;
/// Size of one switchable external RAM bank (8 KiB).
pub const RAM_BANK_SIZE: usize = 0x2000;
/// Value observed on the data bus when nothing drives it.
pub const OPEN_BUS: u8 = 0xFF;
