use std::fmt;
use std::io;

use crate::header::HEADER_END;

/// Errors reported by cartridge construction and persistence.
///
/// Bus-level anomalies (writes into ROM, RAM access while disabled) are not
/// errors; they are absorbed the way the hardware absorbs them.
#[derive(Debug)]
pub enum CartridgeError {
    /// The image is too short to contain the cartridge header.
    MalformedRom { len: usize },
    /// The header names a controller we do not emulate.
    UnsupportedCartridgeType { code: u8 },
    /// A save payload does not match this cartridge's RAM/RTC layout.
    /// Reading stops one byte past `expected`, so `found` never exceeds it
    /// by more than one.
    PersistenceFormat { expected: usize, found: usize },
    /// The host-provided sink or source failed.
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, CartridgeError>;

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::MalformedRom { len } => write!(
                f,
                "malformed ROM: {} bytes, header needs at least {} (0x{:04X})",
                len, HEADER_END, HEADER_END
            ),
            CartridgeError::UnsupportedCartridgeType { code } => {
                write!(f, "unsupported cartridge type 0x{:02X} at 0x0147", code)
            }
            CartridgeError::PersistenceFormat { expected, found } => write!(
                f,
                "save payload is {} bytes, this cartridge expects {}",
                found, expected
            ),
            CartridgeError::Io(e) => write!(f, "save I/O error: {}", e),
        }
    }
}

impl std::error::Error for CartridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CartridgeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CartridgeError {
    fn from(e: io::Error) -> Self {
        CartridgeError::Io(e)
    }
}
