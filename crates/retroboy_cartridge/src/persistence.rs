//! Battery save payload.
//!
//! Layout: the external RAM bytes in bank order, then for MBC3+TIMER
//! cartridges a 48-byte clock record. The record is ten little-endian
//! `u32` words (live seconds, minutes, hours, day low, day high, then the
//! latched copies in the same order) followed by the little-endian `u64`
//! unix time the save was written at. This is the trailer most emulators
//! append to `.sav` files, so existing saves load unchanged.

use std::io::{Read, Write};

use crate::error::{CartridgeError, Result};
use crate::rtc::{Rtc, RTC_RECORD_LEN};
use crate::storage::ExternalRam;

pub(crate) fn payload_len(ram_len: usize, has_rtc: bool) -> usize {
    ram_len + if has_rtc { RTC_RECORD_LEN } else { 0 }
}

/// Write the payload for `ram` and `rtc`. Returns the number of bytes
/// written.
pub(crate) fn write_payload<W: Write + ?Sized>(
    sink: &mut W,
    ram: &ExternalRam,
    rtc: Option<&Rtc>,
) -> Result<usize> {
    let mut payload = Vec::with_capacity(payload_len(ram.len(), rtc.is_some()));
    payload.extend_from_slice(ram.as_bytes());
    if let Some(rtc) = rtc {
        rtc.encode(&mut payload);
    }
    if !payload.is_empty() {
        sink.write_all(&payload)?;
        sink.flush()?;
    }
    Ok(payload.len())
}

/// A payload that passed validation and can be applied in one go.
pub(crate) struct LoadedPayload {
    pub(crate) ram: Vec<u8>,
    pub(crate) rtc: Option<Rtc>,
}

/// Read `source` to its end and split it into RAM and clock parts.
///
/// At most one byte past the expected length is consumed, so an oversized
/// or endless source is rejected without buffering it. Nothing is applied
/// here; a length mismatch leaves the caller's state untouched.
pub(crate) fn read_payload<R: Read + ?Sized>(
    source: &mut R,
    ram_len: usize,
    has_rtc: bool,
) -> Result<LoadedPayload> {
    let expected = payload_len(ram_len, has_rtc);
    let mut bytes = Vec::with_capacity(expected + 1);
    source.take(expected as u64 + 1).read_to_end(&mut bytes)?;

    if bytes.len() != expected {
        return Err(CartridgeError::PersistenceFormat {
            expected,
            found: bytes.len(),
        });
    }

    let rtc = has_rtc.then(|| Rtc::decode(&bytes[ram_len..]));
    bytes.truncate(ram_len);
    Ok(LoadedPayload { ram: bytes, rtc })
}
