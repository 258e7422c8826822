use std::fmt;

use bitflags::bitflags;

use crate::error::{CartridgeError, Result};
use crate::{RAM_BANK_SIZE, ROM_BANK_SIZE};

/// First byte past the cartridge header; shorter images are rejected.
pub const HEADER_END: usize = 0x0150;

const LOGO_START: usize = 0x0104;
const TITLE_START: usize = 0x0134;
const CGB_FLAG: usize = 0x0143;
const SGB_FLAG: usize = 0x0146;
const CARTRIDGE_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const DESTINATION: usize = 0x014A;
const HEADER_CHECKSUM: usize = 0x014D;

/// Boot ROM logo stored at 0x0104..0x0134 on licensed cartridges.
const NINTENDO_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

/// Memory bank controller families we emulate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MbcKind {
    NoMbc,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

impl fmt::Display for MbcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MbcKind::NoMbc => "ROM ONLY",
            MbcKind::Mbc1 => "MBC1",
            MbcKind::Mbc2 => "MBC2",
            MbcKind::Mbc3 => "MBC3",
            MbcKind::Mbc5 => "MBC5",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Extra hardware advertised by the cartridge type byte.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct CartridgeFeatures: u8 {
        const RAM = 1 << 0;
        const BATTERY = 1 << 1;
        const TIMER = 1 << 2;
        const RUMBLE = 1 << 3;
    }
}

/// Target hardware derived from the CGB and SGB flag bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum GameType {
    #[default]
    Dmg,
    Sgb,
    Cgb,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Dmg => "dmg",
            GameType::Sgb => "sgb",
            GameType::Cgb => "cgb",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded cartridge header (0x0100-0x014F).
///
/// Parsed once when the cartridge is opened and never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    /// Title slot with trailing zero padding removed. The slot is 16 bytes,
    /// or 15 when 0x0143 carries a CGB flag.
    pub title: String,
    /// Title bytes 0x0134..0x0142 up to the first NUL.
    pub game_name: String,
    pub game_type: GameType,
    pub cartridge_type_code: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub destination_code: u8,
    pub header_checksum: u8,
    /// The stored header checksum matches the computed one.
    pub is_authentic: bool,
    pub has_nintendo_logo: bool,
    pub kind: MbcKind,
    pub features: CartridgeFeatures,
}

impl Header {
    pub fn parse(rom: &[u8]) -> Result<Self> {
        if rom.len() < HEADER_END {
            return Err(CartridgeError::MalformedRom { len: rom.len() });
        }

        let cartridge_type_code = rom[CARTRIDGE_TYPE];
        let (kind, features) = decode_cartridge_type(cartridge_type_code)?;

        let cgb_flag = rom[CGB_FLAG];
        let title_end = if cgb_flag & 0x80 != 0 {
            CGB_FLAG
        } else {
            CGB_FLAG + 1
        };
        let mut title_bytes = &rom[TITLE_START..title_end];
        while let [rest @ .., 0] = title_bytes {
            title_bytes = rest;
        }

        let game_name_bytes = rom[TITLE_START..0x0142]
            .split(|&b| b == 0)
            .next()
            .unwrap_or(&[]);

        let game_type = if cgb_flag == 0x80 || cgb_flag == 0xC0 {
            GameType::Cgb
        } else if rom[SGB_FLAG] == 0x03 {
            GameType::Sgb
        } else {
            GameType::Dmg
        };

        let header_checksum = rom[HEADER_CHECKSUM];
        let computed = compute_header_checksum(rom);

        Ok(Self {
            title: latin1(title_bytes),
            game_name: latin1(game_name_bytes),
            game_type,
            cartridge_type_code,
            rom_size_code: rom[ROM_SIZE],
            ram_size_code: rom[RAM_SIZE],
            destination_code: rom[DESTINATION],
            header_checksum,
            is_authentic: computed == header_checksum,
            has_nintendo_logo: rom[LOGO_START..LOGO_START + NINTENDO_LOGO.len()] == NINTENDO_LOGO,
            kind,
            features,
        })
    }

    /// ROM size in bytes declared by the header, if the code is known.
    pub fn declared_rom_size(&self) -> Option<usize> {
        rom_size_from_code(self.rom_size_code)
    }

    /// External RAM size in bytes implied by the type and RAM size codes.
    ///
    /// MBC2 always carries 512 half-byte cells. Types without RAM report 0
    /// whatever the size byte says. `None` means the type has RAM but the
    /// size code is unknown.
    pub fn ram_size(&self) -> Option<usize> {
        if self.kind == MbcKind::Mbc2 {
            return Some(0x200);
        }
        if !self.features.contains(CartridgeFeatures::RAM) {
            return Some(0);
        }
        ram_size_from_code(self.ram_size_code)
    }

    pub fn has_battery(&self) -> bool {
        self.features.contains(CartridgeFeatures::BATTERY)
    }

    pub fn has_rtc(&self) -> bool {
        self.features.contains(CartridgeFeatures::TIMER)
    }
}

/// Header checksum over 0x0134..=0x014C as computed by the boot ROM.
/// `rom` must already be at least [`HEADER_END`] bytes long.
pub(crate) fn compute_header_checksum(rom: &[u8]) -> u8 {
    rom[TITLE_START..HEADER_CHECKSUM]
        .iter()
        .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

fn decode_cartridge_type(code: u8) -> Result<(MbcKind, CartridgeFeatures)> {
    use CartridgeFeatures as F;

    let decoded = match code {
        0x00 => (MbcKind::NoMbc, F::empty()),
        0x08 => (MbcKind::NoMbc, F::RAM),
        0x09 => (MbcKind::NoMbc, F::RAM | F::BATTERY),
        0x01 => (MbcKind::Mbc1, F::empty()),
        0x02 => (MbcKind::Mbc1, F::RAM),
        0x03 => (MbcKind::Mbc1, F::RAM | F::BATTERY),
        0x05 => (MbcKind::Mbc2, F::RAM),
        0x06 => (MbcKind::Mbc2, F::RAM | F::BATTERY),
        0x0F => (MbcKind::Mbc3, F::TIMER | F::BATTERY),
        0x10 => (MbcKind::Mbc3, F::TIMER | F::RAM | F::BATTERY),
        0x11 => (MbcKind::Mbc3, F::empty()),
        0x12 => (MbcKind::Mbc3, F::RAM),
        0x13 => (MbcKind::Mbc3, F::RAM | F::BATTERY),
        0x19 => (MbcKind::Mbc5, F::empty()),
        0x1A => (MbcKind::Mbc5, F::RAM),
        0x1B => (MbcKind::Mbc5, F::RAM | F::BATTERY),
        0x1C => (MbcKind::Mbc5, F::RUMBLE),
        0x1D => (MbcKind::Mbc5, F::RUMBLE | F::RAM),
        0x1E => (MbcKind::Mbc5, F::RUMBLE | F::RAM | F::BATTERY),
        _ => return Err(CartridgeError::UnsupportedCartridgeType { code }),
    };
    Ok(decoded)
}

fn rom_size_from_code(code: u8) -> Option<usize> {
    match code {
        0x00..=0x08 => Some((2 * ROM_BANK_SIZE) << code),
        0x52 => Some(72 * ROM_BANK_SIZE),
        0x53 => Some(80 * ROM_BANK_SIZE),
        0x54 => Some(96 * ROM_BANK_SIZE),
        _ => None,
    }
}

fn ram_size_from_code(code: u8) -> Option<usize> {
    match code {
        0x00 => Some(0),
        0x01 => Some(0x800),
        0x02 => Some(RAM_BANK_SIZE),
        0x03 => Some(4 * RAM_BANK_SIZE),
        0x04 => Some(16 * RAM_BANK_SIZE),
        0x05 => Some(8 * RAM_BANK_SIZE),
        _ => None,
    }
}

// Header text is plain ASCII on real carts; map bytes one-to-one so odd
// dumps still produce a stable string.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
