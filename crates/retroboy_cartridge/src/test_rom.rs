//! Synthetic ROM images for tests.
//!
//! Every switchable bank is tagged with its own number: offset 0 holds the
//! low byte, offset 1 the high byte and the rest of the bank repeats the low
//! byte. Bank 0 is zero outside the header.

use crate::header::compute_header_checksum;
use crate::ROM_BANK_SIZE;

const LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

pub(crate) struct TestRom {
    cartridge_type: u8,
    banks: usize,
    rom_size_code: Option<u8>,
    ram_size_code: u8,
    title: Vec<u8>,
    destination: u8,
    cgb_flag: u8,
    sgb_flag: u8,
    logo_in_banks: Vec<usize>,
}

impl TestRom {
    pub(crate) fn new(cartridge_type: u8) -> Self {
        Self {
            cartridge_type,
            banks: 2,
            rom_size_code: None,
            ram_size_code: 0,
            title: b"TESTROM".to_vec(),
            destination: 0,
            cgb_flag: 0,
            sgb_flag: 0,
            logo_in_banks: Vec::new(),
        }
    }

    pub(crate) fn banks(mut self, banks: usize) -> Self {
        self.banks = banks;
        self
    }

    pub(crate) fn rom_size_code(mut self, code: u8) -> Self {
        self.rom_size_code = Some(code);
        self
    }

    pub(crate) fn ram_size_code(mut self, code: u8) -> Self {
        self.ram_size_code = code;
        self
    }

    pub(crate) fn title(mut self, title: &[u8]) -> Self {
        self.title = title.to_vec();
        self
    }

    pub(crate) fn destination(mut self, code: u8) -> Self {
        self.destination = code;
        self
    }

    pub(crate) fn cgb_flag(mut self, flag: u8) -> Self {
        self.cgb_flag = flag;
        self
    }

    pub(crate) fn sgb_flag(mut self, flag: u8) -> Self {
        self.sgb_flag = flag;
        self
    }

    /// Repeat the boot logo at 0x0104 of the given banks (MBC1M layout).
    pub(crate) fn logo_in_banks(mut self, banks: &[usize]) -> Self {
        self.logo_in_banks = banks.to_vec();
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut rom = vec![0u8; self.banks * ROM_BANK_SIZE];
        for bank in 1..self.banks {
            let base = bank * ROM_BANK_SIZE;
            rom[base..base + ROM_BANK_SIZE].fill(bank as u8);
            rom[base + 1] = (bank >> 8) as u8;
        }
        for &bank in &self.logo_in_banks {
            let start = bank * ROM_BANK_SIZE + 0x0104;
            rom[start..start + LOGO.len()].copy_from_slice(&LOGO);
        }

        rom[0x0104..0x0134].copy_from_slice(&LOGO);
        let title_len = self.title.len().min(16);
        rom[0x0134..0x0134 + title_len].copy_from_slice(&self.title[..title_len]);
        if self.cgb_flag != 0 {
            rom[0x0143] = self.cgb_flag;
        }
        rom[0x0146] = self.sgb_flag;
        rom[0x0147] = self.cartridge_type;
        rom[0x0148] = self
            .rom_size_code
            .unwrap_or_else(|| (self.banks / 2).max(1).trailing_zeros() as u8);
        rom[0x0149] = self.ram_size_code;
        rom[0x014A] = self.destination;
        rom[0x014D] = compute_header_checksum(&rom);
        rom
    }
}

/// Bank number tagged at the start of the 16 KiB window beginning at `base`.
pub(crate) fn bank_tag(read: impl Fn(u16) -> u8, base: u16) -> u16 {
    read(base) as u16 | ((read(base + 1) as u16) << 8)
}
