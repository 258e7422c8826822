use super::Region;
use crate::registers::BankRegisters;
use crate::ROM_BANK_SIZE;

/// MBC1 cartridge state.
///
/// `regs.rom_bank` is the 5-bit BANK1 register (never 0), `regs.ram_bank`
/// the 2-bit BANK2 register and `regs.banking_mode` the mode bit. BANK2
/// supplies ROM bank bits 5-6 in both windows (the 0x0000 window only in
/// mode 1) and selects the RAM bank in mode 1.
///
/// MBC1M multicarts wire BANK2 to bits 4-5 instead and drop BANK1 bit 4.
pub(crate) struct Mbc1 {
    pub(super) regs: BankRegisters,
    multicart: bool,
}

impl Mbc1 {
    pub(super) fn new(regs: BankRegisters, multicart: bool) -> Self {
        if multicart {
            log::debug!("cart: MBC1M multicart wiring detected");
        }
        Self { regs, multicart }
    }

    fn bank2_shift(&self) -> u32 {
        if self.multicart {
            4
        } else {
            5
        }
    }

    fn low_window_bank(&self) -> usize {
        if self.regs.banking_mode == 0 {
            0
        } else {
            (self.regs.ram_bank as usize) << self.bank2_shift()
        }
    }

    fn high_window_bank(&self) -> usize {
        let bank1 = if self.multicart {
            self.regs.rom_bank as usize & 0x0F
        } else {
            self.regs.rom_bank as usize
        };
        ((self.regs.ram_bank as usize) << self.bank2_shift()) | bank1
    }

    pub(super) fn translate(&self, address: u16) -> Region {
        match address {
            0x0000..=0x3FFF => Region::Rom(self.regs.rom_offset(self.low_window_bank(), address)),
            0x4000..=0x7FFF => Region::Rom(self.regs.rom_offset(self.high_window_bank(), address)),
            _ => {
                if !self.regs.ram_enabled {
                    return Region::Open;
                }
                let bank = if self.regs.banking_mode == 0 {
                    0
                } else {
                    self.regs.ram_bank as usize
                };
                match self.regs.ram_offset(bank, address) {
                    Some(offset) => Region::Ram(offset),
                    None => Region::Open,
                }
            }
        }
    }

    pub(super) fn write_register(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.regs.write_ram_enable(value),
            0x2000..=0x3FFF => {
                // The zero check sees only the 5 latched bits, so 0x20
                // selects bank 1 as well.
                let bank1 = value & 0x1F;
                self.regs.rom_bank = if bank1 == 0 { 1 } else { bank1 as u16 };
                log::trace!("cart: MBC1 BANK1 <- 0x{:02X}", self.regs.rom_bank);
            }
            0x4000..=0x5FFF => {
                self.regs.ram_bank = value & 0x03;
                log::trace!("cart: MBC1 BANK2 <- 0x{:02X}", self.regs.ram_bank);
            }
            _ => self.regs.banking_mode = value & 0x01,
        }
    }
}

/// MBC1M boards are 8 Mbit and repeat the boot logo at the start of each
/// 256 KiB game; the header alone can't tell them apart from plain MBC1.
pub(super) fn is_multicart(rom: &[u8]) -> bool {
    if rom.len() / ROM_BANK_SIZE != 64 {
        return false;
    }
    let logo = match rom.get(0x0104..0x0134) {
        Some(logo) if logo.iter().any(|&b| b != 0) => logo,
        _ => return false,
    };
    [0x10, 0x20].iter().all(|&bank| {
        let start = bank * ROM_BANK_SIZE + 0x0104;
        rom.get(start..start + logo.len()) == Some(logo)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_rom::TestRom;
    use crate::RAM_BANK_SIZE;

    fn mbc1(banks: usize, ram_size: usize) -> Mbc1 {
        Mbc1::new(
            BankRegisters::new(banks * ROM_BANK_SIZE, ram_size),
            false,
        )
    }

    fn high_bank(m: &Mbc1) -> usize {
        match m.translate(0x4000) {
            Region::Rom(offset) => offset / ROM_BANK_SIZE,
            other => panic!("unexpected region {:?}", other),
        }
    }

    #[test]
    fn bank_zero_selects_bank_one() {
        let mut m = mbc1(32, 0);
        m.write_register(0x2000, 0x00);
        assert_eq!(high_bank(&m), 1);
        m.write_register(0x2000, 0x20);
        assert_eq!(high_bank(&m), 1);
        m.write_register(0x2000, 0x1F);
        assert_eq!(high_bank(&m), 0x1F);
    }

    #[test]
    fn bank2_extends_rom_bank_and_aliases_multiples_of_32() {
        let mut m = mbc1(128, 0);
        m.write_register(0x4000, 0x01);
        m.write_register(0x2000, 0x00);
        assert_eq!(high_bank(&m), 0x21);
        m.write_register(0x4000, 0x03);
        m.write_register(0x2000, 0x05);
        assert_eq!(high_bank(&m), 0x65);
    }

    #[test]
    fn bank_number_masks_to_rom_size() {
        let mut m = mbc1(4, 0);
        m.write_register(0x2000, 0x07);
        assert_eq!(high_bank(&m), 3);
        m.write_register(0x2000, 0x04);
        assert_eq!(high_bank(&m), 0);
    }

    #[test]
    fn mode_one_remaps_low_window_and_ram() {
        let mut m = mbc1(128, 4 * RAM_BANK_SIZE);
        m.write_register(0x0000, 0x0A);
        m.write_register(0x4000, 0x02);

        assert_eq!(m.translate(0x0000), Region::Rom(0));
        assert_eq!(m.translate(0xA000), Region::Ram(0));

        m.write_register(0x6000, 0x01);
        assert_eq!(m.translate(0x0010), Region::Rom(0x40 * ROM_BANK_SIZE + 0x10));
        assert_eq!(m.translate(0xA010), Region::Ram(2 * RAM_BANK_SIZE + 0x10));
    }

    #[test]
    fn ram_window_closed_until_enabled() {
        let mut m = mbc1(4, RAM_BANK_SIZE);
        assert_eq!(m.translate(0xA000), Region::Open);
        m.write_register(0x1FFF, 0x0A);
        assert_eq!(m.translate(0xA000), Region::Ram(0));
        m.write_register(0x0000, 0x00);
        assert_eq!(m.translate(0xA000), Region::Open);
    }

    #[test]
    fn multicart_uses_four_bit_bank1() {
        let rom = TestRom::new(0x01)
            .banks(64)
            .logo_in_banks(&[0x10, 0x20])
            .build();
        assert!(is_multicart(&rom));

        let mut m = Mbc1::new(BankRegisters::new(rom.len(), 0), true);
        m.write_register(0x4000, 0x01);
        m.write_register(0x2000, 0x12);
        assert_eq!(high_bank(&m), 0x12);
        m.write_register(0x2000, 0x10);
        assert_eq!(high_bank(&m), 0x10);

        m.write_register(0x6000, 0x01);
        assert_eq!(m.translate(0x0000), Region::Rom(0x10 * ROM_BANK_SIZE));
    }

    #[test]
    fn plain_64_bank_rom_is_not_multicart() {
        let rom = TestRom::new(0x01).banks(64).build();
        assert!(!is_multicart(&rom));
    }
}
