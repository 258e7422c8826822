use super::Region;
use crate::registers::BankRegisters;

/// Size of the MBC2 built-in RAM in 4-bit cells.
pub(crate) const MBC2_RAM_CELLS: usize = 0x200;

/// MBC2 cartridge state.
///
/// Both registers live in 0x0000-0x3FFF and are told apart by address bit
/// 8: clear selects the RAM enable latch, set selects the 4-bit ROM bank.
/// The built-in 512 x 4-bit RAM repeats across the whole 0xA000-0xBFFF
/// window.
pub(crate) struct Mbc2 {
    pub(super) regs: BankRegisters,
}

impl Mbc2 {
    pub(super) fn new(regs: BankRegisters) -> Self {
        Self { regs }
    }

    pub(super) fn translate(&self, address: u16) -> Region {
        match address {
            0x0000..=0x3FFF => Region::Rom(address as usize),
            0x4000..=0x7FFF => Region::Rom(self.regs.rom_offset(self.regs.rom_bank as usize, address)),
            _ if self.regs.ram_enabled => {
                Region::RamNibble((address as usize - 0xA000) & (MBC2_RAM_CELLS - 1))
            }
            _ => Region::Open,
        }
    }

    pub(super) fn write_register(&mut self, address: u16, value: u8) {
        if address > 0x3FFF {
            return;
        }
        if address & 0x0100 == 0 {
            self.regs.write_ram_enable(value);
        } else {
            let bank = value & 0x0F;
            self.regs.rom_bank = if bank == 0 { 1 } else { bank as u16 };
            log::trace!("cart: MBC2 ROM bank <- 0x{:02X}", self.regs.rom_bank);
        }
    }
}
