use super::Region;
use crate::registers::BankRegisters;

/// MBC5 cartridge state.
///
/// 9-bit ROM bank split across 0x2000-0x2FFF (low 8 bits) and
/// 0x3000-0x3FFF (bit 8). Unlike MBC1/MBC3 there is no bank-zero remap:
/// bank 0 can be mapped into 0x4000-0x7FFF. On rumble boards bit 3 of the
/// RAM bank register drives the motor instead of selecting RAM.
pub(crate) struct Mbc5 {
    pub(super) regs: BankRegisters,
    rumble: bool,
    motor: bool,
}

impl Mbc5 {
    pub(super) fn new(regs: BankRegisters, rumble: bool) -> Self {
        Self {
            regs,
            rumble,
            motor: false,
        }
    }

    pub(super) fn motor_on(&self) -> bool {
        self.motor
    }

    pub(super) fn translate(&self, address: u16) -> Region {
        match address {
            0x0000..=0x3FFF => Region::Rom(address as usize),
            0x4000..=0x7FFF => Region::Rom(self.regs.rom_offset(self.regs.rom_bank as usize, address)),
            _ if !self.regs.ram_enabled => Region::Open,
            _ => match self.regs.ram_offset(self.regs.ram_bank as usize, address) {
                Some(offset) => Region::Ram(offset),
                None => Region::Open,
            },
        }
    }

    pub(super) fn write_register(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.regs.write_ram_enable(value),
            0x2000..=0x2FFF => {
                self.regs.rom_bank = (self.regs.rom_bank & 0x100) | value as u16;
                log::trace!("cart: MBC5 ROM bank <- 0x{:03X}", self.regs.rom_bank);
            }
            0x3000..=0x3FFF => {
                self.regs.rom_bank = (self.regs.rom_bank & 0x0FF) | (((value & 0x01) as u16) << 8);
                log::trace!("cart: MBC5 ROM bank <- 0x{:03X}", self.regs.rom_bank);
            }
            0x4000..=0x5FFF => {
                if self.rumble {
                    self.motor = value & 0x08 != 0;
                    self.regs.ram_bank = value & 0x07;
                } else {
                    self.regs.ram_bank = value & 0x0F;
                }
            }
            _ => {}
        }
    }
}
