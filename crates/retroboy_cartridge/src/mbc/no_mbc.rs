use super::Region;
use crate::registers::BankRegisters;

/// ROM-only cartridge, optionally with a RAM chip wired straight to
/// 0xA000-0xBFFF (types 0x08/0x09). There is no enable latch.
pub(crate) struct NoMbc {
    pub(super) regs: BankRegisters,
}

impl NoMbc {
    pub(super) fn new(regs: BankRegisters) -> Self {
        Self { regs }
    }

    pub(super) fn translate(&self, address: u16) -> Region {
        match address {
            0x0000..=0x7FFF => Region::Rom(address as usize),
            _ => match self.regs.ram_offset(0, address) {
                Some(offset) => Region::Ram(offset),
                None => Region::Open,
            },
        }
    }

    pub(super) fn write_register(&mut self, address: u16, value: u8) {
        log::trace!(
            "cart: ignored write 0x{:02X} to ROM at 0x{:04X}",
            value,
            address
        );
    }
}
