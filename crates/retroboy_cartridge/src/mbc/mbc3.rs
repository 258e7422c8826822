use super::{ControlEvent, Region};
use crate::registers::BankRegisters;
use crate::rtc::RtcRegister;

/// MBC3 cartridge state.
///
/// 7-bit ROM bank with the bank-zero remap, four RAM banks, and on TIMER
/// cartridges the RTC registers mapped into the RAM window through selects
/// 0x08-0x0C. The clock itself lives with the cartridge; we only decode
/// the select and the latch sequence.
pub(crate) struct Mbc3 {
    pub(super) regs: BankRegisters,
    has_rtc: bool,
    latch_armed: bool,
}

impl Mbc3 {
    pub(super) fn new(regs: BankRegisters, has_rtc: bool) -> Self {
        Self {
            regs,
            has_rtc,
            latch_armed: false,
        }
    }

    pub(super) fn translate(&self, address: u16) -> Region {
        match address {
            0x0000..=0x3FFF => Region::Rom(address as usize),
            0x4000..=0x7FFF => Region::Rom(self.regs.rom_offset(self.regs.rom_bank as usize, address)),
            _ if !self.regs.ram_enabled => Region::Open,
            _ => match self.regs.ram_bank {
                select @ 0x00..=0x03 => match self.regs.ram_offset(select as usize, address) {
                    Some(offset) => Region::Ram(offset),
                    None => Region::Open,
                },
                select if self.has_rtc => match RtcRegister::from_select(select) {
                    Some(reg) => Region::Rtc(reg),
                    None => Region::Open,
                },
                _ => Region::Open,
            },
        }
    }

    pub(super) fn write_register(&mut self, address: u16, value: u8) -> Option<ControlEvent> {
        match address {
            0x0000..=0x1FFF => self.regs.write_ram_enable(value),
            0x2000..=0x3FFF => {
                let bank = value & 0x7F;
                self.regs.rom_bank = if bank == 0 { 1 } else { bank as u16 };
                log::trace!("cart: MBC3 ROM bank <- 0x{:02X}", self.regs.rom_bank);
            }
            0x4000..=0x5FFF => {
                self.regs.ram_bank = value;
                log::trace!("cart: MBC3 RAM/RTC select <- 0x{:02X}", value);
            }
            _ => {
                let completes = self.latch_armed && value == 0x01;
                self.latch_armed = value == 0x00;
                if completes && self.has_rtc {
                    return Some(ControlEvent::LatchClock);
                }
            }
        }
        None
    }
}
