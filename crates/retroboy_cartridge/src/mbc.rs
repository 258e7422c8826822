mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod no_mbc;

pub(crate) use mbc1::Mbc1;
pub(crate) use mbc2::Mbc2;
pub(crate) use mbc3::Mbc3;
pub(crate) use mbc5::Mbc5;
pub(crate) use no_mbc::NoMbc;

use crate::header::{CartridgeFeatures, Header, MbcKind};
use crate::registers::BankRegisters;
use crate::rtc::RtcRegister;

/// Where a bus address lands under the current bank registers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Region {
    /// Absolute offset into the ROM image.
    Rom(usize),
    /// Absolute offset into external RAM.
    Ram(usize),
    /// MBC2 built-in RAM: only the low nibble is stored, the high nibble
    /// reads back as 1s.
    RamNibble(usize),
    /// A latched RTC register (reads) or a live one (writes).
    Rtc(RtcRegister),
    /// Nothing drives the bus: reads see open bus, writes vanish.
    Open,
}

/// Side effects of a control-range write that reach beyond the registers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ControlEvent {
    /// The 0x00 -> 0x01 latch sequence completed.
    LatchClock,
}

/// Memory bank controller with its register state.
pub(crate) enum Mbc {
    NoMbc(NoMbc),
    Mbc1(Mbc1),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl Mbc {
    pub(crate) fn new(header: &Header, rom: &[u8], ram_size: usize, detect_multicart: bool) -> Self {
        let regs = BankRegisters::new(rom.len(), ram_size);
        let features = header.features;
        match header.kind {
            MbcKind::NoMbc => Mbc::NoMbc(NoMbc::new(regs)),
            MbcKind::Mbc1 => {
                let multicart = detect_multicart && mbc1::is_multicart(rom);
                Mbc::Mbc1(Mbc1::new(regs, multicart))
            }
            MbcKind::Mbc2 => Mbc::Mbc2(Mbc2::new(regs)),
            MbcKind::Mbc3 => Mbc::Mbc3(Mbc3::new(
                regs,
                features.contains(CartridgeFeatures::TIMER),
            )),
            MbcKind::Mbc5 => Mbc::Mbc5(Mbc5::new(
                regs,
                features.contains(CartridgeFeatures::RUMBLE),
            )),
        }
    }

    /// Resolve a read or data write at `address`.
    ///
    /// Addresses outside 0x0000-0x7FFF and 0xA000-0xBFFF are not ours and
    /// resolve to [`Region::Open`].
    pub(crate) fn translate(&self, address: u16) -> Region {
        match address {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {}
            _ => return Region::Open,
        }
        match self {
            Mbc::NoMbc(m) => m.translate(address),
            Mbc::Mbc1(m) => m.translate(address),
            Mbc::Mbc2(m) => m.translate(address),
            Mbc::Mbc3(m) => m.translate(address),
            Mbc::Mbc5(m) => m.translate(address),
        }
    }

    /// Handle a write into the 0x0000-0x7FFF control range.
    pub(crate) fn write_register(&mut self, address: u16, value: u8) -> Option<ControlEvent> {
        debug_assert!(address <= 0x7FFF);
        match self {
            Mbc::NoMbc(m) => {
                m.write_register(address, value);
                None
            }
            Mbc::Mbc1(m) => {
                m.write_register(address, value);
                None
            }
            Mbc::Mbc2(m) => {
                m.write_register(address, value);
                None
            }
            Mbc::Mbc3(m) => m.write_register(address, value),
            Mbc::Mbc5(m) => {
                m.write_register(address, value);
                None
            }
        }
    }

    pub(crate) fn registers(&self) -> &BankRegisters {
        match self {
            Mbc::NoMbc(m) => &m.regs,
            Mbc::Mbc1(m) => &m.regs,
            Mbc::Mbc2(m) => &m.regs,
            Mbc::Mbc3(m) => &m.regs,
            Mbc::Mbc5(m) => &m.regs,
        }
    }

    pub(crate) fn rumble_active(&self) -> bool {
        match self {
            Mbc::Mbc5(m) => m.motor_on(),
            _ => false,
        }
    }
}
