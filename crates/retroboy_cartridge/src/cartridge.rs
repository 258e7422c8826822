use std::io::{Read, Write};

use typed_builder::TypedBuilder;

use crate::clock::{RtcClock, SystemClock};
use crate::error::Result;
use crate::header::{CartridgeFeatures, GameType, Header, MbcKind};
use crate::mbc::{ControlEvent, Mbc, Region};
use crate::persistence;
use crate::rtc::Rtc;
use crate::storage::ExternalRam;
use crate::{OPEN_BUS, ROM_BANK_SIZE};

/// Knobs for [`Cartridge::open_with`].
#[derive(TypedBuilder)]
pub struct CartridgeOptions {
    /// Time source for the MBC3 clock.
    #[builder(default = Box::new(SystemClock) as Box<dyn RtcClock>)]
    pub clock: Box<dyn RtcClock>,
    /// Recognise MBC1M multicart boards from their ROM layout.
    #[builder(default = true)]
    pub detect_multicart: bool,
}

impl Default for CartridgeOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A Game Boy cartridge: ROM image, controller state, external RAM and,
/// for MBC3+TIMER boards, the real-time clock.
///
/// The CPU side sees only [`read`](Self::read) and [`write`](Self::write)
/// for 0x0000-0x7FFF and 0xA000-0xBFFF. Everything else about banking is
/// internal.
pub struct Cartridge {
    header: Header,
    rom: Vec<u8>,
    ram: ExternalRam,
    rtc: Option<Rtc>,
    mbc: Mbc,
    clock: Box<dyn RtcClock>,
}

impl Cartridge {
    /// Parse `rom` and build the matching controller, using the system
    /// clock for the RTC.
    pub fn open(rom: &[u8]) -> Result<Self> {
        Self::open_with(rom, CartridgeOptions::default())
    }

    pub fn open_with(rom: &[u8], options: CartridgeOptions) -> Result<Self> {
        let header = Header::parse(rom)?;

        if !header.is_authentic {
            log::warn!(
                "cart: header checksum mismatch for '{}' (stored 0x{:02X})",
                header.title,
                header.header_checksum
            );
        }
        match header.declared_rom_size() {
            Some(size) if size != rom.len() => log::warn!(
                "cart: header declares {} bytes of ROM, image has {}",
                size,
                rom.len()
            ),
            Some(_) => {}
            None => log::warn!(
                "cart: unknown ROM size code 0x{:02X}",
                header.rom_size_code
            ),
        }
        let ram_size = header.ram_size().unwrap_or_else(|| {
            log::warn!(
                "cart: unknown RAM size code 0x{:02X}, assuming no RAM",
                header.ram_size_code
            );
            0
        });

        let CartridgeOptions {
            clock,
            detect_multicart,
        } = options;

        let mbc = Mbc::new(&header, rom, ram_size, detect_multicart);
        let rtc = header.has_rtc().then(|| Rtc::new(clock.now()));

        log::debug!(
            "cart: loaded '{}' type 0x{:02X} ({}), {} ROM banks, {} bytes RAM, battery={}, rtc={}",
            header.title,
            header.cartridge_type_code,
            header.kind,
            mbc.registers().rom_banks(),
            ram_size,
            header.has_battery(),
            rtc.is_some()
        );

        Ok(Self {
            header,
            rom: rom.to_vec(),
            ram: ExternalRam::new(ram_size),
            rtc,
            mbc,
            clock,
        })
    }

    pub fn read(&self, address: u16) -> u8 {
        match self.mbc.translate(address) {
            Region::Rom(offset) => self.rom.get(offset).copied().unwrap_or(OPEN_BUS),
            Region::Ram(offset) => self.ram.read(offset),
            Region::RamNibble(offset) => 0xF0 | self.ram.read(offset),
            Region::Rtc(reg) => self.rtc.as_ref().map_or(OPEN_BUS, |rtc| rtc.read(reg)),
            Region::Open => OPEN_BUS,
        }
    }

    pub fn write(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x7FFF => {
                if let Some(ControlEvent::LatchClock) = self.mbc.write_register(address, value) {
                    let now = self.clock.now();
                    if let Some(rtc) = self.rtc.as_mut() {
                        rtc.sync(now);
                        rtc.latch();
                    }
                }
            }
            0xA000..=0xBFFF => match self.mbc.translate(address) {
                Region::Ram(offset) => self.ram.write(offset, value),
                Region::RamNibble(offset) => self.ram.write(offset, value & 0x0F),
                Region::Rtc(reg) => {
                    let now = self.clock.now();
                    if let Some(rtc) = self.rtc.as_mut() {
                        rtc.sync(now);
                        rtc.write(reg, value);
                    }
                }
                Region::Rom(_) | Region::Open => log::trace!(
                    "cart: dropped RAM write 0x{:02X} at 0x{:04X}",
                    value,
                    address
                ),
            },
            _ => log::trace!(
                "cart: write 0x{:02X} to 0x{:04X} is outside the cartridge",
                value,
                address
            ),
        }
    }

    /// Patch one ROM byte: `address` (0x0000-0x3FFF) inside ROM `bank`.
    ///
    /// Used for cheats and test patches. Out-of-range addresses or banks
    /// are logged and ignored.
    pub fn override_rom(&mut self, bank: usize, address: u16, value: u8) {
        if address as usize >= ROM_BANK_SIZE {
            log::error!("cart: invalid ROM override address 0x{:04X}", address);
            return;
        }
        let offset = bank * ROM_BANK_SIZE + address as usize;
        match self.rom.get_mut(offset) {
            Some(slot) => {
                log::debug!(
                    "cart: ROM override at {:02X}:{:04X}, 0x{:02X} -> 0x{:02X}",
                    bank,
                    address,
                    *slot,
                    value
                );
                *slot = value;
            }
            None => log::error!(
                "cart: ROM override bank 0x{:02X} is past the end of a {}-bank image",
                bank,
                self.rom_banks()
            ),
        }
    }

    /// Bring the RTC up to the clock's current time.
    ///
    /// The clock is also synced whenever software latches it or writes a
    /// clock register, so calling this is only needed when the host wants
    /// the live registers current at a specific moment.
    pub fn tick_rtc(&mut self) {
        let now = self.clock.now();
        if let Some(rtc) = self.rtc.as_mut() {
            rtc.sync(now);
        }
    }

    /// Size in bytes of the payload [`save_ram`](Self::save_ram) writes and
    /// [`load_ram`](Self::load_ram) accepts.
    pub fn expected_payload_len(&self) -> usize {
        persistence::payload_len(self.ram.len(), self.rtc.is_some())
    }

    /// Write external RAM (and the clock record on RTC boards) to `sink`.
    ///
    /// Cartridges without RAM or clock write nothing.
    pub fn save_ram<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<()> {
        self.tick_rtc();
        let written = persistence::write_payload(sink, &self.ram, self.rtc.as_ref())?;
        log::debug!("cart: saved {} bytes of battery data", written);
        Ok(())
    }

    /// Replace external RAM (and the clock) with a payload from `source`.
    ///
    /// The whole source is read first; on a length mismatch nothing
    /// changes. The clock is fast-forwarded from the time recorded in the
    /// payload to now.
    pub fn load_ram<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<()> {
        let payload = persistence::read_payload(source, self.ram.len(), self.rtc.is_some())?;
        self.ram.replace(&payload.ram);
        if let Some(mut rtc) = payload.rtc {
            rtc.sync(self.clock.now());
            self.rtc = Some(rtc);
        }
        log::debug!(
            "cart: loaded {} bytes of battery data",
            self.expected_payload_len()
        );
        Ok(())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn game_name(&self) -> &str {
        &self.header.game_name
    }

    pub fn game_type(&self) -> GameType {
        self.header.game_type
    }

    pub fn cartridge_type_code(&self) -> u8 {
        self.header.cartridge_type_code
    }

    pub fn destination_code(&self) -> u8 {
        self.header.destination_code
    }

    pub fn is_authentic(&self) -> bool {
        self.header.is_authentic
    }

    pub fn kind(&self) -> MbcKind {
        self.header.kind
    }

    pub fn features(&self) -> CartridgeFeatures {
        self.header.features
    }

    pub fn has_battery(&self) -> bool {
        self.header.has_battery()
    }

    pub fn has_rtc(&self) -> bool {
        self.rtc.is_some()
    }

    pub fn rom_banks(&self) -> usize {
        self.mbc.registers().rom_banks()
    }

    pub fn ram_size(&self) -> usize {
        self.mbc.registers().ram_size()
    }

    /// Whether an MBC5 rumble board currently has its motor switched on.
    pub fn rumble_active(&self) -> bool {
        self.mbc.rumble_active()
    }
}
