use crate::{RAM_BANK_SIZE, ROM_BANK_SIZE};

/// Latched bank-select state shared by every controller.
///
/// Raw register values are kept at the width the controller latches;
/// effective banks are derived from them against the physical bank counts
/// on each access, so a stale mapping can never outlive a write.
#[derive(Clone, Debug)]
pub(crate) struct BankRegisters {
    pub(crate) rom_bank: u16,
    pub(crate) ram_bank: u8,
    pub(crate) ram_enabled: bool,
    pub(crate) banking_mode: u8,
    rom_banks: usize,
    ram_size: usize,
}

impl BankRegisters {
    pub(crate) fn new(rom_len: usize, ram_size: usize) -> Self {
        Self {
            rom_bank: 1,
            ram_bank: 0,
            ram_enabled: false,
            banking_mode: 0,
            rom_banks: rom_len.div_ceil(ROM_BANK_SIZE).max(1),
            ram_size,
        }
    }

    pub(crate) fn rom_banks(&self) -> usize {
        self.rom_banks
    }

    pub(crate) fn ram_size(&self) -> usize {
        self.ram_size
    }

    /// Number of 8 KiB RAM banks; a 2 KiB chip still counts as one.
    pub(crate) fn ram_banks(&self) -> usize {
        self.ram_size.div_ceil(RAM_BANK_SIZE)
    }

    /// RAM enable latch (0x0000-0x1FFF): only `xA` in the low nibble opens
    /// the RAM window.
    pub(crate) fn write_ram_enable(&mut self, value: u8) {
        self.ram_enabled = value & 0x0F == 0x0A;
        log::trace!("cart: RAM enable <- 0x{:02X} ({})", value, self.ram_enabled);
    }

    pub(crate) fn effective_rom_bank(&self, raw: usize) -> usize {
        raw % self.rom_banks
    }

    pub(crate) fn effective_ram_bank(&self, raw: usize) -> usize {
        match self.ram_banks() {
            0 => 0,
            banks => raw % banks,
        }
    }

    /// Offset into the ROM image for `address` inside a 16 KiB window
    /// mapped to `raw_bank`.
    pub(crate) fn rom_offset(&self, raw_bank: usize, address: u16) -> usize {
        self.effective_rom_bank(raw_bank) * ROM_BANK_SIZE + (address as usize & (ROM_BANK_SIZE - 1))
    }

    /// Offset into external RAM for `address` in 0xA000-0xBFFF mapped to
    /// `raw_bank`. Chips smaller than a bank mirror across the window.
    pub(crate) fn ram_offset(&self, raw_bank: usize, address: u16) -> Option<usize> {
        if self.ram_size == 0 {
            return None;
        }
        let offset = self.effective_ram_bank(raw_bank) * RAM_BANK_SIZE
            + (address as usize & (RAM_BANK_SIZE - 1));
        Some(offset % self.ram_size)
    }
}
