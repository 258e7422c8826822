use crate::OPEN_BUS;

/// Cartridge-side external RAM.
///
/// A flat byte array; bank selection is resolved by the MBC before an
/// offset reaches us. Zero-initialised at power-on.
#[derive(Clone, Debug, Default)]
pub(crate) struct ExternalRam {
    data: Vec<u8>,
}

impl ExternalRam {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn read(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(OPEN_BUS)
    }

    pub(crate) fn write(&mut self, offset: usize, value: u8) {
        if let Some(slot) = self.data.get_mut(offset) {
            *slot = value;
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite the whole store. Callers check the length first.
    pub(crate) fn replace(&mut self, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), self.data.len());
        self.data.copy_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed_and_reads_open_bus_past_end() {
        let mut ram = ExternalRam::new(0x800);
        assert_eq!(ram.len(), 0x800);
        assert!(ram.as_bytes().iter().all(|&b| b == 0));

        ram.write(0x7FF, 0x42);
        ram.write(0x800, 0x42);
        assert_eq!(ram.read(0x7FF), 0x42);
        assert_eq!(ram.read(0x800), OPEN_BUS);
    }

    #[test]
    fn empty_store() {
        let ram = ExternalRam::new(0);
        assert_eq!(ram.len(), 0);
        assert_eq!(ram.read(0), OPEN_BUS);
    }
}
