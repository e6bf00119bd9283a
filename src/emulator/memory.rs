use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Invalid memory size {0}, expected 2..=65536 bytes")]
    InvalidSize(usize),
}

/// Read access to byte addressable storage.
///
/// Addresses are reduced modulo the size of the storage, so every access is defined. Words are
/// stored in big-endian format.
pub trait Readable {
    fn data(&self) -> &[u8];

    fn size(&self) -> usize {
        self.data().len()
    }

    fn read_byte(&self, address: u16) -> u8 {
        let data = self.data();
        data[address as usize % data.len()]
    }

    /// Reads a 16-bit word from memory, high byte first.
    fn read_word(&self, address: u16) -> u16 {
        let data = self.data();
        let ix = address as usize % data.len();
        u16::from_be_bytes([data[ix], data[(ix + 1) % data.len()]])
    }

    /// Read `length` consecutive bytes starting at `address`.
    fn window(&self, address: u16, length: usize) -> Vec<u8> {
        let data = self.data();
        let ix = address as usize % data.len();
        (0..length).map(|i| data[(ix + i) % data.len()]).collect()
    }
}

/// Write access to byte addressable storage.
pub trait Writeable {
    fn data_mut(&mut self) -> &mut [u8];

    fn load(&mut self, start_address: u16, data: &[u8]) {
        let mut address = start_address;
        for byte in data {
            self.write_byte(address, *byte);
            address = address.wrapping_add(1);
        }
    }

    fn write_byte(&mut self, address: u16, data: u8) {
        let memory = self.data_mut();
        let ix = address as usize % memory.len();
        memory[ix] = data;
    }

    /// Writes a 16-bit word to memory, high byte first.
    fn write_word(&mut self, address: u16, data: u16) {
        let memory = self.data_mut();
        let ix = address as usize % memory.len();
        let [high, low] = data.to_be_bytes();
        memory[ix] = high;
        let next = (ix + 1) % memory.len();
        memory[next] = low;
    }
}

/// Flat memory holding program, data and stack.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub const MEMORY_SIZE: usize = 64 * 1024;
    pub const MIN_SIZE: usize = 2;

    pub fn new() -> Self {
        Self {
            data: vec![0; Memory::MEMORY_SIZE],
        }
    }

    pub fn with_size(size: usize) -> Result<Self, MemoryError> {
        if !(Memory::MIN_SIZE..=Memory::MEMORY_SIZE).contains(&size) {
            return Err(MemoryError::InvalidSize(size));
        }
        Ok(Self {
            data: vec![0; size],
        })
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("size", &self.data.len())
            .finish()
    }
}

impl Readable for Memory {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Writeable for Memory {
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
