use log::{info, warn};

use crate::font;

pub const MEMORY_SIZE: usize = 4096;

/// Where programs are loaded and where the program counter starts.
pub const PROGRAM_OFFSET: usize = 0x200;

/// Largest program that fits between `PROGRAM_OFFSET` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_OFFSET;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    TooLarge { size: usize, max: usize },
}

/// Demo ROM run when no file is given: draws the pressed key's hex digit.
pub const DEFAULT_PROGRAM: &[u8] = &[
    0x12, 0x0c, 0xf0, 0x80, 0x80, 0x80, 0xf0, 0xf0, 0x90, 0xf0, 0x90, 0xf0,
    0x6e, 0x10, 0x60, 0x1b, 0x61, 0x0a, 0xa2, 0x02, 0xd0, 0x15, 0x80, 0xf0,
    0x60, 0x20, 0x61, 0x0a, 0xa2, 0x07, 0xd0, 0x15, 0x80, 0xf0, 0x60, 0x01,
    0x40, 0x00, 0x12, 0x2a, 0x12, 0x22, 0x6f, 0x03, 0x8e, 0xf5, 0x8f, 0x00,
    0xfe, 0x29, 0xfe, 0x65, 0x00, 0xee, 0x60, 0xff, 0x61, 0x00, 0xe1, 0xa1,
    0x60, 0x00, 0x61, 0x01, 0xe1, 0xa1, 0x60, 0x01, 0x61, 0x02, 0xe1, 0xa1,
    0x60, 0x02, 0x61, 0x03, 0xe1, 0xa1, 0x60, 0x03, 0x61, 0x04, 0xe1, 0xa1,
    0x60, 0x04, 0x61, 0x05, 0xe1, 0xa1, 0x60, 0x05, 0x61, 0x06, 0xe1, 0xa1,
    0x60, 0x06, 0x61, 0x07, 0xe1, 0xa1, 0x60, 0x07, 0x61, 0x08, 0xe1, 0xa1,
    0x60, 0x08, 0x61, 0x09, 0xe1, 0xa1, 0x60, 0x09, 0x61, 0x0a, 0xe1, 0xa1,
    0x60, 0x0a, 0x61, 0x0b, 0xe1, 0xa1, 0x60, 0x0b, 0x61, 0x0c, 0xe1, 0xa1,
    0x60, 0x0c, 0x61, 0x0d, 0xe1, 0xa1, 0x60, 0x0d, 0x61, 0x0e, 0xe1, 0xa1,
    0x60, 0x0e, 0x61, 0x0f, 0xe1, 0xa1, 0x60, 0x0f, 0x6f, 0x03, 0x8e, 0xf5,
    0x8f, 0x00, 0xfe, 0x29, 0xfe, 0x65, 0x00, 0xee, 0x85, 0x20, 0x84, 0x10,
    0x83, 0x00, 0x66, 0x00, 0xf5, 0x33, 0xf2, 0x65, 0xf0, 0x29, 0xd3, 0x45,
    0x86, 0xf1, 0xf1, 0x29, 0x73, 0x05, 0xd3, 0x45, 0x86, 0xf1, 0xf2, 0x29,
    0x73, 0x05, 0xd3, 0x45, 0x86, 0xf1, 0x6f, 0x03, 0x8e, 0xf5, 0x8f, 0x60,
    0xfe, 0x29, 0xfe, 0x65, 0x00, 0xee,
];

wrapper! {
    Buffer => MEMORY_SIZE
}

/// Flat byte-addressable store, plus the pristine image that `reset` restores.
#[derive(Debug)]
pub struct Memory {
    buffer: Buffer,
    original: Buffer,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut buffer = Buffer::default();
        buffer[font::MEMORY_RANGE].copy_from_slice(font::FONT);
        let original = buffer;
        Self { buffer, original }
    }

    /// Reads a byte, or 0 past the end of memory.
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.buffer.get(addr as usize).copied().unwrap_or(0)
    }

    /// Reads a big-endian word. The word at `0x0FFF` has a zero low byte.
    pub fn read_word(&self, addr: u16) -> u16 {
        if addr as usize >= MEMORY_SIZE {
            return 0;
        }
        u16::from_be_bytes([self.read_byte(addr), self.read_byte(addr.wrapping_add(1))])
    }

    /// Writes past the end of memory are dropped.
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        match self.buffer.get_mut(addr as usize) {
            Some(byte) => *byte = value,
            None => warn!("Ignored write past end of memory [addr: {addr:#06X}]"),
        }
    }

    pub fn font_sprite_address(&self, digit: u8) -> u16 {
        ((digit & 0xF) as usize * font::SPRITE_SIZE + font::MEMORY_RANGE.start) as u16
    }

    /// Copies `rom` to `PROGRAM_OFFSET` and makes the result the reset baseline.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: rom.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        *self = Self::new();
        self.buffer[PROGRAM_OFFSET..PROGRAM_OFFSET + rom.len()].copy_from_slice(rom);
        self.original = self.buffer;
        info!("Loaded ROM [size: {}]", rom.len());
        Ok(())
    }

    /// Restores the image captured by the last `load_program`.
    pub fn reset(&mut self) {
        self.buffer = self.original;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..]
    }
}
