// emit.rs - Growable little-endian bytecode buffer

use crate::error::CompileError;

const INITIAL_CAPACITY: usize = 64;

/// Append-only byte buffer with 16-bit backpatching.
///
/// All multi-byte operands are little-endian. Positions are byte offsets
/// from the start of the buffer and double as the program counter values
/// branch offsets are computed against.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    bytes: Vec<u8>,
}

impl CodeBuffer {
    pub fn new() -> Self {
        CodeBuffer {
            bytes: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Current write position.
    pub fn here(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn emit_u8(&mut self, byte: u8) -> Result<(), CompileError> {
        self.reserve(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    pub fn emit_i16_le(&mut self, value: i16) -> Result<(), CompileError> {
        self.reserve(2)?;
        self.bytes.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn emit_i32_le(&mut self, value: i32) -> Result<(), CompileError> {
        self.reserve(4)?;
        self.bytes.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Overwrite the two bytes at `pos` with a little-endian 16-bit value.
    pub fn patch_i16_le(&mut self, pos: u32, value: i16) {
        let pos = pos as usize;
        let le = value.to_le_bytes();
        self.bytes[pos] = le[0];
        self.bytes[pos + 1] = le[1];
    }

    /// Drop everything at and after `pos`.
    pub fn truncate(&mut self, pos: u32) {
        self.bytes.truncate(pos as usize);
    }

    /// Hand the finished bytes to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn reserve(&mut self, additional: usize) -> Result<(), CompileError> {
        self.bytes
            .try_reserve(additional)
            .map_err(|_| CompileError::OutOfMemory)
    }
}
