// disasm.rs - Stateless bytecode disassembler
//
// Used by the test suite to assert the structure of compiled code, and by
// hosts that want a readable dump of an artifact.

use crate::opcodes::{ImmKind, Op};

fn read_i16_le(code: &[u8], pos: usize) -> Option<i16> {
    let bytes = code.get(pos..pos + 2)?;
    Some(i16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_i32_le(code: &[u8], pos: usize) -> Option<i32> {
    let bytes = code.get(pos..pos + 4)?;
    Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Decode the instruction at `pc`.
///
/// Returns the formatted line and the number of bytes consumed, or `None`
/// when `pc` is outside the buffer. An unknown opcode renders as `??` and
/// consumes a single byte; a truncated operand consumes the rest of the
/// buffer and is marked in the output.
pub fn disasm_one(code: &[u8], pc: usize) -> Option<(String, usize)> {
    let opcode = *code.get(pc)?;

    let (mnemonic, imm) = match Op::from_byte(opcode) {
        Some(op) => (op.mnemonic(), op.imm_kind()),
        None => ("??", ImmKind::None),
    };

    let mut line = format!("{pc:04x}: ");
    let mut consumed = 1usize;

    match imm {
        ImmKind::None => line.push_str(mnemonic),
        ImmKind::I8 => {
            line.push_str(&format!("{mnemonic:<8}"));
            match code.get(pc + consumed) {
                Some(&byte) => {
                    line.push_str(&format!(" {}", byte as i8));
                    consumed += 1;
                }
                None => {
                    line.push_str(" <trunc-i8>");
                    consumed = code.len() - pc;
                }
            }
        }
        ImmKind::I16 => {
            line.push_str(&format!("{mnemonic:<8}"));
            match read_i16_le(code, pc + consumed) {
                Some(value) => {
                    line.push_str(&format!(" {value}"));
                    consumed += 2;
                }
                None => {
                    line.push_str(" <trunc-i16>");
                    consumed = code.len() - pc;
                }
            }
        }
        ImmKind::I32 => {
            line.push_str(&format!("{mnemonic:<8}"));
            match read_i32_le(code, pc + consumed) {
                Some(value) => {
                    line.push_str(&format!(" {value}"));
                    consumed += 4;
                }
                None => {
                    line.push_str(" <trunc-i32>");
                    consumed = code.len() - pc;
                }
            }
        }
        ImmKind::Rel16 => {
            line.push_str(&format!("{mnemonic:<8}"));
            match read_i16_le(code, pc + consumed) {
                Some(offset) => {
                    // Displacement counts from the byte after the operand.
                    let target = (pc as i64 + 3 + offset as i64).max(0) as usize;
                    line.push_str(&format!(" {offset:+} ; -> {target:04x}"));
                    consumed += 2;
                }
                None => {
                    line.push_str(" <trunc-rel16>");
                    consumed = code.len() - pc;
                }
            }
        }
        ImmKind::Idx16 => {
            line.push_str(&format!("{mnemonic:<8}"));
            match read_i16_le(code, pc + consumed) {
                Some(index) => {
                    line.push_str(&format!(" @{}", index as u16));
                    consumed += 2;
                }
                None => {
                    line.push_str(" <trunc-idx16>");
                    consumed = code.len() - pc;
                }
            }
        }
    }

    Some((line, consumed))
}

/// Disassemble a whole buffer, one line per instruction.
pub fn disasm_all(code: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pc = 0;
    while pc < code.len() {
        match disasm_one(code, pc) {
            Some((line, consumed)) if consumed > 0 => {
                lines.push(line);
                pc += consumed;
            }
            _ => break,
        }
    }
    lines
}
