//! Front-end compiler for a Forth-family language targeting a stack VM.
//!
//! [`compile`] lowers whitespace-delimited source text into a flat
//! little-endian bytecode stream plus the bodies of any words it defines.
//! The VM that executes the bytecode, the system-call layer and the
//! command-line tooling live elsewhere; this crate only produces (and, for
//! testing, disassembles) the instruction stream.

pub mod compiler;
pub mod dictionary;
pub mod disasm;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod opcodes;

pub use compiler::{compile, compile_with_context, Artifact, Context};
pub use dictionary::Word;
pub use error::CompileError;
