// compiler.rs - Single-pass code generator and compile driver
//
// Source text is consumed token by token. Each token is classified in a
// fixed priority order: definition boundary, declaration, control word,
// dictionary hit, integer literal, primitive, composite. Control structures
// are lowered with signed 16-bit PC-relative branches, forward branches
// through placeholder operands that are backpatched when the closing word
// arrives.

use smallvec::SmallVec;

use crate::dictionary::{Definition, Dictionary, Word};
use crate::emit::CodeBuffer;
use crate::error::CompileError;
use crate::lexer::{parse_int32, Lexer};
use crate::opcodes::{lookup_primitive, Op};

/// Deepest allowed nesting of open control structures.
pub const MAX_CONTROL_DEPTH: usize = 32;

/// Most `LEAVE` sites one `DO` loop can carry.
pub const MAX_LEAVE_SITES: usize = 8;

/// First byte address handed out to `VARIABLE` declarations. The compiler
/// only allocates addresses; the VM is expected to back this region with
/// readable and writable memory.
pub const DATA_SPACE_BASE: u32 = 0x0001_0000;

/// Allocation stride per variable, one 32-bit cell.
pub const DATA_CELL_SIZE: u32 = 4;

// ============================================================================
// OUTPUT
// ============================================================================

/// Result of a successful compilation.
///
/// `main` is the top-level instruction stream. `words` holds the bodies of
/// user words and variables in definition order; for a standalone
/// compilation an entry's position equals the `CALL` index that reaches it.
#[derive(Debug, Default)]
pub struct Artifact {
    pub main: Vec<u8>,
    pub words: Vec<Word>,
}

// ============================================================================
// CONTEXT (incremental compilation)
// ============================================================================

#[derive(Debug, Clone)]
struct RegisteredWord {
    name: String,
    index: u16,
}

/// Word registry shared between compilations.
///
/// A host that keeps compiled words alive across calls registers each word
/// name with the index it loaded the body under; later compilations resolve
/// those names to `CALL index` without seeing the bodies.
#[derive(Debug, Clone, Default)]
pub struct Context {
    words: Vec<RegisteredWord>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    /// Register a word name, or update its index when the name is already
    /// present (case-insensitive).
    pub fn register_word(&mut self, name: &str, index: u16) {
        if let Some(entry) = self
            .words
            .iter_mut()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
        {
            entry.index = index;
        } else {
            self.words.push(RegisteredWord {
                name: name.to_string(),
                index,
            });
        }
    }

    /// Case-insensitive lookup.
    pub fn find_word(&self, name: &str) -> Option<u16> {
        self.words
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.index)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Name of the `i`-th registration, in registration order.
    pub fn word_name(&self, i: usize) -> Option<&str> {
        self.words.get(i).map(|entry| entry.name.as_str())
    }

    pub fn reset(&mut self) {
        self.words.clear();
    }
}

// ============================================================================
// CONTROL FRAMES
// ============================================================================

type LeaveList = SmallVec<[u32; MAX_LEAVE_SITES]>;

/// One open control structure and its pending patch sites. Positions refer
/// to the emission target that was active when the frame was pushed.
#[derive(Debug)]
enum ControlFrame {
    If {
        /// Operand position of the `JZ` emitted by `IF`.
        jz_patch: u32,
        /// Operand position of the `JMP` emitted by `ELSE`, once seen.
        jmp_patch: Option<u32>,
    },
    Begin {
        begin_pc: u32,
        /// Operand position of the `JZ` emitted by `WHILE`, once seen.
        while_patch: Option<u32>,
    },
    Do {
        do_pc: u32,
        /// Operand positions of pending `LEAVE` jumps.
        leaves: LeaveList,
    },
}

fn unclosed_error(frame: &ControlFrame) -> CompileError {
    match frame {
        ControlFrame::If { .. } => CompileError::UnclosedIf,
        ControlFrame::Begin { .. } => CompileError::UnclosedBegin,
        ControlFrame::Do { .. } => CompileError::UnclosedDo,
    }
}

// ============================================================================
// COMPILER
// ============================================================================

/// The most recent instruction of an emission target, when it was `LIT`.
/// `CONSTANT` consumes it; any other emission invalidates it.
#[derive(Debug, Clone, Copy)]
struct PendingLit {
    pc: u32,
    value: i32,
}

/// An open `: name ... ;` definition with its own emission target.
struct OpenDefinition {
    name: String,
    code: CodeBuffer,
    pending_lit: Option<PendingLit>,
}

struct Compiler<'a> {
    lexer: Lexer<'a>,
    ctx: Option<&'a Context>,
    main: CodeBuffer,
    current: Option<OpenDefinition>,
    dict: Dictionary,
    frames: Vec<ControlFrame>,
    /// Control depth at the most recent `:`. Frames below this belong to the
    /// main stream and are invisible inside the definition.
    def_base: usize,
    next_var_addr: u32,
    main_pending_lit: Option<PendingLit>,
    /// Last opcode emitted to the main stream; decides whether the final
    /// return instruction is reachable at all.
    main_last_op: Option<Op>,
}

/// Compile a source string into bytecode.
///
/// Empty or whitespace-only input is legal and produces a main stream of a
/// single return instruction and no words.
pub fn compile(source: &str) -> Result<Artifact, CompileError> {
    Compiler::new(source, None).run()
}

/// Compile with a word registry from previous compilations. Tokens that miss
/// the local dictionary resolve against `ctx`; definitions created here are
/// numbered after the registered words.
pub fn compile_with_context(ctx: &Context, source: &str) -> Result<Artifact, CompileError> {
    Compiler::new(source, Some(ctx)).run()
}

impl<'a> Compiler<'a> {
    fn new(source: &'a str, ctx: Option<&'a Context>) -> Self {
        let word_base = ctx.map(|c| c.word_count() as u16).unwrap_or(0);
        Compiler {
            lexer: Lexer::new(source),
            ctx,
            main: CodeBuffer::new(),
            current: None,
            dict: Dictionary::new(word_base),
            frames: Vec::new(),
            def_base: 0,
            next_var_addr: DATA_SPACE_BASE,
            main_pending_lit: None,
            main_last_op: None,
        }
    }

    fn run(mut self) -> Result<Artifact, CompileError> {
        while let Some(token) = self.lexer.next_token()? {
            self.process_token(token)?;
        }
        self.finish()
    }

    fn finish(mut self) -> Result<Artifact, CompileError> {
        // The outermost unclosed structure names the error.
        if let Some(frame) = self.frames.first() {
            return Err(unclosed_error(frame));
        }
        if self.current.is_some() {
            return Err(CompileError::UnclosedColon);
        }

        // A trailing return after an unconditional jump would be unreachable.
        if self.main_last_op != Some(Op::Jmp) {
            self.main.emit_u8(Op::Ret as u8)?;
        }

        Ok(Artifact {
            main: self.main.into_bytes(),
            words: self.dict.into_words(),
        })
    }

    // ------------------------------------------------------------------
    // Emission plumbing
    // ------------------------------------------------------------------

    fn buf_mut(&mut self) -> &mut CodeBuffer {
        match &mut self.current {
            Some(def) => &mut def.code,
            None => &mut self.main,
        }
    }

    fn pending_lit_mut(&mut self) -> &mut Option<PendingLit> {
        match &mut self.current {
            Some(def) => &mut def.pending_lit,
            None => &mut self.main_pending_lit,
        }
    }

    /// Emit one opcode byte into the active target.
    fn emit_op(&mut self, op: Op) -> Result<(), CompileError> {
        if self.current.is_none() {
            self.main_last_op = Some(op);
        }
        *self.pending_lit_mut() = None;
        self.buf_mut().emit_u8(op as u8)
    }

    fn emit_ops(&mut self, ops: &[Op]) -> Result<(), CompileError> {
        for &op in ops {
            self.emit_op(op)?;
        }
        Ok(())
    }

    /// Emit `LIT value` and remember it for a possible `CONSTANT`.
    fn emit_literal(&mut self, value: i32) -> Result<(), CompileError> {
        self.emit_op(Op::Lit)?;
        let pc = self.buf_mut().here() - 1;
        self.buf_mut().emit_i32_le(value)?;
        *self.pending_lit_mut() = Some(PendingLit { pc, value });
        Ok(())
    }

    fn emit_call(&mut self, index: u16) -> Result<(), CompileError> {
        self.emit_op(Op::Call)?;
        self.buf_mut().emit_i16_le(index as i16)
    }

    /// Emit a branch with a resolved backward offset.
    fn emit_jump_back(&mut self, op: Op, target: u32) -> Result<(), CompileError> {
        self.emit_op(op)?;
        let operand_pc = self.buf_mut().here();
        let offset = (target as i64 - (operand_pc as i64 + 2)) as i16;
        self.buf_mut().emit_i16_le(offset)
    }

    /// Emit a branch with a placeholder operand; returns the operand
    /// position for later patching.
    fn emit_jump_placeholder(&mut self, op: Op) -> Result<u32, CompileError> {
        self.emit_op(op)?;
        let operand_pc = self.buf_mut().here();
        self.buf_mut().emit_i16_le(0)?;
        Ok(operand_pc)
    }

    /// Resolve a placeholder to `target`: offset = target - (operand + 2).
    fn patch_rel16(&mut self, operand_pos: u32, target: u32) {
        let offset = (target as i64 - (operand_pos as i64 + 2)) as i16;
        self.buf_mut().patch_i16_le(operand_pos, offset);
    }

    // ------------------------------------------------------------------
    // Control stack plumbing
    // ------------------------------------------------------------------

    fn check_depth(&self) -> Result<(), CompileError> {
        if self.frames.len() >= MAX_CONTROL_DEPTH {
            return Err(CompileError::ControlDepthExceeded);
        }
        Ok(())
    }

    /// Innermost frame visible in the current scope. Frames opened before
    /// the current `:` are hidden; their patch positions point into the
    /// main stream, not the word body being emitted.
    fn top_frame(&mut self) -> Option<&mut ControlFrame> {
        if self.frames.len() > self.def_base {
            self.frames.last_mut()
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Token dispatch
    // ------------------------------------------------------------------

    fn process_token(&mut self, token: &str) -> Result<(), CompileError> {
        // 1. Definition boundary.
        if token == ":" {
            return self.begin_definition();
        }
        if token == ";" {
            return self.end_definition();
        }

        let upper = token.to_ascii_uppercase();

        // 2. Declarations.
        match upper.as_str() {
            "CONSTANT" => return self.define_constant(),
            "VARIABLE" => return self.define_variable(),
            _ => {}
        }

        // 3. Control words.
        match upper.as_str() {
            "IF" => return self.compile_if(),
            "ELSE" => return self.compile_else(),
            "THEN" => return self.compile_then(),
            "BEGIN" => return self.compile_begin(),
            "UNTIL" => return self.compile_until(),
            "WHILE" => return self.compile_while(),
            "REPEAT" => return self.compile_repeat(),
            "AGAIN" => return self.compile_again(),
            "DO" => return self.compile_do(),
            "LOOP" => return self.compile_loop_end(false),
            "+LOOP" => return self.compile_loop_end(true),
            "LEAVE" => return self.compile_leave(),
            "EXIT" => return self.emit_op(Op::Ret),
            _ => {}
        }

        // 4. Dictionary words, local first, then the host context.
        enum Resolved {
            Call(u16),
            Inline(i32),
        }
        let hit = match self.dict.find(token) {
            Some(Definition::UserWord { index, .. }) => Some(Resolved::Call(*index)),
            Some(Definition::Constant { value, .. }) => Some(Resolved::Inline(*value)),
            Some(Definition::Variable { address, .. }) => Some(Resolved::Inline(*address as i32)),
            None => self
                .ctx
                .and_then(|ctx| ctx.find_word(token))
                .map(Resolved::Call),
        };
        match hit {
            Some(Resolved::Call(index)) => return self.emit_call(index),
            Some(Resolved::Inline(value)) => return self.emit_literal(value),
            None => {}
        }

        // 5. Integer literal.
        if let Some(value) = parse_int32(token) {
            return self.emit_literal(value);
        }

        // 6. Primitives and composites.
        if let Some(op) = lookup_primitive(token) {
            return self.emit_op(op);
        }
        if self.compile_composite(&upper)? {
            return Ok(());
        }

        Err(CompileError::UnknownToken(token.to_string()))
    }

    // ------------------------------------------------------------------
    // Definitions and declarations
    // ------------------------------------------------------------------

    fn begin_definition(&mut self) -> Result<(), CompileError> {
        if self.current.is_some() {
            return Err(CompileError::NestedColon);
        }
        let name = match self.lexer.next_token()? {
            Some(name) => name,
            None => return Err(CompileError::ColonWithoutName),
        };
        if name == ":" || name == ";" {
            return Err(CompileError::ColonWithoutName);
        }
        self.dict.check_new_name(name)?;

        self.def_base = self.frames.len();
        self.current = Some(OpenDefinition {
            name: name.to_string(),
            code: CodeBuffer::new(),
            pending_lit: None,
        });
        Ok(())
    }

    fn end_definition(&mut self) -> Result<(), CompileError> {
        let def = match self.current.take() {
            Some(def) => def,
            None => return Err(CompileError::SemicolonWithoutColon),
        };
        // Everything opened inside the body must be closed inside it.
        if let Some(frame) = self.frames.get(self.def_base) {
            return Err(unclosed_error(frame));
        }
        self.def_base = 0;

        let mut code = def.code;
        code.emit_u8(Op::Ret as u8)?;
        self.dict.insert_user_word(def.name, code.into_bytes())?;
        Ok(())
    }

    /// `value CONSTANT name`: reclaim the literal just emitted and bind it.
    fn define_constant(&mut self) -> Result<(), CompileError> {
        let lit = match self.pending_lit_mut().take() {
            Some(lit) => lit,
            None => return Err(CompileError::ConstantWithoutValue),
        };
        self.buf_mut().truncate(lit.pc);
        if self.current.is_none() {
            self.main_last_op = None;
        }

        let name = match self.lexer.next_token()? {
            Some(name) => name,
            None => return Err(CompileError::ConstantWithoutName),
        };
        self.dict.insert_constant(name.to_string(), lit.value)
    }

    /// `VARIABLE name`: allocate the next data-space cell and store a
    /// callable `LIT address RET` body under the next word index.
    fn define_variable(&mut self) -> Result<(), CompileError> {
        let name = match self.lexer.next_token()? {
            Some(name) => name,
            None => return Err(CompileError::VariableWithoutName),
        };

        let address = self.next_var_addr;
        let mut body = CodeBuffer::new();
        body.emit_u8(Op::Lit as u8)?;
        body.emit_i32_le(address as i32)?;
        body.emit_u8(Op::Ret as u8)?;

        self.dict
            .insert_variable(name.to_string(), address, body.into_bytes())?;
        self.next_var_addr += DATA_CELL_SIZE;
        Ok(())
    }

    // ------------------------------------------------------------------
    // IF / ELSE / THEN
    // ------------------------------------------------------------------

    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.check_depth()?;
        let jz_patch = self.emit_jump_placeholder(Op::Jz)?;
        self.frames.push(ControlFrame::If {
            jz_patch,
            jmp_patch: None,
        });
        Ok(())
    }

    fn compile_else(&mut self) -> Result<(), CompileError> {
        let jz_patch = match self.top_frame() {
            Some(ControlFrame::If { jz_patch, jmp_patch }) => {
                if jmp_patch.is_some() {
                    return Err(CompileError::DuplicateElse);
                }
                *jz_patch
            }
            _ => return Err(CompileError::ElseWithoutIf),
        };

        // Jump over the ELSE branch, then land the IF's JZ on it.
        let jmp_patch = self.emit_jump_placeholder(Op::Jmp)?;
        let here = self.buf_mut().here();
        self.patch_rel16(jz_patch, here);

        if let Some(ControlFrame::If { jmp_patch: slot, .. }) = self.frames.last_mut() {
            *slot = Some(jmp_patch);
        }
        Ok(())
    }

    fn compile_then(&mut self) -> Result<(), CompileError> {
        let (jz_patch, jmp_patch) = match self.top_frame() {
            Some(ControlFrame::If { jz_patch, jmp_patch }) => (*jz_patch, *jmp_patch),
            _ => return Err(CompileError::ThenWithoutIf),
        };
        self.frames.pop();

        let here = self.buf_mut().here();
        match jmp_patch {
            Some(pos) => self.patch_rel16(pos, here),
            None => self.patch_rel16(jz_patch, here),
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // BEGIN / UNTIL / WHILE / REPEAT / AGAIN
    // ------------------------------------------------------------------

    fn compile_begin(&mut self) -> Result<(), CompileError> {
        self.check_depth()?;
        let begin_pc = self.buf_mut().here();
        self.frames.push(ControlFrame::Begin {
            begin_pc,
            while_patch: None,
        });
        Ok(())
    }

    fn compile_until(&mut self) -> Result<(), CompileError> {
        let begin_pc = match self.top_frame() {
            Some(ControlFrame::Begin {
                begin_pc,
                while_patch,
            }) => {
                if while_patch.is_some() {
                    return Err(CompileError::UntilAfterWhile);
                }
                *begin_pc
            }
            _ => return Err(CompileError::UntilWithoutBegin),
        };
        self.frames.pop();
        self.emit_jump_back(Op::Jz, begin_pc)
    }

    fn compile_while(&mut self) -> Result<(), CompileError> {
        match self.top_frame() {
            Some(ControlFrame::Begin { while_patch, .. }) => {
                if while_patch.is_some() {
                    return Err(CompileError::DuplicateWhile);
                }
            }
            _ => return Err(CompileError::WhileWithoutBegin),
        }

        let patch = self.emit_jump_placeholder(Op::Jz)?;
        if let Some(ControlFrame::Begin { while_patch, .. }) = self.frames.last_mut() {
            *while_patch = Some(patch);
        }
        Ok(())
    }

    fn compile_repeat(&mut self) -> Result<(), CompileError> {
        let (begin_pc, while_patch) = match self.top_frame() {
            Some(ControlFrame::Begin {
                begin_pc,
                while_patch,
            }) => (*begin_pc, *while_patch),
            _ => return Err(CompileError::RepeatWithoutBegin),
        };
        let while_patch = match while_patch {
            Some(pos) => pos,
            None => return Err(CompileError::RepeatWithoutWhile),
        };
        self.frames.pop();

        self.emit_jump_back(Op::Jmp, begin_pc)?;
        let here = self.buf_mut().here();
        self.patch_rel16(while_patch, here);
        // The WHILE exit lands right here, so the stream must not end on
        // the back-jump alone.
        if self.current.is_none() {
            self.main_last_op = None;
        }
        Ok(())
    }

    fn compile_again(&mut self) -> Result<(), CompileError> {
        let begin_pc = match self.top_frame() {
            Some(ControlFrame::Begin {
                begin_pc,
                while_patch,
            }) => {
                if while_patch.is_some() {
                    return Err(CompileError::AgainAfterWhile);
                }
                *begin_pc
            }
            _ => return Err(CompileError::AgainWithoutBegin),
        };
        self.frames.pop();
        self.emit_jump_back(Op::Jmp, begin_pc)
    }

    // ------------------------------------------------------------------
    // DO / LOOP / +LOOP / LEAVE
    // ------------------------------------------------------------------

    /// `DO` latches limit and index onto the return stack, limit below
    /// index, so `I` is a plain return-stack fetch.
    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.check_depth()?;
        self.emit_ops(&[Op::Swap, Op::Tor, Op::Tor])?;
        let do_pc = self.buf_mut().here();
        self.frames.push(ControlFrame::Do {
            do_pc,
            leaves: LeaveList::new(),
        });
        Ok(())
    }

    /// Close a counted loop. `LOOP` increments by one; `+LOOP` takes the
    /// increment from the data stack, where the loop body left it.
    fn compile_loop_end(&mut self, plus: bool) -> Result<(), CompileError> {
        let missing = if plus {
            CompileError::PLoopWithoutDo
        } else {
            CompileError::LoopWithoutDo
        };
        if !matches!(self.top_frame(), Some(ControlFrame::Do { .. })) {
            return Err(missing);
        }
        let (do_pc, leaves) = match self.frames.pop() {
            Some(ControlFrame::Do { do_pc, leaves }) => (do_pc, leaves),
            _ => return Err(missing),
        };

        // index' = index + increment
        self.emit_op(Op::Fromr)?;
        if !plus {
            self.emit_op(Op::Lit)?;
            self.buf_mut().emit_i32_le(1)?;
        }
        self.emit_op(Op::Add)?;
        // Compare against the limit without consuming either value.
        self.emit_op(Op::Fromr)?;
        self.emit_ops(&[Op::Over, Op::Over, Op::Lt])?;
        let exit_patch = self.emit_jump_placeholder(Op::Jz)?;
        // Still looping: latch both back and jump to the body.
        self.emit_ops(&[Op::Tor, Op::Tor])?;
        self.emit_jump_back(Op::Jmp, do_pc)?;

        // Exit: discard the spent index and limit.
        let exit = self.buf_mut().here();
        self.patch_rel16(exit_patch, exit);
        self.emit_ops(&[Op::Drop, Op::Drop])?;

        // LEAVE already unwound its copies, so it lands past the drops.
        let after = self.buf_mut().here();
        for leave in leaves {
            self.patch_rel16(leave, after);
        }
        Ok(())
    }

    fn compile_leave(&mut self) -> Result<(), CompileError> {
        // Innermost DO visible in the current scope.
        let mut frame_at = None;
        for i in (self.def_base..self.frames.len()).rev() {
            if matches!(self.frames[i], ControlFrame::Do { .. }) {
                frame_at = Some(i);
                break;
            }
        }
        let frame_at = match frame_at {
            Some(i) => i,
            None => return Err(CompileError::LeaveWithoutDo),
        };
        if let ControlFrame::Do { leaves, .. } = &self.frames[frame_at] {
            if leaves.len() >= MAX_LEAVE_SITES {
                return Err(CompileError::LeaveDepthExceeded);
            }
        }

        // Unwind the loop's return-stack entries, then jump to the exit.
        self.emit_ops(&[Op::Fromr, Op::Fromr, Op::Drop, Op::Drop])?;
        let patch = self.emit_jump_placeholder(Op::Jmp)?;
        if let ControlFrame::Do { leaves, .. } = &mut self.frames[frame_at] {
            leaves.push(patch);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Composite words
    // ------------------------------------------------------------------

    /// Expand a multi-opcode surface word. `upper` is the case-folded token.
    fn compile_composite(&mut self, upper: &str) -> Result<bool, CompileError> {
        match upper {
            "ROT" => self.emit_ops(&[Op::Tor, Op::Swap, Op::Fromr, Op::Swap])?,
            "NIP" => self.emit_ops(&[Op::Swap, Op::Drop])?,
            "TUCK" => self.emit_ops(&[Op::Swap, Op::Over])?,
            "NEGATE" => self.emit_ops(&[Op::Lit0, Op::Swap, Op::Sub])?,
            "ABS" => {
                // Negate only when the value is below zero.
                self.emit_ops(&[Op::Dup, Op::Lit0, Op::Lt])?;
                let skip = self.emit_jump_placeholder(Op::Jz)?;
                self.emit_ops(&[Op::Lit0, Op::Swap, Op::Sub])?;
                let here = self.buf_mut().here();
                self.patch_rel16(skip, here);
            }
            "MIN" => self.compile_select(Op::Lt)?,
            "MAX" => self.compile_select(Op::Gt)?,
            "?DUP" => {
                self.emit_ops(&[Op::Dup, Op::Dup])?;
                let skip = self.emit_jump_placeholder(Op::Jz)?;
                self.emit_op(Op::Dup)?;
                let here = self.buf_mut().here();
                self.patch_rel16(skip, here);
            }
            "+!" => self.emit_ops(&[
                Op::Swap,
                Op::Over,
                Op::Load,
                Op::Add,
                Op::Swap,
                Op::Store,
            ])?,
            // Outer loop indices: pop past the inner loop's return-stack
            // pair(s), fetch, and push the pair(s) back.
            "J" => self.emit_ops(&[
                Op::Fromr,
                Op::Fromr,
                Op::Rfetch,
                Op::Swap,
                Op::Tor,
                Op::Swap,
                Op::Tor,
            ])?,
            "K" => self.emit_ops(&[
                Op::Fromr,
                Op::Fromr,
                Op::Fromr,
                Op::Fromr,
                Op::Rfetch,
                Op::Swap,
                Op::Tor,
                Op::Swap,
                Op::Tor,
                Op::Swap,
                Op::Tor,
                Op::Swap,
                Op::Tor,
            ])?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// `MIN`/`MAX`: keep one of the top two values depending on `cmp`.
    fn compile_select(&mut self, cmp: Op) -> Result<(), CompileError> {
        self.emit_ops(&[Op::Over, Op::Over, cmp])?;
        let keep_second = self.emit_jump_placeholder(Op::Jz)?;
        self.emit_op(Op::Drop)?;
        let done = self.emit_jump_placeholder(Op::Jmp)?;
        let here = self.buf_mut().here();
        self.patch_rel16(keep_second, here);
        self.emit_ops(&[Op::Swap, Op::Drop])?;
        let here = self.buf_mut().here();
        self.patch_rel16(done, here);
        Ok(())
    }
}
