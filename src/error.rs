// error.rs - Compilation error surface

use thiserror::Error;

/// Everything that can go wrong while compiling a source string.
///
/// Each error aborts the compilation immediately; there is no recovery and
/// no partial output. The messages mirror the wording the virtual machine's
/// tooling expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown token: {0}")]
    UnknownToken(String),

    /// Currently unreachable: integer tokens that fail to parse fall through
    /// the classification chain and come back as [`CompileError::UnknownToken`].
    #[error("invalid integer format")]
    InvalidInteger,

    #[error("out of memory")]
    OutOfMemory,

    /// Currently unreachable: empty input is legal and compiles to a single
    /// return instruction.
    #[error("empty input")]
    EmptyInput,

    #[error("control structure depth exceeded")]
    ControlDepthExceeded,

    // IF / ELSE / THEN
    #[error("ELSE without matching IF")]
    ElseWithoutIf,
    #[error("duplicate ELSE in IF structure")]
    DuplicateElse,
    #[error("THEN without matching IF")]
    ThenWithoutIf,
    #[error("unclosed IF structure")]
    UnclosedIf,

    // BEGIN / UNTIL / WHILE / REPEAT / AGAIN
    #[error("UNTIL without matching BEGIN")]
    UntilWithoutBegin,
    #[error("unclosed BEGIN structure")]
    UnclosedBegin,
    #[error("WHILE without matching BEGIN")]
    WhileWithoutBegin,
    #[error("duplicate WHILE in BEGIN structure")]
    DuplicateWhile,
    #[error("REPEAT without matching BEGIN")]
    RepeatWithoutBegin,
    #[error("REPEAT without matching WHILE")]
    RepeatWithoutWhile,
    #[error("UNTIL cannot be used after WHILE")]
    UntilAfterWhile,
    #[error("AGAIN without matching BEGIN")]
    AgainWithoutBegin,
    #[error("AGAIN cannot be used after WHILE")]
    AgainAfterWhile,

    // DO / LOOP / +LOOP / LEAVE
    #[error("LOOP without matching DO")]
    LoopWithoutDo,
    #[error("+LOOP without matching DO")]
    PLoopWithoutDo,
    #[error("LEAVE without matching DO")]
    LeaveWithoutDo,
    #[error("too many LEAVEs in DO structure")]
    LeaveDepthExceeded,
    #[error("unclosed DO structure")]
    UnclosedDo,

    // : ... ; definitions
    #[error("nested word definition")]
    NestedColon,
    #[error("; without matching :")]
    SemicolonWithoutColon,
    #[error(": without a word name")]
    ColonWithoutName,
    #[error("unclosed word definition")]
    UnclosedColon,
    #[error("duplicate word definition: {0}")]
    DuplicateWord(String),
    #[error("dictionary is full")]
    DictionaryFull,

    // CONSTANT / VARIABLE declarations
    #[error("CONSTANT requires a preceding literal value")]
    ConstantWithoutValue,
    #[error("CONSTANT without a name")]
    ConstantWithoutName,
    #[error("VARIABLE without a name")]
    VariableWithoutName,

    #[error("unterminated comment")]
    UnterminatedComment,
}
