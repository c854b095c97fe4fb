use forthc::compiler::compile;
use forthc::error::CompileError;
use forthc::opcodes::Op;

fn op(o: Op) -> u8 {
    o as u8
}

fn main_bytes(source: &str) -> Vec<u8> {
    compile(source).unwrap().main
}

#[test]
fn test_empty_input_is_single_ret() {
    let artifact = compile("").unwrap();
    assert_eq!(artifact.main, [op(Op::Ret)]);
    assert!(artifact.words.is_empty());
}

#[test]
fn test_whitespace_only_input() {
    let artifact = compile("   \n\t  ").unwrap();
    assert_eq!(artifact.main, [op(Op::Ret)]);
    assert!(artifact.words.is_empty());
}

#[test]
fn test_single_literal() {
    assert_eq!(
        main_bytes("42"),
        [op(Op::Lit), 0x2A, 0x00, 0x00, 0x00, op(Op::Ret)]
    );
}

#[test]
fn test_two_literals_and_add() {
    assert_eq!(
        main_bytes("1 2 +"),
        [
            op(Op::Lit),
            0x01,
            0x00,
            0x00,
            0x00,
            op(Op::Lit),
            0x02,
            0x00,
            0x00,
            0x00,
            op(Op::Add),
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_negative_literal() {
    assert_eq!(
        main_bytes("-1"),
        [op(Op::Lit), 0xFF, 0xFF, 0xFF, 0xFF, op(Op::Ret)]
    );
}

#[test]
fn test_hex_and_octal_literals() {
    assert_eq!(
        main_bytes("0xFF"),
        [op(Op::Lit), 0xFF, 0x00, 0x00, 0x00, op(Op::Ret)]
    );
    assert_eq!(
        main_bytes("010"),
        [op(Op::Lit), 0x08, 0x00, 0x00, 0x00, op(Op::Ret)]
    );
}

#[test]
fn test_i32_min_literal() {
    assert_eq!(
        main_bytes("-2147483648"),
        [op(Op::Lit), 0x00, 0x00, 0x00, 0x80, op(Op::Ret)]
    );
}

#[test]
fn test_literal_overflow_is_unknown_token() {
    assert_eq!(
        compile("2147483648").unwrap_err(),
        CompileError::UnknownToken("2147483648".to_string())
    );
}

#[test]
fn test_almost_literal_is_unknown_token() {
    assert_eq!(
        compile("12abc").unwrap_err(),
        CompileError::UnknownToken("12abc".to_string())
    );
}

#[test]
fn test_stack_primitives() {
    assert_eq!(
        main_bytes("DUP DROP SWAP OVER"),
        [
            op(Op::Dup),
            op(Op::Drop),
            op(Op::Swap),
            op(Op::Over),
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_arithmetic_operators() {
    assert_eq!(
        main_bytes("+ - * / MOD"),
        [
            op(Op::Add),
            op(Op::Sub),
            op(Op::Mul),
            op(Op::Div),
            op(Op::Mod),
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        main_bytes("= == <> != < <= > >="),
        [
            op(Op::Eq),
            op(Op::Eq),
            op(Op::Ne),
            op(Op::Ne),
            op(Op::Lt),
            op(Op::Le),
            op(Op::Gt),
            op(Op::Ge),
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_bitwise_operators() {
    assert_eq!(
        main_bytes("AND OR XOR INVERT"),
        [
            op(Op::And),
            op(Op::Or),
            op(Op::Xor),
            op(Op::Invert),
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_memory_operators() {
    assert_eq!(
        main_bytes("@ ! C@ C! W@ W!"),
        [
            op(Op::Load),
            op(Op::Store),
            op(Op::Load8U),
            op(Op::Store8),
            op(Op::Load16U),
            op(Op::Store16),
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_return_stack_operators() {
    assert_eq!(
        main_bytes("99 >R R@ R> DROP"),
        [
            op(Op::Lit),
            0x63,
            0x00,
            0x00,
            0x00,
            op(Op::Tor),
            op(Op::Rfetch),
            op(Op::Fromr),
            op(Op::Drop),
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_loop_index_is_return_stack_fetch() {
    assert_eq!(main_bytes("I"), [op(Op::Rfetch), op(Op::Ret)]);
}

#[test]
fn test_alphabetic_words_fold_case() {
    assert_eq!(main_bytes("dup Drop swap OVER"), main_bytes("DUP DROP SWAP OVER"));
    assert_eq!(main_bytes("mod invert"), main_bytes("MOD INVERT"));
    assert_eq!(main_bytes(">r r> r@ i"), main_bytes(">R R> R@ I"));
}

#[test]
fn test_exit_emits_return() {
    assert_eq!(
        main_bytes("1 EXIT 2"),
        [
            op(Op::Lit),
            0x01,
            0x00,
            0x00,
            0x00,
            op(Op::Ret),
            op(Op::Lit),
            0x02,
            0x00,
            0x00,
            0x00,
            op(Op::Ret),
        ]
    );
}

#[test]
fn test_unknown_token_carries_name() {
    let err = compile("1 2 FROBNICATE").unwrap_err();
    assert_eq!(err, CompileError::UnknownToken("FROBNICATE".to_string()));
    assert_eq!(err.to_string(), "unknown token: FROBNICATE");
}

#[test]
fn test_main_always_ends_in_ret() {
    for source in ["", "1", "1 2 +", "DUP", "0 IF 1 THEN", "BEGIN 1 UNTIL"] {
        let artifact = compile(source).unwrap();
        assert_eq!(*artifact.main.last().unwrap(), op(Op::Ret), "{source:?}");
    }
}

#[test]
fn test_trailing_ret_omitted_after_jump() {
    // An unconditional jump ends the stream; a return after it would be
    // unreachable.
    assert_eq!(main_bytes("BEGIN AGAIN"), [op(Op::Jmp), 0xFD, 0xFF]);
}
