use forthc::compiler::compile;
use forthc::disasm::{disasm_all, disasm_one};
use forthc::opcodes::Op;

#[test]
fn test_literal_and_add() {
    let artifact = compile("1 2 +").unwrap();
    let lines = disasm_all(&artifact.main);
    assert_eq!(
        lines,
        [
            "0000: LIT      1",
            "0005: LIT      2",
            "000a: ADD",
            "000b: RET",
        ]
    );
}

#[test]
fn test_backward_branch_annotates_target() {
    let artifact = compile("BEGIN 1 UNTIL").unwrap();
    let lines = disasm_all(&artifact.main);
    assert_eq!(
        lines,
        [
            "0000: LIT      1",
            "0005: JZ       -8 ; -> 0000",
            "0008: RET",
        ]
    );
}

#[test]
fn test_forward_branch_annotates_target() {
    let artifact = compile("0 IF 42 THEN").unwrap();
    let lines = disasm_all(&artifact.main);
    assert_eq!(lines[1], "0005: JZ       +5 ; -> 000d");
}

#[test]
fn test_call_renders_word_index() {
    let artifact = compile(": DOUBLE DUP + ; 5 DOUBLE").unwrap();
    let lines = disasm_all(&artifact.main);
    assert_eq!(lines[1], "0005: CALL     @0");
}

#[test]
fn test_word_body_disassembles_standalone() {
    let artifact = compile(": DOUBLE DUP + ;").unwrap();
    let lines = disasm_all(&artifact.words[0].code);
    assert_eq!(lines, ["0000: DUP", "0001: ADD", "0002: RET"]);
}

#[test]
fn test_unknown_opcode() {
    let lines = disasm_all(&[0xFF, Op::Ret as u8]);
    assert_eq!(lines, ["0000: ??", "0001: RET"]);
}

#[test]
fn test_truncated_operand() {
    // LIT with only two of its four operand bytes present.
    let (line, consumed) = disasm_one(&[Op::Lit as u8, 0x01, 0x02], 0).unwrap();
    assert_eq!(line, "0000: LIT      <trunc-i32>");
    assert_eq!(consumed, 3);
}

#[test]
fn test_truncated_branch_operand() {
    let (line, consumed) = disasm_one(&[Op::Jz as u8, 0x01], 0).unwrap();
    assert_eq!(line, "0000: JZ       <trunc-rel16>");
    assert_eq!(consumed, 2);
}

#[test]
fn test_out_of_range_pc() {
    assert!(disasm_one(&[Op::Ret as u8], 1).is_none());
    assert!(disasm_one(&[], 0).is_none());
}

#[test]
fn test_every_compiled_stream_decodes_completely() {
    for source in [
        "",
        "1 2 + 3 *",
        "0 IF 1 ELSE 2 THEN",
        "BEGIN DUP WHILE 1 - REPEAT",
        "10 0 DO I LOOP",
        "10 0 DO LEAVE LOOP",
        ": F DUP ABS MIN ; 1 2 F",
    ] {
        let artifact = compile(source).unwrap();
        let mut decoded = 0;
        let mut pc = 0;
        while pc < artifact.main.len() {
            let (_, consumed) = disasm_one(&artifact.main, pc).unwrap();
            assert!(consumed > 0);
            decoded += consumed;
            pc += consumed;
        }
        assert_eq!(decoded, artifact.main.len(), "{source:?}");
    }
}
