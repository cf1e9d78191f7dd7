//! Integration tests for the two-pass Hack assembler.
//!
//! Programs are embedded as inline source strings rather than external
//! fixture files, so the suite runs standalone.

use hack_assembler::assemble;

/// 2 + 3, stored in R0. No labels, no variables.
#[test]
fn test_add() {
    let source = r#"
        @2
        D=A
        @3
        D=D+A
        @0
        M=D
    "#;

    let result = assemble(source).unwrap();
    let lines: Vec<&str> = result.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "0000000000000010"); // @2
    assert_eq!(lines[1], "1110110000010000"); // D=A
    assert_eq!(lines[2], "0000000000000011"); // @3
    assert_eq!(lines[3], "1110000010010000"); // D=D+A
    assert_eq!(lines[4], "0000000000000000"); // @0
    assert_eq!(lines[5], "1110001100001000"); // M=D
}

/// max(R0, R1), stored in R2. Exercises labels, jumps, and variable-free
/// branching.
#[test]
fn test_max() {
    let source = r#"
        @0
        D=M
        @1
        D=D-M
        @OUTPUT_FIRST
        D;JGT
        @1
        D=M
        @OUTPUT_D
        0;JMP
        (OUTPUT_FIRST)
        @0
        D=M
        (OUTPUT_D)
        @2
        M=D
        (END)
        @END
        0;JMP
    "#;

    let result = assemble(source).unwrap();
    let lines: Vec<&str> = result.lines().collect();

    // 13 instructions; 3 labels generate no code.
    assert_eq!(lines.len(), 13);
    assert_eq!(lines.last().unwrap(), &"1110101010000111"); // 0;JMP at (END)
}

/// Draws a filled rectangle of height R0 at the top-left of the screen.
/// Exercises variable allocation alongside labels.
#[test]
fn test_rect() {
    let source = r#"
        @0
        D=M
        @END
        D;JLE
        @counter
        M=D
        @SCREEN
        D=A
        @address
        M=D
        (LOOP)
        @address
        A=M
        M=-1
        @address
        D=M
        @32
        D=D+A
        @address
        M=D
        @counter
        MD=M-1
        @LOOP
        D;JGT
        (END)
        @END
        0;JMP
    "#;

    let result = assemble(source).unwrap();
    let lines: Vec<&str> = result.lines().collect();

    // @counter and @address are user variables starting at RAM[16].
    assert!(lines.contains(&"0000000000010000")); // @counter -> 16 (first use)
    assert!(lines.contains(&"0000000000010001")); // @address -> 17 (first use)
}

/// Larger program covering the full symbol table: predefined symbols,
/// labels, and multiple user variables in interleaved order.
#[test]
fn test_pong_style_program() {
    let source = r#"
        @SCREEN
        D=A
        @base
        M=D
        @KBD
        D=A
        @keyboard
        M=D
        (GAME_LOOP)
        @keyboard
        A=M
        D=M
        @GAME_LOOP
        D;JEQ
        @base
        D=M
        @SP
        M=D
        (EXIT)
        @EXIT
        0;JMP
    "#;

    let result = assemble(source).unwrap();
    let lines: Vec<&str> = result.lines().collect();

    assert_eq!(lines.len(), 14);
    // @SCREEN resolves to predefined 16384 = 0b0100000000000000
    assert_eq!(lines[0], "0100000000000000");
    // @KBD resolves to predefined 24576 = 0b0110000000000000
    assert_eq!(lines[4], "0110000000000000");
    // @base and @keyboard are the first two allocated variables.
    assert_eq!(lines[2], "0000000000010000"); // @base -> 16
    assert_eq!(lines[6], "0000000000010001"); // @keyboard -> 17
}
