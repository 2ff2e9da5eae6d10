use arm7_lut::disasm::{fmt_arm, fmt_thumb};
use arm7_lut::formats::{arm_desc, thumb_desc};
use arm7_lut::{decode_arm, decode_thumb, DecodeTables};
use pretty_assertions::assert_eq;

#[test]
fn thumb_templates() {
    let cases = [
        (0x0148u16, "lsl rd, rs, #5"),
        (0x18C8, "add rd, rs, r3"),
        (0x1E48, "sub rd, rs, #1"),
        (0x2301, "mov r3, #imm8"),
        (0x4348, "mul rd, rs"),
        (0x4770, "bx hs"),
        (0x4801, "ldr r0, [pc, #imm8*4]"),
        (0x6848, "ldr rd, [rb, #0x4]"),
        (0x8848, "ldrh rd, [rb, #0x2]"),
        (0xB082, "add sp, #-imm7*4"),
        (0xB500, "push {rlist, lr}"),
        (0xBD00, "pop {rlist, pc}"),
        (0xC103, "stmia r1!, {rlist}"),
        (0xD0FE, "beq label"),
        (0xDF05, "swi #imm8"),
        (0xE800, "undefined"),
    ];
    for (word, want) in cases {
        assert_eq!(fmt_thumb(&decode_thumb(word)), want, "{word:#06x}");
    }
}

#[test]
fn arm_templates() {
    let cases = [
        (0xE3A0_0001u32, "mov rd, #imm"),
        (0xE091_0332, "adds rd, rn, rm, lsr rs"),
        (0xE310_0001, "tst rn, #imm"),
        (0xE129_F000, "msr cpsr_fields, rm"),
        (0xE14F_0000, "mrs rd, spsr"),
        (0xE0B1_0392, "umlals rdlo, rdhi, rm, rs"),
        (0xE12F_FF1E, "bx rn"),
        (0xE1F0_00B2, "ldrh rd, [rn, #imm8]!"),
        (0xE4B1_0004, "ldrt rd, [rn], #imm12"),
        (0xE791_0102, "ldr rd, [rn, rm, <shift> #imm5]"),
        (0xE601_0042, "str rd, [rn], -rm, <shift> #imm5"),
        (0xE9D0_0003, "ldmib rn, {rlist}^"),
        (0xEB00_0000, "bl label"),
        (0xEF00_0000, "swi #imm24"),
        (0xEE00_0000, "cdp (unimplemented)"),
    ];
    for (word, want) in cases {
        assert_eq!(fmt_arm(&decode_arm(word)), want, "{word:#010x}");
    }
}

#[test]
fn every_identity_renders() {
    let t = DecodeTables::build();
    for instr in t.thumb_table() {
        assert!(!fmt_thumb(instr).is_empty());
        assert!(thumb_desc(instr.format()).label.starts_with("THUMB."));
    }
    for instr in t.arm_table() {
        assert!(!fmt_arm(instr).is_empty());
        assert_eq!(arm_desc(instr.format()).format, instr.format());
    }
}
