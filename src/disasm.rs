use crate::fields::{AluOp, ShiftType, TransferFlags};
use crate::isa::arm::{ArmInstr, CoprocessorOp, HalfwordOp};
use crate::isa::thumb::{HighRegisterOp, ImmediateOffsetOp, ImmediateOp, RegisterOffsetOp, SignExtendedOp, ThumbInstr};

/// Renders a THUMB identity as a mnemonic template. Static fields are
/// filled in, fields read at run time stay symbolic (`rd`, `rs`, `imm8`, ...).
pub fn fmt_thumb(t: &ThumbInstr) -> String {
    match *t {
        ThumbInstr::MoveShiftedRegister { op, offset5 } => format!("{} rd, rs, #{}", op.mnemonic(), offset5),
        ThumbInstr::AddSubtract { immediate, subtract, field3 } => {
            let mn = if subtract { "sub" } else { "add" };
            if immediate { format!("{mn} rd, rs, #{field3}") } else { format!("{mn} rd, rs, r{field3}") }
        }
        ThumbInstr::ImmediateOp { op, rd } => {
            let mn = match op {
                ImmediateOp::Mov => "mov",
                ImmediateOp::Cmp => "cmp",
                ImmediateOp::Add => "add",
                ImmediateOp::Sub => "sub",
            };
            format!("{mn} r{rd}, #imm8")
        }
        ThumbInstr::Alu { op } => format!("{} rd, rs", op.mnemonic()),
        ThumbInstr::HighRegisterOp { op, high1, high2 } => {
            let d = if high1 { "hd" } else { "rd" };
            let s = if high2 { "hs" } else { "rs" };
            match op {
                HighRegisterOp::Add => format!("add {d}, {s}"),
                HighRegisterOp::Cmp => format!("cmp {d}, {s}"),
                HighRegisterOp::Mov => format!("mov {d}, {s}"),
                HighRegisterOp::Bx => format!("bx {s}"),
            }
        }
        ThumbInstr::PcRelativeLoad { rd } => format!("ldr r{rd}, [pc, #imm8*4]"),
        ThumbInstr::LoadStoreRegisterOffset { op, ro } => {
            let mn = match op {
                RegisterOffsetOp::Str => "str",
                RegisterOffsetOp::Strb => "strb",
                RegisterOffsetOp::Ldr => "ldr",
                RegisterOffsetOp::Ldrb => "ldrb",
            };
            format!("{mn} rd, [rb, r{ro}]")
        }
        ThumbInstr::LoadStoreSignExtended { op, ro } => {
            let mn = match op {
                SignExtendedOp::Strh => "strh",
                SignExtendedOp::Ldsb => "ldsb",
                SignExtendedOp::Ldrh => "ldrh",
                SignExtendedOp::Ldsh => "ldsh",
            };
            format!("{mn} rd, [rb, r{ro}]")
        }
        ThumbInstr::LoadStoreImmediateOffset { op, offset5 } => {
            let (mn, scale) = match op {
                ImmediateOffsetOp::Str => ("str", 4),
                ImmediateOffsetOp::Ldr => ("ldr", 4),
                ImmediateOffsetOp::Strb => ("strb", 1),
                ImmediateOffsetOp::Ldrb => ("ldrb", 1),
            };
            format!("{mn} rd, [rb, #{:#x}]", offset5 as u32 * scale)
        }
        ThumbInstr::LoadStoreHalfword { load, offset5 } => {
            format!("{} rd, [rb, #{:#x}]", if load { "ldrh" } else { "strh" }, offset5 as u32 * 2)
        }
        ThumbInstr::SpRelativeLoadStore { load, rd } => {
            format!("{} r{rd}, [sp, #imm8*4]", if load { "ldr" } else { "str" })
        }
        ThumbInstr::LoadAddress { use_sp, rd } => format!("add r{rd}, {}, #imm8*4", if use_sp { "sp" } else { "pc" }),
        ThumbInstr::AddOffsetToSp { subtract } => format!("add sp, #{}imm7*4", if subtract { "-" } else { "" }),
        ThumbInstr::PushPop { load, pc_lr } => match (load, pc_lr) {
            (false, false) => "push {rlist}".to_string(),
            (false, true) => "push {rlist, lr}".to_string(),
            (true, false) => "pop {rlist}".to_string(),
            (true, true) => "pop {rlist, pc}".to_string(),
        },
        ThumbInstr::LoadStoreMultiple { load, rb } => {
            format!("{} r{rb}!, {{rlist}}", if load { "ldmia" } else { "stmia" })
        }
        ThumbInstr::ConditionalBranch { condition } => format!("b{} label", condition.suffix()),
        ThumbInstr::SoftwareInterrupt => "swi #imm8".to_string(),
        ThumbInstr::UnconditionalBranch => "b label".to_string(),
        ThumbInstr::LongBranchLink { low_half } => {
            if low_half { "bl label (low half)".to_string() } else { "bl label (high half)".to_string() }
        }
        ThumbInstr::Undefined => "undefined".to_string(),
    }
}

/// Same as [`fmt_thumb`] for ARM identities. The condition is never part of
/// an identity, so no suffix is printed for it.
pub fn fmt_arm(a: &ArmInstr) -> String {
    match *a {
        ArmInstr::DataProcessing { immediate, op, set_flags, field4 } => {
            let op2 = if immediate { "#imm".to_string() } else { shifted_register(field4) };
            match op {
                AluOp::Tst | AluOp::Teq | AluOp::Cmp | AluOp::Cmn => format!("{} rn, {op2}", op.mnemonic()),
                AluOp::Mov | AluOp::Mvn => format!("{}{} rd, {op2}", op.mnemonic(), s_suffix(set_flags)),
                _ => format!("{}{} rd, rn, {op2}", op.mnemonic(), s_suffix(set_flags)),
            }
        }
        ArmInstr::StatusTransfer { immediate, use_spsr, to_status } => {
            let psr = if use_spsr { "spsr" } else { "cpsr" };
            if to_status {
                format!("msr {psr}_fields, {}", if immediate { "#imm" } else { "rm" })
            } else {
                format!("mrs rd, {psr}")
            }
        }
        ArmInstr::Multiply { accumulate, set_flags } => {
            if accumulate {
                format!("mla{} rd, rm, rs, rn", s_suffix(set_flags))
            } else {
                format!("mul{} rd, rm, rs", s_suffix(set_flags))
            }
        }
        ArmInstr::MultiplyLong { sign_extend, accumulate, set_flags } => format!(
            "{}{}{} rdlo, rdhi, rm, rs",
            if sign_extend { "s" } else { "u" },
            if accumulate { "mlal" } else { "mull" },
            s_suffix(set_flags)
        ),
        ArmInstr::SingleDataSwap { byte } => format!("swp{} rd, rm, [rn]", if byte { "b" } else { "" }),
        ArmInstr::BranchAndExchange => "bx rn".to_string(),
        ArmInstr::HalfwordSignedTransfer { flags, immediate, op } => {
            let size = match op {
                HalfwordOp::UnsignedHalfword => "h",
                HalfwordOp::SignedByte => "sb",
                HalfwordOp::SignedHalfword => "sh",
            };
            let offset = if immediate { "#imm8" } else { "rm" };
            format!("{}{size} rd, {}", load_store(flags), address(flags, offset))
        }
        ArmInstr::SingleDataTransfer { flags, immediate, byte } => {
            // shift type of the register offset sits in bits 6..5, outside the index
            let offset = if immediate { "#imm12" } else { "rm, <shift> #imm5" };
            // post-indexed with W set is the user-mode (T) variant
            let t = if !flags.pre() && flags.writeback() { "t" } else { "" };
            format!(
                "{}{}{t} rd, {}",
                load_store(flags),
                if byte { "b" } else { "" },
                address(flags, offset)
            )
        }
        ArmInstr::Undefined => "undefined".to_string(),
        ArmInstr::BlockDataTransfer { flags, user_mode } => {
            let mode = match (flags.pre(), flags.add()) {
                (false, true) => "ia",
                (true, true) => "ib",
                (false, false) => "da",
                (true, false) => "db",
            };
            format!(
                "{}{mode} rn{}, {{rlist}}{}",
                if flags.load() { "ldm" } else { "stm" },
                if flags.writeback() { "!" } else { "" },
                if user_mode { "^" } else { "" }
            )
        }
        ArmInstr::Branch { link } => format!("{} label", if link { "bl" } else { "b" }),
        ArmInstr::SoftwareInterrupt => "swi #imm24".to_string(),
        ArmInstr::Coprocessor(op) => match op {
            CoprocessorOp::DataOperation => "cdp (unimplemented)".to_string(),
            CoprocessorOp::RegisterTransfer => "mrc/mcr (unimplemented)".to_string(),
            CoprocessorOp::DataTransfer => "ldc/stc (unimplemented)".to_string(),
        },
    }
}

fn s_suffix(set_flags: bool) -> &'static str {
    if set_flags { "s" } else { "" }
}

fn load_store(flags: TransferFlags) -> &'static str {
    if flags.load() { "ldr" } else { "str" }
}

/// Register operand 2. Bit 0 of `field4` picks a register shift amount,
/// bits 2..1 the shift type.
fn shifted_register(field4: u8) -> String {
    let shift = ShiftType::from_bits((field4 >> 1) as u32).mnemonic();
    if field4 & 1 != 0 { format!("rm, {shift} rs") } else { format!("rm, {shift} #imm5") }
}

fn address(flags: TransferFlags, offset: &str) -> String {
    let sign = if flags.add() { "" } else { "-" };
    if flags.pre() {
        format!("[rn, {sign}{offset}]{}", if flags.writeback() { "!" } else { "" })
    } else {
        format!("[rn], {sign}{offset}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_modes() {
        assert_eq!(address(TransferFlags::PRE | TransferFlags::ADD | TransferFlags::WRITEBACK, "#imm8"), "[rn, #imm8]!");
        assert_eq!(address(TransferFlags::empty(), "rm"), "[rn], -rm");
    }

    #[test]
    fn shifter_field_rendering() {
        assert_eq!(shifted_register(0b0000), "rm, lsl #imm5");
        assert_eq!(shifted_register(0b0011), "rm, lsr rs");
        assert_eq!(shifted_register(0b0110), "rm, ror #imm5");
    }
}
