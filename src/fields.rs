use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Barrel shifter operation, shared by ARM register operands and THUMB.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShiftType {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl ShiftType {
    pub const ALL: [ShiftType; 4] = [Self::Lsl, Self::Lsr, Self::Asr, Self::Ror];

    pub fn from_bits(bits: u32) -> Self {
        Self::ALL[(bits & 3) as usize]
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Lsl => "lsl",
            Self::Lsr => "lsr",
            Self::Asr => "asr",
            Self::Ror => "ror",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    Eq,
    Ne,
    Cs,
    Cc,
    Mi,
    Pl,
    Vs,
    Vc,
    Hi,
    Ls,
    Ge,
    Lt,
    Gt,
    Le,
    Al,
    Nv,
}

impl Condition {
    pub const ALL: [Condition; 16] = [
        Self::Eq,
        Self::Ne,
        Self::Cs,
        Self::Cc,
        Self::Mi,
        Self::Pl,
        Self::Vs,
        Self::Vc,
        Self::Hi,
        Self::Ls,
        Self::Ge,
        Self::Lt,
        Self::Gt,
        Self::Le,
        Self::Al,
        Self::Nv,
    ];

    pub fn from_bits(bits: u32) -> Self {
        Self::ALL[(bits & 0xF) as usize]
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Cs => "cs",
            Self::Cc => "cc",
            Self::Mi => "mi",
            Self::Pl => "pl",
            Self::Vs => "vs",
            Self::Vc => "vc",
            Self::Hi => "hi",
            Self::Ls => "ls",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Al => "",
            Self::Nv => "nv",
        }
    }
}

/// ARM data-processing opcode, bits 24..21.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AluOp {
    And,
    Eor,
    Sub,
    Rsb,
    Add,
    Adc,
    Sbc,
    Rsc,
    Tst,
    Teq,
    Cmp,
    Cmn,
    Orr,
    Mov,
    Bic,
    Mvn,
}

impl AluOp {
    pub const ALL: [AluOp; 16] = [
        Self::And,
        Self::Eor,
        Self::Sub,
        Self::Rsb,
        Self::Add,
        Self::Adc,
        Self::Sbc,
        Self::Rsc,
        Self::Tst,
        Self::Teq,
        Self::Cmp,
        Self::Cmn,
        Self::Orr,
        Self::Mov,
        Self::Bic,
        Self::Mvn,
    ];

    pub fn from_bits(bits: u32) -> Self {
        Self::ALL[(bits & 0xF) as usize]
    }

    /// TST, TEQ, CMP and CMN. Without the S bit these encodings are PSR transfers.
    pub fn is_test(self) -> bool {
        matches!(self, Self::Tst | Self::Teq | Self::Cmp | Self::Cmn)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Eor => "eor",
            Self::Sub => "sub",
            Self::Rsb => "rsb",
            Self::Add => "add",
            Self::Adc => "adc",
            Self::Sbc => "sbc",
            Self::Rsc => "rsc",
            Self::Tst => "tst",
            Self::Teq => "teq",
            Self::Cmp => "cmp",
            Self::Cmn => "cmn",
            Self::Orr => "orr",
            Self::Mov => "mov",
            Self::Bic => "bic",
            Self::Mvn => "mvn",
        }
    }
}

bitflags! {
    /// P/U/W/L control bits of the ARM memory transfer formats, laid out as
    /// `instruction >> 20`. Bit 22 is left out since its meaning differs per
    /// format (byte, immediate offset, user-mode bank).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct TransferFlags: u8 {
        const LOAD = 1 << 0; // bit 20
        const WRITEBACK = 1 << 1; // bit 21
        const ADD = 1 << 3; // bit 23
        const PRE = 1 << 4; // bit 24
    }
}

impl TransferFlags {
    pub fn from_instruction(instruction: u32) -> Self {
        Self::from_bits_truncate((instruction >> 20) as u8)
    }

    /// All sixteen P/U/W/L combinations.
    pub fn combinations() -> impl Iterator<Item = TransferFlags> {
        (0u8..=0x1F).filter_map(TransferFlags::from_bits)
    }

    pub fn pre(self) -> bool {
        self.contains(Self::PRE)
    }
    pub fn add(self) -> bool {
        self.contains(Self::ADD)
    }
    pub fn writeback(self) -> bool {
        self.contains(Self::WRITEBACK)
    }
    pub fn load(self) -> bool {
        self.contains(Self::LOAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_flags_track_instruction_bits() {
        // LDR r0, [r1, #4]! : P=1 U=1 W=1 L=1
        let f = TransferFlags::from_instruction(0xE5B1_0004);
        assert!(f.pre() && f.add() && f.writeback() && f.load());
        // STR r0, [r1], -r2 : all clear
        let f = TransferFlags::from_instruction(0xE601_0002);
        assert!(f.is_empty());
        // bit 22 (byte) never leaks in
        let f = TransferFlags::from_instruction(0x0040_0000);
        assert!(f.is_empty());
    }

    #[test]
    fn sixteen_flag_combinations() {
        let all: Vec<_> = TransferFlags::combinations().collect();
        assert_eq!(all.len(), 16);
        assert!(all.contains(&TransferFlags::all()));
    }

    #[test]
    fn test_ops_are_the_psr_gap() {
        let gap: Vec<_> = AluOp::ALL.iter().filter(|op| op.is_test()).map(|op| *op as u32).collect();
        assert_eq!(gap, vec![0b1000, 0b1001, 0b1010, 0b1011]);
    }
}
