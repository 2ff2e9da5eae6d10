use serde::{Deserialize, Serialize};

use crate::decoder::Decoder;
use crate::fields::{Condition, ShiftType};

/// THUMB instruction formats, numbered as in the ARM7TDMI data sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThumbFormat {
    MoveShiftedRegister,
    AddSubtract,
    ImmediateOp,
    Alu,
    HighRegisterOp,
    PcRelativeLoad,
    LoadStoreRegisterOffset,
    LoadStoreSignExtended,
    LoadStoreImmediateOffset,
    LoadStoreHalfword,
    SpRelativeLoadStore,
    LoadAddress,
    AddOffsetToSp,
    PushPop,
    LoadStoreMultiple,
    ConditionalBranch,
    SoftwareInterrupt,
    UnconditionalBranch,
    LongBranchLink,
    Undefined,
}

/// THUMB.3 operation, bits 12..11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImmediateOp {
    Mov,
    Cmp,
    Add,
    Sub,
}

impl ImmediateOp {
    pub const ALL: [ImmediateOp; 4] = [Self::Mov, Self::Cmp, Self::Add, Self::Sub];
}

/// THUMB.4 operation, bits 9..6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThumbAluOp {
    And,
    Eor,
    Lsl,
    Lsr,
    Asr,
    Adc,
    Sbc,
    Ror,
    Tst,
    Neg,
    Cmp,
    Cmn,
    Orr,
    Mul,
    Bic,
    Mvn,
}

impl ThumbAluOp {
    pub const ALL: [ThumbAluOp; 16] = [
        Self::And,
        Self::Eor,
        Self::Lsl,
        Self::Lsr,
        Self::Asr,
        Self::Adc,
        Self::Sbc,
        Self::Ror,
        Self::Tst,
        Self::Neg,
        Self::Cmp,
        Self::Cmn,
        Self::Orr,
        Self::Mul,
        Self::Bic,
        Self::Mvn,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Eor => "eor",
            Self::Lsl => "lsl",
            Self::Lsr => "lsr",
            Self::Asr => "asr",
            Self::Adc => "adc",
            Self::Sbc => "sbc",
            Self::Ror => "ror",
            Self::Tst => "tst",
            Self::Neg => "neg",
            Self::Cmp => "cmp",
            Self::Cmn => "cmn",
            Self::Orr => "orr",
            Self::Mul => "mul",
            Self::Bic => "bic",
            Self::Mvn => "mvn",
        }
    }
}

/// THUMB.5 operation, bits 9..8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HighRegisterOp {
    Add,
    Cmp,
    Mov,
    Bx,
}

impl HighRegisterOp {
    pub const ALL: [HighRegisterOp; 4] = [Self::Add, Self::Cmp, Self::Mov, Self::Bx];
}

/// THUMB.7, bits 11..10 (L, B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegisterOffsetOp {
    Str,
    Strb,
    Ldr,
    Ldrb,
}

impl RegisterOffsetOp {
    pub const ALL: [RegisterOffsetOp; 4] = [Self::Str, Self::Strb, Self::Ldr, Self::Ldrb];
}

/// THUMB.8, bits 11..10 (H, S).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignExtendedOp {
    Strh,
    Ldsb,
    Ldrh,
    Ldsh,
}

impl SignExtendedOp {
    pub const ALL: [SignExtendedOp; 4] = [Self::Strh, Self::Ldsb, Self::Ldrh, Self::Ldsh];
}

/// THUMB.9, bits 12..11 (B, L). Note the swapped bit order compared to THUMB.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImmediateOffsetOp {
    Str,
    Ldr,
    Strb,
    Ldrb,
}

impl ImmediateOffsetOp {
    pub const ALL: [ImmediateOffsetOp; 4] = [Self::Str, Self::Ldr, Self::Strb, Self::Ldrb];
}

/// THUMB handler identity: the format family and every field baked into
/// the handler. Register fields in bits 5..0 are never part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThumbInstr {
    MoveShiftedRegister { op: ShiftType, offset5: u8 },
    AddSubtract { immediate: bool, subtract: bool, field3: u8 },
    ImmediateOp { op: ImmediateOp, rd: u8 },
    Alu { op: ThumbAluOp },
    HighRegisterOp { op: HighRegisterOp, high1: bool, high2: bool },
    PcRelativeLoad { rd: u8 },
    LoadStoreRegisterOffset { op: RegisterOffsetOp, ro: u8 },
    LoadStoreSignExtended { op: SignExtendedOp, ro: u8 },
    LoadStoreImmediateOffset { op: ImmediateOffsetOp, offset5: u8 },
    LoadStoreHalfword { load: bool, offset5: u8 },
    SpRelativeLoadStore { load: bool, rd: u8 },
    LoadAddress { use_sp: bool, rd: u8 },
    AddOffsetToSp { subtract: bool },
    PushPop { load: bool, pc_lr: bool },
    LoadStoreMultiple { load: bool, rb: u8 },
    ConditionalBranch { condition: Condition },
    SoftwareInterrupt,
    UnconditionalBranch,
    /// `low_half` is bit 11: set for the second instruction of the pair.
    LongBranchLink { low_half: bool },
    Undefined,
}

impl ThumbInstr {
    pub fn format(&self) -> ThumbFormat {
        match self {
            Self::MoveShiftedRegister { .. } => ThumbFormat::MoveShiftedRegister,
            Self::AddSubtract { .. } => ThumbFormat::AddSubtract,
            Self::ImmediateOp { .. } => ThumbFormat::ImmediateOp,
            Self::Alu { .. } => ThumbFormat::Alu,
            Self::HighRegisterOp { .. } => ThumbFormat::HighRegisterOp,
            Self::PcRelativeLoad { .. } => ThumbFormat::PcRelativeLoad,
            Self::LoadStoreRegisterOffset { .. } => ThumbFormat::LoadStoreRegisterOffset,
            Self::LoadStoreSignExtended { .. } => ThumbFormat::LoadStoreSignExtended,
            Self::LoadStoreImmediateOffset { .. } => ThumbFormat::LoadStoreImmediateOffset,
            Self::LoadStoreHalfword { .. } => ThumbFormat::LoadStoreHalfword,
            Self::SpRelativeLoadStore { .. } => ThumbFormat::SpRelativeLoadStore,
            Self::LoadAddress { .. } => ThumbFormat::LoadAddress,
            Self::AddOffsetToSp { .. } => ThumbFormat::AddOffsetToSp,
            Self::PushPop { .. } => ThumbFormat::PushPop,
            Self::LoadStoreMultiple { .. } => ThumbFormat::LoadStoreMultiple,
            Self::ConditionalBranch { .. } => ThumbFormat::ConditionalBranch,
            Self::SoftwareInterrupt => ThumbFormat::SoftwareInterrupt,
            Self::UnconditionalBranch => ThumbFormat::UnconditionalBranch,
            Self::LongBranchLink { .. } => ThumbFormat::LongBranchLink,
            Self::Undefined => ThumbFormat::Undefined,
        }
    }

    /// Every identity the classifier can produce, family by family.
    pub fn variants() -> Vec<ThumbInstr> {
        let bools = [false, true];
        let mut out = Vec::with_capacity(531);

        // opcode 3 of THUMB.1 is THUMB.2
        for op in [ShiftType::Lsl, ShiftType::Lsr, ShiftType::Asr] {
            for offset5 in 0..32 {
                out.push(Self::MoveShiftedRegister { op, offset5 });
            }
        }
        for immediate in bools {
            for subtract in bools {
                for field3 in 0..8 {
                    out.push(Self::AddSubtract { immediate, subtract, field3 });
                }
            }
        }
        for op in ImmediateOp::ALL {
            for rd in 0..8 {
                out.push(Self::ImmediateOp { op, rd });
            }
        }
        out.extend(ThumbAluOp::ALL.iter().map(|&op| Self::Alu { op }));
        for op in HighRegisterOp::ALL {
            for high1 in bools {
                for high2 in bools {
                    out.push(Self::HighRegisterOp { op, high1, high2 });
                }
            }
        }
        out.extend((0..8).map(|rd| Self::PcRelativeLoad { rd }));
        for ro in 0..8 {
            out.extend(RegisterOffsetOp::ALL.iter().map(|&op| Self::LoadStoreRegisterOffset { op, ro }));
            out.extend(SignExtendedOp::ALL.iter().map(|&op| Self::LoadStoreSignExtended { op, ro }));
        }
        for offset5 in 0..32 {
            out.extend(ImmediateOffsetOp::ALL.iter().map(|&op| Self::LoadStoreImmediateOffset { op, offset5 }));
        }
        for load in bools {
            for offset5 in 0..32 {
                out.push(Self::LoadStoreHalfword { load, offset5 });
            }
            for rd in 0..8 {
                out.push(Self::SpRelativeLoadStore { load, rd });
                out.push(Self::LoadAddress { use_sp: load, rd });
            }
            out.push(Self::AddOffsetToSp { subtract: load });
            for pc_lr in bools {
                out.push(Self::PushPop { load, pc_lr });
            }
            for rb in 0..8 {
                out.push(Self::LoadStoreMultiple { load, rb });
            }
            out.push(Self::LongBranchLink { low_half: load });
        }
        out.extend(Condition::ALL.iter().map(|&condition| Self::ConditionalBranch { condition }));
        out.push(Self::SoftwareInterrupt);
        out.push(Self::UnconditionalBranch);
        out.push(Self::Undefined);
        out
    }
}

#[inline]
fn bit(instruction: u32, n: u32) -> bool {
    instruction & (1 << n) != 0
}

#[inline]
fn field(instruction: u32, shift: u32, mask: u32) -> u8 {
    ((instruction >> shift) & mask) as u8
}

/// Classifies a THUMB instruction. Only bits 15..6 are inspected.
///
/// Rules are tried in data sheet order and the first match wins. Rules 1
/// and 16 are range checks, not equality: 16 takes everything below
/// `0xDF00` left over by the earlier rules, including the unallocated
/// `0xB1xx`..`0xBFxx` slots that push/pop and SP adjust do not claim.
pub fn decode_thumb(instruction: u16) -> ThumbInstr {
    let i = instruction as u32;

    // THUMB.1
    if (i & 0xF800) < 0x1800 {
        return ThumbInstr::MoveShiftedRegister {
            op: ShiftType::from_bits(i >> 11),
            offset5: field(i, 6, 0x1F),
        };
    }
    // THUMB.2
    if (i & 0xF800) == 0x1800 {
        return ThumbInstr::AddSubtract {
            immediate: bit(i, 10),
            subtract: bit(i, 9),
            field3: field(i, 6, 7),
        };
    }
    // THUMB.3
    if (i & 0xE000) == 0x2000 {
        return ThumbInstr::ImmediateOp {
            op: ImmediateOp::ALL[((i >> 11) & 3) as usize],
            rd: field(i, 8, 7),
        };
    }
    // THUMB.4
    if (i & 0xFC00) == 0x4000 {
        return ThumbInstr::Alu { op: ThumbAluOp::ALL[((i >> 6) & 0xF) as usize] };
    }
    // THUMB.5
    if (i & 0xFC00) == 0x4400 {
        return ThumbInstr::HighRegisterOp {
            op: HighRegisterOp::ALL[((i >> 8) & 3) as usize],
            high1: bit(i, 7),
            high2: bit(i, 6),
        };
    }
    // THUMB.6
    if (i & 0xF800) == 0x4800 {
        return ThumbInstr::PcRelativeLoad { rd: field(i, 8, 7) };
    }
    // THUMB.7
    if (i & 0xF200) == 0x5000 {
        return ThumbInstr::LoadStoreRegisterOffset {
            op: RegisterOffsetOp::ALL[((i >> 10) & 3) as usize],
            ro: field(i, 6, 7),
        };
    }
    // THUMB.8
    if (i & 0xF200) == 0x5200 {
        return ThumbInstr::LoadStoreSignExtended {
            op: SignExtendedOp::ALL[((i >> 10) & 3) as usize],
            ro: field(i, 6, 7),
        };
    }
    // THUMB.9
    if (i & 0xE000) == 0x6000 {
        return ThumbInstr::LoadStoreImmediateOffset {
            op: ImmediateOffsetOp::ALL[((i >> 11) & 3) as usize],
            offset5: field(i, 6, 0x1F),
        };
    }
    // THUMB.10
    if (i & 0xF000) == 0x8000 {
        return ThumbInstr::LoadStoreHalfword { load: bit(i, 11), offset5: field(i, 6, 0x1F) };
    }
    // THUMB.11
    if (i & 0xF000) == 0x9000 {
        return ThumbInstr::SpRelativeLoadStore { load: bit(i, 11), rd: field(i, 8, 7) };
    }
    // THUMB.12
    if (i & 0xF000) == 0xA000 {
        return ThumbInstr::LoadAddress { use_sp: bit(i, 11), rd: field(i, 8, 7) };
    }
    // THUMB.13
    if (i & 0xFF00) == 0xB000 {
        return ThumbInstr::AddOffsetToSp { subtract: bit(i, 7) };
    }
    // THUMB.14
    if (i & 0xF600) == 0xB400 {
        return ThumbInstr::PushPop { load: bit(i, 11), pc_lr: bit(i, 8) };
    }
    // THUMB.15
    if (i & 0xF000) == 0xC000 {
        return ThumbInstr::LoadStoreMultiple { load: bit(i, 11), rb: field(i, 8, 7) };
    }
    // THUMB.16
    if (i & 0xFF00) < 0xDF00 {
        return ThumbInstr::ConditionalBranch { condition: Condition::from_bits(i >> 8) };
    }
    // THUMB.17
    if (i & 0xFF00) == 0xDF00 {
        return ThumbInstr::SoftwareInterrupt;
    }
    // THUMB.18
    if (i & 0xF800) == 0xE000 {
        return ThumbInstr::UnconditionalBranch;
    }
    // THUMB.19
    if (i & 0xF000) == 0xF000 {
        return ThumbInstr::LongBranchLink { low_half: bit(i, 11) };
    }

    ThumbInstr::Undefined
}

/// THUMB classifier keyed by bits 15..6.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThumbDecoder;

impl ThumbDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for ThumbDecoder {
    type Word = u16;
    type Instr = ThumbInstr;

    const TABLE_LEN: usize = 1024;

    fn reconstruct(index: usize) -> u16 {
        ((index & 0x3FF) << 6) as u16
    }

    fn index_of(word: u16) -> usize {
        (word >> 6) as usize
    }

    fn decode(&self, word: u16) -> ThumbInstr {
        decode_thumb(word)
    }
}
