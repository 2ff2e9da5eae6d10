use serde::{Deserialize, Serialize};

use crate::decoder::Decoder;
use crate::fields::{AluOp, TransferFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArmFormat {
    DataProcessing,
    StatusTransfer,
    Multiply,
    MultiplyLong,
    SingleDataSwap,
    BranchAndExchange,
    HalfwordSignedTransfer,
    SingleDataTransfer,
    Undefined,
    BlockDataTransfer,
    Branch,
    BranchWithLink,
    SoftwareInterrupt,
    CoprocessorDataOperation,
    CoprocessorRegisterTransfer,
    CoprocessorDataTransfer,
}

/// SH field (bits 6..5) of a halfword/signed transfer. `0b00` never gets
/// here: that slot is multiply/swap space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HalfwordOp {
    UnsignedHalfword,
    SignedByte,
    SignedHalfword,
}

impl HalfwordOp {
    pub const ALL: [HalfwordOp; 3] = [Self::UnsignedHalfword, Self::SignedByte, Self::SignedHalfword];

    fn from_bits(bits: u32) -> Self {
        debug_assert_ne!(bits & 3, 0, "SH = 00 is multiply/swap space");
        match bits & 3 {
            0b01 => Self::UnsignedHalfword,
            0b10 => Self::SignedByte,
            _ => Self::SignedHalfword,
        }
    }
}

/// Coprocessor space. The GBA has no coprocessors, so these stay reserved
/// categories: each has its own identity but no semantics in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoprocessorOp {
    DataOperation,
    RegisterTransfer,
    DataTransfer,
}

/// ARM handler identity. Condition (31..28) and register numbers are
/// resolved when the handler runs, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArmInstr {
    DataProcessing { immediate: bool, op: AluOp, set_flags: bool, field4: u8 },
    StatusTransfer { immediate: bool, use_spsr: bool, to_status: bool },
    Multiply { accumulate: bool, set_flags: bool },
    MultiplyLong { sign_extend: bool, accumulate: bool, set_flags: bool },
    SingleDataSwap { byte: bool },
    BranchAndExchange,
    HalfwordSignedTransfer { flags: TransferFlags, immediate: bool, op: HalfwordOp },
    SingleDataTransfer { flags: TransferFlags, immediate: bool, byte: bool },
    Undefined,
    BlockDataTransfer { flags: TransferFlags, user_mode: bool },
    Branch { link: bool },
    SoftwareInterrupt,
    Coprocessor(CoprocessorOp),
}

impl ArmInstr {
    pub fn format(&self) -> ArmFormat {
        match self {
            Self::DataProcessing { .. } => ArmFormat::DataProcessing,
            Self::StatusTransfer { .. } => ArmFormat::StatusTransfer,
            Self::Multiply { .. } => ArmFormat::Multiply,
            Self::MultiplyLong { .. } => ArmFormat::MultiplyLong,
            Self::SingleDataSwap { .. } => ArmFormat::SingleDataSwap,
            Self::BranchAndExchange => ArmFormat::BranchAndExchange,
            Self::HalfwordSignedTransfer { .. } => ArmFormat::HalfwordSignedTransfer,
            Self::SingleDataTransfer { .. } => ArmFormat::SingleDataTransfer,
            Self::Undefined => ArmFormat::Undefined,
            Self::BlockDataTransfer { .. } => ArmFormat::BlockDataTransfer,
            Self::Branch { link: false } => ArmFormat::Branch,
            Self::Branch { link: true } => ArmFormat::BranchWithLink,
            Self::SoftwareInterrupt => ArmFormat::SoftwareInterrupt,
            Self::Coprocessor(CoprocessorOp::DataOperation) => ArmFormat::CoprocessorDataOperation,
            Self::Coprocessor(CoprocessorOp::RegisterTransfer) => ArmFormat::CoprocessorRegisterTransfer,
            Self::Coprocessor(CoprocessorOp::DataTransfer) => ArmFormat::CoprocessorDataTransfer,
        }
    }

    /// Every identity the classifier can produce.
    pub fn variants() -> Vec<ArmInstr> {
        let bools = [false, true];
        let mut out = Vec::with_capacity(1006);

        for immediate in bools {
            for op in AluOp::ALL {
                for set_flags in bools {
                    if !set_flags && op.is_test() {
                        continue;
                    }
                    for field4 in 0..16u8 {
                        // register forms with bit 7 and bit 4 set are multiply/swap/halfword
                        if !immediate && field4 & 0b1001 == 0b1001 {
                            continue;
                        }
                        out.push(Self::DataProcessing { immediate, op, set_flags, field4 });
                    }
                }
            }
            for use_spsr in bools {
                for to_status in bools {
                    out.push(Self::StatusTransfer { immediate, use_spsr, to_status });
                }
            }
        }
        for accumulate in bools {
            for set_flags in bools {
                out.push(Self::Multiply { accumulate, set_flags });
                for sign_extend in bools {
                    out.push(Self::MultiplyLong { sign_extend, accumulate, set_flags });
                }
            }
        }
        out.push(Self::SingleDataSwap { byte: false });
        out.push(Self::SingleDataSwap { byte: true });
        out.push(Self::BranchAndExchange);
        for flags in TransferFlags::combinations() {
            for immediate in bools {
                for op in HalfwordOp::ALL {
                    out.push(Self::HalfwordSignedTransfer { flags, immediate, op });
                }
                for byte in bools {
                    out.push(Self::SingleDataTransfer { flags, immediate, byte });
                }
            }
            for user_mode in bools {
                out.push(Self::BlockDataTransfer { flags, user_mode });
            }
        }
        out.push(Self::Undefined);
        out.push(Self::Branch { link: false });
        out.push(Self::Branch { link: true });
        out.push(Self::SoftwareInterrupt);
        out.push(Self::Coprocessor(CoprocessorOp::DataOperation));
        out.push(Self::Coprocessor(CoprocessorOp::RegisterTransfer));
        out.push(Self::Coprocessor(CoprocessorOp::DataTransfer));
        out
    }
}

// Family predicates of the `00`, register-operand group. Each takes the
// instruction with the condition stripped.

pub fn is_branch_exchange(opcode: u32) -> bool {
    opcode & 0xFF0_00F0 == 0x120_0010
}

/// Multiply and multiply long.
pub fn is_multiply(opcode: u32) -> bool {
    opcode & 0x100_00F0 == 0x000_0090
}

pub fn is_single_data_swap(opcode: u32) -> bool {
    opcode & 0x100_00F0 == 0x100_0090
}

pub fn is_halfword_transfer(opcode: u32) -> bool {
    opcode & 0xF0 == 0xB0 || opcode & 0xD0 == 0xD0
}

#[inline]
fn bit(instruction: u32, n: u32) -> bool {
    instruction & (1 << n) != 0
}

fn data_processing(instruction: u32, immediate: bool) -> ArmInstr {
    let set_flags = bit(instruction, 20);
    let op = AluOp::from_bits(instruction >> 21);

    if !set_flags && op.is_test() {
        ArmInstr::StatusTransfer {
            immediate,
            use_spsr: bit(instruction, 22),
            to_status: bit(instruction, 21),
        }
    } else {
        ArmInstr::DataProcessing {
            immediate,
            op,
            set_flags,
            field4: ((instruction >> 4) & 0xF) as u8,
        }
    }
}

/// Classifies an ARM instruction from bits 27..20 and 7..4.
pub fn decode_arm(instruction: u32) -> ArmInstr {
    let opcode = instruction & 0x0FFF_FFFF;
    let flags = TransferFlags::from_instruction(instruction);

    match opcode >> 26 {
        0b00 => {
            if bit(opcode, 25) {
                data_processing(instruction, true)
            } else if is_branch_exchange(opcode) {
                // TODO: check which of the SBO/SBZ-violating encodings real hardware also runs as BX
                ArmInstr::BranchAndExchange
            } else if is_multiply(opcode) {
                let accumulate = bit(opcode, 21);
                let set_flags = bit(opcode, 20);
                if bit(opcode, 23) {
                    ArmInstr::MultiplyLong { sign_extend: bit(opcode, 22), accumulate, set_flags }
                } else {
                    ArmInstr::Multiply { accumulate, set_flags }
                }
            } else if is_single_data_swap(opcode) {
                ArmInstr::SingleDataSwap { byte: bit(opcode, 22) }
            } else if is_halfword_transfer(opcode) {
                ArmInstr::HalfwordSignedTransfer {
                    flags,
                    immediate: bit(opcode, 22),
                    op: HalfwordOp::from_bits(opcode >> 5),
                }
            } else {
                data_processing(instruction, false)
            }
        }
        0b01 => {
            if opcode & 0x200_0010 == 0x200_0010 {
                ArmInstr::Undefined
            } else {
                ArmInstr::SingleDataTransfer { flags, immediate: !bit(opcode, 25), byte: bit(opcode, 22) }
            }
        }
        0b10 => {
            if bit(opcode, 25) {
                ArmInstr::Branch { link: bit(opcode, 24) }
            } else {
                ArmInstr::BlockDataTransfer { flags, user_mode: bit(opcode, 22) }
            }
        }
        _ => {
            if !bit(opcode, 25) {
                ArmInstr::Coprocessor(CoprocessorOp::DataTransfer)
            } else if bit(opcode, 24) {
                ArmInstr::SoftwareInterrupt
            } else if bit(opcode, 4) {
                ArmInstr::Coprocessor(CoprocessorOp::RegisterTransfer)
            } else {
                ArmInstr::Coprocessor(CoprocessorOp::DataOperation)
            }
        }
    }
}

/// ARM classifier keyed by bits 27..20 and 7..4.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArmDecoder;

impl ArmDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for ArmDecoder {
    type Word = u32;
    type Instr = ArmInstr;

    const TABLE_LEN: usize = 4096;

    fn reconstruct(index: usize) -> u32 {
        let index = (index & 0xFFF) as u32;
        ((index & 0xFF0) << 16) | ((index & 0xF) << 4)
    }

    fn index_of(word: u32) -> usize {
        (((word >> 16) & 0xFF0) | ((word >> 4) & 0xF)) as usize
    }

    fn decode(&self, word: u32) -> ArmInstr {
        decode_arm(word)
    }
}
