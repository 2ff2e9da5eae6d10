use crate::isa::arm::ArmFormat;
use crate::isa::thumb::ThumbFormat;

/// Data sheet label and short name of a format.
#[derive(Debug, Clone, Copy)]
pub struct FormatDesc<F> {
    pub format: F,
    pub label: &'static str,
    pub name: &'static str,
}

pub const THUMB_FORMATS: &[FormatDesc<ThumbFormat>] = &[
    FormatDesc { format: ThumbFormat::MoveShiftedRegister, label: "THUMB.1", name: "move shifted register" },
    FormatDesc { format: ThumbFormat::AddSubtract, label: "THUMB.2", name: "add/subtract" },
    FormatDesc { format: ThumbFormat::ImmediateOp, label: "THUMB.3", name: "move/compare/add/subtract immediate" },
    FormatDesc { format: ThumbFormat::Alu, label: "THUMB.4", name: "ALU operation" },
    FormatDesc { format: ThumbFormat::HighRegisterOp, label: "THUMB.5", name: "hi register operation/branch exchange" },
    FormatDesc { format: ThumbFormat::PcRelativeLoad, label: "THUMB.6", name: "PC-relative load" },
    FormatDesc { format: ThumbFormat::LoadStoreRegisterOffset, label: "THUMB.7", name: "load/store with register offset" },
    FormatDesc { format: ThumbFormat::LoadStoreSignExtended, label: "THUMB.8", name: "load/store sign-extended byte/halfword" },
    FormatDesc { format: ThumbFormat::LoadStoreImmediateOffset, label: "THUMB.9", name: "load/store with immediate offset" },
    FormatDesc { format: ThumbFormat::LoadStoreHalfword, label: "THUMB.10", name: "load/store halfword" },
    FormatDesc { format: ThumbFormat::SpRelativeLoadStore, label: "THUMB.11", name: "SP-relative load/store" },
    FormatDesc { format: ThumbFormat::LoadAddress, label: "THUMB.12", name: "load address" },
    FormatDesc { format: ThumbFormat::AddOffsetToSp, label: "THUMB.13", name: "add offset to stack pointer" },
    FormatDesc { format: ThumbFormat::PushPop, label: "THUMB.14", name: "push/pop registers" },
    FormatDesc { format: ThumbFormat::LoadStoreMultiple, label: "THUMB.15", name: "multiple load/store" },
    FormatDesc { format: ThumbFormat::ConditionalBranch, label: "THUMB.16", name: "conditional branch" },
    FormatDesc { format: ThumbFormat::SoftwareInterrupt, label: "THUMB.17", name: "software interrupt" },
    FormatDesc { format: ThumbFormat::UnconditionalBranch, label: "THUMB.18", name: "unconditional branch" },
    FormatDesc { format: ThumbFormat::LongBranchLink, label: "THUMB.19", name: "long branch with link" },
    FormatDesc { format: ThumbFormat::Undefined, label: "THUMB.-", name: "undefined" },
];

pub const ARM_FORMATS: &[FormatDesc<ArmFormat>] = &[
    FormatDesc { format: ArmFormat::DataProcessing, label: "ARM.8", name: "data processing" },
    FormatDesc { format: ArmFormat::StatusTransfer, label: "ARM.8", name: "PSR transfer" },
    FormatDesc { format: ArmFormat::Multiply, label: "ARM.1", name: "multiply (accumulate)" },
    FormatDesc { format: ArmFormat::MultiplyLong, label: "ARM.2", name: "multiply (accumulate) long" },
    FormatDesc { format: ArmFormat::SingleDataSwap, label: "ARM.4", name: "single data swap" },
    FormatDesc { format: ArmFormat::BranchAndExchange, label: "ARM.3", name: "branch and exchange" },
    FormatDesc { format: ArmFormat::HalfwordSignedTransfer, label: "ARM.5-7", name: "halfword/signed data transfer" },
    FormatDesc { format: ArmFormat::SingleDataTransfer, label: "ARM.9", name: "single data transfer" },
    FormatDesc { format: ArmFormat::Undefined, label: "ARM.10", name: "undefined" },
    FormatDesc { format: ArmFormat::BlockDataTransfer, label: "ARM.11", name: "block data transfer" },
    FormatDesc { format: ArmFormat::Branch, label: "ARM.12", name: "branch" },
    FormatDesc { format: ArmFormat::BranchWithLink, label: "ARM.12", name: "branch with link" },
    FormatDesc { format: ArmFormat::SoftwareInterrupt, label: "ARM.16", name: "software interrupt" },
    FormatDesc { format: ArmFormat::CoprocessorDataOperation, label: "ARM.14", name: "coprocessor data operation" },
    FormatDesc { format: ArmFormat::CoprocessorRegisterTransfer, label: "ARM.15", name: "coprocessor register transfer" },
    FormatDesc { format: ArmFormat::CoprocessorDataTransfer, label: "ARM.13", name: "coprocessor data transfer" },
];

// Both tables are in enum declaration order.

pub fn thumb_desc(format: ThumbFormat) -> &'static FormatDesc<ThumbFormat> {
    &THUMB_FORMATS[format as usize]
}

pub fn arm_desc(format: ArmFormat) -> &'static FormatDesc<ArmFormat> {
    &ARM_FORMATS[format as usize]
}
