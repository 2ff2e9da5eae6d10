use anyhow::Error;

use crate::fields::{AluOp, Condition, ShiftType, TransferFlags};
use crate::isa::arm::{CoprocessorOp, HalfwordOp};
use crate::isa::thumb::{
    HighRegisterOp, ImmediateOffsetOp, ImmediateOp, RegisterOffsetOp, SignExtendedOp, ThumbAluOp,
};
use crate::memory::Bus;

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("Undefined instruction {instruction:#010x}")]
    UndefinedInstruction { instruction: u32 },
    #[error("Unimplemented coprocessor instruction {instruction:#010x} ({op:?})")]
    Coprocessor { instruction: u32, op: CoprocessorOp },
    #[error("Software interrupt {comment:#x}")]
    SoftwareInterrupt { comment: u32 },
    #[error("Bus error at {addr:#010x}: {source}")]
    Bus { addr: u32, #[source] source: Error },
}

/// THUMB handler contract. `self` is the processor state; every method gets
/// the bus and the full instruction word, plus the static fields its
/// identity was specialized with.
pub trait ThumbExecutor<B: Bus> {
    fn move_shifted_register(&mut self, bus: &mut B, instruction: u16, op: ShiftType, offset5: u8) -> Result<(), Trap>;
    fn add_subtract(&mut self, bus: &mut B, instruction: u16, immediate: bool, subtract: bool, field3: u8) -> Result<(), Trap>;
    fn immediate_op(&mut self, bus: &mut B, instruction: u16, op: ImmediateOp, rd: u8) -> Result<(), Trap>;
    fn alu(&mut self, bus: &mut B, instruction: u16, op: ThumbAluOp) -> Result<(), Trap>;
    fn high_register_op(&mut self, bus: &mut B, instruction: u16, op: HighRegisterOp, high1: bool, high2: bool) -> Result<(), Trap>;
    fn pc_relative_load(&mut self, bus: &mut B, instruction: u16, rd: u8) -> Result<(), Trap>;
    fn load_store_register_offset(&mut self, bus: &mut B, instruction: u16, op: RegisterOffsetOp, ro: u8) -> Result<(), Trap>;
    fn load_store_sign_extended(&mut self, bus: &mut B, instruction: u16, op: SignExtendedOp, ro: u8) -> Result<(), Trap>;
    fn load_store_immediate_offset(&mut self, bus: &mut B, instruction: u16, op: ImmediateOffsetOp, offset5: u8) -> Result<(), Trap>;
    fn load_store_halfword(&mut self, bus: &mut B, instruction: u16, load: bool, offset5: u8) -> Result<(), Trap>;
    fn sp_relative_load_store(&mut self, bus: &mut B, instruction: u16, load: bool, rd: u8) -> Result<(), Trap>;
    fn load_address(&mut self, bus: &mut B, instruction: u16, use_sp: bool, rd: u8) -> Result<(), Trap>;
    fn add_offset_to_sp(&mut self, bus: &mut B, instruction: u16, subtract: bool) -> Result<(), Trap>;
    fn push_pop(&mut self, bus: &mut B, instruction: u16, load: bool, pc_lr: bool) -> Result<(), Trap>;
    fn load_store_multiple(&mut self, bus: &mut B, instruction: u16, load: bool, rb: u8) -> Result<(), Trap>;
    fn conditional_branch(&mut self, bus: &mut B, instruction: u16, condition: Condition) -> Result<(), Trap>;
    fn unconditional_branch(&mut self, bus: &mut B, instruction: u16) -> Result<(), Trap>;
    fn long_branch_link(&mut self, bus: &mut B, instruction: u16, low_half: bool) -> Result<(), Trap>;

    fn software_interrupt(&mut self, _bus: &mut B, instruction: u16) -> Result<(), Trap> {
        Err(Trap::SoftwareInterrupt { comment: (instruction & 0xFF) as u32 })
    }

    fn undefined(&mut self, _bus: &mut B, instruction: u16) -> Result<(), Trap> {
        Err(Trap::UndefinedInstruction { instruction: instruction as u32 })
    }
}

/// ARM handler contract. The condition field is the caller's business:
/// handlers only run for instructions whose condition passed.
pub trait ArmExecutor<B: Bus> {
    fn data_processing(&mut self, bus: &mut B, instruction: u32, immediate: bool, op: AluOp, set_flags: bool, field4: u8) -> Result<(), Trap>;
    fn status_transfer(&mut self, bus: &mut B, instruction: u32, immediate: bool, use_spsr: bool, to_status: bool) -> Result<(), Trap>;
    fn multiply(&mut self, bus: &mut B, instruction: u32, accumulate: bool, set_flags: bool) -> Result<(), Trap>;
    fn multiply_long(&mut self, bus: &mut B, instruction: u32, sign_extend: bool, accumulate: bool, set_flags: bool) -> Result<(), Trap>;
    fn single_data_swap(&mut self, bus: &mut B, instruction: u32, byte: bool) -> Result<(), Trap>;
    fn branch_and_exchange(&mut self, bus: &mut B, instruction: u32) -> Result<(), Trap>;
    fn halfword_signed_transfer(&mut self, bus: &mut B, instruction: u32, flags: TransferFlags, immediate: bool, op: HalfwordOp) -> Result<(), Trap>;
    fn single_data_transfer(&mut self, bus: &mut B, instruction: u32, flags: TransferFlags, immediate: bool, byte: bool) -> Result<(), Trap>;
    fn block_data_transfer(&mut self, bus: &mut B, instruction: u32, flags: TransferFlags, user_mode: bool) -> Result<(), Trap>;
    fn branch(&mut self, bus: &mut B, instruction: u32, link: bool) -> Result<(), Trap>;

    fn software_interrupt(&mut self, _bus: &mut B, instruction: u32) -> Result<(), Trap> {
        Err(Trap::SoftwareInterrupt { comment: instruction & 0x00FF_FFFF })
    }

    fn coprocessor(&mut self, _bus: &mut B, instruction: u32, op: CoprocessorOp) -> Result<(), Trap> {
        Err(Trap::Coprocessor { instruction, op })
    }

    fn undefined(&mut self, _bus: &mut B, instruction: u32) -> Result<(), Trap> {
        Err(Trap::UndefinedInstruction { instruction })
    }
}
