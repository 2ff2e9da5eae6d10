//! Handler specialization and the runtime dispatch tables.
//!
//! Every identity in [`DecodeTables`] becomes one shared closure with its
//! static fields captured. Running a handler is a table read plus one
//! indirect call into the executor; no format checks remain at that point.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::decoder::Decoder;
use crate::exec::{ArmExecutor, ThumbExecutor, Trap};
use crate::isa::arm::{ArmDecoder, ArmInstr};
use crate::isa::thumb::{ThumbDecoder, ThumbInstr};
use crate::lut::DecodeTables;
use crate::memory::Bus;

pub type ThumbHandler<E, B> = Arc<dyn Fn(&mut E, &mut B, u16) -> Result<(), Trap> + Send + Sync>;
pub type ArmHandler<E, B> = Arc<dyn Fn(&mut E, &mut B, u32) -> Result<(), Trap> + Send + Sync>;

fn share_thumb<E, B>(
    f: impl Fn(&mut E, &mut B, u16) -> Result<(), Trap> + Send + Sync + 'static,
) -> ThumbHandler<E, B> {
    Arc::new(f)
}

fn share_arm<E, B>(
    f: impl Fn(&mut E, &mut B, u32) -> Result<(), Trap> + Send + Sync + 'static,
) -> ArmHandler<E, B> {
    Arc::new(f)
}

/// Builds the handler for one THUMB identity.
pub fn specialize_thumb<E, B>(instr: ThumbInstr) -> ThumbHandler<E, B>
where
    E: ThumbExecutor<B> + 'static,
    B: Bus + 'static,
{
    match instr {
        ThumbInstr::MoveShiftedRegister { op, offset5 } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.move_shifted_register(bus, i, op, offset5))
        }
        ThumbInstr::AddSubtract { immediate, subtract, field3 } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.add_subtract(bus, i, immediate, subtract, field3))
        }
        ThumbInstr::ImmediateOp { op, rd } => share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.immediate_op(bus, i, op, rd)),
        ThumbInstr::Alu { op } => share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.alu(bus, i, op)),
        ThumbInstr::HighRegisterOp { op, high1, high2 } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.high_register_op(bus, i, op, high1, high2))
        }
        ThumbInstr::PcRelativeLoad { rd } => share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.pc_relative_load(bus, i, rd)),
        ThumbInstr::LoadStoreRegisterOffset { op, ro } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.load_store_register_offset(bus, i, op, ro))
        }
        ThumbInstr::LoadStoreSignExtended { op, ro } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.load_store_sign_extended(bus, i, op, ro))
        }
        ThumbInstr::LoadStoreImmediateOffset { op, offset5 } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.load_store_immediate_offset(bus, i, op, offset5))
        }
        ThumbInstr::LoadStoreHalfword { load, offset5 } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.load_store_halfword(bus, i, load, offset5))
        }
        ThumbInstr::SpRelativeLoadStore { load, rd } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.sp_relative_load_store(bus, i, load, rd))
        }
        ThumbInstr::LoadAddress { use_sp, rd } => share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.load_address(bus, i, use_sp, rd)),
        ThumbInstr::AddOffsetToSp { subtract } => share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.add_offset_to_sp(bus, i, subtract)),
        ThumbInstr::PushPop { load, pc_lr } => share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.push_pop(bus, i, load, pc_lr)),
        ThumbInstr::LoadStoreMultiple { load, rb } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.load_store_multiple(bus, i, load, rb))
        }
        ThumbInstr::ConditionalBranch { condition } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.conditional_branch(bus, i, condition))
        }
        ThumbInstr::SoftwareInterrupt => share_thumb(|cpu: &mut E, bus: &mut B, i| cpu.software_interrupt(bus, i)),
        ThumbInstr::UnconditionalBranch => share_thumb(|cpu: &mut E, bus: &mut B, i| cpu.unconditional_branch(bus, i)),
        ThumbInstr::LongBranchLink { low_half } => {
            share_thumb(move |cpu: &mut E, bus: &mut B, i| cpu.long_branch_link(bus, i, low_half))
        }
        ThumbInstr::Undefined => share_thumb(|cpu: &mut E, bus: &mut B, i| ThumbExecutor::undefined(cpu, bus, i)),
    }
}

/// Builds the handler for one ARM identity.
pub fn specialize_arm<E, B>(instr: ArmInstr) -> ArmHandler<E, B>
where
    E: ArmExecutor<B> + 'static,
    B: Bus + 'static,
{
    match instr {
        ArmInstr::DataProcessing { immediate, op, set_flags, field4 } => {
            share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.data_processing(bus, i, immediate, op, set_flags, field4))
        }
        ArmInstr::StatusTransfer { immediate, use_spsr, to_status } => {
            share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.status_transfer(bus, i, immediate, use_spsr, to_status))
        }
        ArmInstr::Multiply { accumulate, set_flags } => {
            share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.multiply(bus, i, accumulate, set_flags))
        }
        ArmInstr::MultiplyLong { sign_extend, accumulate, set_flags } => {
            share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.multiply_long(bus, i, sign_extend, accumulate, set_flags))
        }
        ArmInstr::SingleDataSwap { byte } => share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.single_data_swap(bus, i, byte)),
        ArmInstr::BranchAndExchange => share_arm(|cpu: &mut E, bus: &mut B, i| cpu.branch_and_exchange(bus, i)),
        ArmInstr::HalfwordSignedTransfer { flags, immediate, op } => {
            share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.halfword_signed_transfer(bus, i, flags, immediate, op))
        }
        ArmInstr::SingleDataTransfer { flags, immediate, byte } => {
            share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.single_data_transfer(bus, i, flags, immediate, byte))
        }
        ArmInstr::Undefined => share_arm(|cpu: &mut E, bus: &mut B, i| ArmExecutor::undefined(cpu, bus, i)),
        ArmInstr::BlockDataTransfer { flags, user_mode } => {
            share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.block_data_transfer(bus, i, flags, user_mode))
        }
        ArmInstr::Branch { link } => share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.branch(bus, i, link)),
        ArmInstr::SoftwareInterrupt => share_arm(|cpu: &mut E, bus: &mut B, i| ArmExecutor::software_interrupt(cpu, bus, i)),
        ArmInstr::Coprocessor(op) => share_arm(move |cpu: &mut E, bus: &mut B, i| cpu.coprocessor(bus, i, op)),
    }
}

/// Handler tables for one executor/bus pair, indexed like [`DecodeTables`].
///
/// Identities shared by several indices share one handler.
pub struct Dispatcher<E, B> {
    thumb: Box<[ThumbHandler<E, B>]>,
    arm: Box<[ArmHandler<E, B>]>,
    thumb_identities: usize,
    arm_identities: usize,
}

impl<E, B> Dispatcher<E, B>
where
    E: ThumbExecutor<B> + ArmExecutor<B> + 'static,
    B: Bus + 'static,
{
    pub fn new(tables: &DecodeTables) -> Self {
        let mut thumb_cache: HashMap<ThumbInstr, ThumbHandler<E, B>> = HashMap::new();
        let thumb = tables
            .thumb_table()
            .iter()
            .map(|&instr| thumb_cache.entry(instr).or_insert_with(|| specialize_thumb(instr)).clone())
            .collect();

        let mut arm_cache: HashMap<ArmInstr, ArmHandler<E, B>> = HashMap::new();
        let arm = tables
            .arm_table()
            .iter()
            .map(|&instr| arm_cache.entry(instr).or_insert_with(|| specialize_arm(instr)).clone())
            .collect();

        debug!(
            thumb_handlers = thumb_cache.len(),
            arm_handlers = arm_cache.len(),
            "dispatcher specialized"
        );
        Self { thumb, arm, thumb_identities: thumb_cache.len(), arm_identities: arm_cache.len() }
    }

    #[inline]
    pub fn execute_thumb(&self, cpu: &mut E, bus: &mut B, instruction: u16) -> Result<(), Trap> {
        (self.thumb[ThumbDecoder::index_of(instruction)])(cpu, bus, instruction)
    }

    /// Runs the handler for `instruction`. The condition must already have
    /// been checked by the caller.
    #[inline]
    pub fn execute_arm(&self, cpu: &mut E, bus: &mut B, instruction: u32) -> Result<(), Trap> {
        (self.arm[ArmDecoder::index_of(instruction)])(cpu, bus, instruction)
    }
}

impl<E, B> Dispatcher<E, B> {
    pub fn thumb_handler(&self, index: usize) -> &ThumbHandler<E, B> {
        &self.thumb[index & (self.thumb.len() - 1)]
    }

    pub fn arm_handler(&self, index: usize) -> &ArmHandler<E, B> {
        &self.arm[index & (self.arm.len() - 1)]
    }

    /// Number of distinct THUMB handlers that were specialized.
    pub fn thumb_identities(&self) -> usize {
        self.thumb_identities
    }

    pub fn arm_identities(&self) -> usize {
        self.arm_identities
    }
}
