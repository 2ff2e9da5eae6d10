use std::collections::BTreeMap;

use arm7_lut::decoder::Decoder;
use arm7_lut::fields::{Condition, ShiftType};
use arm7_lut::isa::thumb::{
    HighRegisterOp, ImmediateOffsetOp, ImmediateOp, RegisterOffsetOp, SignExtendedOp, ThumbAluOp,
    ThumbDecoder, ThumbFormat,
};
use arm7_lut::{decode_thumb, DecodeTables, ThumbInstr};
use pretty_assertions::assert_eq;

#[test]
fn add_subtract_shadows_move_shifted_register() {
    // 0x1800 >> 6 == 0x60; the `< 0x1800` comparison leaves it to add/subtract
    assert_eq!(
        decode_thumb(0x1800),
        ThumbInstr::AddSubtract { immediate: false, subtract: false, field3: 0 }
    );
    assert_eq!(
        decode_thumb(0x17C0),
        ThumbInstr::MoveShiftedRegister { op: ShiftType::Asr, offset5: 31 }
    );
    let t = DecodeTables::build();
    assert_eq!(t.lookup_thumb(0x60).format(), ThumbFormat::AddSubtract);
}

#[test]
fn software_interrupt_sits_in_the_conditional_branch_space() {
    assert_eq!(decode_thumb(0xDF00), ThumbInstr::SoftwareInterrupt);
    assert_eq!(decode_thumb(0xDF05), ThumbInstr::SoftwareInterrupt);
    assert_eq!(
        decode_thumb(0xDE00),
        ThumbInstr::ConditionalBranch { condition: Condition::Al }
    );
    let t = DecodeTables::build();
    for index in 0x37C..=0x37F {
        assert_eq!(t.lookup_thumb(index), ThumbInstr::SoftwareInterrupt, "index {index:#x}");
    }
}

#[test]
fn unclaimed_misc_slots_fall_through_to_conditional_branch() {
    assert_eq!(
        decode_thumb(0xB100),
        ThumbInstr::ConditionalBranch { condition: Condition::Ne }
    );
    assert_eq!(
        decode_thumb(0xBF00),
        ThumbInstr::ConditionalBranch { condition: Condition::Nv }
    );
    // 0xB0 and the push/pop slots are still taken by their own formats
    assert_eq!(decode_thumb(0xB080), ThumbInstr::AddOffsetToSp { subtract: true });
    assert_eq!(decode_thumb(0xB500), ThumbInstr::PushPop { load: false, pc_lr: true });
}

#[test]
fn common_encodings() {
    let cases: &[(u16, ThumbInstr)] = &[
        (0x0048, ThumbInstr::MoveShiftedRegister { op: ShiftType::Lsl, offset5: 1 }),
        (0x1888, ThumbInstr::AddSubtract { immediate: false, subtract: false, field3: 2 }),
        (0x1E48, ThumbInstr::AddSubtract { immediate: true, subtract: true, field3: 1 }),
        (0x2001, ThumbInstr::ImmediateOp { op: ImmediateOp::Mov, rd: 0 }),
        (0x3F10, ThumbInstr::ImmediateOp { op: ImmediateOp::Sub, rd: 7 }),
        (0x4008, ThumbInstr::Alu { op: ThumbAluOp::And }),
        (0x4348, ThumbInstr::Alu { op: ThumbAluOp::Mul }),
        (0x4770, ThumbInstr::HighRegisterOp { op: HighRegisterOp::Bx, high1: false, high2: true }),
        (0x46C0, ThumbInstr::HighRegisterOp { op: HighRegisterOp::Mov, high1: true, high2: true }),
        (0x4801, ThumbInstr::PcRelativeLoad { rd: 0 }),
        (0x5888, ThumbInstr::LoadStoreRegisterOffset { op: RegisterOffsetOp::Ldr, ro: 2 }),
        (0x5E88, ThumbInstr::LoadStoreSignExtended { op: SignExtendedOp::Ldsh, ro: 2 }),
        (0x6848, ThumbInstr::LoadStoreImmediateOffset { op: ImmediateOffsetOp::Ldr, offset5: 1 }),
        (0x7008, ThumbInstr::LoadStoreImmediateOffset { op: ImmediateOffsetOp::Strb, offset5: 0 }),
        (0x8848, ThumbInstr::LoadStoreHalfword { load: true, offset5: 1 }),
        (0x9001, ThumbInstr::SpRelativeLoadStore { load: false, rd: 0 }),
        (0xA801, ThumbInstr::LoadAddress { use_sp: true, rd: 0 }),
        (0xB082, ThumbInstr::AddOffsetToSp { subtract: true }),
        (0xBD00, ThumbInstr::PushPop { load: true, pc_lr: true }),
        (0xC103, ThumbInstr::LoadStoreMultiple { load: false, rb: 1 }),
        (0xD0FE, ThumbInstr::ConditionalBranch { condition: Condition::Eq }),
        (0xE7FE, ThumbInstr::UnconditionalBranch),
        (0xE800, ThumbInstr::Undefined),
        (0xF000, ThumbInstr::LongBranchLink { low_half: false }),
        (0xF800, ThumbInstr::LongBranchLink { low_half: true }),
    ];
    let t = DecodeTables::build();
    for &(word, want) in cases {
        assert_eq!(decode_thumb(word), want, "{word:#06x}");
        assert_eq!(t.decode_thumb(word), want, "{word:#06x} via table");
    }
}

#[test]
fn table_matches_direct_classification() {
    let t = DecodeTables::build();
    for index in 0..ThumbDecoder::TABLE_LEN {
        let word = ThumbDecoder::reconstruct(index);
        assert_eq!(t.lookup_thumb(index), decode_thumb(word), "index {index:#x}");
        // register fields below bit 6 never change the result
        assert_eq!(decode_thumb(word | 0x3F), decode_thumb(word), "index {index:#x}");
    }
}

#[test]
fn format_histogram() {
    use ThumbFormat as F;
    let want: BTreeMap<ThumbFormat, usize> = [
        (F::MoveShiftedRegister, 96),
        (F::AddSubtract, 32),
        (F::ImmediateOp, 128),
        (F::Alu, 16),
        (F::HighRegisterOp, 16),
        (F::PcRelativeLoad, 32),
        (F::LoadStoreRegisterOffset, 32),
        (F::LoadStoreSignExtended, 32),
        (F::LoadStoreImmediateOffset, 128),
        (F::LoadStoreHalfword, 64),
        (F::SpRelativeLoadStore, 64),
        (F::LoadAddress, 64),
        (F::AddOffsetToSp, 4),
        (F::PushPop, 16),
        (F::LoadStoreMultiple, 64),
        (F::ConditionalBranch, 104),
        (F::SoftwareInterrupt, 4),
        (F::UnconditionalBranch, 32),
        (F::LongBranchLink, 64),
        (F::Undefined, 32),
    ]
    .into_iter()
    .collect();

    let got = DecodeTables::build().thumb_histogram();
    assert_eq!(got, want);
    assert_eq!(got.values().sum::<usize>(), 1024);
}
