//! Decode tables: one handler identity per partial opcode, for both
//! instruction sets, built once during setup and read-only afterwards.

use std::collections::{BTreeMap, HashSet};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::decoder::Decoder;
use crate::isa::arm::{ArmDecoder, ArmFormat, ArmInstr};
use crate::isa::thumb::{ThumbDecoder, ThumbFormat, ThumbInstr};

pub const THUMB_TABLE_LEN: usize = ThumbDecoder::TABLE_LEN;
pub const ARM_TABLE_LEN: usize = ArmDecoder::TABLE_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LutConfig {
    /// Size of the rayon pool the index space is decoded on. 0 and 1 both
    /// mean "build on the calling thread".
    pub workers: usize,
}

impl Default for LutConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("THUMB table has {len} entries, expected {}", THUMB_TABLE_LEN)]
    ThumbLength { len: usize },
    #[error("ARM table has {len} entries, expected {}", ARM_TABLE_LEN)]
    ArmLength { len: usize },
    #[error("{table} table entry {index:#x} does not match the classifier")]
    Mismatch { table: &'static str, index: usize },
}

/// Classifies every partial opcode of `D`, in index order.
pub fn build_table<D: Decoder + Sync>(dec: &D, workers: usize) -> Box<[D::Instr]> {
    let workers = workers.clamp(1, D::TABLE_LEN);
    let sequential = || (0..D::TABLE_LEN).map(|index| dec.decode(D::reconstruct(index))).collect();

    if workers == 1 {
        return sequential();
    }

    match ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => {
            trace!(workers, len = D::TABLE_LEN, "decoding on thread pool");
            pool.install(|| {
                (0..D::TABLE_LEN)
                    .into_par_iter()
                    .map(|index| dec.decode(D::reconstruct(index)))
                    .collect::<Vec<_>>()
                    .into_boxed_slice()
            })
        }
        Err(err) => {
            warn!(%err, "thread pool unavailable, decoding on the calling thread");
            sequential()
        }
    }
}

/// First index whose entry differs from a fresh classification.
fn first_mismatch<D: Decoder>(dec: &D, table: &[D::Instr]) -> Option<usize> {
    table.iter().enumerate().position(|(index, entry)| *entry != dec.decode(D::reconstruct(index)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTables")]
pub struct DecodeTables {
    thumb: Box<[ThumbInstr]>,
    arm: Box<[ArmInstr]>,
}

#[derive(Deserialize)]
struct RawTables {
    thumb: Vec<ThumbInstr>,
    arm: Vec<ArmInstr>,
}

impl TryFrom<RawTables> for DecodeTables {
    type Error = TableError;

    fn try_from(raw: RawTables) -> Result<Self, TableError> {
        if raw.thumb.len() != THUMB_TABLE_LEN {
            return Err(TableError::ThumbLength { len: raw.thumb.len() });
        }
        if raw.arm.len() != ARM_TABLE_LEN {
            return Err(TableError::ArmLength { len: raw.arm.len() });
        }
        if let Some(index) = first_mismatch(&ThumbDecoder::new(), &raw.thumb) {
            return Err(TableError::Mismatch { table: "THUMB", index });
        }
        if let Some(index) = first_mismatch(&ArmDecoder::new(), &raw.arm) {
            return Err(TableError::Mismatch { table: "ARM", index });
        }
        Ok(Self { thumb: raw.thumb.into_boxed_slice(), arm: raw.arm.into_boxed_slice() })
    }
}

impl DecodeTables {
    pub fn build() -> Self {
        Self::build_with(&LutConfig::default())
    }

    pub fn build_with(cfg: &LutConfig) -> Self {
        debug!(workers = cfg.workers, "building decode tables");
        let tables = Self {
            thumb: build_table(&ThumbDecoder::new(), cfg.workers),
            arm: build_table(&ArmDecoder::new(), cfg.workers),
        };
        debug!(
            thumb_identities = tables.distinct_thumb(),
            arm_identities = tables.distinct_arm(),
            "decode tables built"
        );
        tables
    }

    /// `index` is bits 15..6 of the instruction; higher bits are ignored.
    #[inline]
    pub fn lookup_thumb(&self, index: usize) -> ThumbInstr {
        self.thumb[index & (THUMB_TABLE_LEN - 1)]
    }

    /// `index` is bits 27..20 followed by bits 7..4; higher bits are ignored.
    #[inline]
    pub fn lookup_arm(&self, index: usize) -> ArmInstr {
        self.arm[index & (ARM_TABLE_LEN - 1)]
    }

    #[inline]
    pub fn decode_thumb(&self, instruction: u16) -> ThumbInstr {
        self.lookup_thumb(ThumbDecoder::index_of(instruction))
    }

    #[inline]
    pub fn decode_arm(&self, instruction: u32) -> ArmInstr {
        self.lookup_arm(ArmDecoder::index_of(instruction))
    }

    pub fn thumb_table(&self) -> &[ThumbInstr] {
        &self.thumb
    }

    pub fn arm_table(&self) -> &[ArmInstr] {
        &self.arm
    }

    pub fn thumb_histogram(&self) -> BTreeMap<ThumbFormat, usize> {
        let mut out = BTreeMap::new();
        for instr in self.thumb.iter() {
            *out.entry(instr.format()).or_insert(0) += 1;
        }
        out
    }

    pub fn arm_histogram(&self) -> BTreeMap<ArmFormat, usize> {
        let mut out = BTreeMap::new();
        for instr in self.arm.iter() {
            *out.entry(instr.format()).or_insert(0) += 1;
        }
        out
    }

    pub fn distinct_thumb(&self) -> usize {
        self.thumb.iter().collect::<HashSet<_>>().len()
    }

    pub fn distinct_arm(&self) -> usize {
        self.arm.iter().collect::<HashSet<_>>().len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Loads tables persisted with [`DecodeTables::to_json`]. Both length
    /// and every entry are checked against the classifiers.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_masks_out_of_range_indices() {
        let t = DecodeTables::build();
        assert_eq!(t.lookup_thumb(THUMB_TABLE_LEN + 5), t.lookup_thumb(5));
        assert_eq!(t.lookup_arm(ARM_TABLE_LEN * 3 + 0x121), t.lookup_arm(0x121));
    }

    #[test]
    fn pooled_build_matches_sequential() {
        let seq = build_table(&ThumbDecoder::new(), 1);
        let par = build_table(&ThumbDecoder::new(), 7);
        assert_eq!(par.len(), THUMB_TABLE_LEN);
        assert_eq!(seq, par);
    }

    #[test]
    fn absurd_worker_counts_are_clamped() {
        let t = build_table(&ThumbDecoder::new(), 1 << 20);
        assert_eq!(t.len(), THUMB_TABLE_LEN);
        let t = build_table(&ArmDecoder::new(), 0);
        assert_eq!(t.len(), ARM_TABLE_LEN);
    }

    #[test]
    fn stale_entries_are_found() {
        let dec = ArmDecoder::new();
        let mut table = build_table(&dec, 1);
        assert_eq!(first_mismatch(&dec, &table), None);
        table[0x121] = ArmInstr::Undefined;
        assert_eq!(first_mismatch(&dec, &table), Some(0x121));
    }
}
