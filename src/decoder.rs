use std::fmt::Debug;
use std::hash::Hash;

/// One instruction set's classifier plus the mapping between instruction
/// words and table indices.
///
/// `decode` must be total: every word resolves to an identity, unmatched
/// encodings to the set's undefined-instruction identity.
pub trait Decoder {
    /// Raw instruction word (`u16` for THUMB, `u32` for ARM).
    type Word: Copy + Debug;
    /// Handler identity: format family plus its static fields.
    type Instr: Copy + Eq + Hash + Debug + Send + Sync;

    /// Number of partial opcodes, i.e. table entries.
    const TABLE_LEN: usize;

    /// Places the bits of a partial opcode back at their instruction positions.
    /// Everything else (condition, register numbers) is zero.
    fn reconstruct(index: usize) -> Self::Word;

    /// Extracts the partial opcode of a full instruction word.
    fn index_of(word: Self::Word) -> usize;

    fn decode(&self, word: Self::Word) -> Self::Instr;
}
