pub mod decoder;
pub mod disasm;
pub mod dispatch;
pub mod exec;
pub mod fields;
pub mod formats;
pub mod lut;
pub mod memory;

pub mod isa {
    pub mod arm; // ARMv4T, 32-bit
    pub mod thumb; // ARMv4T, 16-bit
}

pub use dispatch::Dispatcher;
pub use exec::{ArmExecutor, ThumbExecutor, Trap};
pub use isa::arm::{decode_arm, ArmInstr};
pub use isa::thumb::{decode_thumb, ThumbInstr};
pub use lut::{DecodeTables, LutConfig};
pub use memory::Bus;
