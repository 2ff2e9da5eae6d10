use anyhow::Result;

/// Memory bus handed to every handler. Implementations live with the
/// system being emulated; errors surface as [`crate::exec::Trap::Bus`].
pub trait Bus {
    fn read_u8(&mut self, addr: u32) -> Result<u8>;
    fn read_u16(&mut self, addr: u32) -> Result<u16>;
    fn read_u32(&mut self, addr: u32) -> Result<u32>;
    fn write_u8(&mut self, addr: u32, val: u8) -> Result<()>;
    fn write_u16(&mut self, addr: u32, val: u16) -> Result<()>;
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<()>;
}
