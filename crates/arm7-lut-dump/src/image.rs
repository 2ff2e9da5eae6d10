use anyhow::Result;
use std::path::Path;

/// Raw binary mapped at a fixed base address.
#[derive(Debug, Clone)]
pub struct Image {
    pub base: u32,
    pub bytes: Vec<u8>,
}

impl Image {
    pub fn end(&self) -> u32 {
        self.base.wrapping_add(self.bytes.len() as u32)
    }
}

pub fn load_raw_bin(path: &Path, base: u32, skip: usize, len: Option<usize>) -> Result<Image> {
    let file = std::fs::read(path)?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    Ok(Image { base, bytes: payload.to_vec() })
}

fn slice(img: &Image, addr: u32, width: usize) -> Option<&[u8]> {
    let off = addr.checked_sub(img.base)? as usize;
    img.bytes.get(off..off.checked_add(width)?)
}

pub fn read_u16(img: &Image, addr: u32) -> Option<u16> {
    let b = slice(img, addr, 2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

pub fn read_u32(img: &Image, addr: u32) -> Option<u32> {
    let b = slice(img, addr, 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_maps_skip_and_len() {
        let path = std::env::temp_dir().join("_arm7_lut_dump_test.bin");
        std::fs::write(&path, [0u8, 1, 2, 3, 4, 5]).unwrap();
        let img = load_raw_bin(&path, 0x0800_0000, 2, Some(3)).unwrap();
        assert_eq!(img.base, 0x0800_0000);
        assert_eq!(img.bytes, vec![2, 3, 4]);
        assert_eq!(img.end(), 0x0800_0003);
        assert_eq!(read_u16(&img, 0x0800_0000), Some(0x0302));
        assert_eq!(read_u16(&img, 0x0800_0002), None);
        assert_eq!(read_u32(&img, 0x0800_0000), None);
        assert_eq!(read_u16(&img, 0x07FF_FFFF), None);
        let _ = std::fs::remove_file(&path);
    }
}
