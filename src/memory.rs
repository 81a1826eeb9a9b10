//! Flat 64 KiB memory bus.
//!
//! The 2A03 sees a single byte-addressable space; every `u16` is a
//! valid address, so reads and writes cannot fail. Multi-byte values
//! are little-endian: low byte first.

pub const MEMORY_SIZE: usize = 0x10000;

pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: Box::new([0; MEMORY_SIZE]),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        self.bytes[addr as usize] = data;
    }

    /// Little-endian 16-bit read: low byte at `addr`, high at `addr + 1`.
    pub fn read_u16(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write_u16(&mut self, addr: u16, data: u16) {
        self.write(addr, (data & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (data >> 8) as u8);
    }

    /// Copy a program image into the address space starting at `origin`.
    pub fn load_at(&mut self, origin: u16, program: &[u8]) {
        for (i, &byte) in program.iter().enumerate() {
            self.write(origin.wrapping_add(i as u16), byte);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }

    pub fn copy_from_slice(&mut self, data: &[u8]) {
        self.bytes.copy_from_slice(data);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_round_trip() {
        let mut mem = Memory::new();
        mem.write(0x0000, 0x12);
        mem.write(0xFFFF, 0x34);
        assert_eq!(mem.read(0x0000), 0x12);
        assert_eq!(mem.read(0xFFFF), 0x34);
    }

    #[test]
    fn u16_little_endian_layout() {
        let mut mem = Memory::new();
        mem.write_u16(0x30FF, 0xABCD);
        assert_eq!(mem.read(0x30FF), 0xCD);
        assert_eq!(mem.read(0x3100), 0xAB);
        assert_eq!(mem.read_u16(0x30FF), 0xABCD);
    }

    #[test]
    fn u16_round_trip_at_every_page_edge() {
        let mut mem = Memory::new();
        for page in 0..0xFF_u16 {
            let addr = (page << 8) | 0xFE;
            mem.write_u16(addr, 0x55AA ^ page);
            assert_eq!(mem.read_u16(addr), 0x55AA ^ page);
        }
    }

    #[test]
    fn load_at_copies_image() {
        let mut mem = Memory::new();
        mem.load_at(0x8000, &[0xA9, 0x01, 0x00]);
        assert_eq!(mem.read(0x8000), 0xA9);
        assert_eq!(mem.read(0x8001), 0x01);
        assert_eq!(mem.read(0x8002), 0x00);
    }
}
