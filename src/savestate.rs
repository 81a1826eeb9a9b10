//! CPU save states: a serializable snapshot of the full execution
//! state, encoded with bincode.

use serde::{Deserialize, Serialize};

use crate::cpu::Cpu;
use crate::memory::MEMORY_SIZE;

const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume execution bit-exactly: registers,
/// status byte, and the full 64 KiB address space.
#[derive(Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub version: u32,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub ram: Vec<u8>,
}

#[derive(Debug)]
pub enum SnapshotError {
    /// Snapshot produced by an incompatible crate version.
    VersionMismatch { found: u32 },
    /// RAM image is not exactly 64 KiB.
    BadRamSize { found: usize },
    /// bincode encode/decode failure.
    Codec(bincode::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::VersionMismatch { found } => {
                write!(f, "snapshot version {found} not supported")
            }
            SnapshotError::BadRamSize { found } => {
                write!(
                    f,
                    "snapshot RAM image is {found} bytes, expected {MEMORY_SIZE}"
                )
            }
            SnapshotError::Codec(err) => write!(f, "snapshot codec error: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<bincode::Error> for SnapshotError {
    fn from(err: bincode::Error) -> Self {
        SnapshotError::Codec(err)
    }
}

impl CpuSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: CpuSnapshot = bincode::deserialize(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }
}

impl Cpu {
    /// Capture the current execution state.
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            version: SNAPSHOT_VERSION,
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            status: self.status.bits(),
            ram: self.memory.as_slice().to_vec(),
        }
    }

    /// Restore a previously captured state.
    pub fn restore(&mut self, snapshot: &CpuSnapshot) -> Result<(), SnapshotError> {
        if snapshot.ram.len() != MEMORY_SIZE {
            return Err(SnapshotError::BadRamSize {
                found: snapshot.ram.len(),
            });
        }
        self.a = snapshot.a;
        self.x = snapshot.x;
        self.y = snapshot.y;
        self.sp = snapshot.sp;
        self.pc = snapshot.pc;
        self.status = crate::cpu::StatusFlags::from_bits_truncate(snapshot.status);
        self.memory.copy_from_slice(&snapshot.ram);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::StatusFlags;

    #[test]
    fn snapshot_round_trip_through_bincode() {
        let mut cpu = Cpu::new();
        cpu.load(&[0xA9, 0x42, 0xAA, 0x00]);
        cpu.reset();
        cpu.step().unwrap();

        let bytes = cpu.snapshot().to_bytes().unwrap();
        let snapshot = CpuSnapshot::from_bytes(&bytes).unwrap();

        let mut restored = Cpu::new();
        restored.restore(&snapshot).unwrap();

        assert_eq!(restored.a, 0x42);
        assert_eq!(restored.pc, cpu.pc);
        assert_eq!(restored.status, cpu.status);
        assert_eq!(restored.memory.read(0x8000), 0xA9);

        // The restored CPU continues identically.
        restored.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(restored.x, cpu.x);
        assert_eq!(restored.pc, cpu.pc);
    }

    #[test]
    fn restore_rejects_short_ram_image() {
        let mut cpu = Cpu::new();
        let mut snapshot = cpu.snapshot();
        snapshot.ram.truncate(16);
        assert!(matches!(
            cpu.restore(&snapshot),
            Err(SnapshotError::BadRamSize { found: 16 })
        ));
    }

    #[test]
    fn from_bytes_rejects_unknown_version() {
        let cpu = Cpu::new();
        let mut snapshot = cpu.snapshot();
        snapshot.version = 99;
        let bytes = snapshot.to_bytes().unwrap();
        assert!(matches!(
            CpuSnapshot::from_bytes(&bytes),
            Err(SnapshotError::VersionMismatch { found: 99 })
        ));
    }

    #[test]
    fn snapshot_preserves_status_bits() {
        let mut cpu = Cpu::new();
        cpu.status = StatusFlags::from_bits_truncate(0b1110_0101);
        let snapshot = cpu.snapshot();
        assert_eq!(snapshot.status, 0b1110_0101);
    }
}
