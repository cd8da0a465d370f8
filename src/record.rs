//! Records flowing into and out of a replay.

use std::fmt;

/// Number of bits removed from a byte address to form a block address
/// (64-byte cache lines).
pub const BLOCK_SHIFT: u32 = 6;

/// A cache-line granularity address.
pub type BlockAddr = u64;

/// Convert a byte address into a block address.
pub fn block_of(addr: u64) -> BlockAddr { addr >> BLOCK_SHIFT }

/// Convert a block address back into a (line-aligned) byte address.
pub fn byte_of(block: BlockAddr) -> u64 { block << BLOCK_SHIFT }

/// A single load from a memory-access trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraceRecord {
    /// Unique instruction id (non-decreasing across a trace)
    pub instr_id: u64,

    /// Program counter of the load
    pub pc: u64,

    /// Byte address of the load
    pub address: u64,

    /// Whether the load hit in the last-level cache
    pub is_hit: bool,
}
impl TraceRecord {
    pub fn new(instr_id: u64, pc: u64, address: u64, is_hit: bool) -> Self {
        Self { instr_id, pc, address, is_hit }
    }

    /// Return the block address of this load.
    pub fn block(&self) -> BlockAddr { block_of(self.address) }
}

/// A predicted block address, attributed to some instruction.
///
/// Most predictors attribute a prefetch to the record that triggered it,
/// but the oracle attributes its label to an *earlier* instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prefetch {
    pub instr_id: u64,
    pub block: BlockAddr,
}
impl Prefetch {
    pub fn new(instr_id: u64, block: BlockAddr) -> Self {
        Self { instr_id, block }
    }
}

/// An entry in the output prediction trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictionRecord {
    pub instr_id: u64,

    /// Predicted byte address
    pub addr: u64,
}
impl PredictionRecord {
    pub fn new(instr_id: u64, addr: u64) -> Self {
        Self { instr_id, addr }
    }
}
impl From<Prefetch> for PredictionRecord {
    fn from(p: Prefetch) -> Self {
        Self::new(p.instr_id, byte_of(p.block))
    }
}

// Rendered the way downstream comparison tools expect: "<id> <hex addr>"
impl fmt::Display for PredictionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:#x}", self.instr_id, self.addr)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_round_trip_aligns() {
        assert_eq!(block_of(0x1000), 0x40);
        assert_eq!(block_of(0x103f), 0x40);
        assert_eq!(byte_of(block_of(0x107f)), 0x1040);
    }

    #[test]
    fn prediction_display() {
        let r: PredictionRecord = Prefetch::new(3, block_of(0x2000)).into();
        assert_eq!(r.to_string(), "3 0x2000");
        assert_eq!(PredictionRecord::new(0, 0).to_string(), "0 0x0");
    }
}
