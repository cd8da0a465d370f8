//! Generate synthetic load traces.
//!
//! A [SynthTrace] is a set of load instructions, each with its own access
//! pattern. Generating a trace interleaves the loads at random, which is
//! enough to exercise predictors without a real workload.

use std::io::Write;
use rand::prelude::*;
use rand::rngs::StdRng;
use crate::error::*;
use crate::record::*;

/// The sequence of blocks touched by a single load instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessPattern {
    /// Blocks `base, base + stride, ...`, restarting after `len` accesses.
    Stride { base: BlockAddr, stride: i64, len: usize },

    /// A fixed (irregular) sequence of blocks, replayed in order.
    Chase(Vec<BlockAddr>),

    /// Uniformly random blocks in `[base, base + span)`.
    Random { base: BlockAddr, span: u64 },
}

#[derive(Debug)]
struct SynthLoad {
    pc: u64,
    pattern: AccessPattern,

    /// Number of times this load has executed
    ctr: usize,
}

#[derive(Debug)]
pub struct SynthTrace {
    loads: Vec<SynthLoad>,
    rng: StdRng,

    /// Program counter assigned to the next load
    next_pc: u64,

    /// Instruction id of the next record
    next_id: u64,
}
impl SynthTrace {
    /// Create an empty trace with a particular seed.
    pub fn new(seed: u64) -> Self {
        Self {
            loads: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            next_pc: 0x40_0000,
            next_id: 1,
        }
    }

    /// Add a load with some access pattern, returning its PC.
    pub fn add(&mut self, pattern: AccessPattern) -> u64 {
        let pc = self.next_pc;
        self.next_pc += 4;
        self.loads.push(SynthLoad { pc, pattern, ctr: 0 });
        pc
    }

    /// Add a strided load.
    pub fn add_stride(&mut self, base: BlockAddr, stride: i64, len: usize) -> u64 {
        assert!(len > 0);
        self.add(AccessPattern::Stride { base, stride, len })
    }

    /// Add a load which repeatedly walks a random chain of `len` blocks
    /// drawn from `[base, base + span)`.
    pub fn add_chase(&mut self, base: BlockAddr, span: u64, len: usize) -> u64 {
        assert!(len > 0 && span > 0);
        let chain = (0..len).map(|_| base + self.rng.gen_range(0..span))
            .collect();
        self.add(AccessPattern::Chase(chain))
    }

    /// Add a load with no useful pattern.
    pub fn add_random(&mut self, base: BlockAddr, span: u64) -> u64 {
        assert!(span > 0);
        self.add(AccessPattern::Random { base, span })
    }

    /// Returns the number of loads.
    pub fn num_loads(&self) -> usize { self.loads.len() }

    fn next_block(&mut self, idx: usize) -> BlockAddr {
        let load = &mut self.loads[idx];
        let ctr = load.ctr;
        load.ctr += 1;
        match &load.pattern {
            AccessPattern::Stride { base, stride, len } => {
                let step = (ctr % len) as i64;
                base.wrapping_add_signed(stride.wrapping_mul(step))
            },
            AccessPattern::Chase(chain) => chain[ctr % chain.len()],
            AccessPattern::Random { base, span } => {
                let (base, span) = (*base, *span);
                base + self.rng.gen_range(0..span)
            },
        }
    }

    /// Generate the next `n` records.
    pub fn generate(&mut self, n: usize) -> Vec<TraceRecord> {
        assert!(!self.loads.is_empty(), "no loads in synthetic trace");
        let mut res = Vec::with_capacity(n);
        for _ in 0..n {
            let idx = self.rng.gen_range(0..self.loads.len());
            let block = self.next_block(idx);
            let offset = self.rng.gen_range(0..64);
            let record = TraceRecord {
                instr_id: self.next_id,
                pc: self.loads[idx].pc,
                address: byte_of(block) | offset,
                is_hit: self.rng.gen_bool(0.5),
            };
            self.next_id += self.rng.gen_range(1..=8);
            res.push(record);
        }
        res
    }
}

/// Write records in the five-field load trace format.
pub fn write_load_trace<W: Write>(mut w: W, records: &[TraceRecord]) -> Result<()> {
    for r in records {
        writeln!(w, "{}, {}, {:x}, {:x}, {}",
            r.instr_id, r.instr_id, r.address, r.pc, r.is_hit as u8)?;
    }
    w.flush()?;
    Ok(())
}
