//! Reading load traces and writing prediction traces.
//!
//! Load traces are text, one load per line:
//!
//! ```text
//! <instr id>, <cycle>, <load address>, <pc>, <llc hit>[, ...]
//! ```
//!
//! Addresses are hexadecimal. Reduced traces with three fields
//! (`<instr id>, <load address>, <pc>`) are also accepted.

pub mod synth;

use std::io::{BufRead, Write};
use crate::error::*;
use crate::record::*;

/// Returns true for lines which don't describe a load (simulator banners,
/// warmup and heartbeat messages, and blank lines).
pub fn is_noise(line: &str) -> bool {
    line.starts_with("***")
        || line.starts_with("Read")
        || line.contains("Warmup")
        || line.contains("Heartbeat")
        || line.trim().is_empty()
}

fn parse_dec(s: &str, line: usize, what: &str) -> Result<u64> {
    s.parse::<u64>().map_err(|e| Error::Parse {
        line,
        reason: format!("bad {} '{}': {}", what, s, e),
    })
}

fn parse_hex(s: &str, line: usize, what: &str) -> Result<u64> {
    let digits = s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| Error::Parse {
        line,
        reason: format!("bad {} '{}': {}", what, s, e),
    })
}

/// Decode a single line of a load trace.
///
/// Returns `Ok(None)` for lines that should be ignored.
pub fn parse_line(text: &str, line: usize) -> Result<Option<TraceRecord>> {
    if is_noise(text) {
        return Ok(None);
    }
    let fields: Vec<&str> = text.trim().split(',').map(str::trim).collect();
    let record = match fields.len() {
        3 => TraceRecord {
            instr_id: parse_dec(fields[0], line, "instruction id")?,
            address: parse_hex(fields[1], line, "load address")?,
            pc: parse_hex(fields[2], line, "pc")?,
            is_hit: false,
        },
        n if n >= 5 => TraceRecord {
            instr_id: parse_dec(fields[0], line, "instruction id")?,
            address: parse_hex(fields[2], line, "load address")?,
            pc: parse_hex(fields[3], line, "pc")?,
            is_hit: fields[4] == "1",
        },
        n => return Err(Error::Parse {
            line,
            reason: format!("expected 3 or at least 5 fields, found {}", n),
        }),
    };
    Ok(Some(record))
}

/// Iterator over the records in a text load trace.
pub struct LoadTraceReader<R: BufRead> {
    lines: std::io::Lines<R>,

    /// 1-based number of the last line read
    line: usize,
}
impl<R: BufRead> LoadTraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }

    /// Returns the number of lines consumed so far.
    pub fn lines_read(&self) -> usize { self.line }
}
impl<R: BufRead> Iterator for LoadTraceReader<R> {
    type Item = Result<TraceRecord>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_line(&text, self.line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Write predictions as `<instr id> <hex address>` lines.
///
/// Returns the number of lines written.
pub fn write_predictions<W, I>(mut w: W, predictions: I) -> Result<usize>
    where W: Write, I: IntoIterator<Item = PredictionRecord>
{
    let mut n = 0;
    for p in predictions {
        writeln!(w, "{}", p)?;
        n += 1;
    }
    w.flush()?;
    Ok(n)
}

#[cfg(test)]
mod test {
    use super::*;

    const TRACE: &str = "\
*** ChampSim Multicore Out-of-Order Simulator ***
Read trace file
Warmup complete CPU 0 instructions: 1000
1, 100, 7f001040, 400a10, 0
2, 104, 7f002000, 400a10, 1

Heartbeat CPU 0 instructions: 100000
3, 110, 0x7f001000, 0x400b00, 0, 400c00, 1
";

    #[test]
    fn reads_and_filters() {
        let reader = LoadTraceReader::new(TRACE.as_bytes());
        let records: Vec<TraceRecord> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(records, vec![
            TraceRecord::new(1, 0x400a10, 0x7f001040, false),
            TraceRecord::new(2, 0x400a10, 0x7f002000, true),
            TraceRecord::new(3, 0x400b00, 0x7f001000, false),
        ]);
    }

    #[test]
    fn reduced_format() {
        let r = parse_line("42, 1000, 400", 1).unwrap().unwrap();
        assert_eq!(r, TraceRecord::new(42, 0x400, 0x1000, false));
    }

    #[test]
    fn reports_line_numbers() {
        let text = "1, 100, 1000, 400, 0\n2, 100, zz, 400, 0\n";
        let mut reader = LoadTraceReader::new(text.as_bytes());
        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(reader.lines_read(), 2);
    }

    #[test]
    fn wrong_field_count() {
        assert!(matches!(parse_line("1, 2", 7), Err(Error::Parse { line: 7, .. })));
        assert!(matches!(parse_line("1, 2, 3, 4", 1), Err(Error::Parse { .. })));
    }

    #[test]
    fn writes_predictions() {
        let mut out = Vec::new();
        let n = write_predictions(&mut out, vec![
            PredictionRecord::new(3, 0x2000),
            PredictionRecord::new(9, 0x7f00_1040),
        ]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "3 0x2000\n9 0x7f001040\n");
    }
}
