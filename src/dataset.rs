//! Synthetic dataset generation.
//!
//! Each row is written as a tuple literal followed by a comma, e.g.
//! `(3, 3, 7, '2024-01-01 00:00:02'),`. Row `n` is stamped `n - 1` seconds
//! after [`BASE_TIMESTAMP`], so the file is ordered by time on creation.

use anyhow::{Context, Result, ensure};
use jiff::SignedDuration;
use jiff::civil::{self, DateTime};
use rand::Rng;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Timestamp of the first row.
pub const BASE_TIMESTAMP: DateTime = civil::datetime(2024, 1, 1, 0, 0, 0, 0);

pub const DEFAULT_ROWS: u64 = 1_000_000;
pub const DEFAULT_PATH: &str = "dataset.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One generated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRecord {
    pub sequence_id: u64,
    pub duplicate_id: u64,
    pub random_digit: u8,
    pub timestamp: DateTime,
}

impl RowRecord {
    /// Build the row at 1-based position `sequence_id`, drawing its digit from `rng`.
    pub fn new<R: Rng + ?Sized>(sequence_id: u64, rng: &mut R) -> Result<Self> {
        ensure!(sequence_id >= 1, "sequence ids start at 1");
        let offset = i64::try_from(sequence_id - 1)
            .with_context(|| format!("sequence id out of range: {sequence_id}"))?;
        let timestamp = BASE_TIMESTAMP
            .checked_add(SignedDuration::from_secs(offset))
            .with_context(|| format!("timestamp overflow at sequence id {sequence_id}"))?;
        Ok(Self {
            sequence_id,
            duplicate_id: sequence_id,
            random_digit: rng.random_range(0..=9),
            timestamp,
        })
    }

    /// Write the row as a single newline-terminated line.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let mut buf = itoa::Buffer::new();
        out.write_all(b"(")?;
        out.write_all(buf.format(self.sequence_id).as_bytes())?;
        out.write_all(b", ")?;
        out.write_all(buf.format(self.duplicate_id).as_bytes())?;
        out.write_all(b", ")?;
        out.write_all(buf.format(self.random_digit).as_bytes())?;
        writeln!(out, ", '{}'),", self.timestamp.strftime(TIMESTAMP_FORMAT))
    }
}

impl FromStr for RowRecord {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let body = line
            .trim_end_matches(['\r', '\n'])
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix("),"))
            .with_context(|| format!("not a row tuple: {line:?}"))?;

        let mut fields = body.splitn(4, ", ");
        let mut field = |name: &str| {
            fields
                .next()
                .with_context(|| format!("missing {name} in row: {line:?}"))
        };
        let sequence_id: u64 = field("sequence_id")?
            .parse()
            .with_context(|| format!("bad sequence_id in row: {line:?}"))?;
        let duplicate_id: u64 = field("duplicate_id")?
            .parse()
            .with_context(|| format!("bad duplicate_id in row: {line:?}"))?;
        let random_digit: u8 = field("random_digit")?
            .parse()
            .with_context(|| format!("bad random_digit in row: {line:?}"))?;
        ensure!(random_digit <= 9, "random_digit out of range in row: {line:?}");

        let quoted = field("timestamp")?;
        let timestamp = quoted
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .with_context(|| format!("unquoted timestamp in row: {line:?}"))?;
        let timestamp = DateTime::strptime(TIMESTAMP_FORMAT, timestamp)
            .with_context(|| format!("bad timestamp in row: {line:?}"))?;

        Ok(Self {
            sequence_id,
            duplicate_id,
            random_digit,
            timestamp,
        })
    }
}

/// Write `rows` rows with sequence ids `1..=rows` to `out`.
pub fn generate<W, R>(out: &mut W, rows: u64, rng: &mut R) -> Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    for sequence_id in 1..=rows {
        RowRecord::new(sequence_id, rng)?.write_to(out)?;
    }
    Ok(())
}

/// Create (or truncate) `path` and fill it with `rows` generated rows.
pub fn generate_file<R: Rng + ?Sized>(path: &Path, rows: u64, rng: &mut R) -> Result<()> {
    tracing::debug!(rows, path = %path.display(), "generating dataset");
    let file = File::create(path)
        .with_context(|| format!("failed to create dataset file: {}", path.display()))?;
    let mut out = BufWriter::with_capacity(128 * 1024, file);
    generate(&mut out, rows, rng)
        .with_context(|| format!("failed to write dataset file: {}", path.display()))?;
    out.flush()
        .with_context(|| format!("failed to write dataset file: {}", path.display()))?;
    tracing::info!(rows, path = %path.display(), "dataset written");
    Ok(())
}
