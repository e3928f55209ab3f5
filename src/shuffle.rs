//! Out-of-order relocation of lines in a file.
//!
//! A single forward walk visits every position of the live line sequence.
//! At each position a percent roll decides whether the line there moves; a
//! selected line at index `i >= MIN_INDEX` is moved to `i - offset`
//! (clamped at 0), shifting the lines in between one step later. Lines are
//! opaque byte slices and keep their terminators, so the output is always a
//! permutation of the input.

use anyhow::{Context, Result};
use memchr::memchr_iter;
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::Path;

pub const DEFAULT_PERCENTAGE: u8 = 50;

/// Lines visited below this index are never moved by their own visit.
pub const MIN_INDEX: usize = 10;

/// How far back a selected line moves.
pub const OFFSET_RANGE: RangeInclusive<usize> = 10..=60;

/// Source of the draws that drive [`relocate`].
pub trait Roller {
    /// Uniform in `1..=100`.
    fn roll_percent(&mut self) -> u8;
    /// Uniform in [`OFFSET_RANGE`].
    fn roll_offset(&mut self) -> usize;
}

impl<R: Rng + ?Sized> Roller for R {
    fn roll_percent(&mut self) -> u8 {
        self.random_range(1..=100)
    }

    fn roll_offset(&mut self) -> usize {
        self.random_range(OFFSET_RANGE)
    }
}

/// Outcome of [`shuffle_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleReport {
    pub lines: usize,
    pub relocated: usize,
}

/// Split `buf` into lines, each keeping its trailing `\n`.
///
/// A final fragment without a newline is returned as its own line.
pub fn split_lines(buf: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for nl in memchr_iter(b'\n', buf) {
        lines.push(&buf[start..=nl]);
        start = nl + 1;
    }
    if start < buf.len() {
        lines.push(&buf[start..]);
    }
    lines
}

/// Walk `lines` once, moving selected lines earlier. Returns how many moved.
///
/// The walk reads the sequence as it is being rearranged, not a copy of the
/// original order.
pub fn relocate<T, D>(lines: &mut [T], percentage: u8, roller: &mut D) -> usize
where
    D: Roller + ?Sized,
{
    let mut relocated = 0;
    for i in 0..lines.len() {
        if roller.roll_percent() > percentage || i < MIN_INDEX {
            continue;
        }
        let target = i.saturating_sub(roller.roll_offset());
        lines[target..=i].rotate_right(1);
        relocated += 1;
    }
    relocated
}

/// Read `path`, relocate its lines, and overwrite it with the result.
pub fn shuffle_file<D: Roller + ?Sized>(
    path: &Path,
    percentage: u8,
    roller: &mut D,
) -> Result<ShuffleReport> {
    tracing::debug!(percentage, path = %path.display(), "shuffling file");
    let buf =
        std::fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?;
    let mut lines = split_lines(&buf);
    let relocated = relocate(&mut lines, percentage, roller);

    let file = File::create(path)
        .with_context(|| format!("failed to open file for writing: {}", path.display()))?;
    let mut out = BufWriter::with_capacity(128 * 1024, file);
    for line in &lines {
        out.write_all(line)
            .with_context(|| format!("failed to write file: {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("failed to write file: {}", path.display()))?;

    let report = ShuffleReport {
        lines: lines.len(),
        relocated,
    };
    tracing::info!(
        lines = report.lines,
        relocated = report.relocated,
        path = %path.display(),
        "shuffle finished"
    );
    Ok(report)
}
