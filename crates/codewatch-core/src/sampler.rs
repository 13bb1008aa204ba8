//! Block sampling: the ordered set of block numbers a run visits.
//!
//! Blocks are `from, from + step, from + 2*step, ...` up to and including the
//! last value `<= to`. An inverted range (`from > to`) samples nothing.

use crate::error::MonitorError;

/// A validated, restartable sampling plan over `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSampler {
    from: u64,
    to: u64,
    step: u64,
}

impl BlockSampler {
    /// Create a sampler. A non-positive `step` is rejected; an inverted range is not.
    pub fn new(from: u64, to: u64, step: i64) -> Result<Self, MonitorError> {
        if step <= 0 {
            return Err(MonitorError::InvalidConfiguration(format!(
                "step must be a positive integer, got {step}"
            )));
        }
        Ok(Self {
            from,
            to,
            step: step as u64,
        })
    }

    pub fn from_block(&self) -> u64 {
        self.from
    }

    pub fn to_block(&self) -> u64 {
        self.to
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Number of blocks the sampler yields.
    pub fn len(&self) -> u64 {
        if self.from > self.to {
            0
        } else {
            ((self.to - self.from) / self.step).saturating_add(1)
        }
    }

    /// Returns `true` if the range yields no blocks.
    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// A fresh iterator over the sampled blocks. Can be called any number of times.
    pub fn iter(&self) -> BlockIter {
        BlockIter {
            next: (self.from <= self.to).then_some(self.from),
            to: self.to,
            step: self.step,
        }
    }
}

impl IntoIterator for &BlockSampler {
    type Item = u64;
    type IntoIter = BlockIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator produced by [`BlockSampler::iter`].
#[derive(Debug, Clone)]
pub struct BlockIter {
    next: Option<u64>,
    to: u64,
    step: u64,
}

impl Iterator for BlockIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        // Stops at the range end and on u64 overflow near `u64::MAX`.
        self.next = current
            .checked_add(self.step)
            .filter(|&n| n <= self.to);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(n) => ((self.to - n) / self.step).saturating_add(1) as usize,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}
