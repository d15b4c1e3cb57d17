//! Fills a byte buffer with as few hardware invocations as possible.
//!
//! The buffer is split at native word boundaries:
//!
//! ```text
//!       0       8      16      24      32
//!       |       |       |       |       |
//!         hhhhhhBBBBBBBBBBBBBBBBtttttt
//! ```
//!
//! Each aligned block `B` receives one whole word. The unaligned head `h` and
//! tail `t` each consume one word, least significant byte first.

use crate::error::Error;
use crate::step::Step;
use crate::word::{AttemptBudget, Word, WordSource};

/// Sizes of the three regions of a buffer, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub head: usize,
    pub body: usize,
    pub tail: usize,
}

impl Layout {
    /// Splits `len` bytes starting at `addr` around multiples of `width`.
    /// The head never extends past the end of the buffer.
    pub fn of(addr: usize, len: usize, width: usize) -> Self {
        let head = ((width - addr % width) % width).min(len);
        let body = (len - head) / width * width;
        Self {
            head,
            body,
            tail: len - head - body,
        }
    }

    /// Words consumed by a successful fill.
    pub fn invocations(&self, width: usize) -> usize {
        usize::from(self.head > 0) + self.body / width + usize::from(self.tail > 0)
    }
}

/// Fills `buf` with words from `source`, stopping at the first word that
/// cannot be produced within `budget`. Bytes written before a failure are
/// left in place; bytes after it are untouched.
pub fn fill_bytes<W, S>(
    source: &WordSource<S>,
    buf: &mut [u8],
    budget: AttemptBudget,
) -> Result<(), Error>
where
    W: Word,
    S: Step<W>,
{
    if !source.capability().is_supported() {
        return Err(Error::Unsupported);
    }

    let layout = Layout::of(buf.as_ptr() as usize, buf.len(), W::WIDTH);
    let (head, rest) = buf.split_at_mut(layout.head);
    let (body, tail) = rest.split_at_mut(layout.body);

    fill_residual::<W, S>(source, head, budget)?;

    for block in body.chunks_exact_mut(W::WIDTH) {
        let word: W = next_word(source, budget)?;
        word.store(block);
    }

    fill_residual::<W, S>(source, tail, budget)
}

fn next_word<W, S>(source: &WordSource<S>, budget: AttemptBudget) -> Result<W, Error>
where
    W: Word,
    S: Step<W>,
{
    source.next_word(budget).ok_or(Error::Exhausted {
        retries: budget.get(),
    })
}

fn fill_residual<W, S>(
    source: &WordSource<S>,
    region: &mut [u8],
    budget: AttemptBudget,
) -> Result<(), Error>
where
    W: Word,
    S: Step<W>,
{
    if region.is_empty() {
        return Ok(());
    }
    let mut word: W = next_word(source, budget)?;
    for byte in region {
        *byte = word.take_low_byte();
    }
    Ok(())
}
