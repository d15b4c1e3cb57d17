use crate::cpuid::Capability;
use crate::step::Step;

/// A fixed-width unsigned value produced by one hardware invocation.
pub trait Word: Copy + Eq + core::fmt::Debug + Send + Sync + 'static {
    /// Width in bytes.
    const WIDTH: usize;

    /// Returns the least significant byte and shifts the word right by 8 bits.
    fn take_low_byte(&mut self) -> u8;

    /// Stores the word across a `WIDTH`-byte block in native byte order.
    fn store(self, block: &mut [u8]);
}

impl Word for u32 {
    const WIDTH: usize = 4;

    fn take_low_byte(&mut self) -> u8 {
        let byte = *self as u8;
        *self >>= 8;
        byte
    }

    fn store(self, block: &mut [u8]) {
        block.copy_from_slice(&self.to_ne_bytes());
    }
}

impl Word for u64 {
    const WIDTH: usize = 8;

    fn take_low_byte(&mut self) -> u8 {
        let byte = *self as u8;
        *self >>= 8;
        byte
    }

    fn store(self, block: &mut [u8]) {
        block.copy_from_slice(&self.to_ne_bytes());
    }
}

/// Widest word the target produces with a single instruction.
#[cfg(target_arch = "x86_64")]
pub type NativeWord = u64;

#[cfg(not(target_arch = "x86_64"))]
pub type NativeWord = u32;

/// Retries permitted after the first attempt. A budget of `n` allows at most
/// `n + 1` hardware invocations for one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttemptBudget(u32);

impl AttemptBudget {
    pub const fn retries(retries: u32) -> Self {
        Self(retries)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for AttemptBudget {
    fn default() -> Self {
        Self(10)
    }
}

/// Produces words from an injected step, gated on the capability fact.
#[derive(Debug, Clone)]
pub struct WordSource<S> {
    capability: Capability,
    steps: S,
}

impl<S> WordSource<S> {
    pub fn new(capability: Capability, steps: S) -> Self {
        Self { capability, steps }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn steps(&self) -> &S {
        &self.steps
    }

    /// Returns the first successful step within `budget`, or `None` if the
    /// capability is absent or every attempt failed.
    pub fn next_word<W>(&self, budget: AttemptBudget) -> Option<W>
    where
        W: Word,
        S: Step<W>,
    {
        if !self.capability.is_supported() {
            return None;
        }
        (0..=budget.get()).find_map(|_| self.steps.step())
    }
}
