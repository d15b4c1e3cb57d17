//! Typed random values drawn from the hardware engine.
//!
//! All operations use a fixed attempt budget chosen at construction and
//! surface hardware failure as [`Error::Exhausted`]. Only [`DigitalRandom::next_gaussian`]
//! synchronizes; everything else is lock-free and safe to share across threads.

use std::sync::{Mutex, PoisonError};

use rand_core::{TryCryptoRng, TryRngCore};
use uuid::Uuid;

use crate::drng::Drng;
use crate::error::Error;
use crate::step::{NativeSteps, Step};
use crate::word::{AttemptBudget, NativeWord};

const KEEP_24_BITS: u32 = (1 << 24) - 1;
const KEEP_53_BITS: u64 = (1 << 53) - 1;

#[derive(Debug)]
pub struct DigitalRandom<S = NativeSteps> {
    drng: Drng<S>,
    budget: AttemptBudget,
    spare_gaussian: Mutex<Option<f64>>,
}

impl DigitalRandom<NativeSteps> {
    /// Returns a generator backed by the processor's RDRAND, or
    /// [`Error::Unsupported`] when the instruction is unavailable.
    pub fn new() -> Result<Self, Error> {
        Self::with_budget(AttemptBudget::default())
    }

    pub fn with_budget(budget: AttemptBudget) -> Result<Self, Error> {
        let drng = Drng::new();
        if !drng.is_supported() {
            return Err(Error::Unsupported);
        }
        Ok(Self::from_drng(drng, budget))
    }
}

impl<S> DigitalRandom<S> {
    pub fn from_drng(drng: Drng<S>, budget: AttemptBudget) -> Self {
        Self {
            drng,
            budget,
            spare_gaussian: Mutex::new(None),
        }
    }

    pub fn budget(&self) -> AttemptBudget {
        self.budget
    }

    pub fn drng(&self) -> &Drng<S> {
        &self.drng
    }
}

impl<S> DigitalRandom<S>
where
    S: Step<u32> + Step<u64> + Step<NativeWord>,
{
    pub fn next_u32(&self) -> Result<u32, Error> {
        self.drng.next_u32(self.budget)
    }

    pub fn next_u64(&self) -> Result<u64, Error> {
        self.drng.next_u64(self.budget)
    }

    pub fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), Error> {
        self.drng.fill_bytes(dest, self.budget)
    }

    /// The top bit of a 32-bit word.
    pub fn next_bool(&self) -> Result<bool, Error> {
        Ok(self.next_u32()? >> 31 == 1)
    }

    /// Uniform in `[0, bound)`. Samples from the incomplete top bucket are
    /// rejected so every result is equally likely.
    pub fn next_u32_below(&self, bound: u32) -> Result<u32, Error> {
        if bound == 0 {
            return Err(Error::InvalidArgs("bound must be positive".into()));
        }
        loop {
            let sample = self.next_u32()?;
            let result = sample % bound;
            if sample - result <= u32::MAX - (bound - 1) {
                return Ok(result);
            }
        }
    }

    /// Uniform in `[0, bound)`. See [`Self::next_u32_below`].
    pub fn next_u64_below(&self, bound: u64) -> Result<u64, Error> {
        if bound == 0 {
            return Err(Error::InvalidArgs("bound must be positive".into()));
        }
        loop {
            let sample = self.next_u64()?;
            let result = sample % bound;
            if sample - result <= u64::MAX - (bound - 1) {
                return Ok(result);
            }
        }
    }

    /// Uniform in `[least, bound)`. Any non-empty range is accepted, including
    /// ones wider than `i32::MAX`.
    pub fn next_i32_between(&self, least: i32, bound: i32) -> Result<i32, Error> {
        if least >= bound {
            return Err(Error::InvalidArgs("bound must be greater than least".into()));
        }
        let span = bound.wrapping_sub(least) as u32;
        Ok(least.wrapping_add(self.next_u32_below(span)? as i32))
    }

    /// Uniform in `[least, bound)`.
    pub fn next_i64_between(&self, least: i64, bound: i64) -> Result<i64, Error> {
        if least >= bound {
            return Err(Error::InvalidArgs("bound must be greater than least".into()));
        }
        let span = bound.wrapping_sub(least) as u64;
        Ok(least.wrapping_add(self.next_u64_below(span)? as i64))
    }

    /// Uniform in `[0.0, 1.0)` in steps of 2^-24.
    pub fn next_f32(&self) -> Result<f32, Error> {
        Ok((self.next_u32()? & KEEP_24_BITS) as f32 / (1u32 << 24) as f32)
    }

    /// Uniform in `[0.0, 1.0)` in steps of 2^-53.
    pub fn next_f64(&self) -> Result<f64, Error> {
        Ok((self.next_u64()? & KEEP_53_BITS) as f64 / (1u64 << 53) as f64)
    }

    pub fn next_f64_between(&self, least: f64, bound: f64) -> Result<f64, Error> {
        // Written so that NaN bounds are rejected as well.
        if !(least < bound) {
            return Err(Error::InvalidArgs("bound must be greater than least".into()));
        }
        Ok(self.next_f64()? * (bound - least) + least)
    }

    /// Standard normal deviate via the Marsaglia polar method. Each accepted
    /// pair yields two values; the second is kept for the next call.
    pub fn next_gaussian(&self) -> Result<f64, Error> {
        let mut spare = self
            .spare_gaussian
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = spare.take() {
            return Ok(value);
        }

        loop {
            let v1 = 2.0 * self.next_f64()? - 1.0;
            let v2 = 2.0 * self.next_f64()? - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s < 1.0 && s != 0.0 {
                let multiplier = (-2.0 * s.ln() / s).sqrt();
                *spare = Some(v2 * multiplier);
                return Ok(v1 * multiplier);
            }
        }
    }

    /// A version 4 UUID from two 64-bit words, most significant first.
    pub fn next_uuid(&self) -> Result<Uuid, Error> {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.next_u64()?.to_be_bytes());
        bytes[8..].copy_from_slice(&self.next_u64()?.to_be_bytes());
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl<S> TryRngCore for DigitalRandom<S>
where
    S: Step<u32> + Step<u64> + Step<NativeWord>,
{
    type Error = Error;

    fn try_next_u32(&mut self) -> Result<u32, Error> {
        DigitalRandom::next_u32(self)
    }

    fn try_next_u64(&mut self) -> Result<u64, Error> {
        DigitalRandom::next_u64(self)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        DigitalRandom::fill_bytes(self, dest)
    }
}

impl<S> TryCryptoRng for DigitalRandom<S> where S: Step<u32> + Step<u64> + Step<NativeWord> {}
