//! Hardware random data from the x86 RDRAND instruction.
//!
//! - [`cpuid`]: detects whether RDRAND is usable, once per [`Drng`].
//! - [`word`]: bounded-retry generation of single 32- or 64-bit words.
//! - [`fill`]: fills arbitrary byte buffers one native word per aligned block.
//! - [`random`]: typed values (ranges, floats, UUIDs) built on top.
//!
//! Nothing here falls back to a software generator. Unsupported hardware
//! and exhausted retries are returned as [`Error`] values.
//!
//! ```no_run
//! use drng::{AttemptBudget, Drng};
//!
//! let drng = Drng::new();
//! let mut key = [0u8; 32];
//! drng.fill_bytes(&mut key, AttemptBudget::default())?;
//! # Ok::<(), drng::Error>(())
//! ```

pub mod cpuid;
pub mod drng;
pub mod error;
pub mod fill;
pub mod random;
pub mod step;
pub mod word;

#[cfg(test)]
mod mock;

pub use cpuid::{Capability, CpuReport};
pub use drng::Drng;
pub use error::Error;
pub use random::DigitalRandom;
pub use word::{AttemptBudget, NativeWord};
