use crate::cpuid::Capability;
use crate::error::Error;
use crate::fill;
use crate::step::{self, NativeSteps, Step};
use crate::word::{AttemptBudget, NativeWord, WordSource};

/// Hardware random engine. Holds the capability fact and the invocation
/// strategy chosen for the target; carries no mutable state.
#[derive(Debug, Clone)]
pub struct Drng<S = NativeSteps> {
    source: WordSource<S>,
}

impl Drng<NativeSteps> {
    /// Probes the processor once and selects the native instruction strategy.
    pub fn new() -> Self {
        Self::with_steps(Capability::detect(), step::native_steps())
    }
}

impl Default for Drng<NativeSteps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Drng<S> {
    pub fn with_steps(capability: Capability, steps: S) -> Self {
        Self {
            source: WordSource::new(capability, steps),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.source.capability().is_supported()
    }

    #[cfg(test)]
    pub(crate) fn steps(&self) -> &S {
        self.source.steps()
    }

    fn check_supported(&self) -> Result<(), Error> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(Error::Unsupported)
        }
    }
}

impl<S> Drng<S>
where
    S: Step<u32> + Step<u64> + Step<NativeWord>,
{
    pub fn next_u32(&self, budget: AttemptBudget) -> Result<u32, Error> {
        self.check_supported()?;
        self.source.next_word(budget).ok_or_else(|| {
            log::debug!("rdrand32 failed after {} retries", budget.get());
            Error::Exhausted {
                retries: budget.get(),
            }
        })
    }

    pub fn next_u64(&self, budget: AttemptBudget) -> Result<u64, Error> {
        self.check_supported()?;
        self.source.next_word(budget).ok_or_else(|| {
            log::debug!("rdrand64 failed after {} retries", budget.get());
            Error::Exhausted {
                retries: budget.get(),
            }
        })
    }

    /// Fills `buf` one native word per aligned block.
    pub fn fill_bytes(&self, buf: &mut [u8], budget: AttemptBudget) -> Result<(), Error> {
        let len = buf.len();
        fill::fill_bytes::<NativeWord, S>(&self.source, buf, budget).inspect_err(|e| {
            log::debug!("fill of {} bytes aborted: {}", len, e);
        })
    }
}
