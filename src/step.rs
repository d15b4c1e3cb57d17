//! Raw instruction invokers. One call to [`Step::step`] is one hardware
//! invocation with no retries; `None` means the carry flag was clear.

/// A single attempt at producing a `W`.
pub trait Step<W> {
    fn step(&self) -> Option<W>;
}

impl<W, S: Step<W> + ?Sized> Step<W> for &S {
    fn step(&self) -> Option<W> {
        (**self).step()
    }
}

/// The RDRAND instruction. Only constructed by the crate, and only invoked
/// through a [`WordSource`](crate::word::WordSource) whose capability is set.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[derive(Debug, Clone, Copy)]
pub struct Rdrand {
    _private: (),
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl Rdrand {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl Step<u32> for Rdrand {
    fn step(&self) -> Option<u32> {
        use core::arch::asm;

        let value: u32;
        let ok: u8;
        // SAFETY: callers reach this only after CPUID reported RDRAND support.
        unsafe {
            asm!(
                "rdrand {val:e}",
                "setc {ok}",
                val = out(reg) value,
                ok = out(reg_byte) ok,
                options(nomem, nostack),
            );
        }
        (ok != 0).then_some(value)
    }
}

#[cfg(target_arch = "x86_64")]
impl Step<u64> for Rdrand {
    fn step(&self) -> Option<u64> {
        use core::arch::asm;

        let value: u64;
        let ok: u8;
        // SAFETY: callers reach this only after CPUID reported RDRAND support.
        unsafe {
            asm!(
                "rdrand {val}",
                "setc {ok}",
                val = out(reg) value,
                ok = out(reg_byte) ok,
                options(nomem, nostack),
            );
        }
        (ok != 0).then_some(value)
    }
}

/// A 64-bit step made of two consecutive 32-bit steps, low half first.
/// Fails as a whole if either half fails.
#[derive(Debug, Clone, Copy)]
pub struct Paired<S>(pub S);

impl<S: Step<u32>> Step<u64> for Paired<S> {
    fn step(&self) -> Option<u64> {
        let low = self.0.step()?;
        let high = self.0.step()?;
        Some(u64::from(high) << 32 | u64::from(low))
    }
}

/// Always fails. Stands in for the instruction on other architectures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Step<u32> for Unavailable {
    fn step(&self) -> Option<u32> {
        None
    }
}

impl Step<u64> for Unavailable {
    fn step(&self) -> Option<u64> {
        None
    }
}

/// Pairs a 32-bit strategy with a 64-bit strategy.
#[derive(Debug, Clone, Copy)]
pub struct Steps<N, Wd> {
    narrow: N,
    wide: Wd,
}

impl<N, Wd> Steps<N, Wd> {
    pub const fn new(narrow: N, wide: Wd) -> Self {
        Self { narrow, wide }
    }
}

impl<N: Step<u32>, Wd> Step<u32> for Steps<N, Wd> {
    fn step(&self) -> Option<u32> {
        self.narrow.step()
    }
}

impl<N, Wd: Step<u64>> Step<u64> for Steps<N, Wd> {
    fn step(&self) -> Option<u64> {
        self.wide.step()
    }
}

#[cfg(target_arch = "x86_64")]
pub type NativeSteps = Steps<Rdrand, Rdrand>;

#[cfg(target_arch = "x86")]
pub type NativeSteps = Steps<Rdrand, Paired<Rdrand>>;

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
pub type NativeSteps = Steps<Unavailable, Unavailable>;

pub(crate) fn native_steps() -> NativeSteps {
    #[cfg(target_arch = "x86_64")]
    {
        Steps::new(Rdrand::new(), Rdrand::new())
    }

    #[cfg(target_arch = "x86")]
    {
        Steps::new(Rdrand::new(), Paired(Rdrand::new()))
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        Steps::new(Unavailable, Unavailable)
    }
}
