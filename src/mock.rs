use std::cell::Cell;

use crate::step::Step;

/// Configurable behaviour for [`MockStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStepBehaviour {
    /// Every invocation succeeds.
    None,
    /// Every invocation reports a hardware failure.
    FailAlways,
    /// Only the Nth invocation fails (1-indexed).
    FailAtNthStep(usize),
    /// The first k invocations fail, later ones succeed.
    FailFirst(usize),
}

/// Deterministic, instrumented step. Unless built with [`MockStep::cycling`],
/// the kth successful invocation yields [`MockStep::word(k)`](MockStep::word),
/// truncated for 32-bit words.
#[derive(Debug)]
pub struct MockStep {
    behaviour: MockStepBehaviour,
    values: Vec<u64>,
    calls: Cell<usize>,
    produced: Cell<u64>,
}

impl MockStep {
    pub fn new(behaviour: MockStepBehaviour) -> Self {
        Self {
            behaviour,
            values: Vec::new(),
            calls: Cell::new(0),
            produced: Cell::new(0),
        }
    }

    /// Succeeds every time, cycling through `values` instead of [`MockStep::word`].
    pub fn cycling(values: &[u64]) -> Self {
        Self {
            values: values.to_vec(),
            ..Self::new(MockStepBehaviour::None)
        }
    }

    /// Value of the kth successful invocation (1-indexed). Consecutive words
    /// have unrelated byte patterns, so misplaced bytes show up in comparisons.
    pub fn word(k: u64) -> u64 {
        k.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Total invocations, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    fn invoke(&self) -> Option<u64> {
        let call = self.calls.get() + 1;
        self.calls.set(call);

        let fails = match self.behaviour {
            MockStepBehaviour::None => false,
            MockStepBehaviour::FailAlways => true,
            MockStepBehaviour::FailAtNthStep(n) => call == n,
            MockStepBehaviour::FailFirst(k) => call <= k,
        };
        if fails {
            return None;
        }

        let k = self.produced.get() + 1;
        self.produced.set(k);
        if self.values.is_empty() {
            Some(Self::word(k))
        } else {
            Some(self.values[(k as usize - 1) % self.values.len()])
        }
    }
}

impl Step<u32> for MockStep {
    fn step(&self) -> Option<u32> {
        self.invoke().map(|w| w as u32)
    }
}

impl Step<u64> for MockStep {
    fn step(&self) -> Option<u64> {
        self.invoke()
    }
}
