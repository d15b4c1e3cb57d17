//! Capability detection for the RDRAND instruction.
//!
//! Support is gated on the `GenuineIntel` vendor string before the CPUID leaf 1
//! feature bit is consulted. Processors from other vendors that advertise the
//! same bit are reported as unsupported.

/// Vendor string required before the feature bit is trusted.
pub const GATED_VENDOR: &[u8; 12] = b"GenuineIntel";

/// CPUID leaf 1, ECX bit 30.
pub const RDRAND_ECX_BIT: u32 = 1 << 30;

/// Registers returned by one CPUID query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuidResult {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl CpuidResult {
    /// The 12-byte vendor identifier held in EBX, EDX, ECX (in that order) by leaf 0.
    pub fn vendor_id(&self) -> [u8; 12] {
        let mut id = [0u8; 12];
        id[0..4].copy_from_slice(&self.ebx.to_le_bytes());
        id[4..8].copy_from_slice(&self.edx.to_le_bytes());
        id[8..12].copy_from_slice(&self.ecx.to_le_bytes());
        id
    }
}

/// Source of CPU identification data.
pub trait CpuidQuery {
    fn cpuid(&self, leaf: u32) -> CpuidResult;
}

/// Executes CPUID on the running processor.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCpuid;

#[cfg(target_arch = "x86_64")]
impl CpuidQuery for NativeCpuid {
    fn cpuid(&self, leaf: u32) -> CpuidResult {
        use core::arch::asm;

        let eax: u32;
        let rbx: u64;
        let ecx: u32;
        let edx: u32;
        // SAFETY: CPUID is always available on x86_64. rbx is reserved by LLVM,
        // so it is saved into a scratch register and swapped back afterwards.
        unsafe {
            asm!(
                "mov {rbx_out}, rbx",
                "cpuid",
                "xchg {rbx_out}, rbx",
                rbx_out = out(reg) rbx,
                inout("eax") leaf => eax,
                inout("ecx") 0u32 => ecx,
                out("edx") edx,
                options(nostack, preserves_flags),
            );
        }

        CpuidResult {
            eax,
            ebx: rbx as u32,
            ecx,
            edx,
        }
    }
}

#[cfg(target_arch = "x86")]
impl CpuidQuery for NativeCpuid {
    fn cpuid(&self, leaf: u32) -> CpuidResult {
        // SAFETY: every processor able to run this binary implements CPUID.
        #[allow(unused_unsafe)]
        let r = unsafe { core::arch::x86::__cpuid(leaf) };
        CpuidResult {
            eax: r.eax,
            ebx: r.ebx,
            ecx: r.ecx,
            edx: r.edx,
        }
    }
}

/// Whether RDRAND may be executed. Computed once, then copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    supported: bool,
}

impl Capability {
    pub const fn new(supported: bool) -> Self {
        Self { supported }
    }

    pub const fn unsupported() -> Self {
        Self::new(false)
    }

    /// Runs the vendor-gated probe against `query`. Leaf 1 is only queried
    /// once the vendor matches.
    pub fn probe<Q: CpuidQuery + ?Sized>(query: &Q) -> Self {
        let vendor = query.cpuid(0).vendor_id();
        let supported =
            vendor == *GATED_VENDOR && query.cpuid(1).ecx & RDRAND_ECX_BIT != 0;
        Self { supported }
    }

    /// Probes the running processor.
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        let capability = Self::probe(&NativeCpuid);

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        let capability = Self::unsupported();

        log::debug!("rdrand supported: {}", capability.supported);
        capability
    }

    pub const fn is_supported(&self) -> bool {
        self.supported
    }
}

/// Diagnostic view of the probe, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuReport {
    pub vendor: String,
    pub feature_bit: bool,
    pub capability: Capability,
}

impl CpuReport {
    pub fn collect<Q: CpuidQuery + ?Sized>(query: &Q) -> Self {
        let vendor = query.cpuid(0).vendor_id();
        let feature_bit = query.cpuid(1).ecx & RDRAND_ECX_BIT != 0;
        Self {
            vendor: String::from_utf8_lossy(&vendor).into_owned(),
            feature_bit,
            capability: Capability::probe(query),
        }
    }

    /// Report for the running processor, or `None` off x86.
    pub fn native() -> Option<Self> {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            Some(Self::collect(&NativeCpuid))
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            None
        }
    }
}
