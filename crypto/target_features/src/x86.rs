//! `CPUID` leaf 1 probes.

#[macro_export]
#[doc(hidden)]
macro_rules! __probe {
    ($($tf:tt),+) => {{
        #[cfg(target_arch = "x86")]
        use core::arch::x86::__cpuid;
        #[cfg(target_arch = "x86_64")]
        use core::arch::x86_64::__cpuid;
        // SGX enclaves fault on CPUID
        if cfg!(target_env = "sgx") {
            false
        } else {
            let leaf = unsafe { __cpuid(1) };
            $($crate::__bit!(leaf, $tf) &&)+ true
        }
    }};
}

// SSE2 also needs FXSAVE/FXRSTOR (FXSR, edx bit 24) so XMM state survives
// context switches.
#[macro_export]
#[doc(hidden)]
macro_rules! __bit {
    ($leaf:ident, "sse2") => {
        ($leaf.edx & (1 << 24) != 0) && ($leaf.edx & (1 << 26) != 0)
    };
}
