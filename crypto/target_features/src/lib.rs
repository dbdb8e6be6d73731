#![no_std]
#![deny(
    dead_code,
    deprecated,
    future_incompatible,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]

//! Runtime detection of x86 SIMD extensions through `CPUID`.
//!
//! [`detect!`] generates a module holding one cached answer. The first
//! caller runs `CPUID` and publishes the result with a compare-and-swap, so
//! racing callers agree on it; later calls are a single atomic load. When
//! the features are already enabled at compile time (for example SSE2 on
//! `x86_64`) no probe runs at all.
//!
//! ```rust
//! target_features::detect!(cpuid_sse2, "sse2");
//!
//! // a zero-sized proof that the probe has run
//! let token: cpuid_sse2::Features = cpuid_sse2::init();
//! assert_eq!(token.get(), cpuid_sse2::get());
//! assert_eq!(cpuid_sse2::cached(), Some(token.get()));
//! ```
//!
//! Supported feature names: `sse2`.

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
compile_error!("CPUID feature detection is only available on x86 and x86_64");

#[cfg(miri)]
mod miri;
#[cfg(not(miri))]
mod x86;

/// Creates a module `$name` that detects the listed features.
#[macro_export]
macro_rules! detect {
    ($name:ident, $($tf:tt),+ $(,)?) => {
        #[allow(dead_code, clippy::inline_always)]
        mod $name {
            use core::sync::atomic::{AtomicU8, Ordering};

            const UNKNOWN: u8 = 2;
            const COMPILED_IN: bool = cfg!(all($(target_feature = $tf),+));
            static STATE: AtomicU8 = AtomicU8::new(UNKNOWN);

            /// Proof that [`init`] has run.
            #[derive(Debug, Clone, Copy)]
            pub struct Features(());

            impl Features {
                #[inline(always)]
                #[must_use]
                pub fn get(self) -> bool {
                    COMPILED_IN || STATE.load(Ordering::Relaxed) == 1
                }
            }

            /// Probes on first use, then answers from the cache.
            #[must_use]
            pub fn get() -> bool {
                if COMPILED_IN {
                    return true;
                }
                match STATE.load(Ordering::Acquire) {
                    UNKNOWN => {
                        let found = u8::from($crate::__probe!($($tf),+));
                        match STATE.compare_exchange(
                            UNKNOWN,
                            found,
                            Ordering::AcqRel,
                            Ordering::Acquire,
                        ) {
                            Ok(_) => found == 1,
                            Err(stored) => stored == 1,
                        }
                    }
                    stored => stored == 1,
                }
            }

            /// The cached answer, `None` before the first probe.
            #[must_use]
            pub fn cached() -> Option<bool> {
                if COMPILED_IN {
                    return Some(true);
                }
                match STATE.load(Ordering::Acquire) {
                    UNKNOWN => None,
                    stored => Some(stored == 1),
                }
            }

            #[must_use]
            pub fn init() -> Features {
                let _ = get();
                Features(())
            }
        }
    };
}
