use crate::{cancel::Interrupt, Error, Implementation};

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod sse2;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
target_features::detect!(cpuid_sse2, "sse2");

/// Whether this CPU can run the native ROMix backend.
///
/// On x86 the answer comes from a one-time CPUID probe; on aarch64 it is
/// fixed at compile time by the `neon` target feature.
#[must_use]
pub fn native_available() -> bool {
    Backend::native().is_some()
}

/// The ROMix implementation a derivation runs on.
///
/// `Sse2` carries the detection token, so it can only be built once SSE2
/// support has been confirmed.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Backend {
    Portable,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse2(cpuid_sse2::Features),
    #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
    Neon,
}

impl Backend {
    pub(crate) fn select(implementation: Implementation) -> Result<Self, Error> {
        let backend = match implementation {
            Implementation::Auto => Self::native().unwrap_or(Self::Portable),
            Implementation::Portable => Self::Portable,
            Implementation::Native => Self::native()
                .ok_or(Error::Unsupported("no native scrypt backend for this CPU"))?,
        };
        log::debug!(
            "scrypt: {:?} implementation requested, using the {} backend",
            implementation,
            backend.name()
        );
        Ok(backend)
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    fn native() -> Option<Self> {
        let token = cpuid_sse2::init();
        token.get().then_some(Self::Sse2(token))
    }

    #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
    #[allow(clippy::unnecessary_wraps)]
    const fn native() -> Option<Self> {
        Some(Self::Neon)
    }

    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        all(target_arch = "aarch64", target_feature = "neon")
    )))]
    const fn native() -> Option<Self> {
        None
    }

    pub(crate) const fn is_native(self) -> bool {
        !matches!(self, Self::Portable)
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Portable => "portable",
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Sse2(_) => "sse2",
            #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
            Self::Neon => "neon",
        }
    }

    /// Runs ROMix over one lane block of `128 * r` bytes in place.
    pub(crate) fn ro_mix(
        self,
        block: &mut [u8],
        n: usize,
        interrupt: &Interrupt<'_>,
    ) -> Result<(), Error> {
        match self {
            Self::Portable => crate::romix::ro_mix(block, n, interrupt),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Self::Sse2(token) => {
                debug_assert!(token.get());
                // SAFETY: the token proves SSE2 was detected
                unsafe { sse2::ro_mix(block, n, interrupt) }
            }
            #[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
            // SAFETY: NEON is enabled for the whole compilation
            Self::Neon => unsafe { neon::ro_mix(block, n, interrupt) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection() {
        assert!(!Backend::select(Implementation::Portable).unwrap().is_native());
        let auto = Backend::select(Implementation::Auto).unwrap();
        assert_eq!(auto.is_native(), native_available());
        match Backend::select(Implementation::Native) {
            Ok(backend) => assert!(backend.is_native()),
            Err(err) => {
                assert!(!native_available());
                assert_eq!(err.kind(), crate::ErrorKind::InvalidParameter);
            }
        }
    }

    #[cfg(any(target_arch = "x86_64", all(target_arch = "aarch64", target_feature = "neon")))]
    #[test]
    fn native_on_common_targets() {
        assert!(native_available());
    }
}
