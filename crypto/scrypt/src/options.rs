use crate::Cancel;
use core::num::NonZeroUsize;

/// Default memory ceiling: 2 GiB.
pub const DEFAULT_MAX_MEMORY: u64 = 2 << 30;

/// Which ROMix implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Implementation {
    /// the native backend when the CPU supports it, otherwise portable
    #[default]
    Auto,
    Portable,
    /// fail with [`Error::Unsupported`](crate::Error::Unsupported) if the
    /// native backend is not available
    Native,
}

/// Runtime limits and knobs for a derivation. None of these affect the
/// derived key.
#[derive(Debug, Clone)]
pub struct Options {
    max_memory: u64,
    threads: Option<NonZeroUsize>,
    implementation: Implementation,
    cancel: Option<Cancel>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_memory: DEFAULT_MAX_MEMORY,
            threads: None,
            implementation: Implementation::Auto,
            cancel: None,
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound, in bytes, on the memory a derivation may allocate.
    #[must_use]
    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory = bytes;
        self
    }

    /// Caps the number of threads lanes are spread over. `0` means one
    /// thread per available CPU.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = NonZeroUsize::new(threads);
        self
    }

    #[must_use]
    pub fn with_implementation(mut self, implementation: Implementation) -> Self {
        self.implementation = implementation;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: Cancel) -> Self {
        self.cancel = Some(cancel);
        self
    }

    #[must_use]
    pub const fn max_memory(&self) -> u64 {
        self.max_memory
    }

    /// The effective thread cap.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.threads.map_or_else(
            || std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            NonZeroUsize::get,
        )
    }

    #[must_use]
    pub const fn implementation(&self) -> Implementation {
        self.implementation
    }

    #[must_use]
    pub const fn cancel(&self) -> Option<&Cancel> {
        self.cancel.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.max_memory(), 2 * 1024 * 1024 * 1024);
        assert!(options.threads() >= 1);
        assert_eq!(options.implementation(), Implementation::Auto);
        assert!(options.cancel().is_none());
    }

    #[test]
    fn builder() {
        let cancel = Cancel::new();
        let options = Options::new()
            .with_max_memory(1 << 20)
            .with_threads(3)
            .with_implementation(Implementation::Portable)
            .with_cancel(cancel.clone());
        assert_eq!(options.max_memory(), 1 << 20);
        assert_eq!(options.threads(), 3);
        assert_eq!(options.implementation(), Implementation::Portable);
        cancel.cancel();
        assert!(options.cancel().is_some_and(Cancel::is_cancelled));
        assert_eq!(Options::new().with_threads(0).threads(), Options::new().threads());
    }
}
