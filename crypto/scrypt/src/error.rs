use core::fmt::{Debug, Display};

/// Broad classes of [`Error`], one per way a derivation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// the inputs were rejected before any work was done
    InvalidParameter,
    /// memory or threads could not be obtained
    ResourceExhaustion,
    /// the caller asked for the computation to stop
    Cancelled,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InvalidParams(&'static str),
    InvalidOutputLen,
    MemoryLimit { required: u64, limit: u64 },
    Unsupported(&'static str),
    OutOfMemory { requested: usize },
    ThreadSpawn,
    Cancelled,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParams(_)
            | Self::InvalidOutputLen
            | Self::MemoryLimit { .. }
            | Self::Unsupported(_) => ErrorKind::InvalidParameter,
            Self::OutOfMemory { .. } | Self::ThreadSpawn => ErrorKind::ResourceExhaustion,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidParams(reason) => write!(f, "invalid scrypt parameters: {reason}"),
            Self::InvalidOutputLen => f.write_str("invalid output length"),
            Self::MemoryLimit { required, limit } => write!(
                f,
                "scrypt needs {required} bytes of memory, but the limit is {limit} bytes ({} MiB)",
                limit / (1024 * 1024)
            ),
            Self::Unsupported(what) => write!(f, "unsupported: {what}"),
            Self::OutOfMemory { requested } => {
                write!(f, "failed to allocate {requested} bytes of scratch memory")
            }
            Self::ThreadSpawn => f.write_str("failed to spawn a worker thread"),
            Self::Cancelled => f.write_str("the key derivation was cancelled"),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}
