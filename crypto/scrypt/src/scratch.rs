use crate::Error;
use crypto_common::erase::{Erase, EraseOnDrop};

/// Heap buffer for key-derivation intermediates.
///
/// Allocation is fallible and the contents are erased on drop, on the
/// success and the error path alike.
pub struct Scratch<T: Erase + Copy> {
    buf: Vec<T>,
}

impl<T: Erase + Copy> Scratch<T> {
    pub fn new(len: usize, fill: T) -> Result<Self, Error> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
            requested: len.saturating_mul(core::mem::size_of::<T>()),
        })?;
        buf.resize(len, fill);
        Ok(Self { buf })
    }
}

impl<T: Erase + Copy> core::ops::Deref for Scratch<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<T: Erase + Copy> core::ops::DerefMut for Scratch<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl<T: Erase + Copy> Drop for Scratch<T> {
    fn drop(&mut self) {
        self.buf.iter_mut().erase();
    }
}

impl<T: Erase + Copy> EraseOnDrop for Scratch<T> {}

impl<T: Erase + Copy> core::fmt::Debug for Scratch<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Scratch {{ len: {}, .. }}", self.buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_filled() {
        let scratch = Scratch::new(300, 0u8).unwrap();
        assert_eq!(scratch.len(), 300);
        assert!(scratch.iter().all(|&b| b == 0));
    }

    #[test]
    fn huge_request_is_an_error() {
        let err = Scratch::new(usize::MAX / 2, 0u64).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ResourceExhaustion);
    }
}
