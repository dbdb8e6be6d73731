use crypto_common::{
    constant_time::ConstantTimeEq,
    erase::{Erase, EraseOnDrop},
};

/// Output of a successful derivation.
///
/// The bytes are wiped when the key is dropped, equality runs in constant
/// time, and `Debug` never prints the contents.
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    pub(crate) const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for DerivedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for DerivedKey {}

impl PartialEq<[u8]> for DerivedKey {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.ct_eq(other).into()
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.0.iter_mut().erase();
    }
}

impl EraseOnDrop for DerivedKey {}

impl core::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DerivedKey({} bytes)", self.0.len())
    }
}
