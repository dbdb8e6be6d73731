use crypto_common::erase::Erase;
use sha256::{Sha256, BLOCK_LEN};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC-SHA256 with the padded key already absorbed into both hash states.
///
/// Keying is the expensive part for short messages, so PBKDF2 keys one
/// instance per password and clones it for every block.
#[derive(Clone)]
pub struct HmacSha256 {
    inner: Sha256,
    outer: Sha256,
}

impl core::fmt::Debug for HmacSha256 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("HmacSha256 { ... }")
    }
}

impl HmacSha256 {
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        let mut pad = padded_key(key);
        pad.iter_mut().for_each(|b| *b ^= IPAD);
        let mut inner = Sha256::new();
        inner.update(&pad);
        pad.iter_mut().for_each(|b| *b ^= IPAD ^ OPAD);
        let mut outer = Sha256::new();
        outer.update(&pad);
        pad.erase();
        Self { inner, outer }
    }

    #[inline]
    pub fn update(&mut self, input: &[u8]) {
        self.inner.update(input);
    }

    #[inline]
    #[must_use]
    pub fn finalize(self) -> [u8; 32] {
        let Self { inner, mut outer } = self;
        let mut hash = inner.finalize();
        outer.update(&hash);
        hash.erase();
        outer.finalize()
    }
}

/// Keys longer than a block are hashed first, shorter ones are zero-padded.
fn padded_key(key: &[u8]) -> [u8; BLOCK_LEN] {
    let mut padded = [0; BLOCK_LEN];
    if key.len() <= BLOCK_LEN {
        padded[..key.len()].copy_from_slice(key);
    } else {
        let mut hash = Sha256::digest(key);
        padded[..hash.len()].copy_from_slice(&hash);
        hash.erase();
    }
    padded
}
