//! Block buffering for Merkle-Damgård hashes.

use crate::erase::Erase;

pub type Block<const N: usize> = [u8; N];

/// Collects input until a full `N`-byte block is available.
///
/// The buffered tail never holds a full block, so `len() < N` always.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone)]
pub struct BlockBuffer<const N: usize> {
    tail: Block<N>,
    len: usize,
}

impl<const N: usize> Default for BlockBuffer<N> {
    fn default() -> Self {
        Self {
            tail: [0; N],
            len: 0,
        }
    }
}

impl<const N: usize> BlockBuffer<N> {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Feeds `input` through `compress` one block at a time, keeping the
    /// incomplete remainder.
    pub fn update(&mut self, mut input: &[u8], mut compress: impl FnMut(&Block<N>)) {
        if self.len > 0 {
            let take = input.len().min(N - self.len);
            let (head, rest) = input.split_at(take);
            self.tail[self.len..self.len + take].copy_from_slice(head);
            self.len += take;
            input = rest;
            if self.len < N {
                return;
            }
            compress(&self.tail);
            self.len = 0;
        }
        let mut blocks = input.chunks_exact(N);
        for block in blocks.by_ref() {
            if let Ok(block) = block.try_into() {
                compress(block);
            }
        }
        let rest = blocks.remainder();
        self.tail[..rest.len()].copy_from_slice(rest);
        self.len = rest.len();
    }

    /// Appends `0x80`, zeros and the big-endian 64-bit `bit_len`, then
    /// compresses the one or two resulting blocks. The buffer is empty
    /// afterwards.
    pub fn pad_be64(&mut self, bit_len: u64, mut compress: impl FnMut(&Block<N>)) {
        self.tail[self.len] = 0x80;
        self.tail[self.len + 1..].fill(0);
        if N - self.len - 1 < 8 {
            compress(&self.tail);
            self.tail.fill(0);
        }
        self.tail[N - 8..].copy_from_slice(&bit_len.to_be_bytes());
        compress(&self.tail);
        self.tail.erase();
        self.len = 0;
    }
}

impl<const N: usize> Erase for BlockBuffer<N> {
    fn erase(&mut self) {
        self.tail.erase();
        self.len.erase();
    }
}
