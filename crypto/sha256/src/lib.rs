#![no_std]
#![deny(
    dead_code,
    deprecated,
    future_incompatible,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::inline_always)]

//! Streaming SHA-256 (FIPS 180-4).

use core::fmt::Debug;
use crypto_common::{
    blocks::BlockBuffer,
    erase::{Erase, EraseOnDrop},
};

mod consts;
mod soft;

pub const BLOCK_LEN: usize = 64;
pub const DIGEST_LEN: usize = 32;

#[allow(missing_copy_implementations)]
#[derive(Clone)]
pub struct Sha256 {
    state: [u32; 8],
    buffer: BlockBuffer<BLOCK_LEN>,
    blocks: u64,
}

impl Default for Sha256 {
    fn default() -> Self {
        Self {
            state: consts::H,
            buffer: BlockBuffer::default(),
            blocks: 0,
        }
    }
}

impl Sha256 {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let Self {
            state,
            buffer,
            blocks,
        } = self;
        buffer.update(data, |block| {
            soft::compress(state, block);
            *blocks += 1;
        });
    }

    #[inline]
    #[must_use]
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        let Self {
            state,
            buffer,
            blocks,
        } = &mut self;
        let bit_len = (*blocks * BLOCK_LEN as u64 + buffer.len() as u64) * 8;
        buffer.pad_be64(bit_len, |block| soft::compress(state, block));
        let mut out = [0; DIGEST_LEN];
        for (chunk, v) in out.chunks_exact_mut(4).zip(state.iter()) {
            chunk.copy_from_slice(&v.to_be_bytes());
        }
        out
    }

    #[inline]
    #[must_use]
    pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

impl Drop for Sha256 {
    fn drop(&mut self) {
        self.state.erase();
        self.buffer.erase();
    }
}

impl EraseOnDrop for Sha256 {}

impl Debug for Sha256 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Sha256 { ... }")
    }
}
