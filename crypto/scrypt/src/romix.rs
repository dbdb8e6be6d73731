//! Portable BlockMix and ROMix over little-endian byte blocks.

use crate::{cancel::Interrupt, salsa::salsa20_8, scratch::Scratch, Error};
use crypto_common::erase::Erase;

/// Reads the first word of the last 64-byte chunk of `x`, reduced mod `n`.
#[inline(always)]
fn integerify(x: &[u8], n: usize) -> usize {
    let mask = n - 1;
    let at = x.len() - 64;
    let t = u32::from_le_bytes([x[at], x[at + 1], x[at + 2], x[at + 3]]);
    (t as usize) & mask
}

/// `output = BlockMix(input)`. Both slices hold `2r` chunks of 64 bytes;
/// even chunks land in the first half of `output`, odd chunks in the second.
pub(crate) fn block_mix(input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len());
    let half = input.len() / 2;
    let mut x = [0; 64];
    x.copy_from_slice(&input[input.len() - 64..]);
    for (i, chunk) in input.chunks_exact(64).enumerate() {
        x.iter_mut().zip(chunk).for_each(|(a, b)| *a ^= b);
        salsa20_8(&mut x);
        let pos = (i / 2) * 64 + if i % 2 == 0 { 0 } else { half };
        output[pos..pos + 64].copy_from_slice(&x);
    }
    x.erase();
}

#[inline(always)]
fn xor(x: &[u8], y: &[u8], output: &mut [u8]) {
    for ((out, &x_i), &y_i) in output.iter_mut().zip(x.iter()).zip(y.iter()) {
        *out = x_i ^ y_i;
    }
}

/// Runs ROMix over `b` in place with a fresh scratch array of `n` blocks.
///
/// `b` must be a whole block (`128 * r` bytes) and `n` a power of two greater
/// than one. The scratch array is erased when this returns, including on the
/// error paths.
#[allow(clippy::many_single_char_names)]
pub(crate) fn ro_mix(b: &mut [u8], n: usize, interrupt: &Interrupt<'_>) -> Result<(), Error> {
    let len = b.len();
    let total = n.checked_mul(len).ok_or(Error::OutOfMemory {
        requested: usize::MAX,
    })?;
    let mut v = Scratch::new(total, 0u8)?;
    let mut t = Scratch::new(len, 0u8)?;
    for chunk in v.chunks_exact_mut(len) {
        interrupt.check()?;
        chunk.copy_from_slice(b);
        block_mix(chunk, b);
    }
    for _ in 0..n {
        interrupt.check()?;
        let j = integerify(b, n);
        xor(b, &v[j * len..(j + 1) * len], &mut t);
        block_mix(&t, b);
    }
    Ok(())
}
