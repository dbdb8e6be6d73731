//! ROMix on SSE2 registers.
//!
//! Each 64-byte chunk is held as four `__m128i` in diagonal order: register
//! `q` carries words `5 * (4q + k) mod 16` for lanes `k = 0..4`. In that
//! layout every quarter round of a column pass works lane-wise, and a row
//! pass only needs three shuffles on either side. Blocks are converted once
//! on the way into ROMix and once on the way out.

use crate::{cancel::Interrupt, scratch::Scratch, Error};
use crypto_common::erase::Erase;
#[cfg(target_arch = "x86")]
use core::arch::x86::{
    __m128i, _mm_add_epi32, _mm_cvtsi128_si32, _mm_loadu_si128, _mm_setzero_si128,
    _mm_shuffle_epi32, _mm_slli_epi32, _mm_srli_epi32, _mm_storeu_si128, _mm_xor_si128,
};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128i, _mm_add_epi32, _mm_cvtsi128_si32, _mm_loadu_si128, _mm_setzero_si128,
    _mm_shuffle_epi32, _mm_slli_epi32, _mm_srli_epi32, _mm_storeu_si128, _mm_xor_si128,
};

const DIAGONAL: [usize; 16] = [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11];

macro_rules! rotl {
    ($v:expr, $l:literal, $r:literal) => {{
        let t = $v;
        _mm_xor_si128(_mm_slli_epi32(t, $l), _mm_srli_epi32(t, $r))
    }};
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn salsa20_8(x: &mut [__m128i; 4]) {
    let [mut a, mut b, mut c, mut d] = *x;
    for _ in 0..4 {
        // columns
        b = _mm_xor_si128(b, rotl!(_mm_add_epi32(a, d), 7, 25));
        c = _mm_xor_si128(c, rotl!(_mm_add_epi32(b, a), 9, 23));
        d = _mm_xor_si128(d, rotl!(_mm_add_epi32(c, b), 13, 19));
        a = _mm_xor_si128(a, rotl!(_mm_add_epi32(d, c), 18, 14));
        b = _mm_shuffle_epi32(b, 0b10_01_00_11);
        c = _mm_shuffle_epi32(c, 0b01_00_11_10);
        d = _mm_shuffle_epi32(d, 0b00_11_10_01);
        // rows
        d = _mm_xor_si128(d, rotl!(_mm_add_epi32(a, b), 7, 25));
        c = _mm_xor_si128(c, rotl!(_mm_add_epi32(d, a), 9, 23));
        b = _mm_xor_si128(b, rotl!(_mm_add_epi32(c, d), 13, 19));
        a = _mm_xor_si128(a, rotl!(_mm_add_epi32(b, c), 18, 14));
        b = _mm_shuffle_epi32(b, 0b00_11_10_01);
        c = _mm_shuffle_epi32(c, 0b01_00_11_10);
        d = _mm_shuffle_epi32(d, 0b10_01_00_11);
    }
    x[0] = _mm_add_epi32(x[0], a);
    x[1] = _mm_add_epi32(x[1], b);
    x[2] = _mm_add_epi32(x[2], c);
    x[3] = _mm_add_epi32(x[3], d);
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn block_mix(input: &[__m128i], output: &mut [__m128i]) {
    let half = input.len() / 2;
    let mut x = [_mm_setzero_si128(); 4];
    x.copy_from_slice(&input[input.len() - 4..]);
    for (i, chunk) in input.chunks_exact(4).enumerate() {
        for (a, b) in x.iter_mut().zip(chunk) {
            *a = _mm_xor_si128(*a, *b);
        }
        salsa20_8(&mut x);
        let pos = (i / 2) * 4 + if i % 2 == 0 { 0 } else { half };
        output[pos..pos + 4].copy_from_slice(&x);
    }
    x.erase();
}

#[inline]
#[target_feature(enable = "sse2")]
#[allow(clippy::cast_ptr_alignment)]
unsafe fn load(bytes: &[u8], regs: &mut [__m128i]) {
    for (chunk, out) in bytes.chunks_exact(64).zip(regs.chunks_exact_mut(4)) {
        let mut words = [0u32; 16];
        for (&i, w) in DIAGONAL.iter().zip(words.iter_mut()) {
            let at = 4 * i;
            *w = u32::from_le_bytes([chunk[at], chunk[at + 1], chunk[at + 2], chunk[at + 3]]);
        }
        let ptr = words.as_ptr().cast::<__m128i>();
        for (q, reg) in out.iter_mut().enumerate() {
            *reg = _mm_loadu_si128(ptr.add(q));
        }
        words.erase();
    }
}

#[inline]
#[target_feature(enable = "sse2")]
#[allow(clippy::cast_ptr_alignment)]
unsafe fn store(regs: &[__m128i], bytes: &mut [u8]) {
    for (regs, chunk) in regs.chunks_exact(4).zip(bytes.chunks_exact_mut(64)) {
        let mut words = [0u32; 16];
        let ptr = words.as_mut_ptr().cast::<__m128i>();
        for (q, reg) in regs.iter().enumerate() {
            _mm_storeu_si128(ptr.add(q), *reg);
        }
        for (&i, w) in DIAGONAL.iter().zip(words.iter()) {
            chunk[4 * i..4 * i + 4].copy_from_slice(&w.to_le_bytes());
        }
        words.erase();
    }
}

/// ROMix over `b` in place.
///
/// # Safety
///
/// The CPU must support SSE2.
#[target_feature(enable = "sse2")]
#[allow(clippy::cast_sign_loss)]
pub unsafe fn ro_mix(b: &mut [u8], n: usize, interrupt: &Interrupt<'_>) -> Result<(), Error> {
    let words = b.len() / 16;
    let total = n.checked_mul(words).ok_or(Error::OutOfMemory {
        requested: usize::MAX,
    })?;
    let mut v = Scratch::new(total, _mm_setzero_si128())?;
    let mut x = Scratch::new(words, _mm_setzero_si128())?;
    let mut t = Scratch::new(words, _mm_setzero_si128())?;
    load(b, &mut x);
    for chunk in v.chunks_exact_mut(words) {
        interrupt.check()?;
        chunk.copy_from_slice(&x);
        block_mix(chunk, &mut x);
    }
    let mask = n - 1;
    for _ in 0..n {
        interrupt.check()?;
        // lane 0 of the last chunk's first register is word 0 of that chunk
        let j = (_mm_cvtsi128_si32(x[words - 4]) as u32 as usize) & mask;
        let vj = &v[j * words..(j + 1) * words];
        for ((ti, xi), vi) in t.iter_mut().zip(x.iter()).zip(vj) {
            *ti = _mm_xor_si128(*xi, *vi);
        }
        block_mix(&t, &mut x);
    }
    store(&x, b);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[allow(clippy::cast_possible_truncation)]
    fn pattern(len: usize, seed: u8) -> Vec<u8> {
        (0..len)
            .map(|i| seed.wrapping_mul(31).wrapping_add((i as u8).wrapping_mul(167)) ^ (i >> 8) as u8)
            .collect()
    }

    #[test]
    fn layout_round_trips() {
        if !crate::native_available() {
            return;
        }
        let bytes = pattern(256, 3);
        let mut regs = vec![unsafe { core::mem::zeroed::<__m128i>() }; 16];
        let mut back = vec![0; 256];
        unsafe {
            load(&bytes, &mut regs);
            store(&regs, &mut back);
        }
        assert_eq!(bytes, back);
    }

    #[test]
    fn matches_portable_block_mix() {
        if !crate::native_available() {
            return;
        }
        for r in [1u8, 2, 3, 8] {
            let input = pattern(128 * usize::from(r), r);
            let r = usize::from(r);
            let mut expected = vec![0; 128 * r];
            crate::romix::block_mix(&input, &mut expected);

            let mut regs = vec![unsafe { core::mem::zeroed::<__m128i>() }; 8 * r];
            let mut mixed = regs.clone();
            let mut actual = vec![0; 128 * r];
            unsafe {
                load(&input, &mut regs);
                block_mix(&regs, &mut mixed);
                store(&mixed, &mut actual);
            }
            assert_eq!(actual, expected, "r = {r}");
        }
    }

    #[test]
    fn matches_portable_ro_mix() {
        if !crate::native_available() {
            return;
        }
        let abort = AtomicBool::new(false);
        let interrupt = Interrupt::new(None, &abort);
        for (r, n) in [(1, 16), (2, 64), (8, 32)] {
            let mut expected = pattern(128 * r, 7);
            let mut actual = expected.clone();
            crate::romix::ro_mix(&mut expected, n, &interrupt).unwrap();
            unsafe { ro_mix(&mut actual, n, &interrupt) }.unwrap();
            assert_eq!(actual, expected, "r = {r}, n = {n}");
        }
    }
}
