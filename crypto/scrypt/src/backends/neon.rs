//! ROMix on NEON registers, using the same diagonal word layout as the SSE2
//! backend. `vextq_u32` stands in for the lane rotations.

use crate::{cancel::Interrupt, scratch::Scratch, Error};
use core::arch::aarch64::{
    uint32x4_t, vaddq_u32, vdupq_n_u32, veorq_u32, vextq_u32, vgetq_lane_u32, vld1q_u32,
    vorrq_u32, vshlq_n_u32, vshrq_n_u32, vst1q_u32,
};
use crypto_common::erase::Erase;

const DIAGONAL: [usize; 16] = [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11];

macro_rules! add_xor_rot {
    ($x:expr, $a:expr, $b:expr, $r:literal) => {{
        let t = vaddq_u32($a, $b);
        $x = veorq_u32($x, vorrq_u32(vshlq_n_u32(t, $r), vshrq_n_u32(t, 32 - $r)));
    }};
}

macro_rules! extract {
    ($v:expr, $s:literal) => {
        $v = vextq_u32($v, $v, $s)
    };
}

#[inline]
unsafe fn salsa20_8(x: &mut [uint32x4_t; 4]) {
    let [mut a, mut b, mut c, mut d] = *x;
    for _ in 0..4 {
        add_xor_rot!(b, a, d, 7);
        add_xor_rot!(c, b, a, 9);
        add_xor_rot!(d, c, b, 13);
        add_xor_rot!(a, d, c, 18);
        extract!(b, 3);
        extract!(c, 2);
        extract!(d, 1);
        add_xor_rot!(d, a, b, 7);
        add_xor_rot!(c, d, a, 9);
        add_xor_rot!(b, c, d, 13);
        add_xor_rot!(a, b, c, 18);
        extract!(b, 1);
        extract!(c, 2);
        extract!(d, 3);
    }
    x[0] = vaddq_u32(x[0], a);
    x[1] = vaddq_u32(x[1], b);
    x[2] = vaddq_u32(x[2], c);
    x[3] = vaddq_u32(x[3], d);
}

#[inline]
unsafe fn block_mix(input: &[uint32x4_t], output: &mut [uint32x4_t]) {
    let half = input.len() / 2;
    let mut x = [vdupq_n_u32(0); 4];
    x.copy_from_slice(&input[input.len() - 4..]);
    for (i, chunk) in input.chunks_exact(4).enumerate() {
        for (a, b) in x.iter_mut().zip(chunk) {
            *a = veorq_u32(*a, *b);
        }
        salsa20_8(&mut x);
        let pos = (i / 2) * 4 + if i % 2 == 0 { 0 } else { half };
        output[pos..pos + 4].copy_from_slice(&x);
    }
    x.erase();
}

#[inline]
unsafe fn load(bytes: &[u8], regs: &mut [uint32x4_t]) {
    for (chunk, out) in bytes.chunks_exact(64).zip(regs.chunks_exact_mut(4)) {
        let mut words = [0u32; 16];
        for (&i, w) in DIAGONAL.iter().zip(words.iter_mut()) {
            let at = 4 * i;
            *w = u32::from_le_bytes([chunk[at], chunk[at + 1], chunk[at + 2], chunk[at + 3]]);
        }
        for (q, reg) in out.iter_mut().enumerate() {
            *reg = vld1q_u32(words.as_ptr().add(4 * q));
        }
        words.erase();
    }
}

#[inline]
unsafe fn store(regs: &[uint32x4_t], bytes: &mut [u8]) {
    for (regs, chunk) in regs.chunks_exact(4).zip(bytes.chunks_exact_mut(64)) {
        let mut words = [0u32; 16];
        for (q, reg) in regs.iter().enumerate() {
            vst1q_u32(words.as_mut_ptr().add(4 * q), *reg);
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
/// The target must have NEON enabled at compile time.
pub unsafe fn ro_mix(b: &mut [u8], n: usize, interrupt: &Interrupt<'_>) -> Result<(), Error> {
    let words = b.len() / 16;
    let total = n.checked_mul(words).ok_or(Error::OutOfMemory {
        requested: usize::MAX,
    })?;
    let mut v = Scratch::new(total, vdupq_n_u32(0))?;
    let mut x = Scratch::new(words, vdupq_n_u32(0))?;
    let mut t = Scratch::new(words, vdupq_n_u32(0))?;
    load(b, &mut x);
    for chunk in v.chunks_exact_mut(words) {
        interrupt.check()?;
        chunk.copy_from_slice(&x);
        block_mix(chunk, &mut x);
    }
    let mask = n - 1;
    for _ in 0..n {
        interrupt.check()?;
        let j = (vgetq_lane_u32(x[words - 4], 0) as usize) & mask;
        let vj = &v[j * words..(j + 1) * words];
        for ((ti, xi), vi) in t.iter_mut().zip(x.iter()).zip(vj) {
            *ti = veorq_u32(*xi, *vi);
        }
        block_mix(&t, &mut x);
    }
    store(&x, b);
    Ok(())
}
