//! Comparisons whose running time does not depend on the compared values.

use core::ops::{BitAnd, Not};

/// The result of a constant-time comparison, `0` or `1`.
///
/// Values pass through [`core::hint::black_box`] on construction so the
/// optimizer cannot turn the comparison back into an early exit.
#[derive(Debug, Clone, Copy)]
pub struct Choice(u8);

impl Choice {
    pub const TRUE: Self = Self(1);
    pub const FALSE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for Choice {
    #[inline]
    fn from(value: u8) -> Self {
        debug_assert!(value <= 1);
        Self(core::hint::black_box(value))
    }
}

impl From<Choice> for bool {
    #[inline]
    fn from(value: Choice) -> Self {
        value.0 == 1
    }
}

impl BitAnd for Choice {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self::from(self.0 & rhs.0)
    }
}

impl Not for Choice {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self::from(self.0 ^ 1)
    }
}

#[allow(clippy::module_name_repetitions)]
pub trait ConstantTimeEq {
    fn ct_eq(&self, other: &Self) -> Choice;

    #[inline]
    fn ct_ne(&self, other: &Self) -> Choice {
        !self.ct_eq(other)
    }
}

impl ConstantTimeEq for u8 {
    #[inline]
    fn ct_eq(&self, other: &Self) -> Choice {
        let diff = u16::from(self ^ other);
        // 0 stays 0, anything else borrows into bit 8
        let nonzero = (diff.wrapping_neg() >> 8) & 1;
        Choice::from(nonzero.to_le_bytes()[0] ^ 1)
    }
}

/// Only the lengths are compared early; equal-length slices are scanned in
/// full.
impl ConstantTimeEq for [u8] {
    #[inline]
    fn ct_eq(&self, other: &Self) -> Choice {
        if self.len() != other.len() {
            return Choice::FALSE;
        }
        let diff = self
            .iter()
            .zip(other)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        diff.ct_eq(&0)
    }
}
