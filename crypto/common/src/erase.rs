//! Wiping secrets from memory.
//!
//! Every write goes through [`core::ptr::write_volatile`] followed by a
//! compiler fence, so the zeroing survives even when the value is about to
//! be dropped or overwritten.

use core::sync::atomic::{compiler_fence, Ordering};

/// Overwrites a value with zeros.
pub trait Erase {
    fn erase(&mut self);
}

/// Marker for types that erase their contents in [`Drop`].
pub trait EraseOnDrop {}

#[inline(always)]
fn overwrite<T>(dst: &mut T, zero: T) {
    unsafe { core::ptr::write_volatile(dst, zero) };
    compiler_fence(Ordering::SeqCst);
}

macro_rules! erase_to {
    ($zero:expr => $($t:ty),+ $(,)?) => {
        $(
            impl Erase for $t {
                #[inline]
                fn erase(&mut self) {
                    overwrite(self, $zero);
                }
            }
        )+
    };
}

erase_to!(0 => u8, u16, u32, u64, u128, usize);
erase_to!(false => bool);

// all-zero bits are a valid value for every vector register type
#[cfg(target_arch = "x86")]
erase_to!(unsafe { core::mem::zeroed() } => core::arch::x86::__m128i);
#[cfg(target_arch = "x86_64")]
erase_to!(unsafe { core::mem::zeroed() } => core::arch::x86_64::__m128i);
#[cfg(target_arch = "aarch64")]
erase_to!(unsafe { core::mem::zeroed() } => core::arch::aarch64::uint32x4_t);

impl<E: Erase, const N: usize> Erase for [E; N] {
    fn erase(&mut self) {
        self.iter_mut().erase();
    }
}

impl<E: EraseOnDrop, const N: usize> EraseOnDrop for [E; N] {}

impl<E: Erase> Erase for core::slice::IterMut<'_, E> {
    fn erase(&mut self) {
        self.for_each(Erase::erase);
    }
}
