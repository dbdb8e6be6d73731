//! Raw scrypt building blocks.
//!
//! These run on the portable path only and exist for conformance testing
//! against published vectors. They do not apply any memory ceiling.

use crate::{cancel::Interrupt, romix, salsa, Error, Params};
use std::sync::atomic::AtomicBool;

/// The Salsa20/8 core.
#[must_use]
pub fn salsa20_8(input: &[u8; 64]) -> [u8; 64] {
    let mut block = *input;
    salsa::salsa20_8(&mut block);
    block
}

fn block_r(len: usize) -> Result<u32, Error> {
    if len == 0 || len % 128 != 0 {
        return Err(Error::InvalidParams("block length must be a positive multiple of 128"));
    }
    u32::try_from(len / 128).map_err(|_| Error::InvalidParams("block is too large"))
}

/// BlockMix over `2r` chunks of 64 bytes. `input` and `output` must have the
/// same length, a positive multiple of 128.
pub fn block_mix(input: &[u8], output: &mut [u8]) -> Result<(), Error> {
    block_r(input.len())?;
    if input.len() != output.len() {
        return Err(Error::InvalidOutputLen);
    }
    romix::block_mix(input, output);
    Ok(())
}

/// ROMix over one block of `128 * r` bytes in place, with cost `n`.
pub fn ro_mix(block: &mut [u8], n: u64) -> Result<(), Error> {
    let r = block_r(block.len())?;
    let params = Params::from_cost(n, r, 1)?;
    let n = usize::try_from(params.n()).map_err(|_| Error::InvalidParams("N is too large"))?;
    let abort = AtomicBool::new(false);
    romix::ro_mix(block, n, &Interrupt::new(None, &abort))
}
