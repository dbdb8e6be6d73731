#![deny(
    dead_code,
    deprecated,
    future_incompatible,
    missing_copy_implementations,
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
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::inline_always,
    clippy::module_name_repetitions
)]

//! The scrypt password-based key derivation function ([RFC 7914]).
//!
//! ```rust
//! let params = scrypt::Params::from_cost(1024, 8, 1)?;
//! let mut key = [0; 32];
//! scrypt::scrypt(b"password", b"salt", &params, &mut key)?;
//! # Ok::<(), scrypt::Error>(())
//! ```
//!
//! ROMix runs on SSE2 (x86, detected at runtime) or NEON (aarch64, fixed at
//! compile time) when available and falls back to a portable implementation
//! otherwise. Every backend produces identical output.
//!
//! [RFC 7914]: https://www.rfc-editor.org/rfc/rfc7914

mod backends;
mod cancel;
mod error;
pub mod hazmat;
mod hmac;
mod key;
mod lanes;
mod options;
mod params;
mod pbkdf2;
mod romix;
mod salsa;
mod scratch;

use backends::Backend;
pub use backends::native_available;
pub use cancel::Cancel;
pub use error::{Error, ErrorKind};
use crypto_common::erase::Erase;
pub use key::DerivedKey;
use lanes::Lanes;
pub use options::{Implementation, Options, DEFAULT_MAX_MEMORY};
pub use params::Params;
use pbkdf2::{check_output_len, pbkdf2};
pub use pbkdf2::pbkdf2_hmac_sha256;
use scratch::Scratch;

/// Whether [`Implementation::Auto`] picks a native backend on this machine.
#[must_use]
pub fn using_native_acceleration() -> bool {
    Backend::select(Implementation::Auto).is_ok_and(Backend::is_native)
}

/// Derives `output.len()` bytes from `password` and `salt` with default
/// [`Options`].
pub fn scrypt(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    output: &mut [u8],
) -> Result<(), Error> {
    scrypt_with(password, salt, params, &Options::default(), output)
}

/// Derives `output.len()` bytes from `password` and `salt`.
///
/// All validation happens before any work: an invalid output length, a
/// memory requirement above [`Options::max_memory`] or an unavailable
/// [`Implementation::Native`] backend fail immediately. On any error
/// `output` is zeroed.
pub fn scrypt_with(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    options: &Options,
    output: &mut [u8],
) -> Result<(), Error> {
    let res = run(password, salt, params, options, output);
    if res.is_err() {
        output.iter_mut().erase();
    }
    res
}

fn run(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    options: &Options,
    output: &mut [u8],
) -> Result<(), Error> {
    check_output_len(output.len())?;
    let backend = Backend::select(options.implementation())?;
    let p = usize::try_from(params.p()).map_err(|_| Error::InvalidParams("p is too large"))?;
    let workers = options.threads().clamp(1, p);
    let required = params
        .memory_required(workers)
        .ok_or(Error::InvalidParams("memory size overflows"))?;
    if required > options.max_memory() {
        return Err(Error::MemoryLimit {
            required,
            limit: options.max_memory(),
        });
    }
    let n = usize::try_from(params.n()).map_err(|_| Error::InvalidParams("N is too large"))?;
    log::debug!(
        "scrypt: N = {n}, r = {}, p = {p}, {required} bytes over {workers} worker(s)",
        params.r()
    );

    let lane_len = params.block_len();
    let mut b = Scratch::new(lane_len * p, 0u8)?;
    pbkdf2(password, salt, 1, &mut b);
    Lanes {
        backend,
        lane_len,
        n,
    }
    .run(&mut b, workers, options.cancel())?;
    pbkdf2(password, &b, 1, output);
    Ok(())
}

/// Derives a `dk_len`-byte key with default [`Options`], validating the raw
/// cost parameters on the way.
pub fn derive(
    password: &[u8],
    salt: &[u8],
    n: u64,
    r: u32,
    p: u32,
    dk_len: usize,
) -> Result<DerivedKey, Error> {
    let params = Params::from_cost(n, r, p)?;
    derive_with(password, salt, &params, &Options::default(), dk_len)
}

pub fn derive_with(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    options: &Options,
    dk_len: usize,
) -> Result<DerivedKey, Error> {
    check_output_len(dk_len)?;
    let mut out = Vec::new();
    out.try_reserve_exact(dk_len)
        .map_err(|_| Error::OutOfMemory { requested: dk_len })?;
    out.resize(dk_len, 0);
    let mut key = DerivedKey::new(out);
    scrypt_with(password, salt, params, options, key.as_mut_bytes())?;
    Ok(key)
}
