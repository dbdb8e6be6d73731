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
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

//! Password hashing on top of the [`scrypt`] crate.
//!
//! Hashes are stored as `$s0$PARAMS$SALT$KEY` strings with a random 16-byte
//! salt and a 32-byte key.
//!
//! ```rust
//! let hasher = passhash::Hasher::new(
//!     passhash::scrypt::Params::new(10, 8, 1)?,
//!     passhash::scrypt::Options::default(),
//! );
//! let stored = hasher.hash(b"hunter2")?;
//! assert!(hasher.verify(b"hunter2", &stored)?);
//! assert!(!hasher.verify(b"hunter3", &stored)?);
//! # Ok::<(), passhash::Error>(())
//! ```

pub mod calibrate;
pub mod config;
pub mod error;
pub mod mcf;
pub mod task;

pub use config::Config;
pub use error::{Context, Error, ResultExt};
pub use scrypt;
use scrypt::{Options, Params};

/// Hashes and verifies passwords with fixed cost parameters.
///
/// Verification uses the parameters stored in each hash, so raising the
/// cost later still accepts older hashes.
#[derive(Debug, Clone)]
pub struct Hasher {
    params: Params,
    options: Options,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Hasher {
    #[must_use]
    pub const fn new(params: Params, options: Options) -> Self {
        Self { params, options }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.params(), config.options())
    }

    #[must_use]
    pub const fn params(&self) -> Params {
        self.params
    }

    pub fn hash(&self, password: &[u8]) -> Result<String, Error> {
        mcf::hash(password, &self.params, &self.options)
    }

    pub fn verify(&self, password: &[u8], hashed: &str) -> Result<bool, Error> {
        mcf::verify(password, hashed, &self.options)
    }
}
