//! Modular Crypt Format style password hashes.
//!
//! A hash looks like `$s0$e0801$<salt>$<key>`. The second field is the cost
//! packed as `log2(N) << 16 | r << 8 | p` in lowercase hex; salt and key are
//! padded base64.

use crate::error::Error;
use base64::engine::{general_purpose::STANDARD, Engine as _};
use crypto_common::erase::Erase;
use rand_core::{OsRng, RngCore};
use scrypt::{Options, Params};
use std::fmt::{Debug, Display};

const ID: &str = "s0";
pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

/// A parsed password hash.
pub struct Hashed {
    params: Params,
    packed: u64,
    salt: Vec<u8>,
    key: Vec<u8>,
}

fn encode_params(params: &Params) -> Result<u64, Error> {
    let r = u8::try_from(params.r()).map_err(|_| Error::Unencodable("r must be below 256"))?;
    let p = u8::try_from(params.p()).map_err(|_| Error::Unencodable("p must be below 256"))?;
    Ok((u64::from(params.log_n()) << 16) | (u64::from(r) << 8) | u64::from(p))
}

fn decode_params(field: &str) -> Result<(Params, u64), Error> {
    if field.is_empty() || field.len() > 6 || !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MalformedHash("bad parameter field"));
    }
    let v =
        u32::from_str_radix(field, 16).map_err(|_| Error::MalformedHash("bad parameter field"))?;
    let log_n = u8::try_from(v >> 16).map_err(|_| Error::MalformedHash("cost out of range"))?;
    let params = Params::new(log_n, (v >> 8) & 0xff, v & 0xff)?;
    Ok((params, u64::from(v)))
}

fn decode_base64(field: &str, what: &'static str) -> Result<Vec<u8>, Error> {
    let out = STANDARD.decode(field).map_err(|_| Error::MalformedHash(what))?;
    if out.is_empty() {
        return Err(Error::MalformedHash(what));
    }
    Ok(out)
}

impl Hashed {
    /// Parses `$s0$PARAMS$SALT$KEY`.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let mut fields = s.split('$');
        let (Some(""), Some(id), Some(params), Some(salt), Some(key), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(Error::MalformedHash("expected 5 `$`-separated fields"));
        };
        if id != ID {
            return Err(Error::MalformedHash("unknown algorithm identifier"));
        }
        let (params, packed) = decode_params(params)?;
        Ok(Self {
            params,
            packed,
            salt: decode_base64(salt, "bad salt")?,
            key: decode_base64(key, "bad key")?,
        })
    }

    #[must_use]
    pub const fn params(&self) -> Params {
        self.params
    }

    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl Display for Hashed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "${ID}${:x}${}${}",
            self.packed,
            STANDARD.encode(&self.salt),
            STANDARD.encode(&self.key)
        )
    }
}

impl Debug for Hashed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hashed")
            .field("params", &self.params)
            .field("salt_len", &self.salt.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Hashed {
    fn drop(&mut self) {
        self.key.iter_mut().erase();
    }
}

/// Hashes `password` with a fresh random salt.
pub fn hash(password: &[u8], params: &Params, options: &Options) -> Result<String, Error> {
    let mut salt = [0; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt)?;
    hash_with_salt(password, &salt, params, options)
}

pub fn hash_with_salt(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    options: &Options,
) -> Result<String, Error> {
    // reject unencodable parameters before paying for the derivation
    let packed = encode_params(params)?;
    let key = scrypt::derive_with(password, salt, params, options, KEY_LEN)?;
    let hashed = Hashed {
        params: *params,
        packed,
        salt: salt.to_vec(),
        key: key.as_bytes().to_vec(),
    };
    Ok(hashed.to_string())
}

/// Checks `password` against a stored hash. A malformed hash is an error; a
/// wrong password is `Ok(false)`.
pub fn verify(password: &[u8], hashed: &str, options: &Options) -> Result<bool, Error> {
    let hashed = Hashed::parse(hashed)?;
    let key = scrypt::derive_with(
        password,
        hashed.salt(),
        &hashed.params(),
        options,
        hashed.key().len(),
    )?;
    Ok(key == *hashed.key())
}
