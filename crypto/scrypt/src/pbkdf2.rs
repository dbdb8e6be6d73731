use crate::{hmac::HmacSha256, Error};
use crypto_common::erase::Erase;

/// Largest PBKDF2 output: `(2^32 - 1)` blocks of 32 bytes.
pub(crate) const MAX_OUTPUT_LEN: u64 = 0xffff_ffff * 32;

pub(crate) const fn check_output_len(len: usize) -> Result<(), Error> {
    if len == 0 || len as u64 > MAX_OUTPUT_LEN {
        Err(Error::InvalidOutputLen)
    } else {
        Ok(())
    }
}

/// PBKDF2 with HMAC-SHA256 as the PRF.
///
/// `output` may be any length from 1 byte to `(2^32 - 1) * 32` bytes, and
/// `rounds` must be at least 1.
pub fn pbkdf2_hmac_sha256(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    output: &mut [u8],
) -> Result<(), Error> {
    if rounds == 0 {
        return Err(Error::InvalidParams("PBKDF2 needs at least one round"));
    }
    check_output_len(output.len())?;
    pbkdf2(password, salt, rounds, output);
    Ok(())
}

/// Unchecked PBKDF2; callers validate `rounds` and the output length.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn pbkdf2(password: &[u8], salt: &[u8], rounds: u32, res: &mut [u8]) {
    let hmac = HmacSha256::new(password);
    for (i, chunk) in res.chunks_mut(32).enumerate() {
        block(i as u32 + 1, chunk, &hmac, salt, rounds);
    }
}

/// `T_i = U_1 ^ U_2 ^ ... ^ U_c` with `U_1 = PRF(P, S || INT(i))`.
#[inline(always)]
fn block(index: u32, chunk: &mut [u8], hmac: &HmacSha256, salt: &[u8], rounds: u32) {
    chunk.fill(0);
    let mut u = {
        let mut prf = hmac.clone();
        prf.update(salt);
        prf.update(&index.to_be_bytes());
        prf.finalize()
    };
    xor(chunk, &u);
    for _ in 1..rounds {
        let mut prf = hmac.clone();
        prf.update(&u);
        u = prf.finalize();
        xor(chunk, &u);
    }
    u.erase();
}

#[inline(always)]
fn xor(res: &mut [u8], u: &[u8]) {
    debug_assert!(u.len() >= res.len(), "length mismatch in xor");
    res.iter_mut().zip(u.iter()).for_each(|(a, b)| *a ^= b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_common::encoding::from_hex;

    fn check(password: &[u8], salt: &[u8], rounds: u32, hex: &str) {
        let mut expected = vec![0; hex.len() / 2];
        from_hex(hex, &mut expected).unwrap();
        let mut out = vec![0; expected.len()];
        pbkdf2_hmac_sha256(password, salt, rounds, &mut out).unwrap();
        assert_eq!(out, expected);
    }

    // RFC 7914, section 11
    #[test]
    fn rfc7914() {
        check(
            b"passwd",
            b"salt",
            1,
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc\
             49ca9cccf179b645991664b39d77ef317c71b845b1e30bd509112041d3a19783",
        );
    }

    #[test]
    fn many_rounds() {
        check(
            b"password",
            b"salt",
            4096,
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a",
        );
    }

    #[test]
    fn partial_final_block() {
        let mut long = [0; 64];
        pbkdf2_hmac_sha256(b"passwd", b"salt", 1, &mut long).unwrap();
        let mut short = [0; 40];
        pbkdf2_hmac_sha256(b"passwd", b"salt", 1, &mut short).unwrap();
        assert_eq!(short[..], long[..40]);
    }

    #[test]
    fn rejects_bad_arguments() {
        let mut out = [0; 32];
        assert_eq!(
            pbkdf2_hmac_sha256(b"p", b"s", 0, &mut out),
            Err(Error::InvalidParams("PBKDF2 needs at least one round"))
        );
        assert_eq!(
            pbkdf2_hmac_sha256(b"p", b"s", 1, &mut []),
            Err(Error::InvalidOutputLen)
        );
    }
}
