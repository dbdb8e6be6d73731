//! Lowercase hex over caller-provided buffers.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEncoding;

impl core::fmt::Display for InvalidEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("invalid encoding")
    }
}

struct Hex<'a> {
    inner: core::slice::Iter<'a, u8>,
    next: Option<u8>,
}

impl Hex<'_> {
    const TABLE: &'static [u8; 16] = b"0123456789abcdef";
}

impl Iterator for Hex<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next.take() {
            Some(c) => Some(c),
            None => self.inner.next().map(|b| {
                let current = Self::TABLE[(b >> 4) as usize];
                self.next = Some(Self::TABLE[(b & 0xf) as usize]);
                current
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let length = self.len();
        (length, Some(length))
    }
}

impl core::iter::ExactSizeIterator for Hex<'_> {
    fn len(&self) -> usize {
        let mut length = self.inner.len() * 2;
        if self.next.is_some() {
            length += 1;
        }
        length
    }
}

/// Writes the lowercase hex encoding of `inp` into `out`.
///
/// `out` should be `2 * inp.len()` bytes long; extra output bytes are left
/// untouched and extra input is ignored.
pub fn hex(inp: &[u8], out: &mut [u8]) {
    let iter = Hex {
        inner: inp.iter(),
        next: None,
    };
    for (i, j) in iter.zip(out.iter_mut()) {
        *j = i;
    }
}

/// Decodes exactly `buf.len()` bytes of hex from `s`. Both cases are accepted.
pub fn from_hex(s: &str, buf: &mut [u8]) -> Result<(), InvalidEncoding> {
    const fn decode_char(b: u8) -> Result<u8, InvalidEncoding> {
        match b {
            b'a'..=b'f' => Ok(b - b'a' + 10),
            b'A'..=b'F' => Ok(b - b'A' + 10),
            b'0'..=b'9' => Ok(b - b'0'),
            _ => Err(InvalidEncoding),
        }
    }
    let bytes = s.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(InvalidEncoding);
    }
    if bytes.len() != buf.len() * 2 {
        return Err(InvalidEncoding);
    }
    for (i, b) in buf.iter_mut().enumerate() {
        *b = decode_char(bytes[i * 2])? << 4 | decode_char(bytes[i * 2 + 1])?;
    }
    Ok(())
}
