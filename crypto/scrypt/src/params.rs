use crate::Error;

/// Validated scrypt cost parameters.
///
/// `N` is stored as its base-2 logarithm, so a `Params` value always
/// describes a power of two greater than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub(crate) log_n: u8,
    pub(crate) r: u32,
    pub(crate) p: u32,
}

impl Default for Params {
    /// `N = 2^14, r = 8, p = 1`, the interactive-login setting from the scrypt paper.
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

impl Params {
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, Error> {
        if log_n == 0 {
            return Err(Error::InvalidParams("N must be greater than 1"));
        }
        if r == 0 {
            return Err(Error::InvalidParams("r must be at least 1"));
        }
        if p == 0 {
            return Err(Error::InvalidParams("p must be at least 1"));
        }
        if u32::from(log_n) >= usize::BITS {
            return Err(Error::InvalidParams("N is too large for this platform"));
        }
        // the lane blocks are one PBKDF2 output of 128 * r * p bytes
        if u64::from(r) * u64::from(p) >= 0x4000_0000 {
            return Err(Error::InvalidParams("r * p must be less than 2^30"));
        }
        let too_large = Error::InvalidParams("memory size overflows");
        let r = usize::try_from(r).map_err(|_| too_large)?;
        let p = usize::try_from(p).map_err(|_| too_large)?;
        let r128 = r.checked_mul(128).ok_or(too_large)?;
        r128.checked_mul(p).ok_or(too_large)?;
        r128.checked_mul(1 << log_n).ok_or(too_large)?;
        Ok(Self {
            log_n,
            r: r as u32,
            p: p as u32,
        })
    }

    /// Builds parameters from the cost factor `N` itself rather than its logarithm.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_cost(n: u64, r: u32, p: u32) -> Result<Self, Error> {
        if n <= 1 {
            return Err(Error::InvalidParams("N must be greater than 1"));
        }
        if !n.is_power_of_two() {
            return Err(Error::InvalidParams("N must be a power of 2"));
        }
        Self::new(n.trailing_zeros() as u8, r, p)
    }

    #[must_use]
    pub const fn log_n(&self) -> u8 {
        self.log_n
    }

    #[must_use]
    pub const fn n(&self) -> u64 {
        1 << self.log_n
    }

    #[must_use]
    pub const fn r(&self) -> u32 {
        self.r
    }

    #[must_use]
    pub const fn p(&self) -> u32 {
        self.p
    }

    pub(crate) const fn block_len(&self) -> usize {
        self.r as usize * 128
    }

    /// Peak number of bytes a derivation needs when `workers` lanes run at
    /// the same time.
    ///
    /// Every running lane owns a scratch array of `N` blocks plus two
    /// working blocks; the `p` lane blocks themselves are shared.
    #[must_use]
    pub fn memory_required(&self, workers: usize) -> Option<u64> {
        let r128 = u64::from(self.r) * 128;
        let workers = u64::try_from(workers).ok()?.clamp(1, u64::from(self.p));
        let per_worker = r128.checked_mul(self.n())?.checked_add(2 * r128)?;
        per_worker
            .checked_mul(workers)?
            .checked_add(r128.checked_mul(u64::from(self.p))?)
    }
}
