//! Picks a work factor from wall-clock measurements on this machine.

use crate::error::Error;
use scrypt::{Options, Params};
use std::time::{Duration, Instant};

const PASSWORD: &[u8] = b"secret";
const SALT: &[u8] = b"1234";
const START_LOG_N: u8 = 6;

fn time(params: &Params, options: &Options) -> Result<Duration, Error> {
    let start = Instant::now();
    scrypt::derive_with(PASSWORD, SALT, params, options, 32)?;
    Ok(start.elapsed())
}

/// Returns the `N` whose derivation takes about `target` with the given `r`
/// and `p`.
///
/// `N` doubles from 64 until one derivation takes longer than `target`, then
/// steps back once if the overshoot is more than a quarter. It never grows
/// past what [`Options::max_memory`] allows.
pub fn cost_for(target: Duration, r: u32, p: u32, options: &Options) -> Result<u64, Error> {
    let mut params = Params::new(START_LOG_N, r, p)?;
    let workers = options.threads().clamp(1, usize::try_from(p).unwrap_or(usize::MAX));
    loop {
        let elapsed = time(&params, options)?;
        log::debug!("calibrate: N = {} took {elapsed:?}", params.n());
        if elapsed > target {
            if elapsed - elapsed / 4 > target && params.log_n() > START_LOG_N {
                params = Params::new(params.log_n() - 1, r, p)?;
            }
            break;
        }
        let Ok(next) = Params::new(params.log_n() + 1, r, p) else {
            break;
        };
        if next
            .memory_required(workers)
            .is_none_or(|m| m > options.max_memory())
        {
            log::debug!("calibrate: stopping at the memory ceiling");
            break;
        }
        params = next;
    }
    Ok(params.n())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_target_keeps_the_floor() {
        let n = cost_for(Duration::ZERO, 1, 1, &Options::new()).unwrap();
        assert_eq!(n, 64);
    }

    #[test]
    fn memory_ceiling_caps_the_cost() {
        // 128 * r * N bytes per worker: 2^12 blocks of 128 bytes fit in 512 KiB
        let options = Options::new().with_threads(1).with_max_memory(512 * 1024);
        let n = cost_for(Duration::from_secs(3600), 1, 1, &options).unwrap();
        assert!(n.is_power_of_two());
        assert!(n <= 1 << 12, "N = {n}");
        assert!(n >= 1 << 11, "N = {n}");
    }

    #[test]
    fn small_target() {
        let n = cost_for(Duration::from_millis(5), 1, 1, &Options::new()).unwrap();
        assert!(n.is_power_of_two());
        assert!(n >= 64);
    }

    #[test]
    fn invalid_costs() {
        let err = cost_for(Duration::ZERO, 0, 1, &Options::new()).unwrap_err();
        assert_eq!(err.scrypt_kind(), Some(scrypt::ErrorKind::InvalidParameter));
    }
}
