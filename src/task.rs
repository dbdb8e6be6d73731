//! Running derivations from async code.

use crate::error::Error;
use crypto_common::erase::Erase;
use scrypt::{Cancel, DerivedKey, Options, Params};

/// Cancels its token when dropped, so a derivation stops once the future
/// waiting on it goes away.
struct CancelOnDrop(Cancel);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Derives a key on tokio's blocking pool.
///
/// Dropping the returned future cancels the derivation. The password and
/// salt buffers are wiped once the derivation finishes.
pub async fn derive(
    mut password: Vec<u8>,
    mut salt: Vec<u8>,
    params: Params,
    options: Options,
    dk_len: usize,
) -> Result<DerivedKey, Error> {
    let cancel = options.cancel().map_or_else(Cancel::new, Cancel::child);
    let guard = CancelOnDrop(cancel.clone());
    let options = options.with_cancel(cancel);
    let res = tokio::task::spawn_blocking(move || {
        let res = scrypt::derive_with(&password, &salt, &params, &options, dk_len);
        password.iter_mut().erase();
        salt.iter_mut().erase();
        res
    })
    .await;
    drop(guard);
    match res {
        Ok(res) => Ok(res?),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            log::error!("key derivation task failed: {e}");
            Err(Error::TaskAborted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matches_the_blocking_call() {
        let params = Params::new(8, 2, 2).unwrap();
        let key = derive(
            b"password".to_vec(),
            b"salt".to_vec(),
            params,
            Options::new(),
            40,
        )
        .await
        .unwrap();
        let expected =
            scrypt::derive_with(b"password", b"salt", &params, &Options::new(), 40).unwrap();
        assert_eq!(key, expected);
    }

    #[tokio::test]
    async fn parent_cancellation_reaches_the_task() {
        let cancel = Cancel::new();
        cancel.cancel();
        let options = Options::new().with_cancel(cancel);
        let err = derive(b"pw".to_vec(), b"salt".to_vec(), Params::default(), options, 32)
            .await
            .unwrap_err();
        assert_eq!(err.scrypt_kind(), Some(scrypt::ErrorKind::Cancelled));
    }

    #[tokio::test]
    async fn errors_come_back_unchanged() {
        let options = Options::new().with_max_memory(1024);
        let err = derive(b"pw".to_vec(), b"salt".to_vec(), Params::default(), options, 32)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Scrypt(scrypt::Error::MemoryLimit { limit: 1024, .. })
        ));
    }
}
