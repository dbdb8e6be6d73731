//! Fan-out of the `p` independent ROMix lanes.
//!
//! Every lane is a disjoint slice of `B`, so lanes are mixed in place and the
//! result is in lane order no matter which worker finishes first.

use crate::{
    backends::Backend,
    cancel::{Cancel, Interrupt},
    Error,
};
use std::{sync::atomic::AtomicBool, thread};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Lanes {
    pub(crate) backend: Backend,
    pub(crate) lane_len: usize,
    pub(crate) n: usize,
}

impl Lanes {
    /// Mixes every lane of `b` using at most `workers` threads.
    ///
    /// When a lane fails the remaining workers are told to stop. The first
    /// error in lane order that is not a cancellation wins; a panic in a
    /// worker is resumed on the calling thread.
    pub(crate) fn run(
        self,
        b: &mut [u8],
        workers: usize,
        cancel: Option<&Cancel>,
    ) -> Result<(), Error> {
        let abort = AtomicBool::new(false);
        let interrupt = Interrupt::new(cancel, &abort);
        let count = b.len() / self.lane_len;
        if workers <= 1 || count <= 1 {
            log::debug!("scrypt: mixing {count} lane(s) on the calling thread");
            return self.mix_group(b, 0, &interrupt);
        }
        let per_worker = count.div_ceil(workers);
        log::debug!(
            "scrypt: mixing {count} lanes on {} worker threads",
            count.div_ceil(per_worker)
        );
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            let mut spawn_failed = false;
            for (w, group) in b.chunks_mut(per_worker * self.lane_len).enumerate() {
                let spawned = thread::Builder::new()
                    .name(format!("scrypt-lanes-{w}"))
                    .spawn_scoped(scope, move || {
                        self.mix_group(group, w * per_worker, &interrupt)
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        log::error!("scrypt: failed to spawn lane worker {w}: {err}");
                        interrupt.abort_siblings();
                        spawn_failed = true;
                        break;
                    }
                }
            }
            let mut outcomes = Vec::with_capacity(handles.len() + 1);
            for handle in handles {
                match handle.join() {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            if spawn_failed {
                outcomes.push(Err(Error::ThreadSpawn));
            }
            outcomes.into_iter().fold(Ok(()), merge)
        })
    }

    fn mix_group(
        self,
        group: &mut [u8],
        first: usize,
        interrupt: &Interrupt<'_>,
    ) -> Result<(), Error> {
        for (i, lane) in group.chunks_exact_mut(self.lane_len).enumerate() {
            log::trace!("scrypt: lane {} on the {} backend", first + i, self.backend.name());
            if let Err(err) = self.backend.ro_mix(lane, self.n, interrupt) {
                interrupt.abort_siblings();
                return Err(err);
            }
        }
        Ok(())
    }
}

fn merge(acc: Result<(), Error>, next: Result<(), Error>) -> Result<(), Error> {
    match (acc, next) {
        (Ok(()) | Err(Error::Cancelled), Err(err)) if err != Error::Cancelled => Err(err),
        (Ok(()), Err(err)) => Err(err),
        (acc, _) => acc,
    }
}
