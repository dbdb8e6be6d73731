use crate::Error;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cooperative cancellation token.
///
/// Clones share the same flag. A token made with [`Cancel::child`] also
/// observes its parent, so cancelling the parent stops every child while a
/// child can be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct Cancel {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<Cancel>>,
}

impl Cancel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::default(),
            parent: Some(Arc::new(self.clone())),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.parent.as_deref().is_some_and(Self::is_cancelled)
    }
}

/// What a running lane polls between ROMix iterations: the caller's token
/// and the abort flag shared by sibling lanes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Interrupt<'a> {
    cancel: Option<&'a Cancel>,
    abort: &'a AtomicBool,
}

impl<'a> Interrupt<'a> {
    pub(crate) const fn new(cancel: Option<&'a Cancel>, abort: &'a AtomicBool) -> Self {
        Self { cancel, abort }
    }

    #[inline(always)]
    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.abort.load(Ordering::Relaxed) || self.cancel.is_some_and(Cancel::is_cancelled) {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    pub(crate) fn abort_siblings(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }
}
