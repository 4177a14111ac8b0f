//! Thread-local resolution state.
//!
//! Tracks the stack of containers currently running an initializer and the
//! depth of nested resolutions. Both are confined to the calling thread: two
//! threads constructing at the same time each see their own stack.

use std::cell::RefCell;

use crate::container::Container;
use crate::error::{DiError, DiResult};

/// Deepest chain of nested resolutions before giving up.
pub const MAX_RESOLUTION_DEPTH: usize = 128;

thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    constructing: Vec<Container>,
    depth: usize,
}

/// Guard marking `container` as the one running an initializer
pub(crate) struct ConstructionGuard {
    _private: (),
}

impl ConstructionGuard {
    pub(crate) fn enter(container: &Container) -> Self {
        RESOLUTION_TLS.with(|tls| tls.borrow_mut().constructing.push(container.clone()));
        Self { _private: () }
    }
}

impl Drop for ConstructionGuard {
    fn drop(&mut self) {
        // Dropped outside the borrow, a container's values may touch this state.
        let _popped = RESOLUTION_TLS.with(|tls| tls.borrow_mut().constructing.pop());
    }
}

/// Guard counting one level of nested resolution
pub(crate) struct DepthGuard {
    _private: (),
}

impl DepthGuard {
    pub(crate) fn enter() -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if tls.depth >= MAX_RESOLUTION_DEPTH {
                return Err(DiError::DepthExceeded(tls.depth));
            }
            tls.depth += 1;
            Ok(Self { _private: () })
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            tls.depth = tls.depth.saturating_sub(1);
        });
    }
}

/// The innermost container currently running an initializer on this thread.
pub(crate) fn current() -> Option<Container> {
    RESOLUTION_TLS.with(|tls| tls.borrow().constructing.last().cloned())
}

/// Forgets every container recorded on this thread.
pub(crate) fn clear() {
    let _cleared = RESOLUTION_TLS.with(|tls| std::mem::take(&mut tls.borrow_mut().constructing));
}
