//! # DevRS Exec Interruption
//!
//! File: exec/src/common/process/interrupt.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! `InterruptHandle` lets another thread or task abandon an execution that is
//! blocked waiting for its child. The request is latched: if it arrives
//! before the executor starts waiting, the next wait observes it immediately.
//! Observing the request consumes it, so a later execution starts clean.
//!
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

/// Cloneable handle used to interrupt a waiting execution.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    inner: Arc<Inner>,
}

impl InterruptHandle {
    /// A handle with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests interruption of the current (or next) wait.
    pub fn interrupt(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether a request is pending.
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Completes once an interruption is requested, consuming the request.
    pub async fn requested(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent `interrupt` is not missed.
            notified.as_mut().enable();
            if self.inner.requested.swap(false, Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}
