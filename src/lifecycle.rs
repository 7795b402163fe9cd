//! Cancellation scope tied to a page instance.
//!
//! Every request a page issues runs through [`Lifetime::run`]. Ending the
//! lifetime aborts whatever is still in flight, and a call that resolves
//! after the end reports [`ClientError::Cancelled`] so the page never
//! writes state once it is gone.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{abortable, AbortHandle, Aborted};

use crate::error::ClientError;

#[derive(Debug, Default)]
struct Scope {
    ended: bool,
    next_id: u64,
    in_flight: HashMap<u64, AbortHandle>,
}

/// Cloneable handle; all clones share one scope.
#[derive(Debug, Clone, Default)]
pub struct Lifetime {
    scope: Arc<Mutex<Scope>>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    fn scope(&self) -> MutexGuard<'_, Scope> {
        match self.scope.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn is_ended(&self) -> bool {
        self.scope().ended
    }

    pub fn in_flight(&self) -> usize {
        self.scope().in_flight.len()
    }

    /// Abort everything in flight and refuse new work. Idempotent.
    pub fn end(&self) {
        let handles: Vec<AbortHandle> = {
            let mut scope = self.scope();
            scope.ended = true;
            scope.in_flight.drain().map(|(_, handle)| handle).collect()
        };

        if !handles.is_empty() {
            tracing::debug!(aborted = handles.len(), "lifetime ended with calls in flight");
        }
        for handle in handles {
            handle.abort();
        }
    }

    pub async fn run<F, T>(&self, work: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let (work, handle) = abortable(work);

        let registration = {
            let mut scope = self.scope();
            if scope.ended {
                return Err(ClientError::Cancelled);
            }
            let id = scope.next_id;
            scope.next_id += 1;
            scope.in_flight.insert(id, handle);
            Registration { lifetime: self, id }
        };

        let outcome = work.await;
        drop(registration);
        let ended = self.is_ended();

        match outcome {
            Err(Aborted) => Err(ClientError::Cancelled),
            Ok(_) if ended => Err(ClientError::Cancelled),
            Ok(result) => result,
        }
    }
}

/// Deregisters a call when its `run` future completes or is dropped.
struct Registration<'a> {
    lifetime: &'a Lifetime,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.lifetime.scope().in_flight.remove(&self.id);
    }
}
