//! The patch dispatcher: owns outstanding deferred computations and exposes
//! them as a lazy result sequence, in completion order.

use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use futures::{
    future::BoxFuture,
    stream::{FuturesUnordered, Stream, StreamExt},
};

use crate::{
    executor::{path::PathSegment, ExecutionError},
    value::Value,
};

pub(crate) type PatchFuture = BoxFuture<'static, Patch>;

/// One settled unit of deferred work, ready for emission.
#[derive(Debug)]
pub(crate) struct Patch {
    pub data: Option<Value>,
    pub path: Option<Vec<PathSegment>>,
    pub label: Option<String>,
    pub errors: Vec<ExecutionError>,
}

impl Patch {
    /// The marker patch closing an async-iterator stream: no data, no path.
    pub(crate) fn closing() -> Self {
        Self {
            data: None,
            path: None,
            label: None,
            errors: Vec::new(),
        }
    }
}

/// Owns the multiset of outstanding patch workers.
///
/// Workers are parked in an injection queue and only move into the racing
/// pool between pulls, so a worker can schedule further work (nested
/// `@defer`, stream continuations) while the pool is being polled.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    queued: Arc<Mutex<Vec<PatchFuture>>>,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Enqueues a patch worker.
    pub(crate) fn schedule(&self, worker: PatchFuture) {
        tracing::trace!("scheduling incremental patch worker");
        self.queued.lock().unwrap().push(worker);
    }

    /// Whether any workers were scheduled and not yet claimed by a stream.
    pub(crate) fn has_work(&self) -> bool {
        !self.queued.lock().unwrap().is_empty()
    }

    fn drain_into(&self, pool: &FuturesUnordered<PatchFuture>) {
        for worker in self.queued.lock().unwrap().drain(..) {
            pool.push(worker);
        }
    }
}

/// One element of an incremental result sequence: the initial result or a
/// patch, each carrying the terminal flag.
#[derive(Debug)]
pub struct ResponsePayload {
    data: Option<Value>,
    path: Option<Vec<PathSegment>>,
    label: Option<String>,
    errors: Vec<ExecutionError>,
    has_next: bool,
}

impl ResponsePayload {
    /// The payload data. Absent only on the closing patch of an
    /// async-iterator stream.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The response path anchoring this payload. Absent on the initial
    /// result and on closing patches.
    pub fn path(&self) -> Option<&[PathSegment]> {
        self.path.as_deref()
    }

    /// The label of the `@defer`/`@stream` directive this payload stems
    /// from, if one was given.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The errors owned by this delivery unit.
    pub fn errors(&self) -> &[ExecutionError] {
        &self.errors
    }

    /// The terminal flag: `false` exactly on the last emitted payload.
    pub fn has_next(&self) -> bool {
        self.has_next
    }
}

/// The lazy incremental result sequence: the initial result first, then each
/// patch as it completes.
///
/// Dropping the stream abandons all outstanding workers; no abort is
/// propagated to user resolvers.
pub struct ResponseStream {
    initial: Option<(Value, Vec<ExecutionError>)>,
    dispatcher: Dispatcher,
    pool: FuturesUnordered<PatchFuture>,
    done: bool,
}

impl ResponseStream {
    pub(crate) fn new(data: Value, errors: Vec<ExecutionError>, dispatcher: Dispatcher) -> Self {
        Self {
            initial: Some((data, errors)),
            dispatcher,
            pool: FuturesUnordered::new(),
            done: false,
        }
    }
}

impl Stream for ResponseStream {
    type Item = ResponsePayload;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        if let Some((data, errors)) = this.initial.take() {
            // The sequence shape is only chosen when patches are outstanding,
            // so the initial result is never terminal.
            return Poll::Ready(Some(ResponsePayload {
                data: Some(data),
                path: None,
                label: None,
                errors,
                has_next: true,
            }));
        }

        loop {
            this.dispatcher.drain_into(&this.pool);

            match this.pool.poll_next_unpin(cx) {
                Poll::Ready(Some(patch)) => {
                    // A settling worker may have scheduled follow-up work;
                    // the terminal flag must see it.
                    this.dispatcher.drain_into(&this.pool);
                    let has_next = !this.pool.is_empty();
                    if !has_next {
                        this.done = true;
                    }
                    tracing::trace!(
                        label = patch.label.as_deref(),
                        has_next,
                        "emitting incremental patch"
                    );
                    return Poll::Ready(Some(ResponsePayload {
                        data: patch.data,
                        path: patch.path,
                        label: patch.label,
                        errors: patch.errors,
                        has_next,
                    }));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    return Poll::Ready(None);
                }
                // In-flight workers may have scheduled follow-up work during
                // this very poll (nested defers, stream continuations); take
                // the race again so fresh workers get polled right away.
                Poll::Pending if this.dispatcher.has_work() => continue,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
