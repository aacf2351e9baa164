//! Bridge from blocking worker threads back into runtime futures.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};

/// The worker finished without producing a value (it panicked or was torn down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("background work ended without a result")]
pub struct Canceled;

/// Cooperative cancellation token passed into background work.
///
/// The token flips to "cancelled" once the [`BackgroundTask`] awaiting the
/// work is dropped. Blocking I/O is not interrupted; long-running work should
/// check the token between steps.
#[derive(Clone)]
pub struct CancelToken {
    active: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        !self.active.load(Ordering::SeqCst)
    }
}

enum Slot<T> {
    Waiting(Option<Waker>),
    Done(Result<T, Canceled>),
    Taken,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn complete(&self, value: Result<T, Canceled>) {
        let waker = {
            let mut slot = self.lock();
            match std::mem::replace(&mut *slot, Slot::Done(value)) {
                Slot::Waiting(waker) => waker,
                previous => {
                    *slot = previous;
                    None
                }
            }
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Delivers [`Canceled`] if the worker unwinds before reporting.
struct Completion<T> {
    shared: Arc<Shared<T>>,
    sent: bool,
}

impl<T> Completion<T> {
    fn send(mut self, value: T) {
        self.sent = true;
        self.shared.complete(Ok(value));
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        if !self.sent {
            log::warn!("background worker ended without a result");
            self.shared.complete(Err(Canceled));
        }
    }
}

/// Future resolving to the result of work started with [`spawn_blocking`].
pub struct BackgroundTask<T> {
    shared: Arc<Shared<T>>,
    active: Arc<AtomicBool>,
}

impl<T> Future for BackgroundTask<T> {
    type Output = Result<T, Canceled>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.shared.lock();
        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Done(result) => Poll::Ready(result),
            Slot::Waiting(_) => {
                *slot = Slot::Waiting(Some(cx.waker().clone()));
                Poll::Pending
            }
            Slot::Taken => Poll::Ready(Err(Canceled)),
        }
    }
}

impl<T> Drop for BackgroundTask<T> {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Runs `work` on a worker thread and returns a future for its result.
///
/// The future is meant to be awaited inside a task spawned on the runtime, so
/// whatever consumes the value runs on the UI thread. Waking goes through the
/// waker of the polling task, which for runtime tasks schedules a frame.
pub fn spawn_blocking<T, Work>(work: Work) -> BackgroundTask<T>
where
    T: Send + 'static,
    Work: FnOnce(CancelToken) -> T + Send + 'static,
{
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot::Waiting(None)),
    });
    let active = Arc::new(AtomicBool::new(true));

    let completion = Completion {
        shared: Arc::clone(&shared),
        sent: false,
    };
    let token = CancelToken {
        active: Arc::clone(&active),
    };
    std::thread::spawn(move || {
        let value = work(token);
        completion.send(value);
    });

    BackgroundTask { shared, active }
}
