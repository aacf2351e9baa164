use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::FrameCallbackId;

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    tasks: RefCell<Vec<TaskEntry>>,
    next_task_id: Cell<u64>,
    polling_tasks: Cell<bool>,
    // Ids cancelled while their entry was taken out for polling.
    cancelled_while_polling: RefCell<Vec<u64>>,
    task_waker: Waker,
}

struct TaskEntry {
    id: u64,
    future: Pin<Box<dyn Future<Output = ()> + 'static>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let task_waker = RuntimeTaskWaker::new(scheduler.clone()).into_waker();
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            tasks: RefCell::new(Vec::new()),
            next_task_id: Cell::new(1),
            polling_tasks: Cell::new(false),
            cancelled_while_polling: RefCell::new(Vec::new()),
            task_waker,
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn spawn_ui_task(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> u64 {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        self.tasks.borrow_mut().push(TaskEntry { id, future });
        self.schedule();
        id
    }

    fn cancel_task(&self, id: u64) {
        let mut tasks = self.tasks.borrow_mut();
        if tasks.iter().any(|entry| entry.id == id) {
            tasks.retain(|entry| entry.id != id);
            log::trace!("task {id} cancelled");
        } else if self.polling_tasks.get() {
            self.cancelled_while_polling.borrow_mut().push(id);
            log::trace!("task {id} cancelled during poll");
        }
    }

    fn was_cancelled_while_polling(&self, id: u64) -> bool {
        self.cancelled_while_polling.borrow().contains(&id)
    }

    fn poll_async_tasks(&self) -> bool {
        let mut cx = Context::from_waker(&self.task_waker);
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        let mut pending = Vec::with_capacity(tasks.len());
        let mut made_progress = false;
        self.polling_tasks.set(true);
        for mut entry in tasks.into_iter() {
            if self.was_cancelled_while_polling(entry.id) {
                continue;
            }
            match entry.future.as_mut().poll(&mut cx) {
                Poll::Ready(()) => {
                    made_progress = true;
                }
                Poll::Pending => {
                    pending.push(entry);
                }
            }
        }
        self.polling_tasks.set(false);
        let cancelled = std::mem::take(&mut *self.cancelled_while_polling.borrow_mut());
        pending.retain(|entry| !cancelled.contains(&entry.id));
        if !pending.is_empty() {
            self.tasks.borrow_mut().extend(pending);
        }
        made_progress
    }

    fn drain_ui(&self) {
        while self.poll_async_tasks() {}
    }

    fn has_pending_ui(&self) -> bool {
        self.tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true)
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        let callbacks_empty = callbacks.is_empty();
        drop(callbacks);
        if callbacks_empty && !self.has_pending_ui() {
            self.needs_frame.set(false);
        }
    }

    /// Runs the callbacks registered before this frame started.
    ///
    /// Entries are taken one at a time so a callback cancelled by an earlier
    /// one in the same batch is already gone from the queue. Ids grow
    /// monotonically, so anything registered during the drain is at or past
    /// `last_id` and waits for the next frame.
    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let last_id = self.next_frame_callback_id.get();
        loop {
            let callback = {
                let mut callbacks = self.frame_callbacks.borrow_mut();
                let due = callbacks.front().map_or(false, |entry| entry.id < last_id);
                if !due {
                    break;
                }
                callbacks.pop_front().and_then(|mut entry| entry.callback.take())
            };
            if let Some(callback) = callback {
                callback(frame_time_nanos);
            }
        }
        if !self.has_frame_callbacks() && !self.has_pending_ui() {
            self.needs_frame.set(false);
        }
    }
}

/// Owner of the runtime state. Dropping it turns every handle inert.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

/// Handle to a future spawned with [`RuntimeHandle::spawn_ui`].
pub struct TaskHandle {
    id: u64,
    runtime: RuntimeHandle,
}

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.schedule();
        }
    }

    pub fn spawn_ui<F>(&self, fut: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner.spawn_ui_task(Box::pin(fut));
            TaskHandle {
                id,
                runtime: self.clone(),
            }
        })
    }

    pub fn cancel_task(&self, id: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_task(id);
        }
    }

    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_pending_ui())
            .unwrap_or(false)
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(self) {
        self.runtime.cancel_task(self.id);
    }
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct RuntimeTaskWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl RuntimeTaskWaker {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self { scheduler }
    }

    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for RuntimeTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}
