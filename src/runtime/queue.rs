//! Execution queues
//!
//! A queue is bound to one device of one backend. Work is submitted as a
//! command group: the group declares its buffer accesses and at most one
//! interop task, and the queue runs the task once every conflicting earlier
//! submission (on any queue) has completed.
//!
//! In [`ExecutionMode::Deferred`] (the default) tasks run on the queue's
//! worker thread in submission order and failures are captured as
//! asynchronous errors. In [`ExecutionMode::Inline`] the task runs on the
//! submitting thread and failures are returned directly.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use super::buffer::{AccessMode, Buffer, registration_lock};
use super::event::{Completion, Event};
use super::interop::{Accessor, InteropHandle};
use super::platform::Platform;
use super::traits::{Backend, Device};
use crate::dtype::Element;
use crate::error::{Error, Result};

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(0);

/// Handler receiving the asynchronous errors captured by a queue
pub type AsyncHandler = Arc<dyn Fn(Vec<Error>) + Send + Sync>;

type Task<B> = Box<dyn FnOnce(&mut InteropHandle<'_, B>) -> Result<()> + Send>;
type Job = Box<dyn FnOnce() + Send>;

/// Where submitted tasks execute
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// On the queue's worker thread, in submission order
    #[default]
    Deferred,
    /// On the submitting thread, before `submit` returns
    Inline,
}

/// Queue construction options
///
/// # Example
///
/// ```
/// use blashal::runtime::{ExecutionMode, QueueConfig};
///
/// let config = QueueConfig::new()
///     .with_mode(ExecutionMode::Inline)
///     .with_label("solver");
/// assert_eq!(config.mode(), ExecutionMode::Inline);
/// ```
#[derive(Clone, Default)]
pub struct QueueConfig {
    mode: ExecutionMode,
    handler: Option<AsyncHandler>,
    label: Option<String>,
}

impl QueueConfig {
    /// Default configuration: deferred execution, no handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution mode
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Install the asynchronous error handler
    pub fn with_async_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Vec<Error>) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Label used in logs and for the worker thread name
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Configured execution mode
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }
}

impl fmt::Debug for QueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueConfig")
            .field("mode", &self.mode)
            .field("handler", &self.handler.is_some())
            .field("label", &self.label)
            .finish()
    }
}

struct Worker {
    sender: mpsc::Sender<Job>,
    thread: JoinHandle<()>,
}

struct QueueInner<B: Backend> {
    id: u64,
    device: B::Device,
    label: String,
    platform: Platform<B>,
    handle: OnceLock<Arc<B::Handle>>,
    handle_init: Mutex<()>,
    mode: ExecutionMode,
    handler: Option<AsyncHandler>,
    async_errors: Arc<Mutex<Vec<Error>>>,
    last_event: Mutex<Option<Event>>,
    worker: Mutex<Option<Worker>>,
}

impl<B: Backend> Drop for QueueInner<B> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            drop(worker.sender);
            if worker.thread.join().is_err() {
                warn!(queue = %self.label, "queue worker panicked");
            }
        }
        let pending = self.async_errors.lock().len();
        if pending > 0 {
            warn!(
                queue = %self.label,
                pending,
                "queue dropped with undelivered asynchronous errors"
            );
        }
        debug!(queue = %self.label, "queue destroyed");
    }
}

/// Ordered submission queue bound to one device
///
/// Clones share the same queue.
pub struct Queue<B: Backend> {
    inner: Arc<QueueInner<B>>,
}

impl<B: Backend> Clone for Queue<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Backend> fmt::Debug for Queue<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("backend", &B::name())
            .field("device", &self.inner.device)
            .field("label", &self.inner.label)
            .field("mode", &self.inner.mode)
            .finish()
    }
}

impl<B: Backend> Queue<B> {
    pub(crate) fn new(platform: Platform<B>, device: B::Device, config: QueueConfig) -> Result<Self> {
        let id = NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed);
        let label = config
            .label
            .unwrap_or_else(|| format!("{}:{}#{}", B::name(), device.id(), id));

        let worker = match config.mode {
            ExecutionMode::Deferred => Some(spawn_worker(&label)?),
            ExecutionMode::Inline => None,
        };

        debug!(queue = %label, device = %device.name(), mode = ?config.mode, "queue created");

        Ok(Self {
            inner: Arc::new(QueueInner {
                id,
                device,
                label,
                platform,
                handle: OnceLock::new(),
                handle_init: Mutex::new(()),
                mode: config.mode,
                handler: config.handler,
                async_errors: Arc::new(Mutex::new(Vec::new())),
                last_event: Mutex::new(None),
                worker: Mutex::new(worker),
            }),
        })
    }

    /// Process-unique queue identifier
    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Device this queue is bound to
    #[inline]
    pub fn device(&self) -> &B::Device {
        &self.inner.device
    }

    /// Queue label
    #[inline]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Execution mode
    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.inner.mode
    }

    /// Platform that created this queue
    #[inline]
    pub fn platform(&self) -> &Platform<B> {
        &self.inner.platform
    }

    /// The queue's native handle, created on first use
    ///
    /// The first call resolves the device context through the platform
    /// (creating it if needed) and then creates the handle. Later calls
    /// return the same handle.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` when the device context cannot be created.
    pub fn native_handle(&self) -> Result<Arc<B::Handle>> {
        if let Some(handle) = self.inner.handle.get() {
            return Ok(handle.clone());
        }

        let _init = self.inner.handle_init.lock();
        if let Some(handle) = self.inner.handle.get() {
            return Ok(handle.clone());
        }

        let context = self.inner.platform.context(&self.inner.device)?;
        let handle = Arc::new(B::create_handle(&self.inner.device, &context)?);
        debug!(queue = %self.inner.label, "native handle created");
        let _ = self.inner.handle.set(handle.clone());
        Ok(handle)
    }

    /// Submit a command group
    ///
    /// `build` declares accesses through [`CommandGroup::access`] and the
    /// native work through [`CommandGroup::interop_task`]. Accesses are
    /// registered atomically across all buffers of the group.
    ///
    /// `routine` names the submission in logs and asynchronous errors.
    ///
    /// # Errors
    ///
    /// - Errors returned by `build`
    /// - `BackendUnavailable` on first use of an unavailable device
    /// - In inline mode, any error returned by the task
    pub fn submit<F>(&self, routine: &'static str, build: F) -> Result<Event>
    where
        F: FnOnce(&mut CommandGroup<B>) -> Result<()>,
    {
        let handle = self.native_handle()?;

        let event = Event::new();
        let completion = Completion::new(event.clone());
        let mut group = CommandGroup {
            event: event.clone(),
            deps: SmallVec::new(),
            task: None,
        };
        // Held from registration until the job is enqueued, so the worker
        // FIFO follows dependency order when clones submit concurrently.
        let worker = self.inner.worker.lock();
        {
            let _reg = registration_lock();
            build(&mut group)?;
        }

        let CommandGroup { deps, task, .. } = group;
        let job = move || -> Result<()> {
            let _completion = completion;
            for dep in &deps {
                dep.wait();
            }
            match task {
                Some(task) => run_interop::<B>(&handle, task),
                None => Ok(()),
            }
        };

        *self.inner.last_event.lock() = Some(event.clone());

        match self.inner.mode {
            ExecutionMode::Inline => {
                drop(worker);
                job()?
            }
            ExecutionMode::Deferred => {
                let errors = self.inner.async_errors.clone();
                let label = self.inner.label.clone();
                let deferred: Job = Box::new(move || {
                    if let Err(e) = job() {
                        let e = e.into_asynchronous(routine);
                        warn!(queue = %label, routine, error = %e, "deferred task failed");
                        errors.lock().push(e);
                    }
                });
                let sender = worker
                    .as_ref()
                    .map(|w| &w.sender)
                    .ok_or_else(|| Error::Backend("queue worker is not running".into()))?;
                sender
                    .send(deferred)
                    .map_err(|_| Error::Backend("queue worker terminated".into()))?;
            }
        }

        Ok(event)
    }

    /// Block until every submission made so far has completed
    pub fn wait(&self) {
        let last = self.inner.last_event.lock().clone();
        if let Some(event) = last {
            event.wait();
        }
    }

    /// Deliver captured asynchronous errors to the handler
    ///
    /// Without a handler the errors stay queued for
    /// [`take_async_errors`](Self::take_async_errors).
    pub fn throw_asynchronous(&self) {
        let Some(handler) = &self.inner.handler else {
            return;
        };
        let errors = std::mem::take(&mut *self.inner.async_errors.lock());
        if !errors.is_empty() {
            debug!(queue = %self.inner.label, count = errors.len(), "delivering asynchronous errors");
            handler(errors);
        }
    }

    /// [`wait`](Self::wait) followed by [`throw_asynchronous`](Self::throw_asynchronous)
    pub fn wait_and_throw(&self) {
        self.wait();
        self.throw_asynchronous();
    }

    /// Remove and return the captured asynchronous errors
    pub fn take_async_errors(&self) -> Vec<Error> {
        std::mem::take(&mut *self.inner.async_errors.lock())
    }
}

fn spawn_worker(label: &str) -> Result<Worker> {
    let (sender, receiver) = mpsc::channel::<Job>();
    let thread = thread::Builder::new()
        .name(format!("blashal-{label}"))
        .spawn(move || {
            while let Ok(job) = receiver.recv() {
                job();
            }
        })
        .map_err(|e| Error::Backend(format!("failed to spawn queue worker: {e}")))?;
    Ok(Worker { sender, thread })
}

fn run_interop<B: Backend>(handle: &B::Handle, task: Task<B>) -> Result<()> {
    let staging = B::begin_interop(handle)?;
    let mut interop = InteropHandle::<B>::new(handle, staging);
    task(&mut interop)?;
    interop.finish()
}

/// Builder for one submission
///
/// Passed to the closure given to [`Queue::submit`].
pub struct CommandGroup<B: Backend> {
    event: Event,
    deps: SmallVec<[Event; 8]>,
    task: Option<Task<B>>,
}

impl<B: Backend> CommandGroup<B> {
    /// Declare an access to `buffer`
    ///
    /// The task will not start before every conflicting earlier access
    /// completes.
    pub fn access<T: Element>(&mut self, buffer: &Buffer<T>, mode: AccessMode) -> Accessor<T> {
        for dep in buffer.register(mode, &self.event) {
            if !self.deps.iter().any(|d| d.same_as(&dep)) {
                self.deps.push(dep);
            }
        }
        Accessor::new(buffer.clone(), mode)
    }

    /// Set the native work of this group
    ///
    /// A group runs at most one task; a second call replaces the first.
    pub fn interop_task<F>(&mut self, task: F)
    where
        F: FnOnce(&mut InteropHandle<'_, B>) -> Result<()> + Send + 'static,
    {
        self.task = Some(Box::new(task));
    }
}
