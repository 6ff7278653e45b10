//! Worker context bootstrap.
//!
//! Worker threads do not share registry state with the main context. Each
//! one builds its own copy of the host registries and replays every main
//! context registration against it, reading ids from the cache instead of
//! allocating them. This has to finish before the worker runs any task.

use std::{cell::RefCell, sync::Arc, thread};

use kiln_registry::HostRegistries;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::{
    error::RegistrationError,
    factory::{CustomTypes, Registration},
    id::IdCacheReader,
};

thread_local! {
    static CONTEXT: RefCell<Option<WorkerContext>> = const { RefCell::new(None) };
}

/// Why a worker context is unavailable.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Replaying a registration failed.
    #[error("worker replay failed: {0}")]
    Registration(#[from] RegistrationError),
    /// The current thread never completed [`WorkerBootstrap::init_worker`].
    #[error("worker thread has not been bootstrapped")]
    NotBootstrapped,
    /// The worker context is already in use further up this thread's stack.
    #[error("worker context is already in use on this thread")]
    ContextBusy,
    /// The thread pool could not be built.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// A worker's private registries and custom types.
pub struct WorkerContext {
    /// This worker's copy of the host registries.
    pub host: HostRegistries,
    /// Replayed custom types.
    pub types: CustomTypes,
}

/// Everything needed to rebuild the main context's custom types on a worker.
#[derive(Debug, Clone)]
pub struct WorkerBootstrap {
    cache: IdCacheReader,
    registrations: Arc<[Registration]>,
}

impl WorkerBootstrap {
    pub(crate) fn new(cache: IdCacheReader, registrations: Arc<[Registration]>) -> Self {
        Self {
            cache,
            registrations,
        }
    }

    /// The registrations a worker replays.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Builds a fresh worker context without touching thread-local state.
    pub fn bootstrap(&self) -> Result<WorkerContext, BootstrapError> {
        let mut host = HostRegistries::vanilla();
        let mut types = CustomTypes::replay(self.cache.clone());
        for registration in self.registrations.iter() {
            types.replay_registration(&mut host, registration)?;
        }

        let allocator = types.allocator();
        let reserved = allocator
            .mapping()
            .keys()
            .filter(|identifier| allocator.kind_of(identifier).is_none())
            .count();
        if reserved > 0 {
            log::debug!("{reserved} cached ids have no registration in this run and stay reserved");
        }
        Ok(WorkerContext { host, types })
    }

    /// Bootstraps the current thread. Does nothing if it already succeeded here.
    pub fn init_worker(&self) -> Result<(), BootstrapError> {
        if is_bootstrapped() {
            return Ok(());
        }
        let context = self.bootstrap()?;
        let count = context.types.registrations().len();
        CONTEXT.with_borrow_mut(|slot| *slot = Some(context));
        log::debug!(
            "Bootstrapped worker {} with {count} custom types",
            thread::current().name().unwrap_or("<unnamed>")
        );
        Ok(())
    }
}

/// Whether the current thread holds a worker context.
#[must_use]
pub fn is_bootstrapped() -> bool {
    // only a bootstrapped context can be busy
    CONTEXT.with(|cell| cell.try_borrow().map_or(true, |slot| slot.is_some()))
}

/// Runs `f` with the current thread's worker context.
///
/// Calling this again from inside `f` fails with
/// [`BootstrapError::ContextBusy`].
pub fn with_worker_context<R>(f: impl FnOnce(&mut WorkerContext) -> R) -> Result<R, BootstrapError> {
    CONTEXT.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| BootstrapError::ContextBusy)?;
        slot.as_mut().map(f).ok_or(BootstrapError::NotBootstrapped)
    })
}

/// Thread pool whose threads are bootstrapped before they take any task.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Starts `threads` workers.
    ///
    /// The replay is tried once on the calling thread first, so a broken
    /// registration fails here instead of on every worker.
    pub fn start(bootstrap: WorkerBootstrap, threads: usize) -> Result<Self, BootstrapError> {
        bootstrap.bootstrap()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("kiln-worker-{index}"))
            .start_handler(move |_| {
                if let Err(err) = bootstrap.init_worker() {
                    log::error!("Worker bootstrap failed: {err}");
                }
            })
            .build()?;
        log::info!("Started {} world workers", pool.current_num_threads());
        Ok(Self { pool })
    }

    /// Runs `task` on a worker with that worker's context.
    pub fn run<R, F>(&self, task: F) -> Result<R, BootstrapError>
    where
        R: Send,
        F: FnOnce(&mut WorkerContext) -> R + Send,
    {
        self.pool.install(|| with_worker_context(task))
    }

    /// Number of worker threads.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}
