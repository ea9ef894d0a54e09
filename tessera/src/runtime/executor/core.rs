use crate::error::Error;
use crate::runtime::executor::worker::Worker;
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};
use crate::runtime::work_stealing::queue::LocalQueue;

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Multi-threaded task executor.
///
/// The `Executor` spawns the worker threads, owns the global injector they
/// share, and drives an orderly shutdown.
pub(crate) struct Executor {
    /// Global injector queue shared by all workers.
    injector: InjectorHandle,

    /// Join handles for worker threads.
    handles: Vec<JoinHandle<()>>,
}

impl Executor {
    /// Creates a new executor with `threads` workers named
    /// `<thread_name>-<index>`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned. Workers
    /// started before the failure are shut down and joined.
    pub(crate) fn new(threads: usize, thread_name: &str) -> io::Result<Self> {
        let injector = Arc::new(Injector::new());
        let locals: Arc<Vec<LocalQueue>> =
            Arc::new((0..threads).map(|_| LocalQueue::new()).collect());

        let mut executor = Self {
            injector: injector.clone(),
            handles: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let worker = Arc::new(Worker::new(id, locals.clone(), injector.clone()));

            let spawned = thread::Builder::new()
                .name(format!("{thread_name}-{id}"))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => executor.handles.push(handle),
                Err(err) => {
                    executor.shutdown();
                    executor.join();
                    return Err(err);
                }
            }
        }

        Ok(executor)
    }

    pub(crate) fn injector(&self) -> &InjectorHandle {
        &self.injector
    }

    /// Signals all workers to shut down once the queues are drained.
    pub(crate) fn shutdown(&self) {
        self.injector.shutdown();
    }

    /// Waits for all worker threads to terminate.
    ///
    /// This should be called after initiating shutdown. If called from one
    /// of the pool's own workers, that worker is not joined.
    pub(crate) fn join(&mut self) {
        let current = thread::current().id();

        for handle in self.handles.drain(..) {
            if handle.thread().id() == current {
                continue;
            }

            let name = handle.thread().name().map(str::to_owned);

            if let Err(payload) = handle.join() {
                let err = Error::from_panic(payload);
                tracing::error!(thread = ?name, error = %err, "worker thread panicked");
            }
        }
    }
}
