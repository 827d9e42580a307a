//! Worker pool for distributing render tasks
//!
//! One queue, a fixed set of worker threads, and an unfinished-task
//! counter the driver can block on. Workers sleep on a condition variable
//! between batches, so an idle pool costs nothing.

use std::num::NonZeroUsize;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use log::debug;

/// A unit of work, consumed exactly once by a worker.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

struct TaskQueue {
    tasks: Vec<Task>,
    shutting_down: bool,
}

struct Shared {
    queue: Mutex<TaskQueue>,
    task_available: Condvar,
    unfinished: Mutex<usize>,
    all_done: Condvar,
}

/// Fixed-size pool of worker threads fed from a shared queue.
///
/// The pool is reusable across batches; dropping it wakes and joins every
/// worker.
pub struct TaskPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl TaskPool {
    pub fn new(nb_threads: usize) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(TaskQueue {
                tasks: Vec::new(),
                shutting_down: false,
            }),
            task_available: Condvar::new(),
            unfinished: Mutex::new(0),
            all_done: Condvar::new(),
        });

        let nb_threads = nb_threads.max(1);
        let workers = (0..nb_threads)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("render-worker-{i}"))
                    .spawn(move || worker_loop(&shared))
                    .expect("failed to spawn render worker thread")
            })
            .collect();
        debug!("started task pool with {nb_threads} workers");

        Self { shared, workers }
    }

    /// Pool sized to the machine's available parallelism.
    pub fn with_available_parallelism() -> Self {
        let nb_threads = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self::new(nb_threads)
    }

    /// Push a batch of tasks and wake one worker per task.
    pub fn enqueue(&self, tasks: Vec<Task>) {
        let nb_tasks = tasks.len();
        if nb_tasks == 0 {
            return;
        }

        // The counter goes up before any task becomes visible, so a worker
        // finishing between the two locks cannot drive it below zero.
        {
            let mut unfinished = self.shared.unfinished.lock().unwrap();
            *unfinished += nb_tasks;
        }
        {
            let mut queue = self.shared.queue.lock().unwrap();
            queue.tasks.extend(tasks);
        }
        for _ in 0..nb_tasks {
            self.shared.task_available.notify_one();
        }
    }

    /// Block until every enqueued task has finished running.
    ///
    /// A task only counts as finished once its body has returned.
    pub fn wait_for_all(&self) {
        let mut unfinished = self.shared.unfinished.lock().unwrap();
        while *unfinished > 0 {
            unfinished = self.shared.all_done.wait(unfinished).unwrap();
        }
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.shared.queue.lock().unwrap().shutting_down = true;
        self.shared.task_available.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut queue = shared.queue.lock().unwrap();
            loop {
                if let Some(task) = queue.tasks.pop() {
                    break task;
                }
                if queue.shutting_down {
                    return;
                }
                queue = shared.task_available.wait(queue).unwrap();
            }
        };

        task();

        let mut unfinished = shared.unfinished.lock().unwrap();
        *unfinished -= 1;
        if *unfinished == 0 {
            shared.all_done.notify_all();
        }
    }
}
