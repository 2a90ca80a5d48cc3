use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use devsweep_core::{
    CancellationToken, ScanConfig, ScanEvent, ScanProgress, ScanStream, calculate_dir_size,
    delete_target, run_direct_cleanups,
};
use tracing::{debug, warn};

use super::message::{AppMessage, Effect};

/// One queued late size calculation
struct SizeJob {
    session: u64,
    path: PathBuf,
    cancel: CancellationToken,
}

/// Executes effects off the event loop and feeds results back as messages
pub struct Runtime {
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    /// Feeds the single size worker; closing it stops the worker
    size_jobs: Sender<SizeJob>,
    stream: Option<ScanStream>,
    /// The controller asked for exactly one more scan event
    pending_pull: bool,
    config: ScanConfig,
    home: PathBuf,
}

impl Runtime {
    pub fn new(config: ScanConfig, home: PathBuf) -> Self {
        let (tx, rx) = unbounded();
        let (size_jobs, jobs) = unbounded();
        spawn_size_worker(jobs, tx.clone());
        Self {
            tx,
            rx,
            size_jobs,
            stream: None,
            pending_pull: false,
            config,
            home,
        }
    }

    pub fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute_one(effect);
        }
    }

    fn execute_one(&mut self, effect: Effect) {
        match effect {
            Effect::StartScan {
                scanner,
                root,
                cancel,
            } => {
                if let Some(previous) = self.stream.take() {
                    previous.cancel();
                }
                self.pending_pull = false;
                self.stream = Some(ScanStream::spawn(scanner, root, cancel, &self.config));
            }
            Effect::PullDiscovery => self.pending_pull = true,
            Effect::ResolveSize {
                session,
                path,
                cancel,
            } => {
                let job = SizeJob {
                    session,
                    path,
                    cancel,
                };
                if self.size_jobs.send(job).is_err() {
                    warn!("size worker is gone");
                }
            }
            Effect::DeleteItem(target) => {
                let tx = self.tx.clone();
                thread::spawn(move || {
                    let result = delete_target(&target);
                    let _ = tx.send(AppMessage::ItemDeleted(result));
                });
            }
            Effect::RunDirectCleanups(ids) => {
                let tx = self.tx.clone();
                let home = self.home.clone();
                thread::spawn(move || {
                    let results = run_direct_cleanups(&ids, &home);
                    let _ = tx.send(AppMessage::DirectCleanupFinished(results));
                });
            }
        }
    }

    /// Next ready message, if any. A scan event is only produced when the
    /// controller has pulled for one.
    pub fn poll(&mut self) -> Option<AppMessage> {
        if let Ok(message) = self.rx.try_recv() {
            return Some(message);
        }

        if !self.pending_pull {
            return None;
        }
        let event = self.stream.as_mut()?.try_next()?;
        self.pending_pull = false;
        Some(match event {
            ScanEvent::Discovery(item) => AppMessage::ItemFound(item),
            ScanEvent::Finished(completion) => {
                self.stream = None;
                AppMessage::ScanFinished(completion)
            }
        })
    }

    /// Live counters of the running walk
    pub fn live_progress(&self) -> Option<ScanProgress> {
        self.stream.as_ref().map(ScanStream::progress)
    }
}

/// Resolve sizes one at a time. Jobs of a cancelled session are skipped and
/// a walk interrupted by cancellation reports nothing.
fn spawn_size_worker(jobs: Receiver<SizeJob>, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        for job in jobs {
            if job.cancel.is_cancelled() {
                continue;
            }
            let size = match calculate_dir_size(&job.path, &job.cancel) {
                Ok(size) => size,
                Err(partial) if partial.error.is_cancelled() => continue,
                Err(partial) => {
                    debug!(path = %job.path.display(), error = %partial, "late size failed");
                    partial.partial
                }
            };
            let message = AppMessage::SizeResolved {
                session: job.session,
                path: job.path,
                size,
            };
            if tx.send(message).is_err() {
                break;
            }
        }
        debug!("size worker stopped");
    });
}
