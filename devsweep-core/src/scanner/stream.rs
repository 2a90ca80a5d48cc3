use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, SendTimeoutError, Sender, TryRecvError, bounded, select};
use tracing::{debug, info, warn};

use super::item::Item;
use super::policy::{ArtifactScanner, ScannerInfo};
use super::progress::{ScanCompletion, ScanEvent, ScanProgress};
use super::walker::{CancellationToken, ScanConfig, WalkCounters, walk_targets};
use crate::error::{Result, SweepError};

/// How long a blocked producer waits before re-checking cancellation
const SEND_POLL: Duration = Duration::from_millis(50);

/// A walk running on a background thread.
///
/// Discoveries travel through a bounded queue so a slow consumer throttles the
/// walker. The completion signal has its own channel and is only handed out
/// once every queued discovery has been consumed. Each call to
/// [`try_next`](Self::try_next) or [`next`](Self::next) yields exactly one
/// event; the consumer has to pull again to receive more.
pub struct ScanStream {
    items: Receiver<Item>,
    done: Receiver<ScanCompletion>,
    counters: Arc<WalkCounters>,
    cancel: CancellationToken,
    info: ScannerInfo,
    completion: Option<ScanCompletion>,
    finished: bool,
}

impl ScanStream {
    /// Start walking `root` on a new thread
    pub fn spawn(
        scanner: Arc<dyn ArtifactScanner>,
        root: PathBuf,
        cancel: CancellationToken,
        config: &ScanConfig,
    ) -> Self {
        let (item_tx, item_rx) = bounded(config.queue_capacity);
        let (done_tx, done_rx) = bounded(1);
        let counters = Arc::new(WalkCounters::new());
        let info = scanner.info();

        let worker_counters = Arc::clone(&counters);
        let worker_cancel = cancel.clone();
        let worker_config = config.clone();
        thread::spawn(move || {
            info!(scanner = scanner.info().id, root = %root.display(), "scan started");
            let result = walk_targets(
                &scanner,
                &root,
                &worker_cancel,
                &worker_config,
                &worker_counters,
                |item| send_item(&item_tx, item, &worker_cancel),
            );
            // Close the queue first so the completion can never overtake an item
            drop(item_tx);

            let progress = worker_counters.snapshot();
            let completion = ScanCompletion {
                scanner_id: scanner.info().id,
                items_found: progress.items_found,
                total_size: progress.bytes_found,
                directories_scanned: progress.dirs_scanned,
                result: result.map(|_| ()),
            };
            if let Err(e) = &completion.result {
                debug!(error = %e, "scan ended early");
            }
            let _ = done_tx.send(completion);
        });

        Self {
            items: item_rx,
            done: done_rx,
            counters,
            cancel,
            info,
            completion: None,
            finished: false,
        }
    }

    pub fn info(&self) -> &ScannerInfo {
        &self.info
    }

    /// Live walk counters
    pub fn progress(&self) -> ScanProgress {
        self.counters.snapshot()
    }

    /// Ask the walker to stop; the completion will carry `Cancelled`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Take the next ready event without blocking
    pub fn try_next(&mut self) -> Option<ScanEvent> {
        if self.finished {
            return None;
        }
        if let Ok(item) = self.items.try_recv() {
            return Some(ScanEvent::Discovery(item));
        }

        if self.completion.is_none() {
            self.completion = match self.done.try_recv() {
                Ok(c) => Some(c),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(self.lost_completion()),
            };
        }

        if self.completion.is_some() {
            // An item can land between the first check and the completion
            if let Ok(item) = self.items.try_recv() {
                return Some(ScanEvent::Discovery(item));
            }
            self.finished = true;
            return self.completion.take().map(ScanEvent::Finished);
        }
        None
    }

    /// Block until the next event. Returns `None` after `Finished` was handed out.
    pub fn next(&mut self) -> Option<ScanEvent> {
        loop {
            if self.finished {
                return None;
            }
            if let Some(event) = self.try_next() {
                return Some(event);
            }

            select! {
                recv(self.items) -> msg => match msg {
                    Ok(item) => return Some(ScanEvent::Discovery(item)),
                    Err(_) => {
                        let completion = self.done.recv().unwrap_or_else(|_| self.lost_completion());
                        self.completion = Some(completion);
                    }
                },
                recv(self.done) -> msg => {
                    let completion = msg.unwrap_or_else(|_| self.lost_completion());
                    self.completion = Some(completion);
                }
            }
        }
    }

    /// Completion for a worker that went away without reporting
    fn lost_completion(&self) -> ScanCompletion {
        warn!(scanner = self.info.id, "scan worker exited without a completion");
        let progress = self.counters.snapshot();
        ScanCompletion {
            scanner_id: self.info.id,
            items_found: progress.items_found,
            total_size: progress.bytes_found,
            directories_scanned: progress.dirs_scanned,
            result: Err(SweepError::Io(std::io::Error::other(
                "scan worker stopped unexpectedly",
            ))),
        }
    }
}

impl Drop for ScanStream {
    fn drop(&mut self) {
        if !self.finished {
            self.cancel.cancel();
        }
    }
}

/// Push one discovery, backing off while the queue is full
fn send_item(tx: &Sender<Item>, item: Item, cancel: &CancellationToken) -> Result<()> {
    let mut pending = item;
    loop {
        match tx.send_timeout(pending, SEND_POLL) {
            Ok(()) => return Ok(()),
            Err(SendTimeoutError::Timeout(back)) => {
                if cancel.is_cancelled() {
                    return Err(SweepError::Cancelled);
                }
                pending = back;
            }
            // Consumer is gone
            Err(SendTimeoutError::Disconnected(_)) => return Err(SweepError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::policy::{NodeModulesScanner, UnifiedScanner};
    use std::fs;
    use tempfile::TempDir;

    fn project_tree(count: usize) -> TempDir {
        let temp = tempfile::Builder::new()
            .prefix("devsweep-stream")
            .tempdir()
            .unwrap();
        for i in 0..count {
            let nm = temp.path().join(format!("proj{i}")).join("node_modules");
            fs::create_dir_all(&nm).unwrap();
            fs::write(nm.join("index.js"), vec![0u8; 10]).unwrap();
        }
        temp
    }

    fn drain(stream: &mut ScanStream) -> (Vec<Item>, ScanCompletion) {
        let mut items = Vec::new();
        while let Some(event) = stream.next() {
            match event {
                ScanEvent::Discovery(item) => items.push(item),
                ScanEvent::Finished(c) => return (items, c),
            }
        }
        panic!("stream ended without completion");
    }

    #[test]
    fn test_stream_delivers_items_then_completion() {
        let temp = project_tree(4);
        let mut stream = ScanStream::spawn(
            Arc::new(NodeModulesScanner),
            temp.path().to_path_buf(),
            CancellationToken::new(),
            &ScanConfig::default(),
        );

        let (items, completion) = drain(&mut stream);
        assert_eq!(items.len(), 4);
        assert!(completion.result.is_ok());
        assert_eq!(completion.items_found, 4);
        assert_eq!(completion.total_size, 40);
        assert_eq!(completion.scanner_id, "node_modules");
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_stream_backpressure_keeps_every_item() {
        let temp = project_tree(6);
        let config = ScanConfig {
            queue_capacity: 1,
            ..ScanConfig::default()
        };
        let mut stream = ScanStream::spawn(
            Arc::new(UnifiedScanner::standard()),
            temp.path().to_path_buf(),
            CancellationToken::new(),
            &config,
        );

        thread::sleep(Duration::from_millis(100));
        let (items, completion) = drain(&mut stream);
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].project_context, temp.path().join("proj0"));
        assert_eq!(completion.items_found, 6);
    }

    #[test]
    fn test_stream_cancel_reports_cancelled() {
        let temp = project_tree(3);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut stream = ScanStream::spawn(
            Arc::new(NodeModulesScanner),
            temp.path().to_path_buf(),
            cancel,
            &ScanConfig::default(),
        );

        let (items, completion) = drain(&mut stream);
        assert!(items.is_empty());
        assert!(completion.was_cancelled());
    }

    #[test]
    fn test_try_next_eventually_finishes() {
        let temp = project_tree(2);
        let mut stream = ScanStream::spawn(
            Arc::new(NodeModulesScanner),
            temp.path().to_path_buf(),
            CancellationToken::new(),
            &ScanConfig::default(),
        );

        let mut found = 0;
        let mut finished = false;
        for _ in 0..500 {
            match stream.try_next() {
                Some(ScanEvent::Discovery(_)) => found += 1,
                Some(ScanEvent::Finished(_)) => {
                    finished = true;
                    break;
                }
                None => thread::sleep(Duration::from_millis(10)),
            }
        }
        assert!(finished);
        assert_eq!(found, 2);
        assert!(stream.is_finished());
    }
}
