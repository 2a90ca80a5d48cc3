use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use devsweep_core::{
    CancellationToken, DeletionResult, DeletionRun, DeletionState, DeletionSummary,
    DeletionTarget, DirectCleanupId, DirectCleanupResult, Item, ProgressEstimator,
    ProgressSnapshot, ScanCompletion, ScanProgress, ScannerInfo, ScannerKind,
};
use tracing::{debug, info, warn};

use super::menu::MenuState;
use super::message::{AppMessage, Effect};
use super::Action;

/// How many recent discoveries the progress view lists
const RECENT_LIMIT: usize = 5;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Choosing what to clean
    MainMenu,
    /// Walk in progress
    Scanning,
    /// Picking items to delete
    SelectItems,
    /// Deletion run in progress
    Deleting,
    /// Direct cleanups in progress
    DirectCleanup,
    /// Showing the ledger
    DeletionComplete,
}

/// Item ordering in the selection list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Size,
    Date,
    Path,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Size => "size",
            SortKey::Date => "date",
            SortKey::Path => "path",
        }
    }
}

/// Controller settings fixed at startup
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where scans start
    pub root: PathBuf,
    /// Home directory for zone estimates; `None` when unknown
    pub home: Option<PathBuf>,
    /// Size filter threshold in bytes
    pub min_size: u64,
}

/// The one live scan
#[derive(Debug)]
pub struct ScanSession {
    /// Distinguishes this session's late results from earlier ones
    pub id: u64,
    pub scanner: ScannerInfo,
    cancel: CancellationToken,
    /// Cancel was requested; later discoveries are dropped
    pub cancelled: bool,
    pub estimator: ProgressEstimator,
    pub progress: ProgressSnapshot,
    /// Last counters sampled from the walker
    pub live: ScanProgress,
    /// Newest discoveries first
    pub recent: VecDeque<PathBuf>,
    /// Reason the walk ended early, other than cancellation
    pub error: Option<String>,
}

impl ScanSession {
    fn cancel(&mut self) {
        self.cancel.cancel();
        self.cancelled = true;
    }
}

/// Application state
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    pub settings: Settings,
    pub menu: MenuState,
    /// Active or last finished scan
    pub session: Option<ScanSession>,
    /// Working set, unique by path
    pub items: Vec<Item>,
    /// Cursor in the item list
    pub selected_index: usize,
    /// Scroll offset for the item list
    pub scroll_offset: usize,
    /// Visible area height (set by UI)
    pub visible_height: usize,
    pub sort: Option<SortKey>,
    /// Whether the size filter already dropped items
    pub filter_applied: bool,
    /// Deletion run in flight
    pub deletion: Option<DeletionRun>,
    /// Ledger of the finished run
    pub summary: Option<DeletionSummary>,
    pub direct_results: Vec<DirectCleanupResult>,
    /// Direct cleanups being run
    pub direct_running: Vec<DirectCleanupId>,
    /// Scan to start once direct cleanups finish
    pending_scan: Vec<ScannerKind>,
    /// Sessions started so far
    sessions_started: u64,
    /// Quit once the in-flight deletion reports back
    pub quit_pending: bool,
    /// Whether app should quit
    pub should_quit: bool,
    /// Spinner frame for animation
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            mode: AppMode::MainMenu,
            settings,
            menu: MenuState::new(),
            session: None,
            items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            visible_height: 20,
            sort: None,
            filter_applied: false,
            deletion: None,
            summary: None,
            direct_results: Vec::new(),
            direct_running: Vec::new(),
            pending_scan: Vec::new(),
            sessions_started: 0,
            quit_pending: false,
            should_quit: false,
            spinner_frame: 0,
        }
    }

    /// Apply one user action
    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        match self.mode {
            AppMode::MainMenu => self.menu_action(action),
            AppMode::Scanning => self.scanning_action(action),
            AppMode::SelectItems => self.select_action(action),
            AppMode::Deleting => self.deleting_action(action),
            AppMode::DirectCleanup => {
                if action == Action::Quit {
                    self.quit();
                }
                Vec::new()
            }
            AppMode::DeletionComplete => {
                match action {
                    Action::BackToMenu => self.reset_to_menu(),
                    Action::Quit | Action::Confirm => self.quit(),
                    _ => {}
                }
                Vec::new()
            }
        }
    }

    /// Apply one message from background work
    pub fn handle_message(&mut self, message: AppMessage) -> Vec<Effect> {
        match message {
            AppMessage::ItemFound(item) => self.on_item_found(item),
            AppMessage::ScanFinished(completion) => {
                self.on_scan_finished(completion);
                Vec::new()
            }
            AppMessage::SizeResolved {
                session,
                path,
                size,
            } => {
                let current = self.session.as_ref().map(|s| s.id);
                if current != Some(session) {
                    debug!(path = %path.display(), session, "stale size dropped");
                    return Vec::new();
                }
                if matches!(self.mode, AppMode::Scanning | AppMode::SelectItems)
                    && let Some(item) = self.items.iter_mut().find(|i| i.path == path)
                {
                    item.size = size.bytes;
                    item.item_count = size.files;
                }
                Vec::new()
            }
            AppMessage::ItemDeleted(result) => self.on_item_deleted(result),
            AppMessage::DirectCleanupFinished(results) => self.on_direct_finished(results),
        }
    }

    /// Advance animations and progress estimates
    pub fn tick(&mut self, now: Instant, live: Option<ScanProgress>) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;

        if self.mode != AppMode::Scanning {
            return;
        }
        if let Some(session) = &mut self.session {
            let count = live.as_ref().map(|p| p.dirs_scanned);
            session.progress = session.estimator.tick(now, count);
            if let Some(live) = live {
                session.live = live;
            }
        }
    }

    /// Request quit
    pub fn quit(&mut self) {
        if let Some(session) = &mut self.session {
            session.cancel();
        }
        self.should_quit = true;
    }

    // --- Main menu ---

    fn menu_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::MoveUp => self.menu.move_up(),
            Action::MoveDown => self.menu.move_down(),
            Action::GoToFirst | Action::PageUp => self.menu.go_to_first(),
            Action::GoToLast | Action::PageDown => self.menu.go_to_last(),
            Action::ToggleSelect => self.menu.toggle(),
            Action::Confirm => return self.confirm_menu(),
            Action::Quit => self.quit(),
            _ => {}
        }
        Vec::new()
    }

    fn confirm_menu(&mut self) -> Vec<Effect> {
        let choice = self.menu.choice();
        if choice.is_empty() {
            return Vec::new();
        }

        if !choice.direct.is_empty() {
            info!(
                cleanups = choice.direct.len(),
                scans = choice.scans.len(),
                "running direct cleanups"
            );
            self.pending_scan = choice.scans;
            self.direct_running = choice.direct.clone();
            self.mode = AppMode::DirectCleanup;
            return vec![Effect::RunDirectCleanups(choice.direct)];
        }

        self.start_scan(&choice.scans)
    }

    fn start_scan(&mut self, kinds: &[ScannerKind]) -> Vec<Effect> {
        let Some(scanner) = ScannerKind::combine(kinds) else {
            return Vec::new();
        };

        if let Some(previous) = &mut self.session {
            previous.cancel();
        }

        let root = self.settings.root.clone();
        let estimator =
            ProgressEstimator::new(Instant::now(), &root, self.settings.home.as_deref());
        let cancel = CancellationToken::new();
        let info = scanner.info();
        self.sessions_started += 1;
        info!(
            scanner = info.id,
            session = self.sessions_started,
            root = %root.display(),
            "starting scan"
        );

        self.session = Some(ScanSession {
            id: self.sessions_started,
            scanner: info,
            cancel: cancel.clone(),
            cancelled: false,
            progress: estimator.snapshot(),
            estimator,
            live: ScanProgress::default(),
            recent: VecDeque::new(),
            error: None,
        });
        self.clear_items();
        self.mode = AppMode::Scanning;

        vec![
            Effect::StartScan {
                scanner,
                root,
                cancel,
            },
            Effect::PullDiscovery,
        ]
    }

    // --- Scanning ---

    fn scanning_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::CancelScan => {
                if let Some(session) = &mut self.session
                    && !session.cancelled
                {
                    info!("scan cancelled by user");
                    session.cancel();
                }
            }
            Action::Quit => self.quit(),
            _ => {}
        }
        Vec::new()
    }

    fn on_item_found(&mut self, item: Item) -> Vec<Effect> {
        if self.mode != AppMode::Scanning {
            return Vec::new();
        }
        let Some(session) = &mut self.session else {
            return Vec::new();
        };

        // Keep pulling so the completion still arrives
        if session.cancelled {
            debug!(path = %item.path.display(), "discovery after cancel dropped");
            return vec![Effect::PullDiscovery];
        }

        session.recent.push_front(item.path.clone());
        session.recent.truncate(RECENT_LIMIT);

        let mut effects = Vec::with_capacity(2);
        if !item.is_size_known() {
            effects.push(Effect::ResolveSize {
                session: session.id,
                path: item.path.clone(),
                cancel: session.cancel.clone(),
            });
        }
        self.upsert(item);
        effects.push(Effect::PullDiscovery);
        effects
    }

    /// Insert, or replace the entry with the same path in place
    fn upsert(&mut self, item: Item) {
        match self.items.iter_mut().find(|i| i.path == item.path) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    fn on_scan_finished(&mut self, completion: ScanCompletion) {
        if self.mode != AppMode::Scanning {
            return;
        }
        if let Some(session) = &mut self.session {
            if let Err(e) = &completion.result
                && !e.is_cancelled()
            {
                warn!(error = %e, "scan ended with error");
                session.error = Some(e.to_string());
            }
            session.live.dirs_scanned = completion.directories_scanned;
        }
        info!(
            scanner = completion.scanner_id,
            found = self.items.len(),
            cancelled = completion.was_cancelled(),
            "scan finished"
        );
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.mode = AppMode::SelectItems;
    }

    // --- Selection ---

    fn select_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::PageUp => self.page_up(),
            Action::PageDown => self.page_down(),
            Action::GoToFirst => self.go_to_first(),
            Action::GoToLast => self.go_to_last(),
            Action::ToggleSelect => self.toggle_selected(),
            Action::SelectAll => self.items.iter_mut().for_each(|i| i.selected = true),
            Action::SelectNone => self.items.iter_mut().for_each(|i| i.selected = false),
            Action::SortBySize => self.sort_by(SortKey::Size),
            Action::SortByDate => self.sort_by(SortKey::Date),
            Action::SortByPath => self.sort_by(SortKey::Path),
            Action::FilterBySize => self.filter_by_size(),
            Action::Confirm => return self.start_deletion(),
            Action::BackToMenu => self.reset_to_menu(),
            Action::Quit => self.quit(),
            _ => {}
        }
        Vec::new()
    }

    pub fn selection_count(&self) -> usize {
        self.items.iter().filter(|i| i.selected).count()
    }

    pub fn selected_size(&self) -> u64 {
        self.items.iter().filter(|i| i.selected).map(|i| i.size).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.items.iter().map(|i| i.size).sum()
    }

    fn toggle_selected(&mut self) {
        if let Some(item) = self.items.get_mut(self.selected_index) {
            item.selected = !item.selected;
        }
    }

    fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Size => self.items.sort_by(|a, b| b.size.cmp(&a.size)),
            // None sorts below any timestamp
            SortKey::Date => self
                .items
                .sort_by(|a, b| b.last_modified.cmp(&a.last_modified)),
            SortKey::Path => self.items.sort_by(|a, b| a.path.cmp(&b.path)),
        }
        self.sort = Some(key);
    }

    /// Drop items below the threshold. There is no undo within a session.
    fn filter_by_size(&mut self) {
        let min = self.settings.min_size;
        let before = self.items.len();
        self.items.retain(|i| i.size >= min);
        self.filter_applied = true;
        debug!(min, dropped = before - self.items.len(), "size filter applied");
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let count = self.items.len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
        Self::ensure_visible_for(
            &mut self.selected_index,
            &mut self.scroll_offset,
            self.visible_height,
        );
    }

    /// Ensure the given index is visible within the scroll viewport
    fn ensure_visible_for(selected: &mut usize, scroll: &mut usize, visible_height: usize) {
        if *selected < *scroll {
            *scroll = *selected;
        } else if visible_height > 0 && *selected >= *scroll + visible_height {
            *scroll = *selected - visible_height + 1;
        }
    }

    fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        self.clamp_cursor();
    }

    fn move_down(&mut self) {
        if self.selected_index + 1 < self.items.len() {
            self.selected_index += 1;
        }
        self.clamp_cursor();
    }

    fn page_up(&mut self) {
        let page_size = self.visible_height.saturating_sub(2).max(1);
        self.selected_index = self.selected_index.saturating_sub(page_size);
        self.clamp_cursor();
    }

    fn page_down(&mut self) {
        let page_size = self.visible_height.saturating_sub(2).max(1);
        self.selected_index =
            (self.selected_index + page_size).min(self.items.len().saturating_sub(1));
        self.clamp_cursor();
    }

    fn go_to_first(&mut self) {
        self.selected_index = 0;
        self.clamp_cursor();
    }

    fn go_to_last(&mut self) {
        self.selected_index = self.items.len().saturating_sub(1);
        self.clamp_cursor();
    }

    // --- Deletion ---

    fn start_deletion(&mut self) -> Vec<Effect> {
        let targets: Vec<DeletionTarget> = self
            .items
            .iter()
            .filter(|i| i.selected)
            .map(DeletionTarget::from)
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        for item in self.items.iter_mut().filter(|i| i.selected) {
            item.advance(DeletionState::Pending);
        }
        info!(count = targets.len(), "deletion started");
        self.deletion = Some(DeletionRun::new(targets));
        self.mode = AppMode::Deleting;
        self.next_deletion_step()
    }

    /// Selection still moves during a run but never changes the run. Quit
    /// waits for the item being removed, then stops the run.
    fn deleting_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::ToggleSelect => self.toggle_selected(),
            Action::Quit => {
                info!("quit requested, finishing current deletion");
                self.quit_pending = true;
                if self.deletion.as_ref().is_none_or(|run| run.current().is_none()) {
                    self.quit();
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn next_deletion_step(&mut self) -> Vec<Effect> {
        let Some(run) = &mut self.deletion else {
            return Vec::new();
        };

        if let Some(target) = run.next_target() {
            if let Some(item) = self.items.iter_mut().find(|i| i.path == target.path) {
                item.advance(DeletionState::InProgress);
            }
            return vec![Effect::DeleteItem(target)];
        }

        if run.is_finished()
            && let Some(run) = self.deletion.take()
        {
            let summary = run.into_summary();
            info!(
                freed = summary.total_freed,
                ok = summary.succeeded(),
                failed = summary.failed(),
                "deletion finished"
            );
            self.summary = Some(summary);
            self.mode = AppMode::DeletionComplete;
        }
        Vec::new()
    }

    fn on_item_deleted(&mut self, result: DeletionResult) -> Vec<Effect> {
        if self.mode != AppMode::Deleting {
            return Vec::new();
        }
        let Some(run) = &mut self.deletion else {
            return Vec::new();
        };

        let path = result.path.clone();
        let state = if result.success {
            DeletionState::Deleted
        } else {
            DeletionState::Failed
        };
        if !run.record(result) {
            return Vec::new();
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.path == path) {
            item.advance(state);
        }
        if self.quit_pending {
            let (done, total) = run.progress();
            info!(done, total, "deletion stopped by quit");
            self.quit();
            return Vec::new();
        }
        self.next_deletion_step()
    }

    /// `(completed, total)` of the run in flight
    pub fn deletion_progress(&self) -> Option<(usize, usize)> {
        self.deletion.as_ref().map(|run| run.progress())
    }

    // --- Direct cleanups ---

    fn on_direct_finished(&mut self, results: Vec<DirectCleanupResult>) -> Vec<Effect> {
        if self.mode != AppMode::DirectCleanup {
            return Vec::new();
        }
        self.direct_results = results;
        self.direct_running.clear();

        let pending = std::mem::take(&mut self.pending_scan);
        if pending.is_empty() {
            self.mode = AppMode::DeletionComplete;
            return Vec::new();
        }
        self.start_scan(&pending)
    }

    pub fn direct_freed(&self) -> u64 {
        self.direct_results.iter().map(|r| r.bytes_freed).sum()
    }

    // --- Reset ---

    fn clear_items(&mut self) {
        self.items.clear();
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.sort = None;
        self.filter_applied = false;
        self.deletion = None;
        self.summary = None;
    }

    /// Forget every trace of the previous session
    pub fn reset_to_menu(&mut self) {
        if let Some(session) = &mut self.session {
            session.cancel();
        }
        self.session = None;
        self.clear_items();
        self.direct_results.clear();
        self.direct_running.clear();
        self.pending_scan.clear();
        self.quit_pending = false;
        self.menu.reset();
        self.mode = AppMode::MainMenu;
    }
}
