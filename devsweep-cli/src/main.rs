mod app;
mod logging;
mod tui;
mod ui;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use color_eyre::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use devsweep_core::{ScanConfig, SweepError, resolve_home};
use ratatui::{Terminal, backend::CrosstermBackend, style::Style, widgets::Widget};
use tracing::{error, info};

use app::{AppMode, AppState, Runtime, Settings};
use tui::{AppEvent, EventHandler, handle_key};
use ui::{
    AppLayout, DeletingView, DirectCleanupView, Footer, Header, ItemsView, MenuView,
    ProgressView, StatusBar, SummaryView, Theme,
};

/// Messages applied per frame so a burst of results cannot starve input
const MAX_MESSAGES_PER_FRAME: usize = 256;

/// DEVSWEEP - Interactive cleaner for node_modules and CocoaPods artifacts
#[derive(Parser, Debug)]
#[command(name = "devsweep")]
#[command(about = "Find and delete node_modules, Pods and package manager caches")]
#[command(version)]
struct Args {
    /// Directory to scan (defaults to the home directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Size threshold in MiB for the "filter small" action
    #[arg(long, default_value_t = 100)]
    min_size_mb: u64,

    /// Discoveries buffered between the walker and the UI
    #[arg(long, default_value_t = 10)]
    queue_capacity: usize,

    /// Report items first and measure their sizes afterwards
    #[arg(long)]
    defer_sizes: bool,

    /// UI tick interval in milliseconds
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Log file (defaults to the user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _guard = logging::init_logging(args.log_file.clone())?;

    let home = dirs::home_dir();
    let root = args.root.clone().unwrap_or_else(resolve_home);
    let root = root.canonicalize().unwrap_or(root);

    if let Err(e) = validate_root(&root) {
        error!(root = %root.display(), error = %e, "invalid scan root");
        return Err(e.into());
    }

    info!(root = %root.display(), "devsweep starting");

    let settings = Settings {
        root,
        home,
        min_size: args.min_size_mb * 1024 * 1024,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, settings, &args);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        error!(error = %e, "devsweep exited with an error");
    }
    result
}

/// The scan root must be an existing directory
fn validate_root(root: &Path) -> devsweep_core::Result<()> {
    if !root.exists() {
        return Err(SweepError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(SweepError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: Settings,
    args: &Args,
) -> Result<()> {
    let theme = Theme::default();
    let event_handler = EventHandler::new(args.tick_ms);

    let config = ScanConfig {
        queue_capacity: args.queue_capacity,
        resolve_sizes: !args.defer_sizes,
    };
    let cleanup_home = settings.home.clone().unwrap_or_else(resolve_home);
    let mut runtime = Runtime::new(config, cleanup_home);
    let mut state = AppState::new(settings);

    loop {
        // Apply background results
        for _ in 0..MAX_MESSAGES_PER_FRAME {
            let Some(message) = runtime.poll() else {
                break;
            };
            let effects = state.handle_message(message);
            runtime.execute(effects);
        }

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::new(area);
            let buf = frame.buffer_mut();

            // Background
            buf.set_style(area, Style::default().bg(theme.bg));

            // Update visible height for scrolling
            state.visible_height = layout.body.height as usize;

            Header::new(&state, &theme).render(layout.header, buf);
            StatusBar::new(&state, &theme).render(layout.status_bar, buf);

            match state.mode {
                AppMode::MainMenu => {
                    MenuView::new(&state.menu, &theme).render(layout.body, buf);
                }
                AppMode::Scanning => {
                    if let Some(session) = &state.session {
                        ProgressView::new(
                            session,
                            state.items.len(),
                            state.total_size(),
                            state.spinner_frame,
                            &theme,
                        )
                        .render(layout.body, buf);
                    }
                }
                AppMode::SelectItems | AppMode::Deleting => {
                    ItemsView::new(
                        &state.items,
                        &state.settings.root,
                        state.selected_index,
                        state.scroll_offset,
                        &theme,
                    )
                    .render(layout.body, buf);

                    if state.mode == AppMode::Deleting
                        && let Some(run) = &state.deletion
                    {
                        DeletingView::new(run, &theme).render(layout.body, buf);
                    }
                }
                AppMode::DirectCleanup => {
                    DirectCleanupView::new(&state.direct_running, state.spinner_frame, &theme)
                        .render(layout.body, buf);
                }
                AppMode::DeletionComplete => {
                    SummaryView::new(state.summary.as_ref(), &state.direct_results, &theme)
                        .render(layout.body, buf);
                }
            }

            let freed = match state.mode {
                AppMode::Deleting => state.deletion.as_ref().map(|run| run.total_freed()),
                AppMode::DeletionComplete => Some(
                    state.summary.as_ref().map_or(0, |s| s.total_freed) + state.direct_freed(),
                ),
                _ => None,
            };
            let mut footer = Footer::new(state.mode, &theme);
            if let Some(bytes) = freed {
                footer = footer.with_bytes_freed(bytes);
            }
            footer.render(layout.footer, buf);
        })?;

        // Handle events
        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode);
                let effects = state.handle_action(action);
                runtime.execute(effects);
            }
            AppEvent::Tick => {
                state.tick(Instant::now(), runtime.live_progress());
            }
        }

        if state.should_quit {
            info!("quitting");
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_root() {
        let temp = tempfile::Builder::new()
            .prefix("devsweep-main")
            .tempdir()
            .unwrap();
        let file = temp.path().join("notes.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(validate_root(temp.path()).is_ok());
        assert!(matches!(
            validate_root(&temp.path().join("gone")),
            Err(SweepError::PathNotFound(_))
        ));
        assert!(matches!(
            validate_root(&file),
            Err(SweepError::NotADirectory(_))
        ));
    }
}
