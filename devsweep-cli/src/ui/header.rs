use devsweep_core::{format_count, format_size};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, AppState};

use super::progress::SPINNER;
use super::theme::Theme;

/// Header widget showing title, scan root, and status
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn status(&self) -> String {
        let state = self.state;
        match state.mode {
            AppMode::MainMenu => String::new(),
            AppMode::Scanning => {
                let spinner = SPINNER[state.spinner_frame % SPINNER.len()];
                format!(
                    "{} {} found, {}",
                    spinner,
                    format_count(state.items.len() as u64),
                    format_size(state.total_size())
                )
            }
            AppMode::SelectItems => {
                let mut status = format!(
                    "{} items, {}  │  {} selected ({})",
                    format_count(state.items.len() as u64),
                    format_size(state.total_size()),
                    state.selection_count(),
                    format_size(state.selected_size())
                );
                if let Some(sort) = state.sort {
                    status.push_str(&format!("  │  by {}", sort.label()));
                }
                if state.filter_applied {
                    status.push_str(&format!(
                        "  │  ≥ {}",
                        format_size(state.settings.min_size)
                    ));
                }
                status
            }
            AppMode::Deleting => {
                let (done, total) = state.deletion_progress().unwrap_or((0, 0));
                if state.quit_pending {
                    format!("Deleting {}/{}, quitting after current", done, total)
                } else {
                    format!("Deleting {}/{}", done, total)
                }
            }
            AppMode::DirectCleanup => "Running cleanups".to_string(),
            AppMode::DeletionComplete => {
                let freed = state.summary.as_ref().map_or(0, |s| s.total_freed);
                format!("Freed {}", format_size(freed + state.direct_freed()))
            }
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        // Title
        let title = "DEVSWEEP";
        let title_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, title, title_style);

        buf.set_string(
            area.x + 10,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        let path = self.state.settings.root.to_string_lossy().to_string();
        let max_path_len = area.width.saturating_sub(50) as usize;
        let display_path = if path.chars().count() > max_path_len && max_path_len > 3 {
            let tail: String = path
                .chars()
                .rev()
                .take(max_path_len - 3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            path
        };
        buf.set_string(
            area.x + 12,
            area.y,
            &display_path,
            Style::default().fg(self.theme.text),
        );

        // Status (right-aligned)
        let status = self.status();
        let status_width = status.chars().count() as u16;
        if status_width + 2 < area.width {
            let status_style = if self.state.mode == AppMode::Scanning {
                Style::default().fg(self.theme.warn)
            } else {
                Style::default().fg(self.theme.text_dim)
            };
            buf.set_string(
                area.x + area.width - status_width - 2,
                area.y,
                &status,
                status_style,
            );
        }
    }
}
