use devsweep_core::format_size;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::app::{AppMode, AppState};

use super::meter::{meter, share};
use super::theme::Theme;

/// One-line bar under the header: scan, selection or deletion progress
pub struct StatusBar<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Fill fraction, label, and bar color for the current mode
    fn measure(&self) -> Option<(f64, String, Color)> {
        let state = self.state;
        match state.mode {
            AppMode::Scanning => {
                let progress = &state.session.as_ref()?.progress;
                Some((
                    progress.percent,
                    format!("{:.0}% scanned", progress.percent * 100.0),
                    self.theme.accent,
                ))
            }
            AppMode::SelectItems => Some((
                share(state.selected_size(), state.total_size()),
                format!("{} selected", format_size(state.selected_size())),
                self.theme.warn,
            )),
            AppMode::Deleting => {
                let (done, total) = state.deletion_progress()?;
                Some((
                    share(done as u64, total as u64),
                    format!("{}/{} deleted", done, total),
                    self.theme.danger,
                ))
            }
            AppMode::DeletionComplete => Some((1.0, "done".to_string(), self.theme.ok)),
            AppMode::MainMenu | AppMode::DirectCleanup => None,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 {
            return;
        }
        let Some((fraction, label, color)) = self.measure() else {
            return;
        };

        let bar_width = area.width.saturating_sub(24) as usize;
        let bar = meter(fraction, bar_width);
        buf.set_string(area.x + 1, area.y, &bar, Style::default().fg(color));

        let label_width = label.chars().count() as u16;
        buf.set_string(
            area.x + area.width - label_width - 1,
            area.y,
            &label,
            Style::default().fg(self.theme.text_dim),
        );
    }
}
