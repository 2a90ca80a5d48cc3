use devsweep_core::{Precision, format_count, format_duration, format_size};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use crate::app::ScanSession;

use super::meter::meter;
use super::theme::Theme;

/// Braille spinner characters
pub const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Progress widget shown during scanning
pub struct ProgressView<'a> {
    session: &'a ScanSession,
    items_found: usize,
    bytes_found: u64,
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> ProgressView<'a> {
    pub fn new(
        session: &'a ScanSession,
        items_found: usize,
        bytes_found: u64,
        spinner_frame: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            items_found,
            bytes_found,
            spinner_frame,
            theme,
        }
    }
}

impl Widget for ProgressView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(
                " {} {} ",
                self.session.scanner.icon, self.session.scanner.name
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 5 || inner.width < 30 {
            return;
        }

        let progress = &self.session.progress;

        // Spinner + status
        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        buf.set_string(
            inner.x,
            inner.y,
            spinner.to_string(),
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        );
        let status = if self.session.cancelled {
            " Stopping..."
        } else {
            " Scanning..."
        };
        buf.set_string(inner.x + 1, inner.y, status, Style::default().fg(self.theme.text));

        // Bar + percent
        let bar_width = (inner.width as usize).saturating_sub(8);
        let bar = meter(progress.percent, bar_width);
        buf.set_string(inner.x, inner.y + 1, &bar, Style::default().fg(self.theme.accent));
        buf.set_string(
            inner.x + bar_width as u16 + 1,
            inner.y + 1,
            format!("{:>3.0}%", progress.percent * 100.0),
            Style::default().fg(self.theme.text),
        );

        // Stats line
        let eta = progress
            .eta
            .map(format_duration)
            .unwrap_or_else(|| "--".to_string());
        let precision = match progress.precision {
            Precision::Measured => "",
            Precision::Estimated => "  (estimated)",
        };
        let stats = format!(
            "{} / ~{} dirs  {:.0} dirs/s  ETA {}  zone {}{}",
            format_count(progress.directories_scanned),
            format_count(progress.estimated_total),
            progress.speed,
            eta,
            progress.zone.label(),
            precision,
        );
        buf.set_string(
            inner.x,
            inner.y + 2,
            &stats,
            Style::default().fg(self.theme.text_muted),
        );

        let found = format!(
            "{} found  {}  {} errors",
            format_count(self.items_found as u64),
            format_size(self.bytes_found),
            format_count(self.session.live.errors),
        );
        buf.set_string(
            inner.x,
            inner.y + 3,
            &found,
            Style::default().fg(self.theme.ok),
        );

        // Current path (truncated)
        if let Some(path) = &self.session.live.current_path {
            let display_path = truncate_left(&path.to_string_lossy(), inner.width as usize);
            buf.set_string(
                inner.x,
                inner.y + 4,
                &display_path,
                Style::default().fg(self.theme.text_dim),
            );
        }

        // Recent discoveries
        let mut y = inner.y + 6;
        for path in &self.session.recent {
            if y >= inner.y + inner.height {
                break;
            }
            let line = truncate_left(
                &path.to_string_lossy(),
                (inner.width as usize).saturating_sub(2),
            );
            buf.set_string(inner.x, y, "+", Style::default().fg(self.theme.ok));
            buf.set_string(inner.x + 2, y, &line, Style::default().fg(self.theme.text));
            y += 1;
        }
    }
}

/// Keep the tail of `s` so it fits in `max` columns
pub fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return ".".repeat(max);
    }
    let tail: String = s.chars().skip(len - (max - 3)).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_left() {
        assert_eq!(truncate_left("/a/b", 10), "/a/b");
        assert_eq!(truncate_left("/home/ada/projects", 10), "...rojects");
        assert_eq!(truncate_left("/home/ada/projects", 10).chars().count(), 10);
        assert_eq!(truncate_left("abcdef", 2), "..");
    }
}
