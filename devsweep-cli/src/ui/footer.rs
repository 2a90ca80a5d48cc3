use devsweep_core::format_size;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::AppMode;

use super::theme::Theme;

/// Footer widget showing keyboard hints and freed space
pub struct Footer<'a> {
    mode: AppMode,
    theme: &'a Theme,
    bytes_freed: Option<u64>,
}

impl<'a> Footer<'a> {
    pub fn new(mode: AppMode, theme: &'a Theme) -> Self {
        Self {
            mode,
            theme,
            bytes_freed: None,
        }
    }

    pub fn with_bytes_freed(mut self, bytes: u64) -> Self {
        self.bytes_freed = Some(bytes);
        self
    }
}

/// Key hints for a mode
pub fn hints(mode: AppMode) -> Vec<(&'static str, &'static str)> {
    match mode {
        AppMode::MainMenu => vec![
            ("↑↓", "Navigate"),
            ("Space", "Check"),
            ("Enter", "Start"),
            ("q", "Quit"),
        ],
        AppMode::Scanning => vec![("Esc", "Stop scan"), ("q", "Quit")],
        AppMode::SelectItems => vec![
            ("Space", "Toggle"),
            ("a/n", "All/None"),
            ("s/d/p", "Sort size/date/path"),
            ("f", "Filter small"),
            ("Enter", "Delete"),
            ("r", "Menu"),
            ("q", "Quit"),
        ],
        AppMode::Deleting => vec![("↑↓", "Navigate"), ("q", "Quit after current")],
        AppMode::DirectCleanup => vec![("q", "Quit")],
        AppMode::DeletionComplete => vec![("r", "Menu"), ("q", "Quit")],
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let hints = hints(self.mode);

        let key_style = Style::default()
            .fg(self.theme.text)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.text_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;
        for (i, (key, desc)) in hints.iter().enumerate() {
            buf.set_string(x, area.y, *key, key_style);
            x += key.chars().count() as u16 + 1;

            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.chars().count() as u16;

            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }

            if x >= area.x + area.width - 5 {
                break;
            }
        }

        if let Some(bytes) = self.bytes_freed {
            let freed_text = format!("Freed: {}", format_size(bytes));
            let stats_style = Style::default()
                .fg(self.theme.ok)
                .add_modifier(Modifier::BOLD);
            let width = freed_text.chars().count() as u16;
            if area.width > width + 1 {
                let stats_x = area.x + area.width - width - 1;
                if stats_x > x + 2 {
                    buf.set_string(stats_x, area.y, &freed_text, stats_style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanning_offers_only_stop_and_quit() {
        let keys: Vec<_> = hints(AppMode::Scanning).iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["Esc", "q"]);
    }

    #[test]
    fn test_deleting_quit_waits_for_current_item() {
        let quit = hints(AppMode::Deleting).into_iter().find(|(k, _)| *k == "q");
        assert_eq!(quit, Some(("q", "Quit after current")));
    }
}
