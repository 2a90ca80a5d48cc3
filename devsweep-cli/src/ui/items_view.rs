use std::path::Path;
use std::time::{Duration, SystemTime};

use devsweep_core::{DeletionState, Item, format_size};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::meter::{meter, share};
use super::progress::truncate_left;
use super::theme::Theme;

/// Flat list of discovered artifacts with selection checkboxes
pub struct ItemsView<'a> {
    items: &'a [Item],
    root: &'a Path,
    selected_index: usize,
    scroll_offset: usize,
    total_size: u64,
    theme: &'a Theme,
}

impl<'a> ItemsView<'a> {
    pub fn new(
        items: &'a [Item],
        root: &'a Path,
        selected_index: usize,
        scroll_offset: usize,
        theme: &'a Theme,
    ) -> Self {
        let total_size = items.iter().map(|i| i.size).sum();
        Self {
            items,
            root,
            selected_index,
            scroll_offset,
            total_size,
            theme,
        }
    }

    fn display_path(&self, item: &Item) -> String {
        item.path
            .strip_prefix(self.root)
            .unwrap_or(&item.path)
            .to_string_lossy()
            .to_string()
    }
}

/// Human-readable age such as "3d" or "5mo"
pub fn format_age(modified: Option<SystemTime>, now: SystemTime) -> String {
    let Some(modified) = modified else {
        return "-".to_string();
    };
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    let days = age.as_secs() / 86_400;
    if days == 0 {
        "today".to_string()
    } else if days < 30 {
        format!("{}d", days)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

fn state_marker(state: DeletionState) -> &'static str {
    match state {
        DeletionState::Unset => " ",
        DeletionState::Pending => "·",
        DeletionState::InProgress => "…",
        DeletionState::Deleted => "✓",
        DeletionState::Failed => "✗",
    }
}

impl Widget for ItemsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 60 {
            return;
        }

        if self.items.is_empty() {
            let msg = "Nothing found. Press r to go back.";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            buf.set_string(x, y, msg, Style::default().fg(self.theme.text_dim));
            return;
        }

        let now = SystemTime::now();
        let bar_width: usize = 14;
        let size_width: usize = 10;
        let age_width: usize = 6;
        let kind_width: usize = 15;
        // marker, checkbox, icon
        let lead_width: usize = 2 + 4 + 3;
        let path_width = (area.width as usize)
            .saturating_sub(lead_width + kind_width + age_width + bar_width + size_width + 2);

        for (i, item) in self
            .items
            .iter()
            .skip(self.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            let is_cursor = i + self.scroll_offset == self.selected_index;

            let row_style = if is_cursor {
                Style::default()
                    .bg(self.theme.cursor_bg)
                    .fg(self.theme.cursor_fg)
            } else {
                Style::default().fg(self.theme.text)
            };
            let styled = |style: Style| if is_cursor { row_style } else { style };

            for x in 0..area.width {
                buf.set_string(area.x + x, y, " ", row_style);
            }

            let mut x = area.x;

            let state = item.deletion_state();
            let marker_color = match state {
                DeletionState::Deleted => self.theme.outcome_color(true),
                DeletionState::Failed => self.theme.outcome_color(false),
                _ => self.theme.warn,
            };
            buf.set_string(x, y, state_marker(state), styled(Style::default().fg(marker_color)));
            x += 2;

            let check = if item.selected { "[x]" } else { "[ ]" };
            buf.set_string(x, y, check, row_style);
            x += 4;

            buf.set_string(
                x,
                y,
                item.kind.icon(),
                styled(Style::default().fg(self.theme.kind_color(item.kind))),
            );
            x += 3;

            let path = truncate_left(&self.display_path(item), path_width);
            let path_style = if state == DeletionState::Deleted {
                styled(Style::default().fg(self.theme.text_dim))
            } else {
                row_style.add_modifier(Modifier::BOLD)
            };
            buf.set_string(x, y, &path, path_style);
            x += path_width as u16 + 1;

            let kind_label = format!("[{}]", item.kind.label());
            buf.set_string(x, y, &kind_label, styled(Style::default().fg(self.theme.text_muted)));
            x += kind_width as u16;

            let age = format!("{:>5}", format_age(item.last_modified, now));
            buf.set_string(x, y, &age, styled(Style::default().fg(self.theme.text_dim)));
            x += age_width as u16;

            let fraction = share(item.size, self.total_size);
            let bar_color = if is_cursor {
                self.theme.cursor_fg
            } else {
                self.theme.share_color(fraction)
            };
            let bar = meter(fraction, bar_width.saturating_sub(1));
            buf.set_string(x, y, &bar, styled(Style::default().fg(bar_color)));
            x += bar_width as u16;

            let size_str = if item.is_size_known() {
                format!("{:>9}", format_size(item.size))
            } else {
                format!("{:>9}", "...")
            };
            buf.set_string(x, y, &size_str, styled(Style::default().fg(self.theme.text_muted)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(400 * 86_400);
        let days_ago = |d: u64| Some(now - Duration::from_secs(d * 86_400));

        assert_eq!(format_age(None, now), "-");
        assert_eq!(format_age(Some(now), now), "today");
        assert_eq!(format_age(days_ago(3), now), "3d");
        assert_eq!(format_age(days_ago(95), now), "3mo");
        assert_eq!(format_age(days_ago(399), now), "1y");
    }

    #[test]
    fn test_future_mtime_is_today() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let future = Some(now + Duration::from_secs(3600));
        assert_eq!(format_age(future, now), "today");
    }

    #[test]
    fn test_state_markers() {
        assert_eq!(state_marker(DeletionState::Deleted), "✓");
        assert_eq!(state_marker(DeletionState::Failed), "✗");
        assert_eq!(state_marker(DeletionState::Unset), " ");
    }
}
