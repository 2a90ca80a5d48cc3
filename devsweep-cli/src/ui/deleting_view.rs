use devsweep_core::{DeletionRun, format_size};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use super::layout::centered_rect;
use super::meter::{meter, share};
use super::progress::truncate_left;
use super::theme::Theme;

/// Progress overlay shown while a deletion run is active
pub struct DeletingView<'a> {
    run: &'a DeletionRun,
    theme: &'a Theme,
}

impl<'a> DeletingView<'a> {
    pub fn new(run: &'a DeletionRun, theme: &'a Theme) -> Self {
        Self { run, theme }
    }
}

impl Widget for DeletingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_rect(60, 50, area);
        if dialog_area.width < 20 || dialog_area.height < 6 {
            return;
        }

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(" Deleting... ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.warn))
            .style(Style::default().bg(self.theme.surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let text_style = Style::default().fg(self.theme.text);
        let (done, total) = self.run.progress();
        let mut row = inner.y;

        buf.set_string(
            inner.x,
            row,
            format!("{} / {} completed", done, total),
            text_style,
        );
        row += 1;

        let bar_width = (inner.width as usize).saturating_sub(2);
        let bar = meter(share(done as u64, total as u64), bar_width);
        buf.set_string(inner.x, row, &bar, Style::default().fg(self.theme.ok));
        row += 2;

        buf.set_string(
            inner.x,
            row,
            format!("Freed: {}", format_size(self.run.total_freed())),
            text_style,
        );
        row += 1;

        let failures = self.run.ledger().iter().filter(|r| !r.success).count();
        if failures > 0 && row < inner.y + inner.height {
            buf.set_string(
                inner.x,
                row,
                format!("{} failed", failures),
                Style::default()
                    .fg(self.theme.danger)
                    .add_modifier(Modifier::BOLD),
            );
            row += 1;
        }

        if let Some(target) = self.run.current()
            && row < inner.y + inner.height
        {
            let path = truncate_left(&target.path.to_string_lossy(), inner.width as usize);
            buf.set_string(inner.x, row, &path, Style::default().fg(self.theme.text_dim));
        }
    }
}
