use devsweep_core::DirectCleanupId;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use super::progress::SPINNER;
use super::theme::Theme;

/// Shown while one-shot cleanups run on the worker
pub struct DirectCleanupView<'a> {
    running: &'a [DirectCleanupId],
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> DirectCleanupView<'a> {
    pub fn new(running: &'a [DirectCleanupId], spinner_frame: usize, theme: &'a Theme) -> Self {
        Self {
            running,
            spinner_frame,
            theme,
        }
    }
}

impl Widget for DirectCleanupView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Quick cleanups ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 20 {
            return;
        }

        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        buf.set_string(
            inner.x,
            inner.y,
            format!("{} Cleaning...", spinner),
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        );

        for (i, id) in self.running.iter().enumerate() {
            let y = inner.y + 2 + i as u16;
            if y >= inner.y + inner.height {
                break;
            }
            buf.set_string(inner.x, y, id.icon(), Style::default().fg(self.theme.text));
            buf.set_string(inner.x + 3, y, id.name(), Style::default().fg(self.theme.text));
        }
    }
}
