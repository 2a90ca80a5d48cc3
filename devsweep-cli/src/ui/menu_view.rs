use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use crate::app::MenuState;

use super::theme::Theme;

/// Main menu: scanners first, then one-shot cleanups
pub struct MenuView<'a> {
    menu: &'a MenuState,
    theme: &'a Theme,
}

impl<'a> MenuView<'a> {
    pub fn new(menu: &'a MenuState, theme: &'a Theme) -> Self {
        Self { menu, theme }
    }
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" What should be cleaned? ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 30 {
            return;
        }

        let mut y = inner.y;
        let mut shown_direct_heading = false;
        for (i, entry) in self.menu.entries().iter().enumerate() {
            if !entry.is_interactive() && !shown_direct_heading {
                shown_direct_heading = true;
                y += 1;
                if y >= inner.y + inner.height {
                    break;
                }
                buf.set_string(
                    inner.x,
                    y,
                    "Quick cleanups",
                    Style::default()
                        .fg(self.theme.text_muted)
                        .add_modifier(Modifier::BOLD),
                );
                y += 1;
            }
            if y >= inner.y + inner.height {
                break;
            }

            let is_cursor = i == self.menu.cursor;
            let row_style = if is_cursor {
                Style::default()
                    .bg(self.theme.cursor_bg)
                    .fg(self.theme.cursor_fg)
            } else {
                Style::default().fg(self.theme.text)
            };

            for x in 0..inner.width {
                buf.set_string(inner.x + x, y, " ", row_style);
            }

            let check = if self.menu.is_checked(i) { "[x]" } else { "[ ]" };
            buf.set_string(inner.x, y, check, row_style);
            buf.set_string(inner.x + 4, y, entry.icon(), row_style);
            buf.set_string(
                inner.x + 7,
                y,
                entry.name(),
                row_style.add_modifier(Modifier::BOLD),
            );

            let desc_x = inner.x + 7 + entry.name().chars().count() as u16 + 2;
            if desc_x < inner.x + inner.width {
                let room = (inner.x + inner.width - desc_x) as usize;
                let desc: String = entry.description().chars().take(room).collect();
                let desc_style = if is_cursor {
                    row_style
                } else {
                    Style::default().fg(self.theme.text_dim)
                };
                buf.set_string(desc_x, y, &desc, desc_style);
            }
            y += 1;
        }
    }
}
