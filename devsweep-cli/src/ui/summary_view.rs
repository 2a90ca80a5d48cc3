use devsweep_core::{DeletionSummary, DirectCleanupResult, format_size};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use super::progress::truncate_left;
use super::theme::Theme;

/// Final report: per-item ledger, direct cleanup results, bytes freed
pub struct SummaryView<'a> {
    summary: Option<&'a DeletionSummary>,
    direct: &'a [DirectCleanupResult],
    theme: &'a Theme,
}

impl<'a> SummaryView<'a> {
    pub fn new(
        summary: Option<&'a DeletionSummary>,
        direct: &'a [DirectCleanupResult],
        theme: &'a Theme,
    ) -> Self {
        Self {
            summary,
            direct,
            theme,
        }
    }

    fn total_freed(&self) -> u64 {
        let deleted = self.summary.map_or(0, |s| s.total_freed);
        let direct: u64 = self.direct.iter().map(|r| r.bytes_freed).sum();
        deleted + direct
    }
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Done ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.ok))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 30 {
            return;
        }

        let bottom = inner.y + inner.height;
        let mut y = inner.y;

        buf.set_string(
            inner.x,
            y,
            format!("Total freed: {}", format_size(self.total_freed())),
            Style::default()
                .fg(self.theme.ok)
                .add_modifier(Modifier::BOLD),
        );
        y += 2;

        let size_col = inner.width.saturating_sub(10);
        let path_width = (size_col as usize).saturating_sub(3);

        if let Some(summary) = self.summary {
            if y < bottom {
                buf.set_string(
                    inner.x,
                    y,
                    format!(
                        "{} deleted, {} failed",
                        summary.succeeded(),
                        summary.failed()
                    ),
                    Style::default().fg(self.theme.text_muted),
                );
                y += 1;
            }
            for result in &summary.results {
                if y >= bottom {
                    break;
                }
                let (mark, color) = if result.success {
                    ("✓", self.theme.outcome_color(true))
                } else {
                    ("✗", self.theme.outcome_color(false))
                };
                buf.set_string(inner.x, y, mark, Style::default().fg(color));
                let mut line = result.path.to_string_lossy().to_string();
                if let Some(err) = &result.error {
                    line = format!("{}  ({})", line, err);
                }
                buf.set_string(
                    inner.x + 2,
                    y,
                    truncate_left(&line, path_width),
                    Style::default().fg(self.theme.text),
                );
                buf.set_string(
                    inner.x + size_col,
                    y,
                    format!("{:>9}", format_size(result.size)),
                    Style::default().fg(self.theme.text_muted),
                );
                y += 1;
            }
            y += 1;
        }

        for result in self.direct {
            if y >= bottom {
                break;
            }
            let (mark, color) = if result.success {
                ("✓", self.theme.outcome_color(true))
            } else {
                ("✗", self.theme.outcome_color(false))
            };
            buf.set_string(inner.x, y, mark, Style::default().fg(color));
            let mut line = result.description.to_string();
            if let Some(err) = &result.error {
                line = format!("{}  ({})", line, err);
            }
            buf.set_string(
                inner.x + 2,
                y,
                truncate_left(&line, path_width),
                Style::default().fg(self.theme.text),
            );
            buf.set_string(
                inner.x + size_col,
                y,
                format!("{:>9}", format_size(result.bytes_freed)),
                Style::default().fg(self.theme.text_muted),
            );
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devsweep_core::{DeletionResult, DirectCleanupId};

    #[test]
    fn test_total_freed_includes_partial_cleanups() {
        let theme = Theme::default();
        let summary = DeletionSummary {
            results: vec![
                DeletionResult::succeeded("/a".into(), 100),
                DeletionResult::failed("/b".into(), 50, "denied"),
            ],
            total_freed: 100,
        };
        let direct = vec![
            DirectCleanupResult {
                id: DirectCleanupId::NpmCache,
                description: "npm",
                success: true,
                bytes_freed: 20,
                error: None,
            },
            DirectCleanupResult {
                id: DirectCleanupId::YarnCache,
                description: "yarn",
                success: false,
                bytes_freed: 7,
                error: Some("denied".into()),
            },
        ];
        let view = SummaryView::new(Some(&summary), &direct, &theme);
        // Only successful deletions count; a failed cleanup still reports what it removed
        assert_eq!(view.total_freed(), 127);
    }
}
