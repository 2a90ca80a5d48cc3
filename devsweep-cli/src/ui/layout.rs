use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout
pub struct AppLayout {
    pub header: Rect,
    pub status_bar: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Status bar
                Constraint::Min(5),    // Body
                Constraint::Length(1), // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            status_bar: chunks[1],
            body: chunks[2],
            footer: chunks[3],
        }
    }
}

/// Calculate centered rectangle for overlays
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_width = area.width * percent_x / 100;
    let popup_height = area.height * percent_y / 100;

    let x = area.x + (area.width - popup_width) / 2;
    let y = area.y + (area.height - popup_height) / 2;

    Rect::new(x, y, popup_width, popup_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_area() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.y, 23);
        assert_eq!(layout.body.height, 21);
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 80, 20));
        assert_eq!(r, Rect::new(20, 5, 40, 10));
    }
}
