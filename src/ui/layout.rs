use ratatui::layout::{Constraint, Layout, Rect};

pub struct AppLayout {
    pub list_area: Rect,
    pub label_area: Rect,
    pub url_area: Rect,
    pub header_area: Rect,
    pub viewport_area: Rect,
    pub footer_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        // Split: list (one third) | gap | request + response column
        let horizontal = Layout::horizontal([
            Constraint::Length(area.width / 3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

        let list_area = horizontal[0];
        let main_area = horizontal[2];

        let vertical = Layout::vertical([
            Constraint::Length(1), // "Request URL:"
            Constraint::Length(1), // URL field
            Constraint::Length(1), // response header rule
            Constraint::Min(0),    // response body
            Constraint::Length(1), // footer rule + scroll percent
        ])
        .split(main_area);

        Self {
            list_area,
            label_area: vertical[0],
            url_area: vertical[1],
            header_area: vertical[2],
            viewport_area: vertical[3],
            footer_area: vertical[4],
        }
    }

    /// Layout for a terminal of the given size, used to size widgets from a
    /// resize message before anything is drawn.
    pub fn for_size(width: u16, height: u16) -> Self {
        Self::new(Rect::new(0, 0, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_80x24_split() {
        let layout = AppLayout::for_size(80, 24);
        assert_eq!(layout.list_area.width, 26);
        assert_eq!(layout.list_area.height, 24);
        assert_eq!(layout.viewport_area.width, 53);
        assert_eq!(layout.viewport_area.height, 20);
        assert_eq!(layout.url_area.y, 1);
        assert_eq!(layout.footer_area.y, 23);
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let layout = AppLayout::for_size(3, 2);
        assert!(layout.viewport_area.bottom() <= 2);
    }
}
