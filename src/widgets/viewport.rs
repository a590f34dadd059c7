use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Scrollable window over arbitrarily long text.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    y_offset: usize,
    content: String,
    lines: Vec<String>,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        let mut viewport = Self {
            width,
            height,
            ..Self::default()
        };
        viewport.set_content("");
        viewport
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.lines = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        self.y_offset = self.y_offset.min(self.max_offset());
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resizing keeps the content and only moves the visible window.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.y_offset = self.y_offset.min(self.max_offset());
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height as usize)
    }

    /// Fraction scrolled in `[0.0, 1.0]`; content that fits counts as fully
    /// scrolled.
    pub fn scroll_percent(&self) -> f64 {
        let total = self.lines.len();
        let height = self.height as usize;
        if height >= total {
            return 1.0;
        }
        let denominator = (total - height).max(1) as f64;
        (self.y_offset as f64 / denominator).clamp(0.0, 1.0)
    }

    pub fn visible_lines(&self) -> &[String] {
        let start = self.y_offset.min(self.lines.len());
        let end = (start + self.height as usize).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn line_down(&mut self, n: usize) {
        self.y_offset = (self.y_offset + n).min(self.max_offset());
    }

    pub fn line_up(&mut self, n: usize) {
        self.y_offset = self.y_offset.saturating_sub(n);
    }

    pub fn half_page_down(&mut self) {
        self.line_down((self.height as usize / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.line_up((self.height as usize / 2).max(1));
    }

    pub fn page_down(&mut self) {
        self.line_down((self.height as usize).max(1));
    }

    pub fn page_up(&mut self) {
        self.line_up((self.height as usize).max(1));
    }

    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_offset();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = Rect {
            width: area.width.min(self.width()),
            height: area.height.min(self.height()),
            ..area
        };
        let lines: Vec<Line> = self
            .visible_lines()
            .iter()
            .map(|l| Line::raw(l.as_str()))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}
