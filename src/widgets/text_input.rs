use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

/// Single-line text field with a placeholder and a character limit.
///
/// Keys only reach the buffer while the field is focused; the root loop reads
/// [`TextInput::focused`] on every message to decide routing.
pub struct TextInput {
    textarea: TextArea<'static>,
    pub placeholder: String,
    char_limit: usize,
    pub width: u16,
    focused: bool,
}

impl TextInput {
    pub fn new(placeholder: impl Into<String>, char_limit: usize, width: u16) -> Self {
        let placeholder = placeholder.into();
        let mut input = Self {
            textarea: TextArea::default(),
            placeholder,
            char_limit,
            width,
            focused: false,
        };
        input.textarea = input.build_textarea(String::new());
        input
    }

    fn build_textarea(&self, value: String) -> TextArea<'static> {
        let mut textarea = TextArea::new(vec![value]);
        textarea.set_placeholder_text(self.placeholder.clone());
        textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
        textarea.set_cursor_line_style(Style::default());
        textarea.move_cursor(CursorMove::End);
        textarea.set_cursor_style(cursor_style(self.focused));
        textarea
    }

    pub fn value(&self) -> String {
        self.textarea.lines().concat()
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.textarea.set_cursor_style(cursor_style(true));
    }

    pub fn blur(&mut self) {
        self.focused = false;
        self.textarea.set_cursor_style(cursor_style(false));
    }

    /// Feeds a key to the buffer. Returns whether the value changed.
    pub fn update(&mut self, key: KeyEvent) -> bool {
        if !self.focused {
            return false;
        }
        let input = Input::from(key);
        if matches!(
            input,
            Input {
                key: Key::Enter,
                ..
            } | Input {
                key: Key::Char('m'),
                ctrl: true,
                ..
            }
        ) {
            return false;
        }

        if !self.textarea.input(input) {
            return false;
        }
        let lines = self.textarea.lines();
        let too_long = lines.iter().map(|l| l.chars().count()).sum::<usize>() > self.char_limit;
        if lines.len() > 1 || too_long {
            self.textarea.undo();
            return false;
        }
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = Rect {
            width: area.width.min(self.width),
            ..area
        };
        frame.render_widget(&self.textarea, area);
    }
}

fn cursor_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}
