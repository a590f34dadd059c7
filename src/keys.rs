use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single physical key, optionally with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub const fn new(modifiers: KeyModifiers, code: KeyCode) -> Self {
        Self { code, modifiers }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(KeyModifiers::NONE, code)
    }

    pub const fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyModifiers::CONTROL, KeyCode::Char(c))
    }

    /// Terminals disagree on whether `T` arrives with SHIFT set, so SHIFT is
    /// ignored for character keys.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        let mut modifiers = key.modifiers;
        if matches!(key.code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        modifiers == self.modifiers
    }
}

#[derive(Debug, Clone)]
pub struct KeyBinding {
    keys: Vec<KeyPress>,
    pub help_key: &'static str,
    pub help_desc: &'static str,
    enabled: bool,
}

impl KeyBinding {
    pub fn new(keys: &[KeyPress], help_key: &'static str, help_desc: &'static str) -> Self {
        Self {
            keys: keys.to_vec(),
            help_key,
            help_desc,
            enabled: true,
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.enabled && self.keys.iter().any(|k| k.matches(key))
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Actions the root loop checks before handing keys to the list.
#[derive(Debug, Clone)]
pub struct ListKeyMap {
    pub toggle_title_bar: KeyBinding,
    pub toggle_status_bar: KeyBinding,
    pub toggle_pagination: KeyBinding,
    pub toggle_help_menu: KeyBinding,
    pub insert_item: KeyBinding,
}

impl Default for ListKeyMap {
    fn default() -> Self {
        Self {
            insert_item: KeyBinding::new(&[KeyPress::char('a')], "a", "add item"),
            toggle_title_bar: KeyBinding::new(&[KeyPress::char('T')], "T", "toggle title"),
            toggle_status_bar: KeyBinding::new(&[KeyPress::char('S')], "S", "toggle status"),
            toggle_pagination: KeyBinding::new(&[KeyPress::char('P')], "P", "toggle pagination"),
            toggle_help_menu: KeyBinding::new(&[KeyPress::char('H')], "H", "toggle help"),
        }
    }
}

impl ListKeyMap {
    pub fn full_help(&self) -> [&KeyBinding; 5] {
        [
            &self.insert_item,
            &self.toggle_title_bar,
            &self.toggle_status_bar,
            &self.toggle_pagination,
            &self.toggle_help_menu,
        ]
    }
}

/// Actions applied to the selected list item.
#[derive(Debug, Clone)]
pub struct DelegateKeyMap {
    pub choose: KeyBinding,
    pub remove: KeyBinding,
}

impl Default for DelegateKeyMap {
    fn default() -> Self {
        Self {
            choose: KeyBinding::new(&[KeyPress::key(KeyCode::Enter)], "enter", "choose"),
            remove: KeyBinding::new(
                &[KeyPress::char('x'), KeyPress::key(KeyCode::Backspace)],
                "x",
                "delete",
            ),
        }
    }
}

impl DelegateKeyMap {
    pub fn short_help(&self) -> [&KeyBinding; 2] {
        [&self.choose, &self.remove]
    }
}

/// `send` also drives the list spinner, which runs while a request is in
/// flight.
#[derive(Debug, Clone)]
pub struct GlobalKeyMap {
    pub quit: KeyBinding,
    pub suspend: KeyBinding,
    pub focus_url: KeyBinding,
    pub send: KeyBinding,
}

impl Default for GlobalKeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(&[KeyPress::char('q'), KeyPress::ctrl('c')], "q", "quit"),
            suspend: KeyBinding::new(&[KeyPress::ctrl('z')], "ctrl+z", "suspend"),
            focus_url: KeyBinding::new(&[KeyPress::char('u')], "u", "edit url"),
            send: KeyBinding::new(&[KeyPress::char('s')], "s", "send request"),
        }
    }
}

/// Keys intercepted while the URL field has focus.
#[derive(Debug, Clone)]
pub struct FieldKeyMap {
    pub escape: KeyBinding,
    pub enter: KeyBinding,
}

impl Default for FieldKeyMap {
    fn default() -> Self {
        Self {
            escape: KeyBinding::new(&[KeyPress::key(KeyCode::Esc)], "esc", "quit"),
            enter: KeyBinding::new(&[KeyPress::key(KeyCode::Enter)], "enter", "send request"),
        }
    }
}

/// Response scrolling, checked by the root loop before keys fall through to
/// the list.
#[derive(Debug, Clone)]
pub struct ViewportKeyMap {
    pub page_down: KeyBinding,
    pub page_up: KeyBinding,
    pub half_page_down: KeyBinding,
    pub half_page_up: KeyBinding,
    pub line_down: KeyBinding,
    pub line_up: KeyBinding,
    pub top: KeyBinding,
    pub bottom: KeyBinding,
}

impl Default for ViewportKeyMap {
    fn default() -> Self {
        Self {
            page_down: KeyBinding::new(&[KeyPress::key(KeyCode::PageDown)], "pgdn", "page down"),
            page_up: KeyBinding::new(&[KeyPress::key(KeyCode::PageUp)], "pgup", "page up"),
            half_page_down: KeyBinding::new(&[KeyPress::ctrl('d')], "ctrl+d", "½ page down"),
            half_page_up: KeyBinding::new(&[KeyPress::ctrl('u')], "ctrl+u", "½ page up"),
            line_down: KeyBinding::new(
                &[KeyPress::new(KeyModifiers::CONTROL, KeyCode::Down)],
                "ctrl+↓",
                "scroll down",
            ),
            line_up: KeyBinding::new(
                &[KeyPress::new(KeyModifiers::CONTROL, KeyCode::Up)],
                "ctrl+↑",
                "scroll up",
            ),
            top: KeyBinding::new(
                &[KeyPress::new(KeyModifiers::CONTROL, KeyCode::Home)],
                "ctrl+home",
                "response top",
            ),
            bottom: KeyBinding::new(
                &[KeyPress::new(KeyModifiers::CONTROL, KeyCode::End)],
                "ctrl+end",
                "response bottom",
            ),
        }
    }
}
