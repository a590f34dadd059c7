use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::keys::{DelegateKeyMap, KeyBinding, KeyPress};
use crate::message::Command;

const STATUS_COLOR: Color = Color::Rgb(0x04, 0xB5, 0x75);
const SELECTED_COLOR: Color = Color::Rgb(0xEE, 0x6F, 0xF8);
const TITLE_BG: Color = Color::Rgb(0x25, 0xA0, 0x65);
const ITEM_HEIGHT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub description: String,
}

impl ListItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn filter_value(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    #[default]
    Unfiltered,
    Filtering,
    FilterApplied,
}

#[derive(Debug, Clone)]
struct NavKeys {
    up: KeyBinding,
    down: KeyBinding,
    home: KeyBinding,
    end: KeyBinding,
    prev_page: KeyBinding,
    next_page: KeyBinding,
    filter: KeyBinding,
    clear_filter: KeyBinding,
}

impl Default for NavKeys {
    fn default() -> Self {
        Self {
            up: KeyBinding::new(&[KeyPress::key(KeyCode::Up), KeyPress::char('k')], "↑/k", "up"),
            down: KeyBinding::new(
                &[KeyPress::key(KeyCode::Down), KeyPress::char('j')],
                "↓/j",
                "down",
            ),
            home: KeyBinding::new(&[KeyPress::key(KeyCode::Home), KeyPress::char('g')], "g", "top"),
            end: KeyBinding::new(&[KeyPress::key(KeyCode::End), KeyPress::char('G')], "G", "bottom"),
            prev_page: KeyBinding::new(
                &[KeyPress::key(KeyCode::Left), KeyPress::char('h')],
                "←/h",
                "prev page",
            ),
            next_page: KeyBinding::new(
                &[KeyPress::key(KeyCode::Right), KeyPress::char('l')],
                "→/l",
                "next page",
            ),
            filter: KeyBinding::new(&[KeyPress::char('/')], "/", "filter"),
            clear_filter: KeyBinding::new(&[KeyPress::key(KeyCode::Esc)], "esc", "clear filter"),
        }
    }
}

/// Ordered, filterable list of request targets with a selection cursor.
///
/// The cursor indexes the *visible* items, which are all items unless a
/// filter is being typed or has been applied.
#[derive(Debug, Clone)]
pub struct ItemList {
    items: Vec<ListItem>,
    cursor: usize,
    filter: String,
    filter_state: FilterState,
    pub keys: DelegateKeyMap,
    nav: NavKeys,
    pub title: String,
    additional_help: Vec<(&'static str, &'static str)>,
    show_title: bool,
    show_filter: bool,
    filtering_enabled: bool,
    show_status_bar: bool,
    show_pagination: bool,
    show_help: bool,
    spinner: bool,
    status_message: Option<String>,
    width: u16,
    height: u16,
}

impl ItemList {
    pub fn new(items: Vec<ListItem>, keys: DelegateKeyMap, width: u16, height: u16) -> Self {
        Self {
            items,
            cursor: 0,
            filter: String::new(),
            filter_state: FilterState::Unfiltered,
            keys,
            nav: NavKeys::default(),
            title: String::from("List"),
            additional_help: Vec::new(),
            show_title: true,
            show_filter: true,
            filtering_enabled: true,
            show_status_bar: true,
            show_pagination: true,
            show_help: true,
            spinner: false,
            status_message: None,
            width,
            height,
        }
    }

    pub fn set_additional_help(&mut self, bindings: &[&KeyBinding]) {
        self.additional_help = bindings
            .iter()
            .map(|b| (b.help_key, b.help_desc))
            .collect();
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts at `index` (clamped to the end), shifting later items down.
    pub fn insert_item(&mut self, index: usize, item: ListItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Removes the item at `index`, shifting later items up.
    pub fn remove_item(&mut self, index: usize) -> Option<ListItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.clamp_cursor();
        Some(removed)
    }

    pub fn visible_items(&self) -> Vec<&ListItem> {
        self.visible_indices()
            .into_iter()
            .map(|i| &self.items[i])
            .collect()
    }

    fn visible_indices(&self) -> Vec<usize> {
        if self.filter_state == FilterState::Unfiltered || self.filter.is_empty() {
            return (0..self.items.len()).collect();
        }
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.filter_value().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Cursor position within the visible items.
    pub fn index(&self) -> usize {
        self.cursor
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.selected_global_index().map(|i| &self.items[i])
    }

    fn selected_global_index(&self) -> Option<usize> {
        self.visible_indices().get(self.cursor).copied()
    }

    pub fn filter_state(&self) -> FilterState {
        self.filter_state
    }

    pub fn filter_value(&self) -> &str {
        &self.filter
    }

    pub fn show_title(&self) -> bool {
        self.show_title
    }

    pub fn set_show_title(&mut self, show: bool) {
        self.show_title = show;
    }

    pub fn set_show_filter(&mut self, show: bool) {
        self.show_filter = show;
    }

    pub fn filtering_enabled(&self) -> bool {
        self.filtering_enabled
    }

    pub fn set_filtering_enabled(&mut self, enabled: bool) {
        self.filtering_enabled = enabled;
        if !enabled {
            self.reset_filter();
        }
    }

    pub fn show_status_bar(&self) -> bool {
        self.show_status_bar
    }

    pub fn set_show_status_bar(&mut self, show: bool) {
        self.show_status_bar = show;
    }

    pub fn show_pagination(&self) -> bool {
        self.show_pagination
    }

    pub fn set_show_pagination(&mut self, show: bool) {
        self.show_pagination = show;
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn set_show_help(&mut self, show: bool) {
        self.show_help = show;
    }

    pub fn spinner_active(&self) -> bool {
        self.spinner
    }

    pub fn start_spinner(&mut self) {
        self.spinner = true;
    }

    pub fn stop_spinner(&mut self) {
        self.spinner = false;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn new_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Items that fit on one page at the current height.
    pub fn per_page(&self) -> usize {
        let available = (self.height as usize).saturating_sub(self.chrome_height());
        (available / ITEM_HEIGHT).max(1)
    }

    fn chrome_height(&self) -> usize {
        // title and status bar are followed by a blank spacer line
        let mut height = 0;
        if self.show_title || (self.show_filter && self.filter_state != FilterState::Unfiltered) {
            height += 2;
        }
        if self.show_status_bar {
            height += 2;
        }
        if self.show_pagination {
            height += 1;
        }
        if self.show_help {
            height += 1;
        }
        height
    }

    pub fn page(&self) -> usize {
        self.cursor / self.per_page()
    }

    pub fn total_pages(&self) -> usize {
        let visible = self.visible_indices().len();
        visible.div_ceil(self.per_page()).max(1)
    }

    fn clamp_cursor(&mut self) {
        let visible = self.visible_indices().len();
        self.cursor = self.cursor.min(visible.saturating_sub(1));
    }

    fn reset_filter(&mut self) {
        self.filter.clear();
        self.filter_state = FilterState::Unfiltered;
        self.clamp_cursor();
    }

    /// Handles a key the root loop did not claim. Returns a command only for
    /// a forced quit while the filter prompt owns the keyboard.
    pub fn update(&mut self, key: &KeyEvent) -> Option<Command> {
        if self.filter_state == FilterState::Filtering {
            return self.handle_filtering(key);
        }
        self.handle_browsing(key);
        None
    }

    fn handle_filtering(&mut self, key: &KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Command::Quit);
            }
            KeyCode::Esc => self.reset_filter(),
            KeyCode::Enter => {
                self.filter_state = if self.filter.is_empty() {
                    FilterState::Unfiltered
                } else {
                    FilterState::FilterApplied
                };
                self.clamp_cursor();
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.cursor = 0;
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.filter.push(c);
                self.cursor = 0;
            }
            _ => {}
        }
        None
    }

    fn handle_browsing(&mut self, key: &KeyEvent) {
        let visible = self.visible_indices().len();
        let per_page = self.per_page();

        if self.nav.up.matches(key) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if self.nav.down.matches(key) {
            if self.cursor + 1 < visible {
                self.cursor += 1;
            }
        } else if self.nav.home.matches(key) {
            self.cursor = 0;
        } else if self.nav.end.matches(key) {
            self.cursor = visible.saturating_sub(1);
        } else if self.nav.prev_page.matches(key) {
            self.cursor = self.cursor.saturating_sub(per_page);
        } else if self.nav.next_page.matches(key) {
            self.cursor = (self.cursor + per_page).min(visible.saturating_sub(1));
        } else if self.nav.filter.matches(key) && self.filtering_enabled {
            self.filter.clear();
            self.filter_state = FilterState::Filtering;
            self.cursor = 0;
        } else if self.nav.clear_filter.matches(key)
            && self.filter_state == FilterState::FilterApplied
        {
            self.reset_filter();
        } else {
            self.handle_delegate(key);
        }
    }

    fn handle_delegate(&mut self, key: &KeyEvent) {
        let Some(index) = self.selected_global_index() else {
            return;
        };
        let title = self.items[index].title.clone();

        if self.keys.choose.matches(key) {
            self.new_status_message(format!("You chose {title}"));
        } else if self.keys.remove.matches(key) {
            self.remove_item(index);
            if self.items.is_empty() {
                self.keys.remove.set_enabled(false);
            }
            self.new_status_message(format!("Deleted {title}"));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let filter_visible = self.show_filter && self.filter_state != FilterState::Unfiltered;
        let header_visible = self.show_title || filter_visible;
        let pages = self.total_pages();

        let mut constraints = Vec::new();
        if header_visible {
            constraints.push(Constraint::Length(2));
        }
        if self.show_status_bar {
            constraints.push(Constraint::Length(2));
        }
        constraints.push(Constraint::Min(0));
        if self.show_pagination {
            constraints.push(Constraint::Length(1));
        }
        if self.show_help {
            constraints.push(Constraint::Length(1));
        }
        let chunks = Layout::vertical(constraints).split(area);
        let mut next = chunks.iter().copied();

        if header_visible {
            if let Some(rect) = next.next() {
                frame.render_widget(Paragraph::new(self.header_line(filter_visible)), rect);
            }
        }
        if self.show_status_bar {
            if let Some(rect) = next.next() {
                frame.render_widget(Paragraph::new(self.status_line()), rect);
            }
        }
        if let Some(rect) = next.next() {
            frame.render_widget(Paragraph::new(self.item_lines(rect.height)), rect);
        }
        if self.show_pagination {
            if let Some(rect) = next.next() {
                if pages > 1 {
                    frame.render_widget(Paragraph::new(self.pagination_line(pages)), rect);
                }
            }
        }
        if self.show_help {
            if let Some(rect) = next.next() {
                frame.render_widget(Paragraph::new(self.help_line()), rect);
            }
        }
    }

    fn header_line(&self, filter_visible: bool) -> Line<'static> {
        if filter_visible {
            let cursor = if self.filter_state == FilterState::Filtering {
                "█"
            } else {
                ""
            };
            return Line::from(vec![
                Span::styled("Filter: ", Style::default().fg(SELECTED_COLOR)),
                Span::raw(format!("{}{}", self.filter_value(), cursor)),
            ]);
        }
        let mut spans = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default().fg(Color::White).bg(TITLE_BG),
        )];
        if self.spinner {
            spans.push(Span::styled(" ⣾", Style::default().fg(SELECTED_COLOR)));
        }
        Line::from(spans)
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(message) = &self.status_message {
            return Line::styled(message.clone(), Style::default().fg(STATUS_COLOR));
        }
        let visible = self.visible_indices().len();
        let text = match (self.filter_state, visible) {
            (_, 0) if self.items.is_empty() => String::from("No items"),
            (FilterState::Unfiltered, 1) => String::from("1 item"),
            (FilterState::Unfiltered, n) => format!("{n} items"),
            (_, n) => format!("{n} of {} items", self.items.len()),
        };
        Line::styled(text, Style::default().fg(Color::DarkGray))
    }

    fn item_lines(&self, height: u16) -> Vec<Line<'static>> {
        let visible = self.visible_items();
        let per_page = self.per_page().min((height as usize / ITEM_HEIGHT).max(1));
        let start = (self.cursor / per_page) * per_page;

        let mut lines = Vec::new();
        for (offset, item) in visible.iter().skip(start).take(per_page).enumerate() {
            let selected = start + offset == self.cursor;
            let (bar, title_style, desc_style) = if selected {
                (
                    "│ ",
                    Style::default().fg(SELECTED_COLOR),
                    Style::default().fg(SELECTED_COLOR).add_modifier(Modifier::DIM),
                )
            } else {
                (
                    "  ",
                    Style::default(),
                    Style::default().fg(Color::DarkGray),
                )
            };
            lines.push(Line::from(vec![
                Span::styled(bar, title_style),
                Span::styled(item.title.clone(), title_style),
            ]));
            lines.push(Line::from(vec![
                Span::styled(bar, title_style),
                Span::styled(item.description.clone(), desc_style),
            ]));
            lines.push(Line::default());
        }
        lines
    }

    fn pagination_line(&self, pages: usize) -> Line<'static> {
        let page = self.page();
        let dots: String = (0..pages)
            .map(|p| if p == page { '•' } else { '○' })
            .collect();
        Line::styled(format!("  {dots}"), Style::default().fg(Color::DarkGray))
    }

    fn help_line(&self) -> Line<'static> {
        let mut entries: Vec<(&str, &str)> = vec![
            (self.nav.up.help_key, self.nav.up.help_desc),
            (self.nav.down.help_key, self.nav.down.help_desc),
        ];
        if self.filtering_enabled {
            entries.push((self.nav.filter.help_key, self.nav.filter.help_desc));
        }
        entries.extend(
            self.keys
                .short_help()
                .into_iter()
                .filter(|b| b.enabled())
                .map(|b| (b.help_key, b.help_desc)),
        );
        entries.extend(self.additional_help.iter().copied());

        let text = entries
            .iter()
            .map(|(key, desc)| format!("{key} {desc}"))
            .collect::<Vec<_>>()
            .join(" • ");
        Line::styled(text, Style::default().fg(Color::DarkGray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample() -> ItemList {
        let items = vec![
            ListItem::new("users", "GET /users"),
            ListItem::new("orders", "GET /orders"),
            ListItem::new("user detail", "GET /users/1"),
        ];
        ItemList::new(items, DelegateKeyMap::default(), 26, 24)
    }

    #[test]
    fn test_insert_shifts_items_down() {
        let mut list = sample();
        list.insert_item(1, ListItem::new("health", "GET /health"));
        let titles: Vec<_> = list.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["users", "health", "orders", "user detail"]);

        list.insert_item(99, ListItem::new("tail", ""));
        assert_eq!(list.items().last().map(|i| i.title.as_str()), Some("tail"));
    }

    #[test]
    fn test_remove_shifts_items_up_and_clamps_cursor() {
        let mut list = sample();
        list.update(&key(KeyCode::Char('G')));
        assert_eq!(list.index(), 2);

        let removed = list.remove_item(2);
        assert_eq!(removed.map(|i| i.title), Some(String::from("user detail")));
        assert_eq!(list.index(), 1);
        assert!(list.remove_item(5).is_none());
    }

    #[test]
    fn test_duplicate_titles_allowed() {
        let mut list = sample();
        list.insert_item(0, ListItem::new("users", "again"));
        assert_eq!(list.items().iter().filter(|i| i.title == "users").count(), 2);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut list = sample();
        list.update(&key(KeyCode::Up));
        assert_eq!(list.index(), 0);
        for _ in 0..10 {
            list.update(&key(KeyCode::Char('j')));
        }
        assert_eq!(list.index(), 2);
        list.update(&key(KeyCode::Home));
        assert_eq!(list.index(), 0);
    }

    #[test]
    fn test_filter_substring_case_insensitive() {
        let mut list = sample();
        list.update(&key(KeyCode::Char('/')));
        assert_eq!(list.filter_state(), FilterState::Filtering);
        for c in "USER".chars() {
            list.update(&key(KeyCode::Char(c)));
        }
        let titles: Vec<_> = list.visible_items().iter().map(|i| i.title.clone()).collect();
        assert_eq!(titles, ["users", "user detail"]);

        list.update(&key(KeyCode::Enter));
        assert_eq!(list.filter_state(), FilterState::FilterApplied);
        list.update(&key(KeyCode::Down));
        assert_eq!(list.selected_item().map(|i| i.title.as_str()), Some("user detail"));

        list.update(&key(KeyCode::Esc));
        assert_eq!(list.filter_state(), FilterState::Unfiltered);
        assert_eq!(list.visible_items().len(), 3);
    }

    #[test]
    fn test_filter_keys_do_not_trigger_delegate_actions() {
        let mut list = sample();
        list.update(&key(KeyCode::Char('/')));
        list.update(&key(KeyCode::Char('x')));
        assert_eq!(list.len(), 3);
        assert_eq!(list.filter_value(), "x");

        list.update(&key(KeyCode::Esc));
        assert_eq!(list.filter_state(), FilterState::Unfiltered);
        assert_eq!(list.filter_value(), "");
    }

    #[test]
    fn test_empty_filter_enter_returns_to_unfiltered() {
        let mut list = sample();
        list.update(&key(KeyCode::Char('/')));
        list.update(&key(KeyCode::Enter));
        assert_eq!(list.filter_state(), FilterState::Unfiltered);
    }

    #[test]
    fn test_ctrl_c_while_filtering_quits() {
        let mut list = sample();
        list.update(&key(KeyCode::Char('/')));
        let cmd = list.update(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(cmd, Some(Command::Quit));
    }

    #[test]
    fn test_filter_disabled_ignores_slash() {
        let mut list = sample();
        list.set_filtering_enabled(false);
        list.update(&key(KeyCode::Char('/')));
        assert_eq!(list.filter_state(), FilterState::Unfiltered);
    }

    #[test]
    fn test_choose_sets_status_message() {
        let mut list = sample();
        list.update(&key(KeyCode::Down));
        list.update(&key(KeyCode::Enter));
        assert_eq!(list.status_message(), Some("You chose orders"));
    }

    #[test]
    fn test_removing_last_item_disables_remove() {
        let mut list = sample();
        for _ in 0..3 {
            list.update(&key(KeyCode::Char('x')));
        }
        assert!(list.is_empty());
        assert!(!list.keys.remove.enabled());
        assert_eq!(list.status_message(), Some("Deleted user detail"));

        list.insert_item(0, ListItem::new("again", ""));
        list.update(&key(KeyCode::Backspace));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_pagination_follows_cursor() {
        let items = (1..=20)
            .map(|n| ListItem::new(format!("item {n}"), ""))
            .collect();
        let list_height = 2 + 2 + 1 + 1 + ITEM_HEIGHT as u16 * 4;
        let mut list = ItemList::new(items, DelegateKeyMap::default(), 30, list_height);
        assert_eq!(list.per_page(), 4);
        assert_eq!(list.total_pages(), 5);

        list.update(&key(KeyCode::Right));
        assert_eq!(list.index(), 4);
        assert_eq!(list.page(), 1);
        list.update(&key(KeyCode::Left));
        assert_eq!(list.page(), 0);
    }
}
