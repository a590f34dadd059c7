use std::io::{stdout, Stdout};
use std::panic;
use std::thread;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::{Config, UrlConfig};
use crate::http::{self, FetchError, RequestResult};
use crate::keys::{DelegateKeyMap, FieldKeyMap, GlobalKeyMap, KeyBinding, ListKeyMap, ViewportKeyMap};
use crate::message::{Command, Msg};
use crate::ui::{self, layout::AppLayout};
use crate::widgets::{FilterState, ItemList, ListItem, TextInput, Viewport};
use crate::perf;

type Term = Terminal<CrosstermBackend<Stdout>>;

const LIST_TITLE: &str = "Requests";
const NO_DATA: &str = "No Data";
const INITIAL_ITEMS: usize = 3;

/// Widgets that can only be built once the terminal size is known.
pub struct Panes {
    pub list: ItemList,
    pub list_keys: ListKeyMap,
    pub url: TextInput,
    pub viewport: Viewport,
}

/// Root model. Every sub-widget is owned here and only mutated from
/// [`App::update`], one message at a time.
pub struct App {
    panes: Option<Panes>,
    global_keys: GlobalKeyMap,
    field_keys: FieldKeyMap,
    viewport_keys: ViewportKeyMap,
    last_response: Option<Result<RequestResult, FetchError>>,
    in_flight: usize,
    url_config: UrlConfig,
    client: Client,
}

fn numbered_item(n: usize) -> ListItem {
    ListItem::new(format!("test {n}"), format!("test {n} description"))
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let client = http::build_client(config)?;

        Ok(Self {
            panes: None,
            global_keys: GlobalKeyMap::default(),
            field_keys: FieldKeyMap::default(),
            viewport_keys: ViewportKeyMap::default(),
            last_response: None,
            in_flight: 0,
            url_config: config.url.clone(),
            client,
        })
    }

    pub fn init(&self) -> Option<Command> {
        None
    }

    pub fn panes(&self) -> Option<&Panes> {
        self.panes.as_ref()
    }

    /// Outcome of the most recently completed request, success or failure.
    pub fn last_response(&self) -> Option<&Result<RequestResult, FetchError>> {
        self.last_response.as_ref()
    }

    pub fn update(&mut self, msg: Msg) -> Option<Command> {
        let _guard = perf::scope("update");

        // A focused URL field swallows every key except escape and enter.
        if let (Some(panes), Msg::Key(key)) = (self.panes.as_mut(), &msg) {
            if panes.url.focused() {
                if self.field_keys.escape.matches(key) {
                    return Some(Command::Quit);
                }
                if self.field_keys.enter.matches(key) {
                    let url = panes.url.value();
                    return Some(self.send(url));
                }
                panes.url.update(*key);
                return None;
            }
        }

        match msg {
            Msg::Resize { width, height } => {
                self.resize(width, height);
                None
            }
            Msg::Key(key) => self.handle_key(key),
            Msg::RequestFailed(err) => {
                self.request_finished();
                let description = err.to_string();
                warn!(error = %description, "request failed");
                if let Some(panes) = self.panes.as_mut() {
                    panes.viewport.set_content(&description);
                }
                self.last_response = Some(Err(err));
                None
            }
            Msg::RequestSucceeded(result) => {
                self.request_finished();
                let text = result.display_text();
                debug!(
                    status = %result.status_line(),
                    bytes = result.body.len(),
                    duration = ?result.duration,
                    "response received"
                );
                if let Some(panes) = self.panes.as_mut() {
                    panes.viewport.set_content(&text);
                }
                self.last_response = Some(Ok(result));
                None
            }
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let layout = AppLayout::for_size(width, height);
        if let Some(panes) = self.panes.as_mut() {
            panes
                .viewport
                .set_size(layout.viewport_area.width, layout.viewport_area.height);
            panes
                .list
                .set_size(layout.list_area.width, layout.list_area.height);
            return;
        }

        self.panes = Some(self.build_panes(&layout));
        info!(width, height, "terminal size known, ready");
    }

    fn build_panes(&self, layout: &AppLayout) -> Panes {
        let list_keys = ListKeyMap::default();

        let items = (1..=INITIAL_ITEMS).map(numbered_item).collect();
        let mut list = ItemList::new(
            items,
            DelegateKeyMap::default(),
            layout.list_area.width,
            layout.list_area.height,
        );
        list.title = LIST_TITLE.to_string();
        {
            let mut help: Vec<&KeyBinding> =
                vec![&self.global_keys.send, &self.global_keys.focus_url];
            help.extend(list_keys.full_help());
            list.set_additional_help(&help);
        }

        let url = TextInput::new(
            self.url_config.placeholder.clone(),
            self.url_config.char_limit,
            self.url_config.width,
        );

        let mut viewport = Viewport::new(layout.viewport_area.width, layout.viewport_area.height);
        viewport.set_content(NO_DATA);

        Panes {
            list,
            list_keys,
            url,
            viewport,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let Some(panes) = self.panes.as_mut() else {
            if self.global_keys.quit.matches(&key) {
                return Some(Command::Quit);
            }
            if self.global_keys.suspend.matches(&key) {
                return Some(Command::Suspend);
            }
            return None;
        };

        // While the filter prompt is open every key belongs to the list.
        if panes.list.filter_state() != FilterState::Filtering {
            let keys = &panes.list_keys;
            let list = &mut panes.list;

            if keys.toggle_title_bar.matches(&key) {
                let show = !list.show_title();
                list.set_show_title(show);
                list.set_show_filter(show);
                list.set_filtering_enabled(show);
                return None;
            }
            if keys.toggle_status_bar.matches(&key) {
                list.set_show_status_bar(!list.show_status_bar());
                return None;
            }
            if keys.toggle_pagination.matches(&key) {
                list.set_show_pagination(!list.show_pagination());
                return None;
            }
            if keys.toggle_help_menu.matches(&key) {
                list.set_show_help(!list.show_help());
                return None;
            }
            if keys.insert_item.matches(&key) {
                list.keys.remove.set_enabled(true);
                let item = numbered_item(list.len() + 1);
                let status = format!("Added {}", item.title);
                list.insert_item(0, item);
                list.new_status_message(status);
                return None;
            }

            if self.global_keys.quit.matches(&key) {
                return Some(Command::Quit);
            }
            if self.global_keys.suspend.matches(&key) {
                return Some(Command::Suspend);
            }
            if self.global_keys.focus_url.matches(&key) {
                panes.url.focus();
                return None;
            }
            if self.global_keys.send.matches(&key) {
                let mut url = panes.url.value();
                if url.is_empty() {
                    url = panes.url.placeholder.clone();
                }
                return Some(self.send(url));
            }

            let scroll = &self.viewport_keys;
            let viewport = &mut panes.viewport;
            if scroll.page_down.matches(&key) {
                viewport.page_down();
                return None;
            }
            if scroll.page_up.matches(&key) {
                viewport.page_up();
                return None;
            }
            if scroll.half_page_down.matches(&key) {
                viewport.half_page_down();
                return None;
            }
            if scroll.half_page_up.matches(&key) {
                viewport.half_page_up();
                return None;
            }
            if scroll.line_down.matches(&key) {
                viewport.line_down(1);
                return None;
            }
            if scroll.line_up.matches(&key) {
                viewport.line_up(1);
                return None;
            }
            if scroll.top.matches(&key) {
                viewport.goto_top();
                return None;
            }
            if scroll.bottom.matches(&key) {
                viewport.goto_bottom();
                return None;
            }
        }

        panes.list.update(&key)
    }

    /// Overlapping requests are not cancelled or sequenced: whichever result
    /// arrives last is what the viewport shows.
    fn send(&mut self, url: String) -> Command {
        self.in_flight += 1;
        if let Some(panes) = self.panes.as_mut() {
            panes.list.start_spinner();
        }
        info!(url, in_flight = self.in_flight, "dispatching request");
        Command::Fetch(url)
    }

    fn request_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            if let Some(panes) = self.panes.as_mut() {
                panes.list.stop_spinner();
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.install_panic_hook();
        let mut terminal = setup_terminal()?;

        let result = self.event_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;
        result
    }

    fn install_panic_hook(&self) {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            original_hook(panic_info);
        }));
    }

    async fn event_loop(&mut self, terminal: &mut Term) -> Result<()> {
        let (tx, mut rx) = mpsc::channel::<Msg>(64);
        spawn_input_reader(tx.clone());

        let (width, height) = terminal::size()?;
        let mut command = self.init();
        if tx.send(Msg::Resize { width, height }).await.is_err() {
            return Ok(());
        }

        loop {
            if let Some(cmd) = command.take() {
                match cmd {
                    Command::Quit => {
                        info!("quit requested");
                        break;
                    }
                    Command::Suspend => self.suspend(terminal)?,
                    Command::Fetch(url) => {
                        http::dispatch(self.client.clone(), url, tx.clone());
                    }
                }
            }

            {
                let _guard = perf::scope("draw");
                terminal.draw(|frame| ui::render(frame, self))?;
            }

            let Some(msg) = rx.recv().await else {
                break;
            };
            command = self.update(msg);
        }

        Ok(())
    }

    #[cfg(unix)]
    fn suspend(&self, terminal: &mut Term) -> Result<()> {
        info!("suspending");
        restore_terminal(terminal)?;

        // SAFETY: raise() only delivers a signal to the calling process.
        if unsafe { libc::raise(libc::SIGTSTP) } != 0 {
            warn!("failed to raise SIGTSTP");
        }

        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        terminal.clear()?;
        info!("resumed");
        Ok(())
    }

    #[cfg(not(unix))]
    fn suspend(&self, _terminal: &mut Term) -> Result<()> {
        warn!("suspend is not supported on this platform");
        Ok(())
    }
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Terminal input is read on its own thread and queued with network results,
/// so the loop sees a single ordered stream of messages.
fn spawn_input_reader(tx: mpsc::Sender<Msg>) {
    thread::spawn(move || loop {
        let msg = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Msg::Key(key),
            Ok(Event::Resize(width, height)) => Msg::Resize { width, height },
            Ok(_) => continue,
            Err(err) => {
                error!(error = %err, "failed to read terminal event");
                break;
            }
        };
        if tx.blocking_send(msg).is_err() {
            break;
        }
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};
    use reqwest::StatusCode;

    use super::*;

    fn app() -> App {
        App::new(&Config::default()).unwrap()
    }

    fn ready_app() -> App {
        let mut app = app();
        assert_eq!(app.update(Msg::Resize { width: 80, height: 24 }), None);
        app
    }

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ch(c: char) -> Msg {
        key(KeyCode::Char(c))
    }

    fn ctrl(c: char) -> Msg {
        Msg::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn panes(app: &App) -> &Panes {
        app.panes().unwrap()
    }

    fn titles(app: &App) -> Vec<String> {
        panes(app).list.items().iter().map(|i| i.title.clone()).collect()
    }

    fn ok_result(body: &str, millis: u64) -> RequestResult {
        RequestResult {
            status: StatusCode::OK,
            body: body.as_bytes().to_vec(),
            duration: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_first_resize_builds_widgets_once() {
        let mut app = app();
        assert!(app.panes().is_none());
        assert_eq!(app.init(), None);

        app.update(Msg::Resize { width: 80, height: 24 });
        assert!(app.panes().is_some());
        assert_eq!(titles(&app), ["test 1", "test 2", "test 3"]);
        assert_eq!(panes(&app).viewport.content(), NO_DATA);
        assert_eq!(panes(&app).viewport.height(), 20);
        assert_eq!(panes(&app).url.placeholder, "https://httpbin.org/anything");

        app.update(ch('a'));
        app.update(Msg::Resize { width: 120, height: 40 });
        assert_eq!(titles(&app).len(), 4);
        assert_eq!(panes(&app).viewport.width(), 79);
        assert_eq!(panes(&app).viewport.height(), 36);
        assert_eq!(panes(&app).viewport.content(), NO_DATA);
    }

    #[test]
    fn test_quit_and_suspend_before_ready() {
        let mut app = app();
        assert_eq!(app.update(ch('q')), Some(Command::Quit));
        assert_eq!(app.update(ctrl('z')), Some(Command::Suspend));
        assert_eq!(app.update(ch('a')), None);
        assert!(app.panes().is_none());
    }

    #[test]
    fn test_insert_numbers_from_current_count() {
        let mut app = ready_app();
        app.update(ch('a'));
        assert_eq!(titles(&app)[0], "test 4");
        assert_eq!(panes(&app).list.status_message(), Some("Added test 4"));

        // remove the selected (first) item, then insert again
        app.update(ch('x'));
        assert_eq!(titles(&app).len(), 3);
        app.update(ch('a'));
        assert_eq!(titles(&app)[0], "test 4");
        app.update(ch('a'));
        assert_eq!(titles(&app)[0], "test 5");
        assert_eq!(titles(&app).len(), 5);
        assert_eq!(panes(&app).list.items()[0].description, "test 5 description");
    }

    #[test]
    fn test_list_length_tracks_inserts_and_removals() {
        let mut app = ready_app();
        let script = "aaxaxxxaxa";
        let mut expected = INITIAL_ITEMS;
        for c in script.chars() {
            let before = titles(&app).len();
            app.update(ch(c));
            match c {
                'a' => {
                    expected += 1;
                    assert_eq!(titles(&app)[0], format!("test {}", before + 1));
                }
                _ => expected -= 1,
            }
            assert_eq!(titles(&app).len(), expected);
        }
    }

    #[test]
    fn test_removing_last_item_disables_delete_and_insert_reenables() {
        let mut app = ready_app();
        for _ in 0..INITIAL_ITEMS {
            app.update(key(KeyCode::Backspace));
        }
        assert!(panes(&app).list.is_empty());
        assert!(!panes(&app).list.keys.remove.enabled());

        app.update(ch('x'));
        assert!(panes(&app).list.is_empty());

        app.update(ch('a'));
        assert!(panes(&app).list.keys.remove.enabled());
        assert_eq!(titles(&app), ["test 1"]);
    }

    #[test]
    fn test_toggles_only_touch_display_flags() {
        let mut app = ready_app();
        app.update(ch('T'));
        let list = &panes(&app).list;
        assert!(!list.show_title());
        assert!(!list.filtering_enabled());

        app.update(ch('S'));
        app.update(ch('P'));
        app.update(ch('H'));
        let list = &panes(&app).list;
        assert!(!list.show_status_bar());
        assert!(!list.show_pagination());
        assert!(!list.show_help());
        assert_eq!(app.in_flight, 0);
        assert_eq!(titles(&app).len(), INITIAL_ITEMS);

        app.update(ch('T'));
        assert!(panes(&app).list.show_title());
        assert!(panes(&app).list.filtering_enabled());
    }

    #[test]
    fn test_focused_field_swallows_keys() {
        let mut app = ready_app();
        app.update(ch('u'));
        assert!(panes(&app).url.focused());

        for c in ['q', 'a', 'T', 'x', 's', 'u', 'j'] {
            assert_eq!(app.update(ch(c)), None);
        }
        assert_eq!(app.update(ctrl('c')), None);
        assert_eq!(app.update(key(KeyCode::PageDown)), None);
        assert_eq!(panes(&app).url.value(), "qaTxsuj");
        assert_eq!(titles(&app).len(), INITIAL_ITEMS);
        assert!(panes(&app).list.show_title());
        assert_eq!(panes(&app).list.index(), 0);
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_focused_field_enter_sends_and_escape_quits() {
        let mut app = ready_app();
        app.update(ch('u'));
        for c in "http://localhost/x".chars() {
            app.update(ch(c));
        }
        assert_eq!(
            app.update(key(KeyCode::Enter)),
            Some(Command::Fetch("http://localhost/x".into()))
        );
        assert!(panes(&app).url.focused());
        assert_eq!(app.update(key(KeyCode::Esc)), Some(Command::Quit));
    }

    #[test]
    fn test_enter_on_empty_field_sends_empty_url() {
        let mut app = ready_app();
        app.update(ch('u'));
        assert_eq!(app.update(key(KeyCode::Enter)), Some(Command::Fetch(String::new())));
    }

    #[test]
    fn test_results_still_arrive_while_field_focused() {
        let mut app = ready_app();
        app.update(ch('u'));
        app.update(Msg::RequestSucceeded(ok_result("body", 3)));
        assert_eq!(panes(&app).viewport.content(), "3ms\nbody");
    }

    #[test]
    fn test_send_falls_back_to_placeholder() {
        let mut app = ready_app();
        assert_eq!(
            app.update(ch('s')),
            Some(Command::Fetch("https://httpbin.org/anything".into()))
        );
        assert_eq!(app.in_flight, 1);
        assert!(panes(&app).list.spinner_active());

        app.update(Msg::RequestFailed(FetchError::Transport("boom".into())));
        assert_eq!(app.in_flight, 0);
        assert!(!panes(&app).list.spinner_active());
    }

    #[test]
    fn test_send_uses_field_value_when_set() {
        let mut app = ready_app();
        app.update(ch('u'));
        for c in "http://a.test".chars() {
            app.update(ch(c));
        }
        if let Some(panes) = app.panes.as_mut() {
            panes.url.blur();
        }
        assert_eq!(
            app.update(ch('s')),
            Some(Command::Fetch("http://a.test".into()))
        );
    }

    #[test]
    fn test_transport_error_is_shown_verbatim() {
        let mut app = ready_app();
        let description = "error sending request for url (http://127.0.0.1:1/): connection refused";
        app.update(Msg::RequestFailed(FetchError::Transport(description.into())));
        assert_eq!(panes(&app).viewport.content(), description);
        assert!(matches!(
            app.last_response(),
            Some(Err(FetchError::Transport(d))) if d == description
        ));
    }

    fn last_ok(app: &App) -> Option<&RequestResult> {
        app.last_response().and_then(|r| r.as_ref().ok())
    }

    #[test]
    fn test_success_replaces_last_response() {
        let mut app = ready_app();
        app.update(Msg::RequestSucceeded(ok_result("{\"ok\":true}", 12)));
        assert_eq!(panes(&app).viewport.content(), "12ms\n{\"ok\":true}");
        assert_eq!(last_ok(&app).map(|r| r.body.clone()), Some(b"{\"ok\":true}".to_vec()));

        app.update(Msg::RequestSucceeded(ok_result("second", 1)));
        assert_eq!(last_ok(&app).map(|r| r.body.clone()), Some(b"second".to_vec()));
    }

    #[test]
    fn test_failure_replaces_earlier_success() {
        let mut app = ready_app();
        app.update(Msg::RequestSucceeded(ok_result("first", 3)));
        assert!(last_ok(&app).is_some());

        app.update(Msg::RequestFailed(FetchError::Transport("connection refused".into())));
        assert!(last_ok(&app).is_none());
        assert!(matches!(app.last_response(), Some(Err(FetchError::Transport(_)))));
        assert_eq!(panes(&app).viewport.content(), "connection refused");
    }

    #[test]
    fn test_last_message_wins_for_overlapping_requests() {
        let mut app = ready_app();
        assert!(matches!(app.update(ch('s')), Some(Command::Fetch(_))));
        assert!(matches!(app.update(ch('s')), Some(Command::Fetch(_))));
        assert_eq!(app.in_flight, 2);

        // B (fast) completes before A (slow)
        app.update(Msg::RequestSucceeded(ok_result("B", 5)));
        assert!(panes(&app).list.spinner_active());
        app.update(Msg::RequestSucceeded(ok_result("A", 900)));

        assert_eq!(last_ok(&app).map(|r| r.body.clone()), Some(b"A".to_vec()));
        assert_eq!(panes(&app).viewport.content(), "900ms\nA");
        assert!(!panes(&app).list.spinner_active());
    }

    #[test]
    fn test_filtering_suppresses_key_actions() {
        let mut app = ready_app();
        app.update(ch('/'));
        assert_eq!(panes(&app).list.filter_state(), FilterState::Filtering);

        assert_eq!(app.update(ch('q')), None);
        assert_eq!(app.update(ch('a')), None);
        assert_eq!(app.update(ch('s')), None);
        assert_eq!(app.update(ch('u')), None);
        assert_eq!(titles(&app).len(), INITIAL_ITEMS);
        assert!(!panes(&app).url.focused());
        assert_eq!(panes(&app).list.filter_value(), "qasu");

        app.update(key(KeyCode::Esc));
        assert_eq!(panes(&app).list.filter_state(), FilterState::Unfiltered);
        assert_eq!(app.update(ch('q')), Some(Command::Quit));
    }

    #[test]
    fn test_filter_ctrl_c_still_quits() {
        let mut app = ready_app();
        app.update(ch('/'));
        assert_eq!(app.update(ctrl('c')), Some(Command::Quit));
    }

    #[test]
    fn test_unmatched_keys_reach_the_list() {
        let mut app = ready_app();
        app.update(ch('j'));
        app.update(key(KeyCode::Down));
        assert_eq!(panes(&app).list.index(), 2);
        app.update(key(KeyCode::Enter));
        assert_eq!(panes(&app).list.status_message(), Some("You chose test 3"));
    }

    #[test]
    fn test_quit_and_suspend_keys() {
        let mut app = ready_app();
        assert_eq!(app.update(ch('q')), Some(Command::Quit));
        assert_eq!(app.update(ctrl('c')), Some(Command::Quit));
        assert_eq!(app.update(ctrl('z')), Some(Command::Suspend));
    }

    #[test]
    fn test_scroll_keys_move_viewport() {
        let mut app = ready_app();
        let body = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        app.update(Msg::RequestSucceeded(ok_result(&body, 1)));
        assert_eq!(panes(&app).viewport.y_offset(), 0);

        app.update(key(KeyCode::PageDown));
        assert_eq!(panes(&app).viewport.y_offset(), 20);
        app.update(ctrl('u'));
        assert_eq!(panes(&app).viewport.y_offset(), 10);
        app.update(Msg::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::CONTROL)));
        assert_eq!(panes(&app).viewport.y_offset(), 11);
        // "1ms" header line plus 100 body lines, 20 visible
        app.update(Msg::Key(KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL)));
        assert_eq!(panes(&app).viewport.y_offset(), 81);
        app.update(Msg::Key(KeyEvent::new(KeyCode::Home, KeyModifiers::CONTROL)));
        assert_eq!(panes(&app).viewport.y_offset(), 0);
        app.update(key(KeyCode::PageDown));
        app.update(key(KeyCode::PageUp));
        assert_eq!(panes(&app).viewport.y_offset(), 0);
        // list cursor untouched by scrolling
        assert_eq!(panes(&app).list.index(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_request_fills_viewport() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 15\r\nConnection: close\r\n\r\n{\"args\": \"ok\"}\n")
                .await
                .unwrap();
            socket.shutdown().await.ok();
        });

        let mut config = Config::default();
        config.url.placeholder = format!("http://{addr}/anything");
        let mut app = App::new(&config).unwrap();
        app.client = Client::builder().no_proxy().build().unwrap();
        app.update(Msg::Resize { width: 80, height: 24 });

        let Some(Command::Fetch(url)) = app.update(ch('s')) else {
            panic!("expected a fetch command");
        };
        let (tx, mut rx) = mpsc::channel(4);
        http::dispatch(app.client.clone(), url, tx);
        let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(app.update(msg), None);

        let content = panes(&app).viewport.content().to_string();
        let (duration, body) = content.split_once('\n').unwrap();
        let response = last_ok(&app).unwrap();
        assert_eq!(duration, format!("{:?}", response.duration));
        assert_eq!(body, "{\"args\": \"ok\"}\n");
        assert_eq!(response.status_line(), "200 OK");
    }
}
