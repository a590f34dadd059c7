pub mod layout;

use layout::AppLayout;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const RULE_COLOR: Color = Color::DarkGray;

/// Pure function of the model: called after every update.
pub fn render(frame: &mut Frame, app: &App) {
    let Some(panes) = app.panes() else {
        frame.render_widget(Paragraph::new("\n  Initializing..."), frame.area());
        return;
    };

    let layout = AppLayout::new(frame.area());

    panes.list.render(frame, layout.list_area);

    frame.render_widget(
        Paragraph::new(Line::styled(
            "Request URL:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        layout.label_area,
    );
    panes.url.render(frame, layout.url_area);

    frame.render_widget(
        Paragraph::new(header_line(
            layout.header_area.width,
            app.last_response()
                .and_then(|r| r.as_ref().ok())
                .map(|r| r.status_line()),
        )),
        layout.header_area,
    );
    panes.viewport.render(frame, layout.viewport_area);
    frame.render_widget(
        Paragraph::new(footer_line(
            layout.footer_area.width,
            panes.viewport.scroll_percent(),
        )),
        layout.footer_area,
    );
}

fn header_line(width: u16, status: Option<String>) -> Line<'static> {
    let title = match status {
        Some(status) => format!(" Response Body │ {status} │"),
        None => String::from(" Response Body │"),
    };
    let rule = "─".repeat((width as usize).saturating_sub(title.width()));
    Line::from(vec![
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(rule, Style::default().fg(RULE_COLOR)),
    ])
}

fn footer_line(width: u16, percent: f64) -> Line<'static> {
    let info = format!("│ {:3.0}% ", percent * 100.0);
    let rule = "─".repeat((width as usize).saturating_sub(info.width()));
    Line::from(vec![
        Span::styled(rule, Style::default().fg(RULE_COLOR)),
        Span::raw(info),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::message::Msg;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_unready_shows_initializing() {
        let app = App::new(&Config::default()).unwrap();
        let rows = screen(&app);
        assert!(rows.iter().any(|r| r.contains("Initializing...")));
    }

    #[test]
    fn test_ready_screen_80x24() {
        let mut app = App::new(&Config::default()).unwrap();
        app.update(Msg::Resize {
            width: 80,
            height: 24,
        });
        let rows = screen(&app);
        let all = rows.join("\n");

        assert!(rows[0].contains("Requests"));
        assert!(rows[0].contains("Request URL:"));
        assert!(rows[1].contains("ttps://httpbin.org/anything"));
        assert!(rows[2].contains("Response Body"));
        assert!(rows[3].contains("No Data"));
        assert!(rows[23].contains("100%"));
        assert!(all.contains("test 1"));
        assert!(all.contains("test 3 description"));
        assert!(all.contains("3 items"));
    }

    #[test]
    fn test_header_tracks_latest_outcome() {
        use crate::http::{FetchError, RequestResult};
        use reqwest::StatusCode;
        use std::time::Duration;

        let mut app = App::new(&Config::default()).unwrap();
        app.update(Msg::Resize {
            width: 80,
            height: 24,
        });
        app.update(Msg::RequestSucceeded(RequestResult {
            status: StatusCode::OK,
            body: b"first".to_vec(),
            duration: Duration::from_millis(4),
        }));
        assert!(screen(&app)[2].contains("Response Body │ 200 OK │"));

        app.update(Msg::RequestFailed(FetchError::Transport(
            "connection refused".into(),
        )));
        let rows = screen(&app);
        assert!(rows[2].contains("Response Body │"));
        assert!(!rows[2].contains("200 OK"));
        assert!(rows[3].contains("connection refused"));
    }

    #[test]
    fn test_header_and_footer_fill_width() {
        assert_eq!(header_line(40, None).width(), 40);
        let header = header_line(40, Some("404 Not Found".into()));
        assert_eq!(header.width(), 40);
        assert!(header.to_string().starts_with(" Response Body │ 404 Not Found │─"));
        assert_eq!(footer_line(40, 0.5).width(), 40);
        assert!(footer_line(40, 0.5).to_string().ends_with("│  50% "));
        // narrower than the label: no rule, no panic
        assert_eq!(footer_line(2, 1.0).to_string(), "│ 100% ");
    }
}
