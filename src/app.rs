use ratatui::layout::Rect;
use pulse_core::{BubbleId, ChatClient, ChatError, ChatMessage, Config, Transcript};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthChar;
use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Chips,
    Transcript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown,
    Online,
    Offline,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub show_disclaimer: bool,

    // Input state
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars
    pub input_height: u16,   // visible rows, grows with content
    pub input_scroll: u16,
    pub input_width: u16, // inner width of the input box, set during render
    pub max_input_rows: u16,

    // Example chips
    pub example_queries: Vec<String>,
    pub selected_chip: usize,
    pub visible_chips: usize, // chips that fit on screen, set during render

    // Conversation
    pub transcript: Transcript,
    pub transcript_scroll: u16,
    pub transcript_max_scroll: u16, // set during render
    pub transcript_pinned: bool,    // follow the newest message

    // Send gate
    pub sending: bool,
    pub typing_bubble: Option<BubbleId>,

    // Animation state
    pub animation_frame: u8, // 0-2, which typing dot is lit

    pub server_status: ServerStatus,
    pub assistant_label: String,

    // Areas for mouse hit-testing (updated during render)
    pub transcript_area: Option<Rect>,
    pub input_area: Option<Rect>,
    pub send_button_area: Option<Rect>,
    pub clear_button_area: Option<Rect>,
    pub accept_button_area: Option<Rect>,
    pub chip_areas: Vec<Rect>,

    client: ChatClient,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, client: ChatClient, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            focus: FocusPane::Input,
            show_disclaimer: true,

            input: String::new(),
            input_cursor: 0,
            input_height: 1,
            input_scroll: 0,
            input_width: 0,
            max_input_rows: config.max_input_rows(),

            visible_chips: config.example_queries().len(),
            example_queries: config.example_queries(),
            selected_chip: 0,

            transcript: Transcript::new(),
            transcript_scroll: 0,
            transcript_max_scroll: 0,
            transcript_pinned: true,

            sending: false,
            typing_bubble: None,

            animation_frame: 0,

            server_status: ServerStatus::Unknown,
            assistant_label: config.assistant_label(),

            transcript_area: None,
            input_area: None,
            send_button_area: None,
            clear_button_area: None,
            accept_button_area: None,
            chip_areas: Vec::new(),

            client,
            events,
        }
    }

    pub fn server_url(&self) -> &str {
        self.client.base_url()
    }

    /// Hide the disclaimer overlay and hand focus to the input
    pub fn accept_disclaimer(&mut self) {
        self.show_disclaimer = false;
        self.focus = FocusPane::Input;
    }

    /// Run the send pipeline for the current input.
    ///
    /// Returns false without side effects when the input is blank or a
    /// request is already in flight. The reply comes back later as
    /// [`AppEvent::Reply`] and is applied by [`App::finish_send`].
    pub fn send_message(&mut self) -> bool {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.sending {
            return false;
        }

        self.transcript.dismiss_welcome();
        self.transcript.push(ChatMessage::user(text.clone()));

        self.input.clear();
        self.input_cursor = 0;
        self.input_scroll = 0;
        self.input_height = 1;

        self.sending = true;
        self.typing_bubble = Some(self.transcript.push_typing());
        self.scroll_to_bottom();

        info!(chars = text.chars().count(), "sending message");
        let client = self.client.clone();
        let request = tokio::spawn(async move { client.send(&text).await });

        // A panicking request still has to reopen the gate
        let tx = self.events.clone();
        tokio::spawn(async move {
            let outcome = request
                .await
                .unwrap_or_else(|e| Err(ChatError::Interrupted(e.to_string())));
            let _ = tx.send(AppEvent::Reply(outcome));
        });

        true
    }

    /// Apply the outcome of the in-flight request
    pub fn finish_send(&mut self, outcome: Result<String, ChatError>) {
        if let Some(id) = self.typing_bubble.take() {
            // Already gone if the conversation was cleared meanwhile
            self.transcript.remove(id);
        }

        match outcome {
            Ok(reply) => {
                debug!(chars = reply.chars().count(), "reply received");
                self.transcript.push(ChatMessage::assistant(reply));
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.transcript.push(ChatMessage::assistant_error(e.bubble_text()));
            }
        }
        self.scroll_to_bottom();

        self.sending = false;
        self.focus = FocusPane::Input;
    }

    /// Reset the conversation to the welcome screen.
    ///
    /// Does not touch the send gate; a pending reply still lands afterwards.
    pub fn clear_conversation(&mut self) {
        self.transcript.clear();
        self.transcript_scroll = 0;
        self.transcript_pinned = true;
        info!("conversation cleared");
    }

    /// Fill the input with an example query and send it straight away
    pub fn select_chip(&mut self, idx: usize) {
        let Some(query) = self.example_queries.get(idx).cloned() else {
            return;
        };
        self.selected_chip = idx;
        self.input = query;
        self.input_cursor = self.input.chars().count();
        self.resize_input();
        self.send_message();
    }

    /// Move the chip selection right, stopping at the last chip on screen
    pub fn chip_next(&mut self) {
        let len = self.visible_chips.min(self.example_queries.len());
        if len > 0 {
            self.selected_chip = (self.selected_chip + 1).min(len - 1);
        }
    }

    pub fn chip_prev(&mut self) {
        self.selected_chip = self.selected_chip.saturating_sub(1);
    }

    pub fn spawn_health_check(&self) {
        let client = self.client.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let online = match client.health().await {
                Ok(health) => health.is_ok(),
                Err(e) => {
                    warn!(error = %e, "health check failed");
                    false
                }
            };
            let _ = tx.send(AppEvent::Health(online));
        });
    }

    pub fn set_server_online(&mut self, online: bool) {
        self.server_status = if online {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        };
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.sending {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Input editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
        self.input.insert(byte_pos, c);
        self.input_cursor += 1;
        self.resize_input();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Insert pasted text at the cursor. Newlines are kept and never send.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
        self.input.insert_str(byte_pos, &text);
        self.input_cursor += text.chars().count();
        self.resize_input();
    }

    pub fn backspace(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
            self.input.remove(byte_pos);
            self.resize_input();
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.input.chars().count();
        if self.input_cursor < char_count {
            let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
            self.input.remove(byte_pos);
            self.resize_input();
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
        self.keep_cursor_visible();
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_count);
        self.keep_cursor_visible();
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
        self.keep_cursor_visible();
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.input.chars().count();
        self.keep_cursor_visible();
    }

    /// Recompute the input height from its content, capped at `max_input_rows`
    pub fn resize_input(&mut self) {
        let rows = input_rows(&self.input, self.input_wrap_width()).len() as u16;
        self.input_height = rows.clamp(1, self.max_input_rows);
        self.keep_cursor_visible();
    }

    /// Row and column of the cursor within the wrapped input
    pub fn cursor_position(&self) -> (u16, u16) {
        let width = self.input_wrap_width();
        let rows = input_rows(&self.input, width);
        cursor_row_col(&self.input, &rows, self.input_cursor, width)
    }

    fn keep_cursor_visible(&mut self) {
        let (row, _) = self.cursor_position();
        if row < self.input_scroll {
            self.input_scroll = row;
        } else if row >= self.input_scroll + self.input_height {
            self.input_scroll = row + 1 - self.input_height;
        }
    }

    fn input_wrap_width(&self) -> usize {
        // Before the first render, fall back to a typical width
        if self.input_width > 0 {
            self.input_width as usize
        } else {
            60
        }
    }

    // Transcript scrolling

    pub fn scroll_to_bottom(&mut self) {
        self.transcript_pinned = true;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.transcript_pinned = false;
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.transcript_scroll = self
            .transcript_scroll
            .saturating_add(lines)
            .min(self.transcript_max_scroll);
        if self.transcript_scroll == self.transcript_max_scroll {
            self.transcript_pinned = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.transcript_pinned = false;
        self.transcript_scroll = 0;
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Split input text into visual rows as `(start, end)` char ranges.
///
/// Rows break at newlines and wrap once `width` terminal columns are used; a
/// wide character that would straddle the edge moves to the next row. A full
/// last row gets an empty row after it so the cursor has somewhere to sit.
pub fn input_rows(text: &str, width: usize) -> Vec<(usize, usize)> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    let mut last_full = false;

    for line in text.split('\n') {
        let mut row_start = start;
        let mut row_width = 0;
        let mut idx = start;
        for c in line.chars() {
            let w = c.width().unwrap_or(0);
            if row_width > 0 && row_width + w > width {
                rows.push((row_start, idx));
                row_start = idx;
                row_width = 0;
            }
            row_width += w;
            idx += 1;
        }
        rows.push((row_start, idx));
        last_full = row_width >= width;
        start = idx + 1; // skip the newline
    }

    if last_full {
        if let Some(&(_, end)) = rows.last() {
            rows.push((end, end));
        }
    }

    rows
}

/// Locate a char cursor in wrapped rows: the last row starting at or before
/// it. The column is in terminal columns and never reaches `width`, so a
/// cursor after a full row stays inside the box.
pub fn cursor_row_col(
    text: &str,
    rows: &[(usize, usize)],
    cursor: usize,
    width: usize,
) -> (u16, u16) {
    let row = rows
        .iter()
        .rposition(|&(start, _)| start <= cursor)
        .unwrap_or(0);
    let col = rows
        .get(row)
        .map(|&(start, end)| {
            text.chars()
                .skip(start)
                .take(cursor.min(end).saturating_sub(start))
                .map(|c| c.width().unwrap_or(0))
                .sum::<usize>()
        })
        .unwrap_or(0);
    (row as u16, col.min(width.max(1) - 1) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::{ChatRole, EntryKind, CONNECTIVITY_MESSAGE};
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(server_url: &str) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut config = Config::new();
        config.max_input_rows = Some(4);
        let app = App::new(&config, ChatClient::new(server_url), tx);
        (app, rx)
    }

    /// Wait for the reply event and feed it back, as the main loop does
    async fn deliver_reply(app: &mut App, rx: &mut mpsc::UnboundedReceiver<AppEvent>) {
        loop {
            match rx.recv().await {
                Some(AppEvent::Reply(outcome)) => {
                    app.finish_send(outcome);
                    return;
                }
                Some(_) => continue,
                None => panic!("event channel closed before reply"),
            }
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    fn contents(app: &App) -> Vec<(ChatRole, String, bool)> {
        app.transcript
            .messages()
            .map(|m| (m.role, m.content.clone(), m.is_error))
            .collect()
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (mut app, _rx) = test_app(&mock_server.uri());
        type_text(&mut app, "   \n  ");
        assert!(!app.send_message());
        assert!(app.transcript.is_empty());
        assert!(app.transcript.shows_welcome());
        assert!(!app.sending);
        // Input is left alone
        assert_eq!(app.input, "   \n  ");
    }

    #[tokio::test]
    async fn test_successful_send() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "Try resting."})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (mut app, mut rx) = test_app(&mock_server.uri());
        app.accept_disclaimer();
        type_text(&mut app, "  I have a headache ");
        assert!(app.send_message());

        // Synchronous part of the pipeline
        assert!(!app.transcript.shows_welcome());
        assert!(app.sending);
        assert!(app.transcript.is_typing());
        assert!(app.input.is_empty());
        assert_eq!(app.input_height, 1);
        assert_eq!(
            contents(&app),
            vec![(ChatRole::User, "I have a headache".to_string(), false)]
        );

        deliver_reply(&mut app, &mut rx).await;

        assert!(!app.transcript.is_typing());
        assert!(!app.sending);
        assert_eq!(app.focus, FocusPane::Input);
        assert_eq!(
            contents(&app),
            vec![
                (ChatRole::User, "I have a headache".to_string(), false),
                (ChatRole::Assistant, "Try resting.".to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_while_busy_is_noop() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "ok"}))
                    .set_delay(std::time::Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (mut app, mut rx) = test_app(&mock_server.uri());
        type_text(&mut app, "fever");
        assert!(app.send_message());

        type_text(&mut app, "cough");
        assert!(!app.send_message());
        // The second text stays in the input for later
        assert_eq!(app.input, "cough");
        assert_eq!(app.transcript.messages().count(), 1);

        deliver_reply(&mut app, &mut rx).await;
        assert_eq!(app.transcript.messages().count(), 2);
        assert!(!app.sending);
    }

    #[tokio::test]
    async fn test_server_error_detail() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"detail": "Message cannot be empty."})),
            )
            .mount(&mock_server)
            .await;

        let (mut app, mut rx) = test_app(&mock_server.uri());
        type_text(&mut app, "x");
        app.send_message();
        deliver_reply(&mut app, &mut rx).await;

        let last = app.transcript.messages().last().cloned().unwrap();
        assert_eq!(last, ChatMessage::assistant_error("Message cannot be empty."));
        assert!(!app.sending);
        assert_eq!(app.focus, FocusPane::Input);
    }

    #[tokio::test]
    async fn test_server_error_unparsable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let (mut app, mut rx) = test_app(&mock_server.uri());
        type_text(&mut app, "chills");
        app.send_message();
        deliver_reply(&mut app, &mut rx).await;

        let last = app.transcript.messages().last().cloned().unwrap();
        assert_eq!(last, ChatMessage::assistant_error("Unknown error"));
    }

    #[tokio::test]
    async fn test_transport_error() {
        let (mut app, mut rx) = test_app("http://127.0.0.1:1");
        app.focus = FocusPane::Transcript;
        type_text(&mut app, "muscle pain");
        app.send_message();
        deliver_reply(&mut app, &mut rx).await;

        let errors: Vec<_> = app.transcript.messages().filter(|m| m.is_error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].content, CONNECTIVITY_MESSAGE);
        assert!(!app.sending);
        assert_eq!(app.focus, FocusPane::Input);
    }

    #[test]
    fn test_interrupted_request_reopens_gate() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), ChatClient::new("http://127.0.0.1:1"), tx);
        app.sending = true;
        app.typing_bubble = Some(app.transcript.push_typing());

        app.finish_send(Err(ChatError::Interrupted("task panicked".to_string())));
        assert!(!app.sending);
        assert!(!app.transcript.is_typing());
        assert_eq!(app.transcript.messages().count(), 1);
    }

    #[tokio::test]
    async fn test_clear_while_busy_keeps_gate() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": "late reply"}))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .mount(&mock_server)
            .await;

        let (mut app, mut rx) = test_app(&mock_server.uri());
        type_text(&mut app, "rash");
        app.send_message();

        app.clear_conversation();
        assert!(app.transcript.shows_welcome());
        assert!(app.transcript.is_empty());
        assert!(app.sending);

        // The pending reply still lands, below the welcome placeholder
        deliver_reply(&mut app, &mut rx).await;
        assert!(!app.sending);
        assert!(app.transcript.shows_welcome());
        assert_eq!(
            contents(&app),
            vec![(ChatRole::Assistant, "late reply".to_string(), false)]
        );
    }

    #[test]
    fn test_clear_removes_everything() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), ChatClient::new("http://127.0.0.1:1"), tx);
        app.transcript.dismiss_welcome();
        app.transcript.push(ChatMessage::user("a"));
        app.transcript.push(ChatMessage::assistant("b"));

        app.clear_conversation();
        assert!(app.transcript.shows_welcome());
        assert!(app.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_chip_fills_and_sends() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "ok"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (mut app, mut rx) = test_app(&mock_server.uri());
        let query = app.example_queries[1].clone();
        app.select_chip(1);

        assert!(app.sending);
        assert!(app.input.is_empty());
        assert_eq!(app.transcript.messages().next().unwrap().content, query);
        assert!(matches!(
            app.transcript.entries().last().map(|e| &e.kind),
            Some(EntryKind::Typing)
        ));

        deliver_reply(&mut app, &mut rx).await;
    }

    #[test]
    fn test_input_grows_and_caps() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut config = Config::new();
        config.max_input_rows = Some(3);
        let mut app = App::new(&config, ChatClient::new("http://127.0.0.1:1"), tx);
        app.input_width = 10;

        type_text(&mut app, "short");
        assert_eq!(app.input_height, 1);

        app.insert_newline();
        assert_eq!(app.input_height, 2);

        type_text(&mut app, "a much longer line that wraps");
        assert_eq!(app.input_height, 3);
        // Past the cap the view scrolls to keep the cursor visible
        let (row, _) = app.cursor_position();
        assert!(row >= 3);
        assert_eq!(app.input_scroll, row + 1 - 3);

        app.cursor_home();
        assert_eq!(app.input_scroll, 0);
    }

    #[test]
    fn test_insert_str_keeps_newlines() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), ChatClient::new("http://127.0.0.1:1"), tx);
        type_text(&mut app, "[]");
        app.cursor_left();
        app.insert_str("fever\r\ncough\rchills");
        assert_eq!(app.input, "[fever\ncough\nchills]");
        assert_eq!(app.input_cursor, 19);
        assert_eq!(app.input_height, 3);
        assert!(!app.sending);
    }

    #[test]
    fn test_chip_next_stops_at_visible_chips() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), ChatClient::new("http://127.0.0.1:1"), tx);
        assert_eq!(app.visible_chips, app.example_queries.len());
        app.visible_chips = 1;
        app.chip_next();
        assert_eq!(app.selected_chip, 0);

        app.visible_chips = 2;
        app.chip_next();
        app.chip_next();
        assert_eq!(app.selected_chip, 1);
    }

    #[test]
    fn test_unicode_editing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), ChatClient::new("http://127.0.0.1:1"), tx);
        type_text(&mut app, "dolor de cabeza ñ");
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input, "dolor de cabezañ");
        app.cursor_end();
        app.backspace();
        assert_eq!(app.input, "dolor de cabeza");
        app.cursor_home();
        app.delete();
        assert_eq!(app.input, "olor de cabeza");
    }

    #[test]
    fn test_input_rows() {
        assert_eq!(input_rows("", 5), vec![(0, 0)]);
        assert_eq!(input_rows("abc", 5), vec![(0, 3)]);
        assert_eq!(input_rows("abcdefg", 5), vec![(0, 5), (5, 7)]);
        assert_eq!(input_rows("ab\ncd", 5), vec![(0, 2), (3, 5)]);
        assert_eq!(input_rows("ab\n", 5), vec![(0, 2), (3, 3)]);
        // A full row leaves room for the cursor below it
        assert_eq!(input_rows("abcde", 5), vec![(0, 5), (5, 5)]);
    }

    #[test]
    fn test_cursor_row_col() {
        let rows = input_rows("abcdefg", 5);
        assert_eq!(cursor_row_col("abcdefg", &rows, 0, 5), (0, 0));
        assert_eq!(cursor_row_col("abcdefg", &rows, 5, 5), (1, 0));
        assert_eq!(cursor_row_col("abcdefg", &rows, 7, 5), (1, 2));

        let rows = input_rows("ab\ncd", 5);
        assert_eq!(cursor_row_col("ab\ncd", &rows, 2, 5), (0, 2));
        assert_eq!(cursor_row_col("ab\ncd", &rows, 3, 5), (1, 0));
    }

    #[test]
    fn test_cursor_after_full_row_stays_inside_box() {
        let rows = input_rows("abcde\nx", 5);
        assert_eq!(rows, vec![(0, 5), (6, 7)]);
        assert_eq!(cursor_row_col("abcde\nx", &rows, 5, 5), (0, 4));
    }

    #[test]
    fn test_input_rows_wide_chars() {
        // Each char is two columns, so three fit in a width of six
        let text = "頭痛がします";
        let rows = input_rows(text, 6);
        assert_eq!(rows, vec![(0, 3), (3, 6), (6, 6)]);

        // A wide char never straddles the edge
        let rows = input_rows("ab頭痛", 5);
        assert_eq!(rows, vec![(0, 3), (3, 4)]);

        let rows = input_rows("頭痛x", 6);
        assert_eq!(cursor_row_col("頭痛x", &rows, 2, 6), (0, 4));
        assert_eq!(cursor_row_col("頭痛x", &rows, 3, 6), (0, 5));
    }

    #[test]
    fn test_input_height_counts_display_width() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), ChatClient::new("http://127.0.0.1:1"), tx);
        app.input_width = 10;
        // Eight wide chars are sixteen columns: two rows, not one
        type_text(&mut app, "頭痛がして熱があ");
        assert_eq!(app.input_height, 2);
        assert_eq!(app.cursor_position(), (1, 6));
    }

    #[test]
    fn test_tick_only_animates_while_sending() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), ChatClient::new("http://127.0.0.1:1"), tx);
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.sending = true;
        app.tick_animation();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
        app.tick_animation();
        assert_eq!(app.animation_frame, 1);
    }
}
