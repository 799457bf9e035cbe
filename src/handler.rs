use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;
use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Reply(outcome) => app.finish_send(outcome),
        AppEvent::Health(online) => {
            debug!(online, "health check finished");
            app.set_server_online(online);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The disclaimer swallows everything until accepted
    if app.show_disclaimer {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => app.accept_disclaimer(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        }
        return;
    }

    if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.clear_conversation();
        return;
    }

    match (key.code, app.focus) {
        (KeyCode::PageUp, _) => app.scroll_up(10),
        (KeyCode::PageDown, _) => app.scroll_down(10),
        (_, FocusPane::Input) => handle_input_key(app, key),
        (_, FocusPane::Chips) => handle_chips_key(app, key),
        (_, FocusPane::Transcript) => handle_transcript_key(app, key),
    }
}

/// Pasted text always lands in the input, newlines included
fn handle_paste(app: &mut App, text: &str) {
    if app.show_disclaimer {
        return;
    }
    app.focus = FocusPane::Input;
    app.insert_str(text);
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Shift+Enter where the terminal reports it, Alt+Enter everywhere else
        KeyCode::Enter
            if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.insert_newline();
        }
        KeyCode::Enter => {
            app.send_message();
        }
        KeyCode::Tab => {
            app.focus = if app.visible_chips == 0 {
                FocusPane::Transcript
            } else {
                FocusPane::Chips
            };
        }
        KeyCode::Esc => {
            app.focus = FocusPane::Transcript;
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char(c);
        }
        _ => {}
    }
}

fn handle_chips_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.chip_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.chip_next(),
        KeyCode::Enter | KeyCode::Char(' ') if app.selected_chip < app.visible_chips => {
            let idx = app.selected_chip;
            app.select_chip(idx);
            app.focus = FocusPane::Input;
        }
        KeyCode::Tab => app.focus = FocusPane::Transcript,
        KeyCode::Esc | KeyCode::BackTab => app.focus = FocusPane::Input,
        _ => {}
    }
}

fn handle_transcript_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_to_bottom(),
        KeyCode::Char('i') | KeyCode::Enter | KeyCode::Tab | KeyCode::Esc => {
            app.focus = FocusPane::Input;
        }
        KeyCode::BackTab => app.focus = FocusPane::Chips,
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn hit(area: Option<Rect>, x: u16, y: u16) -> bool {
    area.map(|r| point_in_rect(x, y, r)).unwrap_or(false)
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    if app.show_disclaimer {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && hit(app.accept_button_area, x, y)
        {
            app.accept_disclaimer();
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(app.send_button_area, x, y) {
                app.send_message();
            } else if hit(app.clear_button_area, x, y) {
                app.clear_conversation();
            } else if let Some(idx) = app.chip_areas.iter().position(|r| point_in_rect(x, y, *r)) {
                app.select_chip(idx);
            } else if hit(app.input_area, x, y) {
                app.focus = FocusPane::Input;
            } else if hit(app.transcript_area, x, y) {
                app.focus = FocusPane::Transcript;
            }
        }
        MouseEventKind::ScrollDown if hit(app.transcript_area, x, y) => app.scroll_down(3),
        MouseEventKind::ScrollUp if hit(app.transcript_area, x, y) => app.scroll_up(3),
        _ => {}
    }
}
