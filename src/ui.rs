use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;
use crate::app::{input_rows, App, FocusPane, ServerStatus};
use crate::bubble;

pub const DISCLAIMER_TITLE: &str = " Medical Disclaimer ";
pub const DISCLAIMER_TEXT: &str = "Pulse AI provides general health information drawn from \
    published medical literature. It is not a diagnosis and is not a substitute for advice \
    from a qualified healthcare professional. If you are experiencing a medical emergency, \
    contact your local emergency services immediately.";
const ACCEPT_LABEL: &str = "[ I understand ]";
const SEND_LABEL: &str = "[ Send ]";
const CLEAR_LABEL: &str = "[ Clear ]";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, chips, input, footer
    let [header_area, transcript_area, chips_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(app.input_height + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, transcript_area);
    render_chips(app, frame, chips_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.show_disclaimer {
        render_disclaimer(app, frame, area);
    } else {
        app.accept_button_area = None;
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let (status_text, status_color) = match app.server_status {
        ServerStatus::Unknown => ("● connecting", Color::Yellow),
        ServerStatus::Online => ("● online", Color::Green),
        ServerStatus::Offline => ("● offline", Color::Red),
    };

    let title = Line::from(vec![
        Span::styled(" Pulse AI ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::styled(format!(" {}", app.server_url()), Style::default().fg(Color::Gray)),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let border_style = if app.focus == FocusPane::Transcript && !app.show_disclaimer {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Conversation ");
    let inner = block.inner(area);
    app.transcript_area = Some(area);

    let lines = bubble::transcript_lines(
        &app.transcript,
        inner.width,
        &app.assistant_label,
        app.animation_frame,
    );

    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.transcript_max_scroll = total.saturating_sub(inner.height);
    if app.transcript_pinned {
        app.transcript_scroll = app.transcript_max_scroll;
    } else {
        app.transcript_scroll = app.transcript_scroll.min(app.transcript_max_scroll);
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.transcript_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_chips(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chip_areas.clear();

    let mut spans = vec![Span::styled(" Try: ", Style::default().fg(Color::Gray))];
    let mut x = area.x + 6;
    let right_edge = area.x + area.width;

    for (i, query) in app.example_queries.iter().enumerate() {
        let label = format!("[ {} ]", query);
        let label_width = label.width() as u16;
        if x + label_width > right_edge {
            break;
        }

        let selected = app.focus == FocusPane::Chips && i == app.selected_chip;
        let style = if selected {
            Style::default().bg(Color::Cyan).fg(Color::Black)
        } else {
            Style::default().fg(Color::Cyan)
        };

        app.chip_areas.push(Rect::new(x, area.y, label_width, 1));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += label_width + 1;
    }

    // Chips that did not fit cannot be selected
    app.visible_chips = app.chip_areas.len();
    if app.selected_chip >= app.visible_chips {
        app.selected_chip = app.visible_chips.saturating_sub(1);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let [text_area, buttons_area] = Layout::horizontal([
        Constraint::Min(10),
        Constraint::Length(11),
    ])
    .areas(area);

    let focused = app.focus == FocusPane::Input && !app.show_disclaimer;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(" Message ");
    let inner = block.inner(text_area);
    app.input_area = Some(text_area);

    // Width feeds the height calculation, so re-fit when it changes
    if inner.width != app.input_width {
        app.input_width = inner.width;
        app.resize_input();
    }

    let rows = input_rows(&app.input, inner.width as usize);
    let chars: Vec<char> = app.input.chars().collect();
    let visible: Vec<Line> = rows
        .iter()
        .skip(app.input_scroll as usize)
        .take(app.input_height as usize)
        .map(|&(start, end)| Line::from(chars[start..end].iter().collect::<String>()))
        .collect();

    let content = if app.input.is_empty() {
        Text::from(Line::from(Span::styled(
            "Describe your symptoms...",
            Style::default().fg(Color::DarkGray),
        )))
    } else {
        Text::from(visible)
    };
    frame.render_widget(Paragraph::new(content).block(block), text_area);

    if focused {
        let (row, col) = app.cursor_position();
        let y = inner.y + row.saturating_sub(app.input_scroll);
        frame.set_cursor_position((inner.x + col, y));
    }

    // Send / Clear buttons
    let [send_area, clear_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(Rect {
        y: buttons_area.y + 1,
        height: buttons_area.height.saturating_sub(1),
        ..buttons_area
    });

    let send_style = if app.sending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let send_label = if app.sending { "[ ..... ]" } else { SEND_LABEL };
    frame.render_widget(Paragraph::new(Span::styled(send_label, send_style)), send_area);
    frame.render_widget(
        Paragraph::new(Span::styled(CLEAR_LABEL, Style::default().fg(Color::Magenta))),
        clear_area,
    );
    app.send_button_area = Some(send_area);
    app.clear_button_area = Some(clear_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: &[(&str, &str)] = if app.show_disclaimer {
        &[("Enter", "accept"), ("q", "quit")]
    } else {
        match app.focus {
            FocusPane::Input => &[
                ("Enter", "send"),
                ("Shift+Enter", "newline"),
                ("Tab", "examples"),
                ("Ctrl+L", "clear"),
                ("Esc", "scroll"),
                ("Ctrl+C", "quit"),
            ],
            FocusPane::Chips => &[
                ("←/→", "choose"),
                ("Enter", "ask"),
                ("Tab", "conversation"),
                ("Esc", "back"),
            ],
            FocusPane::Transcript => &[
                ("j/k", "scroll"),
                ("g/G", "top/bottom"),
                ("i", "type"),
                ("Ctrl+L", "clear"),
                ("q", "quit"),
            ],
        }
    };

    let mut hints = Vec::new();
    for (key, label) in pairs {
        hints.push(Span::styled(format!(" {} ", key), key_style));
        hints.push(Span::styled(format!(" {} ", label), label_style));
    }

    let mode_text = if app.sending { " WAITING " } else { " READY " };
    let mode_style = if app.sending {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().bg(Color::Blue).fg(Color::White)
    };
    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_disclaimer(app: &mut App, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 64, 13);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(DISCLAIMER_TITLE);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [text_area, button_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(DISCLAIMER_TEXT).wrap(Wrap { trim: true }),
        text_area,
    );

    let button_width = (ACCEPT_LABEL.width() as u16).min(button_area.width);
    let button = Rect {
        x: button_area.x + (button_area.width - button_width) / 2,
        width: button_width,
        ..button_area
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            ACCEPT_LABEL,
            Style::default().bg(Color::Yellow).fg(Color::Black).bold(),
        )),
        button,
    );
    app.accept_button_area = Some(button);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
