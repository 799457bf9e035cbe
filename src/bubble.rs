//! Projection of the transcript into styled terminal lines.
//!
//! Lines are wrapped here rather than by the `Paragraph` widget so the line
//! count used for scrolling is exactly what gets drawn.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use pulse_core::{ChatMessage, ChatRole, EntryKind, Transcript};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const USER_LABEL: &str = "You";
pub const WELCOME_TITLE: &str = "How are you feeling?";
pub const WELCOME_SUBTITLE: &str = "Describe your symptoms in plain language. Pulse AI will \
    search relevant medical literature and provide an informed response.";

const INDENT: &str = "  ";

pub fn transcript_lines(
    transcript: &Transcript,
    width: u16,
    assistant_label: &str,
    animation_frame: u8,
) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut lines = Vec::new();

    if transcript.shows_welcome() {
        lines.extend(welcome_lines(width));
    }

    for entry in transcript.entries() {
        match &entry.kind {
            EntryKind::Message(message) => {
                lines.extend(message_lines(message, width, assistant_label));
            }
            EntryKind::Typing => {
                lines.extend(typing_lines(assistant_label, animation_frame));
            }
        }
        lines.push(Line::default());
    }

    lines
}

fn welcome_lines(width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            WELCOME_TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::default(),
    ];
    for row in wrap_text_to_width(WELCOME_SUBTITLE, width.saturating_sub(4)) {
        lines.push(Line::from(Span::styled(row, Style::default().fg(Color::Gray))).centered());
    }
    lines.push(Line::default());
    lines
}

fn label_line(role: ChatRole, assistant_label: &str) -> Line<'static> {
    match role {
        ChatRole::User => Line::from(Span::styled(
            USER_LABEL,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        ChatRole::Assistant => Line::from(Span::styled(
            assistant_label.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    }
}

/// Label line followed by the wrapped, indented message text
pub fn message_lines(
    message: &ChatMessage,
    width: usize,
    assistant_label: &str,
) -> Vec<Line<'static>> {
    let style = if message.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let mut lines = vec![label_line(message.role, assistant_label)];
    if message.is_error {
        lines[0].spans.push(Span::styled(
            " (error)",
            Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
        ));
    }

    for row in wrap_text_to_width(&message.content, width.saturating_sub(INDENT.len())) {
        lines.push(Line::from(vec![Span::raw(INDENT), Span::styled(row, style)]));
    }
    lines
}

/// Label line followed by three dots, one of them lit per animation frame
pub fn typing_lines(assistant_label: &str, animation_frame: u8) -> Vec<Line<'static>> {
    let mut dots = vec![Span::raw(INDENT)];
    for i in 0..3u8 {
        let style = if i == animation_frame % 3 {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        dots.push(Span::styled("●", style));
        if i < 2 {
            dots.push(Span::raw(" "));
        }
    }

    vec![label_line(ChatRole::Assistant, assistant_label), Line::from(dots)]
}

/// Wrap text to fit within a given width in terminal columns.
///
/// Explicit newlines are kept. Words break at whitespace; a word wider than
/// the width is split across rows. Wide characters (CJK, emoji) count as the
/// columns they occupy on screen.
pub fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }

    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();

            // Hard-split words that can never fit on one row
            while word.width() > width {
                let (head, rest) = split_at_width(&word, width);
                if rest.is_empty() {
                    // A single char wider than the row gets a row of its own
                    break;
                }
                if current_width > 0 {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }
                lines.push(head.to_string());
                word = rest.to_string();
            }
            let word_width = word.width();
            if word.is_empty() {
                continue;
            }

            if current_width == 0 {
                // First word on line
                current_line = word;
                current_width = word_width;
            } else if current_width + 1 + word_width <= width {
                // Word fits on current line
                current_line.push(' ');
                current_line.push_str(&word);
                current_width += 1 + word_width;
            } else {
                // Word doesn't fit, start new line
                lines.push(std::mem::replace(&mut current_line, word));
                current_width = word_width;
            }
        }

        // Empty paragraphs still take one row
        lines.push(current_line);
    }

    lines
}

/// Split off the longest prefix that fits in `width` columns, taking at
/// least one character so the caller always makes progress
fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (i, c) in word.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width && i > 0 {
            return word.split_at(i);
        }
        used += w;
    }
    (word, "")
}
