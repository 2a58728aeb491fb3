//! Terminal rendering
//!
//! Everything drawn is read from the [`App`] on each frame, so the progress
//! bar always reflects the current session context. The only thing written
//! back is the clamped transcript scroll offset.

use crate::app::{App, ChatScreen, Screen, WelcomeForm};
use crate::service::ConversationService;
use crate::session::{CheckType, Turn, TurnOrigin};
use crate::state_machine::ConvState;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Gauge, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ACCENT: Color = Color::Cyan;

pub fn render<S: ConversationService + 'static>(frame: &mut Frame, app: &mut App<S>) {
    match app.screen_mut() {
        Screen::Welcome(form) => render_welcome(frame, form),
        Screen::Chat(chat) => render_chat(frame, chat),
    }
}

// ============================================================================
// Welcome
// ============================================================================

fn render_welcome(frame: &mut Frame, form: &WelcomeForm) {
    let area = centered(frame.area(), 64, 18);
    let dim = Style::default().fg(Color::DarkGray);

    let name_line = if form.name.is_empty() {
        Line::from(vec![Span::raw("  > "), Span::styled("Enter your name", dim)])
    } else {
        Line::from(format!("  > {}", form.name))
    };

    let option = |check_type: CheckType| {
        let marker = if form.check_type == check_type { "(●)" } else { "( )" };
        let style = if form.check_type == check_type {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Span::styled(format!("{marker} {}", check_type.option_label()), style)
    };

    let button = if form.loading {
        "[ Starting... ]"
    } else {
        "[ Start Check-in ]"
    };

    let mut lines = vec![
        Line::styled("Engineering Team Check-ins", dim).alignment(Alignment::Center),
        Line::default(),
        Line::styled("Your Name", Style::default().add_modifier(Modifier::BOLD)),
        name_line,
        Line::default(),
        Line::styled("Check-in Type", Style::default().add_modifier(Modifier::BOLD)),
        Line::from(vec![
            Span::raw("  "),
            option(CheckType::Start),
            Span::raw("   "),
            option(CheckType::End),
        ]),
        Line::default(),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
    } else {
        lines.push(Line::default());
    }
    lines.extend([
        Line::styled(button, Style::default().fg(ACCENT)).alignment(Alignment::Center),
        Line::default(),
        Line::styled(
            "Keep it crisp and honest. This helps us support each other better! 💪",
            dim,
        )
        .alignment(Alignment::Center),
        Line::default(),
        Line::styled("Enter start · Tab switch type · Esc quit", dim).alignment(Alignment::Center),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 📋 Task Tracker ")
        .title_alignment(Alignment::Center);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ============================================================================
// Chat
// ============================================================================

fn render_chat<S: ConversationService + 'static>(frame: &mut Frame, chat: &mut ChatScreen<S>) {
    let driver = &chat.driver;
    let context = driver.context();
    let progress = driver.progress();

    let [header, bar, messages, input] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    // Header: who, which flow, how far
    let [who, counter] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(12)]).areas(header);
    frame.render_widget(
        Paragraph::new(vec![
            Line::styled(
                context.participant().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::from(context.check_type().header_label()),
        ]),
        who,
    );
    frame.render_widget(
        Paragraph::new(progress.to_string()).alignment(Alignment::Right),
        counter,
    );

    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(ACCENT))
            .percent(progress.percent())
            .label(""),
        bar,
    );

    render_transcript(
        frame,
        messages,
        driver.transcript().turns(),
        driver.state(),
        &mut chat.scroll_back,
    );
    render_input(frame, input, &chat.input, driver.state());
}

fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    turns: &[Turn],
    state: ConvState,
    scroll_back: &mut u16,
) {
    let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    let inner = block.inner(area);
    let width = usize::from(inner.width.saturating_sub(2)).max(8);

    let mut lines: Vec<Line> = Vec::new();
    for turn in turns {
        let (alignment, style) = match turn.origin {
            TurnOrigin::User => (Alignment::Right, Style::default().fg(ACCENT)),
            TurnOrigin::Bot => (Alignment::Left, Style::default()),
            TurnOrigin::Error => (Alignment::Left, Style::default().fg(Color::Red)),
        };
        for chunk in wrap(&turn.text, width) {
            lines.push(Line::styled(chunk, style).alignment(alignment));
        }
        lines.push(
            Line::styled(
                turn.sent_at.format("%H:%M").to_string(),
                Style::default().fg(Color::DarkGray),
            )
            .alignment(alignment),
        );
        lines.push(Line::default());
    }
    if state == ConvState::AwaitingResponse {
        lines.push(Line::styled("• • •", Style::default().fg(Color::DarkGray)));
    }

    // Offset counts up from the newest line; never past the oldest
    let overflow = lines.len().saturating_sub(usize::from(inner.height));
    let overflow = u16::try_from(overflow).unwrap_or(u16::MAX);
    *scroll_back = (*scroll_back).min(overflow);
    let scroll = overflow - *scroll_back;

    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);

    if overflow > 0 {
        let mut scrollbar =
            ScrollbarState::new(usize::from(overflow)).position(usize::from(scroll));
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            inner,
            &mut scrollbar,
        );
    }
}

fn render_input(frame: &mut Frame, area: Rect, input: &str, state: ConvState) {
    let dim = Style::default().fg(Color::DarkGray);

    if state == ConvState::Completed {
        let button = Paragraph::new(Line::styled(
            "[ Start New Check-in ]  (Enter)",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, area);
        return;
    }

    let text = if input.is_empty() {
        Line::styled("Type your response...", dim)
    } else {
        Line::from(input.to_string())
    };
    let border_style = if state.accepts_input() {
        Style::default()
    } else {
        dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Enter send · PgUp/PgDn scroll · Esc leave ", dim));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ============================================================================
// Helpers
// ============================================================================

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Greedy word wrap on display width. Words wider than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let gap = usize::from(!current.is_empty());
            if current_width + gap + word_width <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if current_width + char_width > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += char_width;
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
