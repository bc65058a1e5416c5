use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serenity_core::Role;

use crate::app::state::{App, AppState, Field, FOOTER_ACTIONS};

pub fn ui(f: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 1. Title/Header
            Constraint::Min(5),    // 2. Body (profile + chat)
            Constraint::Length(3), // 3. Message input
            Constraint::Length(1), // 4. Buttons
            Constraint::Length(2), // 5. Status line
        ])
        .split(f.area());

    let block_style = app.theme.base_style;
    let border_style = app.theme.border_style;

    // --- SECTION 1: TITLE (HEADER) ---
    let header_text = Line::from(vec![
        Span::styled(" S E R E N I T Y ", app.theme.header_title_style),
        Span::styled(
            " // YOUR MENTAL WELLNESS COMPANION ",
            app.theme.header_subtitle_style,
        ),
    ]);
    let header = Paragraph::new(header_text).style(block_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" A SAFE SPACE TO TALK "),
    );
    f.render_widget(header, main_layout[0]);

    // --- SECTION 2: BODY (PROFILE SIDEBAR + CHAT) ---
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(main_layout[1]);

    render_profile_sidebar(f, app, body[0]);
    render_chat(f, app, body[1]);

    // --- SECTION 3: MESSAGE INPUT ---
    render_message_input(f, app, main_layout[2]);

    // --- SECTION 4: BUTTON BAR ---
    render_button_bar(f, app, main_layout[3]);

    // --- SECTION 5: STATUS LINE ---
    render_status_line(f, app, main_layout[4]);
}

fn render_profile_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(
        app.focus,
        Field::Name | Field::Age | Field::Gender | Field::Nationality | Field::Preferences
    );
    let border = if focused {
        app.theme.focus_border_style
    } else {
        app.theme.border_style
    };

    let gender_text = app
        .gender
        .map(|g| g.display_name().to_string())
        .unwrap_or_else(|| "-".to_string());

    let rows: [(Field, &str, &str); 5] = [
        (Field::Name, "Name", app.name.as_str()),
        (Field::Age, "Age", app.age_input.as_str()),
        (Field::Gender, "Gender", gender_text.as_str()),
        (Field::Nationality, "Nationality", app.nationality.as_str()),
        (Field::Preferences, "Preferences", app.preferences.as_str()),
    ];

    let mut lines = vec![Line::from("")];
    for (field, label, value) in rows {
        let selected = app.focus == field;
        let marker = if selected { " > " } else { "   " };
        let mut spans = vec![
            Span::styled(marker, app.theme.input_prompt_style),
            Span::styled(format!("{:<12}", label), app.theme.label_style),
            Span::styled(value.to_string(), app.theme.value_style),
        ];
        // Blink a block cursor on the focused text field.
        let editable = selected && field != Field::Gender;
        if editable && (app.tick_count / 8) % 2 == 0 {
            spans.push(Span::styled(" ", app.theme.input_cursor_style));
        }
        if field == Field::Gender && selected {
            spans.push(Span::styled(
                "  (Enter to change)",
                app.theme.header_subtitle_style,
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let sidebar = Paragraph::new(lines)
        .style(app.theme.base_style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(" YOUR DETAILS ", app.theme.header_title_style)),
        );
    f.render_widget(sidebar, area);
}

fn render_chat(f: &mut Frame, app: &mut App, area: Rect) {
    let mut lines: Vec<Line> = vec![Line::from("")];
    for turn in app.session.transcript.turns() {
        let style = match turn.role {
            Role::User => app.theme.chat_user_style,
            Role::Assistant => app.theme.chat_assistant_style,
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {}: ", turn.role.display_name()), style.add_modifier(Modifier::BOLD)),
            Span::styled(turn.content.clone(), style),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(advice) = &app.advice {
        lines.push(Line::from(Span::styled(
            " --- Collective Advice ---",
            app.theme.advice_style,
        )));
        lines.push(Line::from(Span::styled(
            format!(" {}", advice),
            app.theme.advice_style,
        )));
        lines.push(Line::from(""));
    }

    if let Some(path) = &app.last_prescription {
        lines.push(Line::from(Span::styled(
            format!(" Prescription saved to {}", path.display()),
            app.theme.success_style,
        )));
    }

    // Scroll bound from this draw's content; the key handler clamps
    // against it so Down can't run past the last line.
    let viewport = area.height.saturating_sub(2);
    app.chat_max_scroll = (lines.len() as u16).saturating_sub(viewport);
    app.chat_scroll = app.chat_scroll.min(app.chat_max_scroll);

    let chat = Paragraph::new(lines)
        .style(app.theme.base_style)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style)
                .title(Span::styled(" CONVERSATION ", app.theme.header_title_style)),
        );
    f.render_widget(chat, area);
}

fn render_message_input(f: &mut Frame, app: &App, area: Rect) {
    let border = if app.focus == Field::Message {
        app.theme.focus_border_style
    } else {
        app.theme.border_style
    };

    let mut spans = vec![Span::styled(" > ", app.theme.input_prompt_style)];
    let cursor = app.message_cursor.min(app.message.chars().count());
    let before: String = app.message.chars().take(cursor).collect();
    let at: String = app.message.chars().skip(cursor).take(1).collect();
    let after: String = app.message.chars().skip(cursor + 1).collect();

    spans.push(Span::styled(before, app.theme.input_text_style));
    if app.focus == Field::Message && !app.is_busy() {
        let cursor_char = if at.is_empty() { " ".to_string() } else { at };
        spans.push(Span::styled(cursor_char, app.theme.input_cursor_style));
    } else {
        spans.push(Span::styled(at, app.theme.input_text_style));
    }
    spans.push(Span::styled(after, app.theme.input_text_style));

    let input = Paragraph::new(Line::from(spans))
        .style(app.theme.base_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(
                    " HOW ARE YOU FEELING TODAY? ",
                    app.theme.header_title_style,
                )),
        );
    f.render_widget(input, area);
}

fn render_button_bar(f: &mut Frame, app: &mut App, area: Rect) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    if app.footer_focus >= FOOTER_ACTIONS.len() {
        app.footer_focus = 0;
    }

    let constraints: Vec<Constraint> = FOOTER_ACTIONS
        .iter()
        .map(|a| Constraint::Length(a.label().len() as u16 + 2))
        .collect();

    let button_rects = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .spacing(1)
        .split(area);

    for (i, rect) in button_rects.iter().enumerate() {
        let mut style = app.theme.footer_key_style;
        if app.focus == Field::Buttons && app.footer_focus == i {
            style = app.theme.footer_selected_style;
        }
        let label = format!("[{}]", FOOTER_ACTIONS[i].label());
        let para = Paragraph::new(label).style(style);
        f.render_widget(para, *rect);
    }
}

fn render_status_line(f: &mut Frame, app: &App, area: Rect) {
    let footer_block = Block::default()
        .borders(Borders::TOP)
        .border_style(app.theme.border_style);
    f.render_widget(&footer_block, area);
    let inner = footer_block.inner(area);

    let line = match &app.state {
        AppState::Busy(label) => {
            let spinner = ['|', '/', '-', '\\'][(app.tick_count / 2) as usize % 4];
            Line::from(vec![
                Span::styled(format!(" {} ", spinner), app.theme.busy_style),
                Span::styled(format!("{}...", label), app.theme.busy_style),
            ])
        }
        AppState::Error(message) => Line::from(vec![
            Span::styled(" ! ", app.theme.error_style.add_modifier(Modifier::BOLD)),
            Span::styled(message.clone(), app.theme.error_style),
            Span::styled("  (Esc to dismiss)", app.theme.footer_text_style),
        ]),
        AppState::Editing => {
            if let Some(notice) = &app.notice {
                Line::from(Span::styled(format!(" {} ", notice), app.theme.success_style))
            } else {
                Line::from(vec![
                    Span::styled(" Tab ", app.theme.footer_key_style),
                    Span::styled(" next field ", app.theme.footer_text_style),
                    Span::styled(" Enter ", app.theme.footer_key_style),
                    Span::styled(" activate ", app.theme.footer_text_style),
                    Span::styled(" Ctrl+C ", app.theme.footer_key_style),
                    Span::styled(" quit ", app.theme.footer_text_style),
                ])
            }
        }
    };

    let info = Paragraph::new(vec![line]).style(app.theme.base_style);
    f.render_widget(info, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use ratatui::{backend::TestBackend, Terminal};
    use serenity_core::{CompletionParams, CompletionProvider, Config};
    use std::sync::Arc;

    struct Silent;

    #[async_trait::async_trait]
    impl CompletionProvider for Silent {
        async fn complete(&self, _prompt: &str, _params: CompletionParams) -> Result<String> {
            Ok(String::new())
        }
    }

    fn test_app() -> App {
        App::with_provider(Config::default(), Arc::new(Silent))
    }

    fn draw(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        format!("{:?}", terminal.backend().buffer())
    }

    #[test]
    fn busy_state_paints_the_spinner_label() {
        let mut app = test_app();
        app.state = AppState::Busy("Listening");
        let rendered = draw(&mut app);
        assert!(rendered.contains("Listening..."));
    }

    #[test]
    fn error_state_paints_the_message() {
        let mut app = test_app();
        app.state = AppState::Error("Message failed: boom".to_string());
        let rendered = draw(&mut app);
        assert!(rendered.contains("Message failed: boom"));
        assert!(rendered.contains("Esc to dismiss"));
    }

    #[test]
    fn drawing_measures_and_clamps_the_chat_scroll() {
        let mut app = test_app();
        app.chat_scroll = 500;
        let rendered = draw(&mut app);
        // A fresh session fits in the pane, so the bound collapses to zero.
        assert_eq!(app.chat_max_scroll, 0);
        assert_eq!(app.chat_scroll, 0);
        assert!(rendered.contains("Mindful Companion"));

        for i in 0..40 {
            app.session.transcript.push_user(&format!("message {}", i));
        }
        draw(&mut app);
        assert!(app.chat_max_scroll > 0);
    }
}
