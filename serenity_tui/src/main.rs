use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use serenity_core::Config;
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

mod app;
mod theme;
mod ui;

use app::actions::{busy_label, perform_footer_action};
use app::editor;
use app::state::{App, AppState, Field, FooterAction, FOOTER_ACTIONS};
use ui::main_view::ui;

/// What a keypress asks the event loop to do next.
enum KeyFlow {
    Continue,
    Quit,
    Run(FooterAction),
}

fn init_tracing() {
    // Tracing goes to a file so the TUI surface stays clean. Failure to set
    // this up is not fatal.
    let Some(base) = dirs::data_dir() else {
        return;
    };
    let log_dir = base.join("serenity").join("logs");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(log_dir.join("serenity.log")) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = Config::load().await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Run app loop
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        if app.dirty {
            terminal.draw(|f| ui(f, app))?;
            app.dirty = false;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key(app, key) {
                        KeyFlow::Quit => return Ok(()),
                        KeyFlow::Run(action) => {
                            // Paint the busy frame now; the action holds the
                            // loop until it completes.
                            if let Some(label) = busy_label(app, action) {
                                app.state = AppState::Busy(label);
                                terminal.draw(|f| ui(f, app))?;
                            }
                            if perform_footer_action(app, action).await? {
                                return Ok(());
                            }
                        }
                        KeyFlow::Continue => {}
                    }
                }
                Event::Resize(_, _) => {
                    app.dirty = true;
                }
                _ => {}
            }
        } else {
            // Drives the cursor blink and busy spinner.
            app.tick_count += 1;
            app.dirty = true;
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> KeyFlow {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyFlow::Quit;
    }

    // A visible error must be acknowledged before anything else.
    if matches!(app.state, AppState::Error(_)) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            app.clear_error();
        }
        return KeyFlow::Continue;
    }

    match key.code {
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Esc => {
            app.notice = None;
            app.dirty = true;
        }
        KeyCode::Enter => match app.focus {
            Field::Buttons => {
                let action = FOOTER_ACTIONS[app.footer_focus.min(FOOTER_ACTIONS.len() - 1)];
                return KeyFlow::Run(action);
            }
            Field::Gender => app.cycle_gender(),
            Field::Message => return KeyFlow::Run(FooterAction::Send),
            _ => app.focus_next(),
        },
        KeyCode::Left => match app.focus {
            Field::Buttons => {
                let len = FOOTER_ACTIONS.len();
                app.footer_focus = (app.footer_focus + len - 1) % len;
                app.dirty = true;
            }
            Field::Message => {
                app.message_cursor = app.message_cursor.saturating_sub(1);
                app.dirty = true;
            }
            Field::Gender => app.cycle_gender(),
            _ => {}
        },
        KeyCode::Right => match app.focus {
            Field::Buttons => {
                app.footer_focus = (app.footer_focus + 1) % FOOTER_ACTIONS.len();
                app.dirty = true;
            }
            Field::Message => {
                let len = editor::char_count(&app.message);
                app.message_cursor = (app.message_cursor + 1).min(len);
                app.dirty = true;
            }
            Field::Gender => app.cycle_gender(),
            _ => {}
        },
        KeyCode::Up => {
            app.chat_scroll = app.chat_scroll.saturating_sub(1);
            app.dirty = true;
        }
        KeyCode::Down => {
            // Bounded by what the chat pane measured on the last draw.
            app.chat_scroll = app.chat_scroll.saturating_add(1).min(app.chat_max_scroll);
            app.dirty = true;
        }
        KeyCode::Backspace => {
            match app.focus {
                Field::Message => {
                    editor::delete_char_before_cursor(&mut app.message, &mut app.message_cursor)
                }
                Field::Name => editor::pop_last_char(&mut app.name),
                Field::Age => editor::pop_last_char(&mut app.age_input),
                Field::Nationality => editor::pop_last_char(&mut app.nationality),
                Field::Preferences => editor::pop_last_char(&mut app.preferences),
                _ => {}
            }
            app.dirty = true;
        }
        KeyCode::Char(ch) => {
            match app.focus {
                Field::Message => {
                    editor::insert_char_at_cursor(&mut app.message, &mut app.message_cursor, ch)
                }
                Field::Name => app.name.push(ch),
                Field::Age => {
                    if ch.is_ascii_digit() && app.age_input.len() < 3 {
                        app.age_input.push(ch);
                    }
                }
                Field::Nationality => app.nationality.push(ch),
                Field::Preferences => app.preferences.push(ch),
                _ => {}
            }
            app.dirty = true;
        }
        _ => {}
    }

    KeyFlow::Continue
}
