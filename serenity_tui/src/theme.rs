use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Base
    pub base_style: Style,
    // Borders
    pub border_style: Style,
    pub focus_border_style: Style,
    // Header
    pub header_title_style: Style,
    pub header_subtitle_style: Style,
    // Profile sidebar
    pub label_style: Style,
    pub value_style: Style,
    // Chat
    pub chat_user_style: Style,
    pub chat_assistant_style: Style,
    pub advice_style: Style,
    // Input
    pub input_prompt_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    // Footer
    pub footer_text_style: Style,
    pub footer_key_style: Style,
    pub footer_selected_style: Style,
    // Status
    pub busy_style: Style,
    pub error_style: Style,
    pub success_style: Style,
}

impl Theme {
    pub fn from_config(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "auto" => {
                // Detect system theme
                match dark_light::detect() {
                    dark_light::Mode::Dark => Self::dark(),
                    dark_light::Mode::Light => Self::light(),
                    // Default to dark if detection fails
                    dark_light::Mode::Default => Self::dark(),
                }
            }
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        let sage = Color::Rgb(148, 190, 158);
        let sage_dim = Color::Rgb(88, 120, 96);
        let mist = Color::Rgb(176, 196, 222);
        let bg = Color::Rgb(16, 20, 18);
        let red_alert = Color::Rgb(255, 90, 90);

        Self {
            base_style: Style::default().fg(sage).bg(bg),
            border_style: Style::default().fg(sage_dim),
            focus_border_style: Style::default().fg(sage).add_modifier(Modifier::BOLD),

            header_title_style: Style::default().fg(sage).add_modifier(Modifier::BOLD),
            header_subtitle_style: Style::default().fg(sage_dim),

            label_style: Style::default().fg(sage_dim),
            value_style: Style::default().fg(Color::White),

            chat_user_style: Style::default().fg(mist),
            chat_assistant_style: Style::default().fg(sage),
            advice_style: Style::default().fg(mist).add_modifier(Modifier::BOLD),

            input_prompt_style: Style::default().fg(sage).add_modifier(Modifier::BOLD),
            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default()
                .bg(sage)
                .fg(bg)
                .add_modifier(Modifier::RAPID_BLINK),

            footer_text_style: Style::default().fg(sage_dim),
            footer_key_style: Style::default().fg(bg).bg(sage),
            footer_selected_style: Style::default()
                .fg(bg)
                .bg(mist)
                .add_modifier(Modifier::BOLD),

            busy_style: Style::default().fg(sage).add_modifier(Modifier::BOLD),
            error_style: Style::default().fg(red_alert),
            success_style: Style::default().fg(bg).bg(sage),
        }
    }

    pub fn light() -> Self {
        let text_main = Color::Black;
        let text_dim = Color::DarkGray;
        let accent = Color::Rgb(31, 60, 136);
        let leaf = Color::Rgb(46, 110, 72);
        let red_alert = Color::Red;

        Self {
            base_style: Style::default().fg(text_main),
            border_style: Style::default().fg(text_dim),
            focus_border_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),

            header_title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            header_subtitle_style: Style::default().fg(text_dim),

            label_style: Style::default().fg(text_dim),
            value_style: Style::default().fg(text_main),

            chat_user_style: Style::default().fg(accent),
            chat_assistant_style: Style::default().fg(leaf),
            advice_style: Style::default().fg(leaf).add_modifier(Modifier::BOLD),

            input_prompt_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            input_text_style: Style::default().fg(text_main),
            input_cursor_style: Style::default()
                .bg(accent)
                .fg(Color::White)
                .add_modifier(Modifier::RAPID_BLINK),

            footer_text_style: Style::default().fg(text_dim),
            footer_key_style: Style::default().fg(Color::White).bg(accent),
            footer_selected_style: Style::default()
                .fg(Color::White)
                .bg(leaf)
                .add_modifier(Modifier::BOLD),

            busy_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            error_style: Style::default().fg(red_alert),
            success_style: Style::default().fg(Color::White).bg(leaf),
        }
    }
}
