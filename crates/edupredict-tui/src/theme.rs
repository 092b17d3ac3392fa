use ratatui::style::{Color, Modifier, Style};

/// Light card palette: slate-blue accents, green for results, red for errors.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::Rgb(34, 34, 34);
    pub const FG_MUTED: Color = Color::Rgb(102, 102, 102);

    pub const ACCENT: Color = Color::Rgb(74, 111, 165);
    pub const ACCENT_DARK: Color = Color::Rgb(58, 90, 138);
    pub const SUCCESS: Color = Color::Rgb(76, 175, 80);
    pub const INFO: Color = Color::Rgb(13, 71, 161);
    pub const ERROR: Color = Color::Rgb(183, 28, 28);

    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Focused form row.
    pub fn focused() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Self::ACCENT_DARK)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button() -> Style {
        Style::default().fg(Color::White).bg(Self::ACCENT)
    }

    pub fn ok() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }
}
