use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub surface: Color,
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub highlight: Color,
    pub income: Color,
    pub expense: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface: Color::Rgb(20, 26, 32),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            highlight: Color::Rgb(36, 48, 58),
            income: Color::Rgb(90, 190, 120),
            expense: Color::Rgb(220, 100, 100),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
