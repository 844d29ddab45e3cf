//! Dark and light color palettes.

use ratatui::style::{Color, Modifier, Style};

/// Semantic colors used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub cell_filled: Color,
    pub cell_empty: Color,
    pub success: Color,
    pub error: Color,
}

impl Palette {
    /// Near-black background with white text.
    pub const DARK: Self = Self {
        name: "Dark",
        bg: Color::Rgb(0x11, 0x11, 0x11),
        fg: Color::Rgb(0xff, 0xff, 0xff),
        muted: Color::Rgb(0x56, 0x5f, 0x89),
        accent: Color::Rgb(0x7a, 0xa2, 0xf7),
        border: Color::Rgb(0xee, 0xee, 0xee),
        cell_filled: Color::Rgb(0xc0, 0xca, 0xf5),
        cell_empty: Color::Rgb(0x2a, 0x2e, 0x3f),
        success: Color::Rgb(0x9e, 0xce, 0x6a),
        error: Color::Rgb(0xf7, 0x76, 0x8e),
    };

    pub const LIGHT: Self = Self {
        name: "Light",
        bg: Color::Rgb(0xf5, 0xf5, 0xf5),
        fg: Color::Rgb(0x1a, 0x1b, 0x26),
        muted: Color::Rgb(0x6c, 0x70, 0x86),
        accent: Color::Rgb(0x2e, 0x7d, 0xe9),
        border: Color::Rgb(0x34, 0x3b, 0x58),
        cell_filled: Color::Rgb(0x34, 0x3b, 0x58),
        cell_empty: Color::Rgb(0xd0, 0xd0, 0xd0),
        success: Color::Rgb(0x58, 0x75, 0x39),
        error: Color::Rgb(0xf5, 0x2a, 0x65),
    };

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }

    /// Base style for the whole screen.
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn title(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn border(&self) -> Style {
        self.base().fg(self.border)
    }

    pub fn selected(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn cell(&self, filled: bool) -> Style {
        self.base()
            .fg(if filled { self.cell_filled } else { self.cell_empty })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DARK
    }
}
