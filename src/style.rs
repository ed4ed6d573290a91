use iced::widget::container;
use iced::{Border, Color, Theme};
use std::sync::Arc;

// Main theme colors
pub const PRIMARY: Color = Color::from_rgb(0.25, 0.35, 0.5);
pub const BACKGROUND: Color = Color::from_rgb(0.98, 0.98, 0.99);
pub const TEXT: Color = Color::from_rgb(0.2, 0.23, 0.28);
pub const ERROR: Color = Color::from_rgb(0.85, 0.2, 0.2);
pub const SUCCESS: Color = Color::from_rgb(0.1, 0.65, 0.3);
pub const MUTED: Color = Color::from_rgb(0.55, 0.58, 0.62);

pub fn custom_theme() -> Theme {
    let palette = iced::theme::Palette {
        background: BACKGROUND,
        text: TEXT,
        primary: PRIMARY,
        success: SUCCESS,
        danger: ERROR,
    };

    Theme::Custom(Arc::new(iced::theme::Custom::new(
        "mesh-light".to_string(),
        palette,
    )))
}

/// Card-style container for a single board row.
pub fn board_row(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.base.color.into()),
        border: Border {
            width: 1.0,
            radius: 8.0.into(),
            color: palette.background.strong.color,
        },
        ..container::Style::default()
    }
}

/// Thin divider bar under the menu row.
pub fn menu_bar(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        ..container::Style::default()
    }
}
