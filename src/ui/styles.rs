//! # UI Styling Module
//!
//! Centralized styling utilities for consistent UI appearance across panels.
//! Green-on-white palette; blue for Refresh, red/green for Pause/Resume.

use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme, Vector};

pub const PAGE_BACKGROUND: Color = Color::from_rgb(0.941, 0.992, 0.957);
pub const TITLE_TEXT: Color = Color::from_rgb(0.082, 0.502, 0.239);
pub const HEADING_TEXT: Color = Color::from_rgb(0.086, 0.639, 0.290);
pub const BODY_TEXT: Color = Color::from_rgb(0.082, 0.502, 0.239);
pub const MUTED_TEXT: Color = Color::from_rgb(0.290, 0.871, 0.502);
pub const FOOTER_TEXT: Color = Color::from_rgb(0.133, 0.773, 0.369);
const TABLE_HEADER: Color = Color::from_rgb(0.733, 0.969, 0.816);
const ROW_DIVIDER: Color = Color::from_rgb(0.898, 0.906, 0.922);

const BLUE: Color = Color::from_rgb(0.231, 0.510, 0.965);
const BLUE_HOVER: Color = Color::from_rgb(0.145, 0.388, 0.922);
const RED: Color = Color::from_rgb(0.937, 0.267, 0.267);
const RED_HOVER: Color = Color::from_rgb(0.863, 0.149, 0.149);
const GREEN: Color = Color::from_rgb(0.133, 0.773, 0.369);
const GREEN_HOVER: Color = Color::from_rgb(0.086, 0.639, 0.290);

pub fn page(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(PAGE_BACKGROUND)),
        ..Default::default()
    }
}

/// White rounded card with a soft shadow
pub fn card(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::WHITE)),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 8.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.08),
            offset: Vector::new(0.0, 1.0),
            blur_radius: 3.0,
        },
        ..Default::default()
    }
}

pub fn table_header(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(TABLE_HEADER)),
        text_color: Some(BODY_TEXT),
        ..Default::default()
    }
}

pub fn table_row(_theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            color: ROW_DIVIDER,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..Default::default()
    }
}

/// Style for the Refresh button (blue theme)
pub fn refresh_button_style() -> impl Fn(&Theme, button::Status) -> button::Style {
    |_theme: &Theme, status: button::Status| solid_button(status, BLUE, BLUE_HOVER)
}

/// Style for the Pause/Resume button: red while running, green while paused
pub fn pause_button_style(is_paused: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme: &Theme, status: button::Status| {
        if is_paused {
            solid_button(status, GREEN, GREEN_HOVER)
        } else {
            solid_button(status, RED, RED_HOVER)
        }
    }
}

fn solid_button(status: button::Status, base: Color, hover: Color) -> button::Style {
    let background = match status {
        button::Status::Active => base,
        button::Status::Hovered | button::Status::Pressed => hover,
        button::Status::Disabled => Color { a: 0.5, ..base },
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: Color::WHITE,
        border: Border {
            color: background,
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}
