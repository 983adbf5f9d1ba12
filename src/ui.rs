// src/ui.rs
use iced::Color;
use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub toolbar_bg: Color,
    pub button_bg: Color,
    pub button_fg: Color,
    pub button_hover: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub grid: Color,
}

pub static DARK_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(0.1176, 0.1176, 0.1176),          // #1e1e1e
    fg: Color::from_rgb(0.9412, 0.9412, 0.9412),          // #f0f0f0
    toolbar_bg: Color::from_rgb(0.1686, 0.1686, 0.1686),  // #2b2b2b
    button_bg: Color::from_rgb(0.2275, 0.2275, 0.2275),   // #3a3a3a
    button_fg: Color::WHITE,
    button_hover: Color::from_rgb(0.3333, 0.3333, 0.3333), // #555
    header_bg: Color::from_rgb(0.2667, 0.2667, 0.2667),   // #444
    header_fg: Color::WHITE,
    grid: Color::from_rgb(0.4, 0.4, 0.4),                 // #666
});

pub static LIGHT_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::WHITE,
    fg: Color::from_rgb(0.2, 0.2, 0.2),                   // #333
    toolbar_bg: Color::from_rgb(0.96, 0.96, 0.96),
    button_bg: Color::from_rgb(0.098, 0.2863, 0.6902),    // #1949b0
    button_fg: Color::WHITE,
    button_hover: Color::from_rgb(0.1176, 0.5686, 0.8902), // #1e91e3
    header_bg: Color::from_rgb(0.098, 0.2863, 0.6902),    // #1949b0
    header_fg: Color::WHITE,
    grid: Color::from_rgb(0.8, 0.8, 0.8),                 // #ccc
});

pub fn palette(dark: bool) -> &'static Styles {
    if dark {
        &*DARK_THEME
    } else {
        &*LIGHT_THEME
    }
}
