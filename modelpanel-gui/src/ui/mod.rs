//! UI components for Modelpanel.

pub mod closed;
pub mod settings;
pub mod status;

// Theme-aware colors for the UI
pub mod colors {
    use eframe::egui::{Color32, Visuals};

    /// Primary action buttons.
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);

    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);

    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    /// Background of the license notice banner.
    pub fn notice_bg(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(69, 26, 3)
        } else {
            Color32::from_rgb(254, 243, 199)
        }
    }

    pub fn muted(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(156, 163, 175)
        } else {
            Color32::from_rgb(100, 100, 110)
        }
    }

    pub fn border(visuals: &Visuals) -> Color32 {
        if visuals.dark_mode {
            Color32::from_rgb(70, 70, 75)
        } else {
            Color32::from_rgb(200, 200, 210)
        }
    }
}
