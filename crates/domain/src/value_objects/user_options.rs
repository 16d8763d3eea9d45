//! Per-user display defaults.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// No mouse button pans the board.
pub const MOUSE_PAN_NONE: u8 = 0;
/// Middle and right buttons both pan.
pub const MOUSE_PAN_BOTH: u8 = 3;

/// Display preferences a user starts every room with.
///
/// Missing fields fall back to their defaults when deserialized, so stored
/// options keep loading as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOptions {
    pub fow_colour: String,
    pub grid_colour: String,
    pub ruler_colour: String,
    pub use_tool_icons: bool,
    pub show_token_directions: bool,

    pub invert_alt: bool,
    pub disable_scroll_to_zoom: bool,
    /// `false` tracks absolute values, `true` relative ones.
    pub default_tracker_mode: bool,
    /// 0 none, 1 middle button, 2 right button, 3 both.
    pub mouse_pan_mode: u8,

    pub use_high_dpi: bool,
    pub grid_size: u32,
    pub use_as_physical_board: bool,
    pub mini_size: f64,
    pub ppi: u32,

    pub initiative_camera_lock: bool,
    pub initiative_vision_lock: bool,
    pub initiative_effect_visibility: String,
    pub initiative_open_on_activate: bool,

    pub render_all_floors: bool,
}

impl Default for UserOptions {
    fn default() -> Self {
        Self {
            fow_colour: "#000".to_string(),
            grid_colour: "#000".to_string(),
            ruler_colour: "#F00".to_string(),
            use_tool_icons: true,
            show_token_directions: true,
            invert_alt: false,
            disable_scroll_to_zoom: false,
            default_tracker_mode: false,
            mouse_pan_mode: MOUSE_PAN_BOTH,
            use_high_dpi: false,
            grid_size: 50,
            use_as_physical_board: false,
            mini_size: 1.0,
            ppi: 96,
            initiative_camera_lock: false,
            initiative_vision_lock: false,
            initiative_effect_visibility: "active".to_string(),
            initiative_open_on_activate: true,
            render_all_floors: true,
        }
    }
}

impl UserOptions {
    /// Reject values the board cannot render with.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(MOUSE_PAN_NONE..=MOUSE_PAN_BOTH).contains(&self.mouse_pan_mode) {
            return Err(DomainError::validation(format!(
                "mouse_pan_mode must be between {MOUSE_PAN_NONE} and {MOUSE_PAN_BOTH}"
            )));
        }
        if self.grid_size == 0 {
            return Err(DomainError::validation("grid_size must be positive"));
        }
        if self.ppi == 0 {
            return Err(DomainError::validation("ppi must be positive"));
        }
        if !self.mini_size.is_finite() || self.mini_size <= 0.0 {
            return Err(DomainError::validation("mini_size must be a positive number"));
        }
        Ok(())
    }
}
