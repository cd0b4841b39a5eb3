use eframe::egui::{Color32, CornerRadius, Margin};

pub const ERROR: Color32 = Color32::from_rgb(220, 76, 70);
pub const SUCCESS: Color32 = Color32::from_rgb(64, 160, 96);
pub const ACCENT: Color32 = Color32::from_rgb(99, 102, 241);
pub const USER_BUBBLE: Color32 = Color32::from_rgb(67, 56, 202);
pub const ASSISTANT_BUBBLE: Color32 = Color32::from_rgb(55, 65, 81);
pub const BUBBLE_TEXT: Color32 = Color32::WHITE;

pub const BUBBLE_RADIUS: CornerRadius = CornerRadius::same(8);
pub const BUBBLE_MARGIN: Margin = Margin::same(8);

pub const FORM_WIDTH: f32 = 360.0;
