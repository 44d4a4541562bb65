//! Color constants for the dashboard theme: dark slate chrome around a light
//! content area.

use eframe::egui::Color32;

/// Top bar and sidebar background
pub const CHROME_BG: Color32 = Color32::from_rgb(0x1F, 0x29, 0x37);

/// Admin sidebar, one shade lighter than the top bar
pub const SIDEBAR_BG: Color32 = Color32::from_rgb(0x27, 0x33, 0x44);

/// Page background
pub const PAGE_BG: Color32 = Color32::from_rgb(0xF4, 0xF6, 0xF8);

/// Login/register card background
pub const CARD_BG: Color32 = Color32::WHITE;

pub const CARD_BORDER: Color32 = Color32::from_rgb(0xD5, 0xDB, 0xE3);

/// Text on the dark chrome
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xE8, 0xEC, 0xF1);

/// Text on the page background
pub const TEXT_DARK: Color32 = Color32::from_rgb(0x1F, 0x29, 0x37);

pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x6B, 0x77, 0x85);

pub const ACCENT: Color32 = Color32::from_rgb(0x25, 0x63, 0xEB);

/// Expense bars
pub const EXPENSE: Color32 = Color32::from_rgb(0xDC, 0x26, 0x26);

/// Income bars
pub const INCOME: Color32 = Color32::from_rgb(0x16, 0xA3, 0x4A);

pub const ERROR: Color32 = Color32::from_rgb(0xE5, 0x48, 0x4D);

pub const SUCCESS: Color32 = Color32::from_rgb(0x16, 0xA3, 0x4A);
