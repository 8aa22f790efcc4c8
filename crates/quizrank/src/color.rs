//! CLI color helpers.
//!
//! All functions respect `NO_COLOR`, `FORCE_COLOR` and TTY detection through
//! `owo-colors`' `if_supports_color()`. `--no-color` sets an in-process flag
//! that bypasses owo-colors entirely.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use quizrank_core::{BadgeTier, RankMovement};

/// Forces color off when set (by `--no-color`).
static NO_COLOR_FLAG: AtomicBool = AtomicBool::new(false);

/// Call once from main.rs when `--no-color` is passed.
pub fn set_no_color() {
    NO_COLOR_FLAG.store(true, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb {
    const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

const GOLD: Rgb = Rgb::from_hex(0xEAB308);
const SILVER: Rgb = Rgb::from_hex(0x9CA3AF);
const BRONZE: Rgb = Rgb::from_hex(0xD97706);
const VIEWER: Rgb = Rgb::from_hex(0x60A5FA); // Viewer's own row
const SCORE: Rgb = Rgb::from_hex(0x4ADE80);
const ERROR: Rgb = Rgb::from_hex(0xB87060);
const WARNING: Rgb = Rgb::from_hex(0xC49A5C);
const MUTED: Rgb = Rgb::from_hex(0x5C6370);

fn no_color() -> bool {
    NO_COLOR_FLAG.load(Ordering::Relaxed)
}

fn paint(text: &str, rgb: Rgb) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(Stdout, |t| t.truecolor(rgb.r, rgb.g, rgb.b))
        .to_string()
}

fn paint_stderr(text: &str, rgb: Rgb) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(Stderr, |t| t.truecolor(rgb.r, rgb.g, rgb.b))
        .to_string()
}

/// Color a rank cell by badge tier. Standard ranks stay plain.
pub fn badge(tier: BadgeTier, text: &str) -> String {
    match tier {
        BadgeTier::Gold => paint(text, GOLD),
        BadgeTier::Silver => paint(text, SILVER),
        BadgeTier::Bronze => paint(text, BRONZE),
        BadgeTier::Standard => text.to_string(),
    }
}

/// Green for climbers, red for fallers, muted otherwise.
pub fn movement(movement: RankMovement, text: &str) -> String {
    match movement {
        RankMovement::Up(_) => paint(text, SCORE),
        RankMovement::Down(_) => paint(text, ERROR),
        RankMovement::New | RankMovement::Unchanged => paint(text, MUTED),
    }
}

pub fn viewer(text: &str) -> String {
    paint(text, VIEWER)
}

pub fn score(text: &str) -> String {
    paint(text, SCORE)
}

/// Apply bold text (headers).
pub fn bold(text: &str) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(Stdout, |t| t.bold()).to_string()
}

/// Apply muted gray (secondary info, borders).
pub fn muted(text: &str) -> String {
    paint(text, MUTED)
}

/// Error styling for stderr messages.
pub fn error(text: &str) -> String {
    paint_stderr(text, ERROR)
}

/// Warning styling for stderr messages.
pub fn warning(text: &str) -> String {
    paint_stderr(text, WARNING)
}

/// Hint styling for secondary info on stderr.
pub fn hint(text: &str) -> String {
    paint_stderr(text, MUTED)
}
