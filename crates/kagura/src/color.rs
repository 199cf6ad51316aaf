//! RGBA カラー（CSS 形式のパースとチャネル単位の補間）

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{KaguraError, Result};

/// RGBA カラー。各チャネルは `[0, 1]`。
///
/// シリアライズ形式は `#rrggbbaa`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    /// CSS の `green`（#008000）。緑チャネル最大ではない。
    pub const GREEN: Self = Self::rgba(0.0, 128.0 / 255.0, 0.0, 1.0);
    pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 8bit チャネルから不透明色を生成
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// 8bit チャネル（四捨五入）
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// `#rrggbbaa`
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }

    /// チャネル単位の線形補間。`t` は `[0, 1]` 外も可（オーバーシュートする
    /// イージング）。各チャネルは `[0, 1]` に丸める。
    pub fn lerp(self, to: Color, t: f64) -> Color {
        if t == 0.0 {
            return self;
        }
        if t == 1.0 {
            return to;
        }
        Color {
            r: lerp_channel(self.r, to.r, t),
            g: lerp_channel(self.g, to.g, t),
            b: lerp_channel(self.b, to.b, t),
            a: lerp_channel(self.a, to.a, t),
        }
    }
}

fn lerp_channel(from: f32, to: f32, t: f64) -> f32 {
    let value = from as f64 * (1.0 - t) + to as f64 * t;
    value.clamp(0.0, 1.0) as f32
}

fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

lazy_static! {
    static ref NAMED_COLORS: HashMap<&'static str, Color> = {
        let mut m = HashMap::new();
        m.insert("transparent", Color::TRANSPARENT);
        m.insert("black", Color::BLACK);
        m.insert("white", Color::WHITE);
        m.insert("red", Color::RED);
        m.insert("green", Color::GREEN);
        m.insert("blue", Color::BLUE);
        m.insert("lime", Color::from_rgb8(0, 255, 0));
        m.insert("yellow", Color::from_rgb8(255, 255, 0));
        m.insert("cyan", Color::from_rgb8(0, 255, 255));
        m.insert("aqua", Color::from_rgb8(0, 255, 255));
        m.insert("magenta", Color::from_rgb8(255, 0, 255));
        m.insert("fuchsia", Color::from_rgb8(255, 0, 255));
        m.insert("gray", Color::from_rgb8(128, 128, 128));
        m.insert("grey", Color::from_rgb8(128, 128, 128));
        m.insert("silver", Color::from_rgb8(192, 192, 192));
        m.insert("maroon", Color::from_rgb8(128, 0, 0));
        m.insert("olive", Color::from_rgb8(128, 128, 0));
        m.insert("teal", Color::from_rgb8(0, 128, 128));
        m.insert("navy", Color::from_rgb8(0, 0, 128));
        m.insert("purple", Color::from_rgb8(128, 0, 128));
        m.insert("orange", Color::from_rgb8(255, 165, 0));
        m.insert("pink", Color::from_rgb8(255, 192, 203));
        m.insert("brown", Color::from_rgb8(165, 42, 42));
        m
    };
}

impl FromStr for Color {
    type Err = KaguraError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim().to_ascii_lowercase();
        let parsed = if let Some(hex) = text.strip_prefix('#') {
            parse_hex(hex)
        } else if let Some(args) = function_args(&text, "rgba") {
            parse_rgb_args(args, true)
        } else if let Some(args) = function_args(&text, "rgb") {
            parse_rgb_args(args, false)
        } else {
            NAMED_COLORS.get(text.as_str()).copied()
        };
        parsed.ok_or_else(|| KaguraError::InvalidColor(s.to_string()))
    }
}

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::from_rgba8(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            nibble(3)?,
        )),
        6 => Some(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |part: &str| -> Option<f32> {
        let v: f64 = part.parse().ok()?;
        (0.0..=255.0).contains(&v).then(|| (v / 255.0) as f32)
    };
    let alpha = if with_alpha {
        let a: f64 = parts[3].parse().ok()?;
        if !(0.0..=1.0).contains(&a) {
            return None;
        }
        a as f32
    } else {
        1.0
    };
    Some(Color {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha,
    })
}

impl TryFrom<String> for Color {
    type Error = KaguraError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
