//! # Geometry 模块
//!
//! 场景使用的基础几何与颜色类型。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 二维点（逻辑坐标）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// 原点
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// 创建新的点
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// 视口尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
        }
    }
}

impl ViewportSize {
    /// 创建新的视口尺寸
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// RGBA 颜色
///
/// 序列化为 `"#rrggbb"` 或 `"#rrggbbaa"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// 不透明颜色
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 带透明度的颜色
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 解析 `#rrggbb` / `#rrggbbaa`（`#` 可省略）
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();

        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("无效的颜色值: '{value}'"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lerp() {
        let mid = Point::new(0.0, 0.0).lerp(Point::new(10.0, -20.0), 0.5);
        assert_eq!(mid, Point::new(5.0, -10.0));
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#3060e0"), Some(Color::rgb(0x30, 0x60, 0xe0)));
        assert_eq!(
            Color::from_hex("ff000080"),
            Some(Color::rgba(255, 0, 0, 0x80))
        );
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zz0000"), None);
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_color_serde() {
        let json = serde_json::to_string(&Color::rgba(16, 32, 48, 0)).unwrap();
        assert_eq!(json, "\"#10203000\"");

        let color: Color = serde_json::from_str("\"#ffffff\"").unwrap();
        assert_eq!(color, Color::WHITE);
        assert!(serde_json::from_str::<Color>("\"white\"").is_err());
    }
}
