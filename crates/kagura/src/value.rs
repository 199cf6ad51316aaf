use serde::{Deserialize, Serialize};

use crate::color::Color;

/// 呼び出し側・シーン文書から渡される属性値
///
/// serde は untagged。数値は `Number`、色として解釈できる文字列は `Color`、
/// それ以外は `Text` のまま（対象プロパティに応じたエラーで後から弾く）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Color(Color),
    Text(String),
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Number(v as f64)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Number(v as f64)
    }
}

impl From<Color> for AttrValue {
    fn from(c: Color) -> Self {
        AttrValue::Color(c)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

/// 解決・型検査済みのプロパティ値
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Color(Color),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            PropertyValue::Color(c) => Some(*c),
            PropertyValue::Number(_) => None,
        }
    }

    /// イージング後の進行度 `t` で `to` へ向けて補間
    ///
    /// `t == 0` で `self`、`t == 1` でちょうど `to`。`from·(1−t) + to·t` の形で
    /// 計算するため、有限の端点同士なら途中でオーバーフローしない。
    /// 種別が異なる場合は `to` に切り替わる。
    pub fn interpolate(&self, to: &PropertyValue, t: f64) -> PropertyValue {
        if t == 1.0 {
            return *to;
        }
        match (self, to) {
            (PropertyValue::Number(from), PropertyValue::Number(to)) => {
                if t == 0.0 {
                    PropertyValue::Number(*from)
                } else {
                    PropertyValue::Number(from * (1.0 - t) + to * t)
                }
            }
            (PropertyValue::Color(from), PropertyValue::Color(to)) => {
                PropertyValue::Color(from.lerp(*to, t))
            }
            _ => *to,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<Color> for PropertyValue {
    fn from(c: Color) -> Self {
        PropertyValue::Color(c)
    }
}
