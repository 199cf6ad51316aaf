//! 名前付きシェイプ プロパティ（種別と有効範囲）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{KaguraError, Result};
use crate::shape::ShapeKind;
use crate::value::{AttrValue, PropertyValue};

/// プロパティ種別（値のパースと補間方法を決める）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Number,
    Color,
}

impl PropertyKind {
    fn describe(self) -> &'static str {
        match self {
            PropertyKind::Number => "a number",
            PropertyKind::Color => "a color",
        }
    }
}

/// アニメーション可能なシェイプ プロパティ
///
/// 名前はスクリプトやシーン文書の属性名に従う（`x`, `fillColor`, `radiusX` など）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    X,
    Y,
    Rotation,
    Opacity,
    FillColor,
    StrokeColor,
    StrokeWidth,
    Radius,
    Width,
    Height,
    #[serde(rename = "radiusX")]
    RadiusX,
    #[serde(rename = "radiusY")]
    RadiusY,
}

impl Property {
    pub const ALL: [Property; 12] = [
        Property::X,
        Property::Y,
        Property::Rotation,
        Property::Opacity,
        Property::FillColor,
        Property::StrokeColor,
        Property::StrokeWidth,
        Property::Radius,
        Property::Width,
        Property::Height,
        Property::RadiusX,
        Property::RadiusY,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Rotation => "rotation",
            Property::Opacity => "opacity",
            Property::FillColor => "fillColor",
            Property::StrokeColor => "strokeColor",
            Property::StrokeWidth => "strokeWidth",
            Property::Radius => "radius",
            Property::Width => "width",
            Property::Height => "height",
            Property::RadiusX => "radiusX",
            Property::RadiusY => "radiusY",
        }
    }

    pub fn kind(self) -> PropertyKind {
        match self {
            Property::FillColor | Property::StrokeColor => PropertyKind::Color,
            _ => PropertyKind::Number,
        }
    }

    /// `kind` のシェイプがこのプロパティを持つか
    pub fn applies_to(self, kind: ShapeKind) -> bool {
        match self {
            Property::Radius => kind == ShapeKind::Circle,
            Property::Width | Property::Height => kind == ShapeKind::Rect,
            Property::RadiusX | Property::RadiusY => kind == ShapeKind::Ellipse,
            _ => true,
        }
    }

    /// 数値の有効範囲（両端含む）
    pub fn range(self) -> (f64, f64) {
        match self {
            Property::Opacity => (0.0, 1.0),
            Property::StrokeWidth
            | Property::Radius
            | Property::Width
            | Property::Height
            | Property::RadiusX
            | Property::RadiusY => (0.0, f64::MAX),
            _ => (f64::MIN, f64::MAX),
        }
    }

    /// 値を範囲内に丸める。オーバーシュートするイージングの出力に使う。
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }

    /// 呼び出し側の値をこのプロパティ用にパース・検査
    pub fn resolve(self, value: &AttrValue) -> Result<PropertyValue> {
        match (self.kind(), value) {
            (PropertyKind::Number, AttrValue::Number(v)) => {
                let (min, max) = self.range();
                if !v.is_finite() || *v < min || *v > max {
                    return Err(KaguraError::ValueOutOfRange {
                        property: self.name().to_string(),
                        value: *v,
                        min,
                        max,
                    });
                }
                Ok(PropertyValue::Number(*v))
            }
            (PropertyKind::Color, AttrValue::Color(c)) => Ok(PropertyValue::Color(*c)),
            (PropertyKind::Color, AttrValue::Text(text)) => {
                Ok(PropertyValue::Color(text.parse::<Color>()?))
            }
            (kind, _) => Err(KaguraError::type_mismatch(self.name(), kind.describe())),
        }
    }
}

impl FromStr for Property {
    type Err = KaguraError;

    fn from_str(s: &str) -> Result<Self> {
        Property::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| KaguraError::UnknownProperty(s.to_string()))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
