//! シェイプ コンポーネントと、ステージ外の `Shape` 記述
//!
//! - Placement: 位置と回転
//! - Geometry: 円 / 矩形 / 楕円 の寸法
//! - Style: 塗り、線、不透明度
//!
//! `Stage` に登録されたシェイプは、この3コンポーネントを持つエンティティ。

use std::fmt;

use bevy_ecs::prelude::*;
use euclid::{Angle, Box2D, Point2D, Size2D, Vector2D};
use serde::{Serialize, Serializer};

use crate::color::Color;
use crate::error::{KaguraError, Result};
use crate::property::Property;
use crate::stage::{ShapeMut, Stage};
use crate::value::{AttrValue, PropertyValue};

/// ステージ座標空間（euclid 型の単位マーカー）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSpace;

pub type Point = Point2D<f64, StageSpace>;
pub type Size = Size2D<f64, StageSpace>;
pub type Bounds = Box2D<f64, StageSpace>;

/// `Stage` が所有するシェイプのハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) Entity);

impl ShapeId {
    pub fn entity(self) -> Entity {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0.to_bits())
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0.to_bits())
    }
}

/// シェイプ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Rect,
    Ellipse,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rect => "rect",
            ShapeKind::Ellipse => "ellipse",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 位置と回転。円・楕円は中心、矩形は左上で配置する。
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub position: Point,
    pub rotation: Angle<f64>,
}

impl Placement {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            rotation: Angle::zero(),
        }
    }
}

/// シェイプ寸法
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Circle { radius: f64 },
    Rect { size: Size },
    Ellipse { radius_x: f64, radius_y: f64 },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Rect { .. } => ShapeKind::Rect,
            Geometry::Ellipse { .. } => ShapeKind::Ellipse,
        }
    }

    /// `position` での軸平行な外接矩形（回転は無視）
    pub fn bounds(&self, position: Point) -> Bounds {
        match *self {
            Geometry::Circle { radius } => {
                let r = Vector2D::new(radius, radius);
                Bounds::new(position - r, position + r)
            }
            Geometry::Ellipse { radius_x, radius_y } => {
                let r = Vector2D::new(radius_x, radius_y);
                Bounds::new(position - r, position + r)
            }
            Geometry::Rect { size } => Bounds::new(position, position + size.to_vector()),
        }
    }
}

/// 塗り / 線 / 不透明度
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

/// コンポーネントからプロパティを読む。形状が持たなければ `None`。
pub(crate) fn read_property(
    placement: &Placement,
    geometry: &Geometry,
    style: &Style,
    property: Property,
) -> Option<PropertyValue> {
    let number = |v: f64| Some(PropertyValue::Number(v));
    match (property, geometry) {
        (Property::X, _) => number(placement.position.x),
        (Property::Y, _) => number(placement.position.y),
        (Property::Rotation, _) => number(placement.rotation.to_degrees()),
        (Property::Opacity, _) => number(style.opacity),
        (Property::FillColor, _) => Some(PropertyValue::Color(style.fill)),
        (Property::StrokeColor, _) => Some(PropertyValue::Color(style.stroke)),
        (Property::StrokeWidth, _) => number(style.stroke_width),
        (Property::Radius, Geometry::Circle { radius }) => number(*radius),
        (Property::Width, Geometry::Rect { size }) => number(size.width),
        (Property::Height, Geometry::Rect { size }) => number(size.height),
        (Property::RadiusX, Geometry::Ellipse { radius_x, .. }) => number(*radius_x),
        (Property::RadiusY, Geometry::Ellipse { radius_y, .. }) => number(*radius_y),
        _ => None,
    }
}

/// 解決済みの値をコンポーネントへ書き込む。数値はプロパティ範囲に丸める。
/// 形状がプロパティを持たない、または値の種別が合わなければ false。
pub(crate) fn write_property(
    placement: &mut Placement,
    geometry: &mut Geometry,
    style: &mut Style,
    property: Property,
    value: PropertyValue,
) -> bool {
    match value {
        PropertyValue::Color(color) => match property {
            Property::FillColor => style.fill = color,
            Property::StrokeColor => style.stroke = color,
            _ => return false,
        },
        PropertyValue::Number(v) => {
            let v = property.clamp(v);
            match (property, geometry) {
                (Property::X, _) => placement.position.x = v,
                (Property::Y, _) => placement.position.y = v,
                (Property::Rotation, _) => placement.rotation = Angle::degrees(v),
                (Property::Opacity, _) => style.opacity = v,
                (Property::StrokeWidth, _) => style.stroke_width = v,
                (Property::Radius, Geometry::Circle { radius }) => *radius = v,
                (Property::Width, Geometry::Rect { size }) => size.width = v,
                (Property::Height, Geometry::Rect { size }) => size.height = v,
                (Property::RadiusX, Geometry::Ellipse { radius_x, .. }) => *radius_x = v,
                (Property::RadiusY, Geometry::Ellipse { radius_y, .. }) => *radius_y = v,
                _ => return false,
            }
        }
    }
    true
}

/// 属性名と値をシェイプ種別に対して解決
///
/// 未知の名前も、他種別の名前も `InvalidProperty` になる。
pub(crate) fn resolve_attr(
    kind: ShapeKind,
    name: &str,
    value: &AttrValue,
) -> Result<(Property, PropertyValue)> {
    let property = name
        .parse::<Property>()
        .map_err(|_| KaguraError::invalid_property(name, kind.name()))?;
    if !property.applies_to(kind) {
        return Err(KaguraError::invalid_property(name, kind.name()));
    }
    let value = property.resolve(value)?;
    Ok((property, value))
}

/// ステージ外のシェイプ記述
///
/// ```ignore
/// let id = Shape::circle(0.0, 0.0, 50.0)
///     .add_to(&mut stage)
///     .attr("fillColor", "red")?
///     .id();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub placement: Placement,
    pub geometry: Geometry,
    pub style: Style,
}

/// 座標の正規化: NaN は 0、無限大は有限の最大/最小値に丸める
fn coordinate(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(f64::MIN, f64::MAX)
    }
}

/// 寸法の正規化: NaN・負値は 0、無限大は `f64::MAX` に丸める
fn extent(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, f64::MAX)
    }
}

impl Shape {
    /// (x, y) を中心とする円
    ///
    /// コンストラクタは失敗しない。座標・寸法は `attr` と同じ範囲に丸める
    /// （NaN は 0、負の半径は 0、無限大は有限値）。値を検査したい場合は
    /// `attr` で設定する。
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self::with_geometry(
            x,
            y,
            Geometry::Circle {
                radius: extent(radius),
            },
        )
    }

    /// 左上を (x, y) とする矩形。丸めは `circle` と同じ。
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::with_geometry(
            x,
            y,
            Geometry::Rect {
                size: Size::new(extent(width), extent(height)),
            },
        )
    }

    /// (x, y) を中心とする楕円。丸めは `circle` と同じ。
    pub fn ellipse(x: f64, y: f64, radius_x: f64, radius_y: f64) -> Self {
        Self::with_geometry(
            x,
            y,
            Geometry::Ellipse {
                radius_x: extent(radius_x),
                radius_y: extent(radius_y),
            },
        )
    }

    fn with_geometry(x: f64, y: f64, geometry: Geometry) -> Self {
        Self {
            placement: Placement::new(coordinate(x), coordinate(y)),
            geometry,
            style: Style::default(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// 名前付きプロパティを設定してシェイプを返す（チェーン用）
    pub fn attr(mut self, name: &str, value: impl Into<AttrValue>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// 名前付きプロパティをその場で設定
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<()> {
        let (property, value) = resolve_attr(self.kind(), name, &value.into())?;
        write_property(
            &mut self.placement,
            &mut self.geometry,
            &mut self.style,
            property,
            value,
        );
        Ok(())
    }

    /// 名前付きプロパティを読む
    pub fn get(&self, name: &str) -> Result<PropertyValue> {
        let property = name
            .parse::<Property>()
            .map_err(|_| KaguraError::invalid_property(name, self.kind().name()))?;
        read_property(&self.placement, &self.geometry, &self.style, property)
            .ok_or_else(|| KaguraError::invalid_property(name, self.kind().name()))
    }

    pub fn bounds(&self) -> Bounds {
        self.geometry.bounds(self.placement.position)
    }

    /// `stage` に登録する。返るハンドルで `attr` をチェーンできる。
    pub fn add_to(self, stage: &mut Stage) -> ShapeMut<'_> {
        let id = stage.add(self);
        ShapeMut::new(stage, id)
    }
}
