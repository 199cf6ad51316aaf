//! 宣言的シーン文書（serde）
//!
//! ```json
//! {
//!   "shapes": [
//!     { "name": "a", "type": "circle", "x": 0, "y": 0, "radius": 50,
//!       "attrs": { "fillColor": "red" } }
//!   ],
//!   "animations": [
//!     { "name": "slide", "duration": "1s",
//!       "properties": { "x": 100, "fillColor": "green" },
//!       "subjects": ["a"], "autoplay": true }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{Animation, AnimationId};
use crate::duration::DurationSpec;
use crate::easing::Easing;
use crate::error::{KaguraError, Result};
use crate::shape::{Shape, ShapeId, ShapeKind};
use crate::stage::Stage;
use crate::validate::Validate;
use crate::value::AttrValue;

/// シーン文書ルート
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    /// z順のシェイプ（先頭から描画）
    #[serde(default)]
    pub shapes: Vec<ShapeDef>,
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
}

/// 名前付きシェイプ定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDef {
    pub name: String,
    #[serde(flatten)]
    pub geometry: GeometryDef,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
}

/// シェイプ形状（内部タグ "type"）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryDef {
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        x: f64,
        y: f64,
        #[serde(rename = "radiusX")]
        radius_x: f64,
        #[serde(rename = "radiusY")]
        radius_y: f64,
    },
}

impl GeometryDef {
    pub fn kind(&self) -> ShapeKind {
        match self {
            GeometryDef::Circle { .. } => ShapeKind::Circle,
            GeometryDef::Rect { .. } => ShapeKind::Rect,
            GeometryDef::Ellipse { .. } => ShapeKind::Ellipse,
        }
    }

    pub fn to_shape(&self) -> Shape {
        match *self {
            GeometryDef::Circle { x, y, radius } => Shape::circle(x, y, radius),
            GeometryDef::Rect {
                x,
                y,
                width,
                height,
            } => Shape::rect(x, y, width, height),
            GeometryDef::Ellipse {
                x,
                y,
                radius_x,
                radius_y,
            } => Shape::ellipse(x, y, radius_x, radius_y),
        }
    }
}

impl ShapeDef {
    /// 属性を適用したシェイプを生成
    pub fn to_shape(&self) -> Result<Shape> {
        let mut shape = self.geometry.to_shape();
        for (name, value) in &self.attrs {
            shape.set(name, value.clone())?;
        }
        Ok(shape)
    }
}

/// 名前付きアニメーション定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    pub name: String,
    pub duration: DurationSpec,
    pub properties: BTreeMap<String, AttrValue>,
    #[serde(default)]
    pub easing: Easing,
    /// シェイプ名
    #[serde(default)]
    pub subjects: Vec<String>,
    /// 読み込み直後に再生
    #[serde(default)]
    pub autoplay: bool,
}

impl AnimationDef {
    /// サブジェクト無しでアニメーションを生成
    pub fn to_animation(&self) -> Result<Animation> {
        let duration = self.duration.resolve()?;
        let targets = self
            .properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.clone()));
        Ok(Animation::new(duration, targets)?.with_easing(self.easing))
    }
}

/// 読み込み済みシーン（ステージと名前→ID の対応表）
#[derive(Debug)]
pub struct Scene {
    pub stage: Stage,
    pub shapes: BTreeMap<String, ShapeId>,
    pub animations: BTreeMap<String, AnimationId>,
}

impl Scene {
    pub fn shape(&self, name: &str) -> Option<ShapeId> {
        self.shapes.get(name).copied()
    }

    pub fn animation(&self, name: &str) -> Option<AnimationId> {
        self.animations.get(name).copied()
    }
}

impl SceneDocument {
    /// 文書全体を検証してからステージを構築
    pub fn load(&self) -> std::result::Result<Scene, Vec<KaguraError>> {
        self.validate()?;
        self.build().map_err(|e| vec![e])
    }

    fn build(&self) -> Result<Scene> {
        let mut stage = Stage::new();
        let mut shapes = BTreeMap::new();
        for def in &self.shapes {
            let id = stage.add(def.to_shape()?);
            shapes.insert(def.name.clone(), id);
        }

        let mut animations = BTreeMap::new();
        for def in &self.animations {
            let id = stage.animate(def.to_animation()?)?;
            let subjects = def
                .subjects
                .iter()
                .map(|name| {
                    shapes
                        .get(name)
                        .copied()
                        .ok_or_else(|| KaguraError::UndefinedSubject {
                            animation: def.name.clone(),
                            name: name.clone(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            stage.add_subjects(id, subjects)?;
            if def.autoplay {
                stage.play(id)?;
            }
            animations.insert(def.name.clone(), id);
        }

        debug!(
            shapes = shapes.len(),
            animations = animations.len(),
            "[SceneDocument] Loaded"
        );
        Ok(Scene {
            stage,
            shapes,
            animations,
        })
    }
}
