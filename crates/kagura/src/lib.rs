//! # kagura
//!
//! プロパティトゥイーン付きの保持型 2D ステージ
//!
//! シェイプは `Stage` に登録される。`Animation` はサブジェクトの数値・色
//! プロパティを、再生開始時の値から目標値まで一定時間かけて補間する。
//! 時間は `Stage::tick` で進める。
//!
//! ```ignore
//! let mut stage = Stage::new();
//! let a = Shape::circle(0.0, 0.0, 50.0).add_to(&mut stage).attr("fillColor", "red")?.id();
//! let b = Shape::circle(0.0, 50.0, 50.0).add_to(&mut stage).attr("fillColor", "blue")?.id();
//! let anim = stage.animate(
//!     Animation::builder().duration("1s").to("x", 100.0).to("fillColor", "green").build()?,
//! )?;
//! stage.add_subjects(anim, [a, b])?;
//! stage.play(anim)?;
//! stage.run(Duration::from_millis(16))?;
//! ```

mod animation;
mod builder;
mod color;
mod document;
mod duration;
mod easing;
mod error;
mod playback;
mod property;
mod render;
mod shape;
mod stage;
mod systems;
mod validate;
mod value;

pub use animation::{Animation, AnimationId};
pub use builder::AnimationBuilder;
pub use color::Color;
pub use document::{AnimationDef, GeometryDef, Scene, SceneDocument, ShapeDef};
pub use duration::{parse_duration, DurationSpec};
pub use easing::Easing;
pub use error::{KaguraError, Result};
pub use playback::PlaybackState;
pub use property::{Property, PropertyKind};
pub use render::{Frame, FrameRecorder, FrameSink, ShapeSnapshot};
pub use shape::{
    Bounds, Geometry, Placement, Point, Shape, ShapeId, ShapeKind, Size, StageSpace, Style,
};
pub use stage::{ShapeMut, Stage};
pub use systems::{advance_animations, Animate, FrameClock, Timeline};
pub use validate::Validate;
pub use value::{AttrValue, PropertyValue};
