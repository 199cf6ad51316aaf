//! レンダラ向けフレームスナップショット
//!
//! ピクセル出力はこのクレートの外。レンダラは `FrameSink` を実装し、
//! `Stage::render` ごとに登録中シェイプを z 順で受け取る。

use std::time::Duration;

use serde::Serialize;

use crate::shape::{Bounds, Geometry, Placement, ShapeId, ShapeKind, Style};

/// 登録中シェイプ1つの属性スナップショット
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeSnapshot {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub placement: Placement,
    pub geometry: Geometry,
    pub style: Style,
    /// 軸平行、回転前
    pub bounds: Bounds,
}

/// 1フレーム
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub number: u64,
    pub elapsed: Duration,
    /// 奥から手前
    pub shapes: Vec<ShapeSnapshot>,
}

pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> FrameSink for F {
    fn present(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// 全フレームを記録（テスト、オフライン出力用）
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl FrameSink for FrameRecorder {
    fn present(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}
