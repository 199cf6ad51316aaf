//! ステージ: シェイプとアニメーションを所有し、フレームループを回す
//!
//! シェイプとアニメーションはステージが持つ ECS World のエンティティ。
//! 登録リストがそのまま z 順（先頭から描画）。

use std::time::Duration;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use tracing::{debug, trace};

use crate::animation::{Animation, AnimationId};
use crate::error::{KaguraError, Result};
use crate::render::{Frame, FrameSink, ShapeSnapshot};
use crate::shape::{Geometry, Placement, Shape, ShapeId, Style};
use crate::systems::{advance_animations, Animate, FrameClock, Timeline};
use crate::value::{AttrValue, PropertyValue};

pub struct Stage {
    world: World,
    schedule: Schedule,
    draw_order: Vec<ShapeId>,
}

impl Stage {
    pub fn new() -> Self {
        let mut world = World::new();
        world.init_resource::<FrameClock>();
        world.init_resource::<Timeline>();

        let mut schedule = Schedule::new(Animate);
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(advance_animations);

        Self {
            world,
            schedule,
            draw_order: Vec::new(),
        }
    }

    // === シェイプ ===

    /// `shape` を引き取り、z 順の末尾に追加して ID を返す
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let Shape {
            placement,
            geometry,
            style,
        } = shape;
        let kind = geometry.kind();
        let id = ShapeId(self.world.spawn((placement, geometry, style)).id());
        self.draw_order.push(id);
        debug!(shape = %id, %kind, "[Stage] Shape added");
        id
    }

    /// `attr` チェーン用の可変ハンドル
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<ShapeMut<'_>> {
        if self.exists(id) {
            Some(ShapeMut::new(self, id))
        } else {
            None
        }
    }

    /// 外したシェイプを再登録する。登録済みなら何もせず false。
    pub fn attach(&mut self, id: ShapeId) -> Result<bool> {
        if !self.exists(id) {
            return Err(KaguraError::ShapeNotFound(id));
        }
        if self.contains(id) {
            return Ok(false);
        }
        self.draw_order.push(id);
        debug!(shape = %id, "[Stage] Shape attached");
        Ok(true)
    }

    /// シェイプを破棄せず z 順から外す。外したシェイプもアニメーションは
    /// 続くが、描画されない。
    pub fn detach(&mut self, id: ShapeId) -> bool {
        let before = self.draw_order.len();
        self.draw_order.retain(|s| *s != id);
        let detached = self.draw_order.len() != before;
        if detached {
            debug!(shape = %id, "[Stage] Shape detached");
        }
        detached
    }

    /// シェイプを破棄し最後の状態を返す。全アニメーションのサブジェクト
    /// からも外す。
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shape(id)?;
        self.draw_order.retain(|s| *s != id);
        let animations: Vec<AnimationId> = self.world.resource::<Timeline>().iter().collect();
        for animation in animations {
            if let Some(mut animation) = self.world.get_mut::<Animation>(animation.entity()) {
                animation.remove_subject(id);
            }
        }
        self.world.despawn(id.entity());
        debug!(shape = %id, "[Stage] Shape removed");
        Some(shape)
    }

    /// 登録中（z 順に含まれる）か
    pub fn contains(&self, id: ShapeId) -> bool {
        self.draw_order.contains(&id)
    }

    fn exists(&self, id: ShapeId) -> bool {
        self.world.get::<Geometry>(id.entity()).is_some()
    }

    /// 登録中シェイプ（奥から手前）
    pub fn shapes(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.draw_order.iter().copied()
    }

    /// 登録中シェイプ数
    pub fn len(&self) -> usize {
        self.draw_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_order.is_empty()
    }

    /// シェイプの現在の状態（登録の有無は問わない）
    pub fn shape(&self, id: ShapeId) -> Option<Shape> {
        let entity = id.entity();
        Some(Shape {
            placement: *self.world.get::<Placement>(entity)?,
            geometry: *self.world.get::<Geometry>(entity)?,
            style: *self.world.get::<Style>(entity)?,
        })
    }

    pub fn attr(&self, id: ShapeId, name: &str) -> Result<PropertyValue> {
        self.shape(id)
            .ok_or(KaguraError::ShapeNotFound(id))?
            .get(name)
    }

    pub fn set_attr(&mut self, id: ShapeId, name: &str, value: impl Into<AttrValue>) -> Result<()> {
        let mut shape = self.shape(id).ok_or(KaguraError::ShapeNotFound(id))?;
        shape.set(name, value)?;
        let Shape {
            placement,
            geometry,
            style,
        } = shape;
        self.world
            .entity_mut(id.entity())
            .insert((placement, geometry, style));
        trace!(shape = %id, name, "[Stage] Attribute set");
        Ok(())
    }

    // === アニメーション ===

    /// アニメーションを登録。既に持つサブジェクトは存在し、全ターゲット
    /// プロパティを持っていなければならない。
    pub fn animate(&mut self, animation: Animation) -> Result<AnimationId> {
        for subject in animation.subjects() {
            self.check_subject(&animation, *subject)?;
        }
        let state = animation.state();
        let id = AnimationId(self.world.spawn(animation).id());
        self.world.resource_mut::<Timeline>().push(id);
        debug!(animation = %id, ?state, "[Stage] Animation registered");
        Ok(id)
    }

    fn check_subject(&self, animation: &Animation, subject: ShapeId) -> Result<()> {
        let geometry = self
            .world
            .get::<Geometry>(subject.entity())
            .ok_or(KaguraError::ShapeNotFound(subject))?;
        animation.check_subject_kind(geometry.kind())
    }

    pub fn animation(&self, id: AnimationId) -> Option<&Animation> {
        self.world.get::<Animation>(id.entity())
    }

    pub fn animation_mut(&mut self, id: AnimationId) -> Option<Mut<'_, Animation>> {
        self.world.get_mut::<Animation>(id.entity())
    }

    fn animation_mut_or_err(&mut self, id: AnimationId) -> Result<Mut<'_, Animation>> {
        self.animation_mut(id)
            .ok_or(KaguraError::AnimationNotFound(id))
    }

    /// 登録済みアニメーションにサブジェクトを追加。全件検査してから追加し、
    /// 重複は無視する。新規追加数を返す。
    pub fn add_subjects(
        &mut self,
        id: AnimationId,
        subjects: impl IntoIterator<Item = ShapeId>,
    ) -> Result<usize> {
        let subjects: Vec<ShapeId> = subjects.into_iter().collect();
        {
            let animation = self
                .animation(id)
                .ok_or(KaguraError::AnimationNotFound(id))?;
            for subject in &subjects {
                self.check_subject(animation, *subject)?;
            }
        }
        let added = self.animation_mut_or_err(id)?.add_subjects(subjects);
        debug!(animation = %id, added, "[Stage] Subjects added");
        Ok(added)
    }

    pub fn play(&mut self, id: AnimationId) -> Result<bool> {
        Ok(self.animation_mut_or_err(id)?.play())
    }

    pub fn pause(&mut self, id: AnimationId) -> Result<bool> {
        Ok(self.animation_mut_or_err(id)?.pause())
    }

    pub fn stop(&mut self, id: AnimationId) -> Result<bool> {
        Ok(self.animation_mut_or_err(id)?.stop())
    }

    /// アニメーションの登録を解除して返す。サブジェクトの値はそのまま。
    pub fn remove_animation(&mut self, id: AnimationId) -> Option<Animation> {
        let animation = self.animation(id)?.clone();
        self.world.resource_mut::<Timeline>().remove(id);
        self.world.despawn(id.entity());
        debug!(animation = %id, "[Stage] Animation removed");
        Some(animation)
    }

    /// 登録順のアニメーション一覧
    pub fn animations(&self) -> Vec<AnimationId> {
        self.world.resource::<Timeline>().iter().collect()
    }

    /// 実行中のアニメーションがあるか
    pub fn is_animating(&self) -> bool {
        self.world
            .resource::<Timeline>()
            .iter()
            .filter_map(|id| self.animation(id))
            .any(|a| a.state().is_running())
    }

    // === フレームループ ===

    /// フレームクロックを `delta` 進め、アニメーションシステムを1回実行
    pub fn tick(&mut self, delta: Duration) {
        self.world.resource_mut::<FrameClock>().advance(delta);
        self.schedule.run(&mut self.world);
    }

    /// 実行中のアニメーションが無くなるまで固定ステップ `frame` で tick する。
    /// tick 回数を返す。
    pub fn run(&mut self, frame: Duration) -> Result<u64> {
        if frame.is_zero() {
            return Err(KaguraError::invalid_duration("frame step must be positive"));
        }
        let mut frames = 0;
        while self.is_animating() {
            self.tick(frame);
            frames += 1;
        }
        debug!(frames, "[Stage] Run complete");
        Ok(frames)
    }

    pub fn clock(&self) -> FrameClock {
        *self.world.resource::<FrameClock>()
    }

    // === 描画 ===

    /// 登録中シェイプのスナップショット（奥から手前）
    pub fn snapshot(&self) -> Vec<ShapeSnapshot> {
        self.draw_order
            .iter()
            .filter_map(|id| {
                let shape = self.shape(*id)?;
                Some(ShapeSnapshot {
                    id: *id,
                    kind: shape.kind(),
                    bounds: shape.bounds(),
                    placement: shape.placement,
                    geometry: shape.geometry,
                    style: shape.style,
                })
            })
            .collect()
    }

    /// 現在のフレームをレンダラへ渡す
    pub fn render(&self, sink: &mut impl FrameSink) {
        let clock = self.clock();
        let frame = Frame {
            number: clock.frame,
            elapsed: clock.elapsed,
            shapes: self.snapshot(),
        };
        sink.present(&frame);
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("shapes", &self.draw_order)
            .field("animations", &self.animations())
            .field("clock", &self.clock())
            .finish()
    }
}

/// `Shape::add_to` が返す可変シェイプハンドル
pub struct ShapeMut<'a> {
    stage: &'a mut Stage,
    id: ShapeId,
}

impl<'a> ShapeMut<'a> {
    pub(crate) fn new(stage: &'a mut Stage, id: ShapeId) -> Self {
        Self { stage, id }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// 名前付きプロパティを設定してチェーンを続ける
    pub fn attr(self, name: &str, value: impl Into<AttrValue>) -> Result<Self> {
        self.stage.set_attr(self.id, name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Result<PropertyValue> {
        self.stage.attr(self.id, name)
    }

    /// 再登録（登録済みなら何もしない）
    pub fn attach(&mut self) -> Result<bool> {
        self.stage.attach(self.id)
    }

    pub fn detach(&mut self) -> bool {
        self.stage.detach(self.id)
    }
}
