//! フレームクロック リソースとアニメーションシステム
//!
//! - FrameClock: 現在の tick の差分時間 / 累計時間 / フレーム番号
//! - Timeline: アニメーションの登録順
//! - advance_animations: 実行中の全アニメーションを補間（Animate スケジュール）

use std::time::Duration;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ScheduleLabel;
use tracing::{debug, trace, warn};

use crate::animation::{Animation, AnimationId};
use crate::shape::{read_property, write_property, Geometry, Placement, Style};

/// `Stage::tick` ごとに1回実行されるスケジュール
#[derive(ScheduleLabel, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Animate;

/// 処理中フレームの時刻
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// 前回 tick からの経過
    pub delta: Duration,
    /// ステージ生成からの累計
    pub elapsed: Duration,
    /// これまでの tick 数
    pub frame: u64,
}

impl FrameClock {
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed = self.elapsed.saturating_add(delta);
        self.frame += 1;
    }
}

/// 登録順のアニメーション。同一フレームで同じプロパティに書き込んだ場合は
/// 後に登録されたものが勝つ。
#[derive(Resource, Debug, Clone, Default)]
pub struct Timeline {
    order: Vec<AnimationId>,
}

impl Timeline {
    pub fn push(&mut self, id: AnimationId) {
        self.order.push(id);
    }

    pub fn remove(&mut self, id: AnimationId) -> bool {
        let before = self.order.len();
        self.order.retain(|a| *a != id);
        self.order.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = AnimationId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// 実行中の全アニメーションをフレーム差分だけ進め、補間値をサブジェクトへ
/// 書き込む。
///
/// 開始値はトラックを最初に駆動したフレームで取得する。
pub fn advance_animations(
    clock: Res<FrameClock>,
    timeline: Res<Timeline>,
    mut animations: Query<&mut Animation>,
    mut shapes: Query<(&mut Placement, &mut Geometry, &mut Style)>,
) {
    for id in timeline.iter() {
        let Ok(mut animation) = animations.get_mut(id.entity()) else {
            continue;
        };
        let Some(progress) = animation.advance(clock.delta) else {
            continue;
        };
        trace!(
            animation = %id,
            frame = clock.frame,
            progress,
            "[advance_animations] Interpolating"
        );

        for track in animation.tracks_mut() {
            let Ok((mut placement, mut geometry, mut style)) =
                shapes.get_mut(track.subject.entity())
            else {
                warn!(
                    animation = %id,
                    subject = %track.subject,
                    "[advance_animations] Subject missing, skipping"
                );
                continue;
            };
            if track.from.is_none() {
                track.from = read_property(&placement, &geometry, &style, track.property);
            }
            let Some(from) = track.from else {
                continue;
            };
            let value = from.interpolate(&track.to, progress);
            write_property(
                &mut placement,
                &mut geometry,
                &mut style,
                track.property,
                value,
            );
        }

        if !animation.state().is_running() {
            debug!(animation = %id, frame = clock.frame, "[advance_animations] Finished");
        }
    }
}
