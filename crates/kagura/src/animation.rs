//! アニメーション（トゥイーン）コンポーネント
//!
//! 全サブジェクトの全ターゲットプロパティを、再生開始時に取得した値から
//! `duration` かけて目標値へ動かす。進行はステージの tick ごとに
//! `advance_animations` が1回進める。

use std::fmt;
use std::time::Duration;

use bevy_ecs::prelude::*;
use tracing::trace;

use crate::builder::AnimationBuilder;
use crate::duration::positive;
use crate::easing::Easing;
use crate::error::{KaguraError, Result};
use crate::playback::PlaybackState;
use crate::property::Property;
use crate::shape::{ShapeId, ShapeKind};
use crate::value::{AttrValue, PropertyValue};

/// `Stage` に登録されたアニメーションのハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub(crate) Entity);

impl AnimationId {
    pub fn entity(self) -> Entity {
        self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "animation#{}", self.0.to_bits())
    }
}

/// アニメーションが駆動する (サブジェクト, プロパティ) の組
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Track {
    pub subject: ShapeId,
    pub property: Property,
    /// 再生の最初のフレームで取得
    pub from: Option<PropertyValue>,
    pub to: PropertyValue,
}

/// ターゲット名と値を解決する。同じプロパティが二度現れた場合は後勝ち。
pub(crate) fn resolve_targets<K: AsRef<str>>(
    targets: impl IntoIterator<Item = (K, AttrValue)>,
) -> Result<Vec<(Property, PropertyValue)>> {
    let mut resolved: Vec<(Property, PropertyValue)> = Vec::new();
    for (name, value) in targets {
        let property: Property = name.as_ref().parse()?;
        let value = property.resolve(&value)?;
        match resolved.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => resolved.push((property, value)),
        }
    }
    if resolved.is_empty() {
        return Err(KaguraError::EmptyTargets);
    }
    Ok(resolved)
}

pub(crate) fn check_targets_kind(
    targets: &[(Property, PropertyValue)],
    kind: ShapeKind,
) -> Result<()> {
    match targets.iter().find(|(p, _)| !p.applies_to(kind)) {
        Some((property, _)) => Err(KaguraError::invalid_property(property.name(), kind.name())),
        None => Ok(()),
    }
}

#[derive(Component, Debug, Clone)]
pub struct Animation {
    duration: Duration,
    easing: Easing,
    targets: Vec<(Property, PropertyValue)>,
    subjects: Vec<ShapeId>,
    tracks: Vec<Track>,
    state: PlaybackState,
    elapsed: Duration,
}

impl Animation {
    /// 継続時間とターゲットプロパティからアニメーションを生成
    ///
    /// 0 の継続時間、空のターゲット、未知のプロパティ名、プロパティに
    /// 合わない値はここで即エラー。同じプロパティが二度現れた場合は後勝ち。
    pub fn new<K, I>(duration: Duration, targets: I) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, AttrValue)>,
    {
        let duration = positive(duration)?;
        let targets = resolve_targets(targets)?;
        Ok(Self {
            duration,
            easing: Easing::Linear,
            targets,
            subjects: Vec::new(),
            tracks: Vec::new(),
            state: PlaybackState::Idle,
            elapsed: Duration::ZERO,
        })
    }

    pub fn builder() -> AnimationBuilder {
        AnimationBuilder::new()
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn targets(&self) -> &[(Property, PropertyValue)] {
        &self.targets
    }

    pub fn target(&self, property: Property) -> Option<PropertyValue> {
        self.targets
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    pub fn subjects(&self) -> &[ShapeId] {
        &self.subjects
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// 線形進行度 `[0, 1]`
    pub fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// `kind` のシェイプが全ターゲットプロパティを持つか検査
    pub fn check_subject_kind(&self, kind: ShapeKind) -> Result<()> {
        check_targets_kind(&self.targets, kind)
    }

    /// サブジェクトを追加（既存のものは無視）。追加数を返す。
    ///
    /// 種別の検査はここでは行わない（`Stage::add_subjects` /
    /// `Stage::animate` が行う）。
    pub fn add_subjects(&mut self, subjects: impl IntoIterator<Item = ShapeId>) -> usize {
        let mut added = 0;
        for subject in subjects {
            if self.subjects.contains(&subject) {
                continue;
            }
            self.subjects.push(subject);
            for (property, to) in &self.targets {
                self.tracks.push(Track {
                    subject,
                    property: *property,
                    from: None,
                    to: *to,
                });
            }
            added += 1;
        }
        added
    }

    /// サブジェクト（とそのトラック）を外す。サブジェクトでなければ false。
    pub fn remove_subject(&mut self, subject: ShapeId) -> bool {
        let before = self.subjects.len();
        self.subjects.retain(|s| *s != subject);
        self.tracks.retain(|t| t.subject != subject);
        self.subjects.len() != before
    }

    /// 開始・再開・再再生。実行中なら false。
    ///
    /// - Idle / Finished: 現在のプロパティ値から再スタート
    /// - Paused: 停止した位置から再開
    pub fn play(&mut self) -> bool {
        match self.state {
            PlaybackState::Running => return false,
            PlaybackState::Paused => {}
            PlaybackState::Idle | PlaybackState::Finished => self.rewind(),
        }
        trace!(from = ?self.state, "[Animation] play");
        self.state = PlaybackState::Running;
        true
    }

    /// 実行中のアニメーションを一時停止
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        trace!(elapsed = ?self.elapsed, "[Animation] pause");
        self.state = PlaybackState::Paused;
        true
    }

    /// 進行を破棄して Idle に戻す。プロパティは現在値のまま。
    pub fn stop(&mut self) -> bool {
        if !matches!(self.state, PlaybackState::Running | PlaybackState::Paused) {
            return false;
        }
        trace!(elapsed = ?self.elapsed, "[Animation] stop");
        self.rewind();
        self.state = PlaybackState::Idle;
        true
    }

    fn rewind(&mut self) {
        self.elapsed = Duration::ZERO;
        for track in &mut self.tracks {
            track.from = None;
        }
    }

    /// `delta` だけ進め、このフレームのイージング後進行度を返す。
    /// 実行中でなければ `None`。終端に達すると Finished になり、
    /// ちょうど 1.0 を返す。
    pub(crate) fn advance(&mut self, delta: Duration) -> Option<f64> {
        if !self.state.is_running() {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
        if self.elapsed >= self.duration {
            self.state = PlaybackState::Finished;
            return Some(1.0);
        }
        Some(self.easing.apply(self.progress()))
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }
}
