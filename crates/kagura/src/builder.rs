use crate::animation::Animation;
use crate::duration::DurationSpec;
use crate::easing::Easing;
use crate::error::{KaguraError, Result};
use crate::shape::ShapeId;
use crate::value::AttrValue;

/// アニメーションビルダー
///
/// ```ignore
/// let anim = Animation::builder()
///     .duration("1s")
///     .to("x", 100.0)
///     .to("fillColor", "green")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnimationBuilder {
    duration: Option<DurationSpec>,
    targets: Vec<(String, AttrValue)>,
    easing: Easing,
    subjects: Vec<ShapeId>,
}

impl AnimationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 継続時間（`Duration`、ミリ秒、`"1s"` などの文字列）
    pub fn duration(mut self, duration: impl Into<DurationSpec>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// ターゲットプロパティを追加
    pub fn to(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.targets.push((name.into(), value.into()));
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn subject(mut self, subject: ShapeId) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn subjects(mut self, subjects: impl IntoIterator<Item = ShapeId>) -> Self {
        self.subjects.extend(subjects);
        self
    }

    /// アニメーションを構築。検証エラーはすべてここで返る。
    pub fn build(self) -> Result<Animation> {
        let duration = self
            .duration
            .ok_or_else(|| KaguraError::invalid_duration("missing duration"))?
            .resolve()?;
        let mut animation = Animation::new(duration, self.targets)?.with_easing(self.easing);
        animation.add_subjects(self.subjects);
        Ok(animation)
    }
}
