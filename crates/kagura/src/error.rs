//! kagura のエラー型

use thiserror::Error;

use crate::animation::AnimationId;
use crate::shape::ShapeId;

/// kagura 操作の Result 型エイリアス
pub type Result<T> = std::result::Result<T, KaguraError>;

/// ステージ・シェイプ・アニメーション操作の構造化エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KaguraError {
    /// プロパティ名は存在するが、このシェイプ種別には無い
    #[error("Invalid property '{name}' for {shape}")]
    InvalidProperty { name: String, shape: &'static str },

    /// どのシェイプ種別にも無いプロパティ名
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    /// 数値プロパティに色を渡した（またはその逆）
    #[error("Type mismatch for '{property}': expected {expected}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
    },

    /// 解釈できない色文字列
    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Value out of range for '{property}': {value}, valid range [{min}, {max}]")]
    ValueOutOfRange {
        property: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// 0・負・解釈不能な継続時間
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// ターゲットプロパティが空のアニメーション
    ///
    /// 不正引数の一種で、`InvalidDuration` / `InvalidProperty` と同じく
    /// 構築時に返る。これらをまとめて扱う場合は
    /// [`KaguraError::is_invalid_argument`] を使う。
    #[error("Animation requires at least one target property")]
    EmptyTargets,

    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),

    #[error("Animation not found: {0}")]
    AnimationNotFound(AnimationId),

    /// シーン文書が未定義のシェイプ名を参照している
    #[error("Undefined subject '{name}' in animation '{animation}'")]
    UndefinedSubject { animation: String, name: String },

    /// シーン文書で同じ名前が二重定義されている
    #[error("Duplicate name '{0}'")]
    DuplicateName(String),
}

impl KaguraError {
    /// InvalidProperty エラーを生成
    pub fn invalid_property(name: impl Into<String>, shape: &'static str) -> Self {
        KaguraError::InvalidProperty {
            name: name.into(),
            shape,
        }
    }

    /// TypeMismatch エラーを生成
    pub fn type_mismatch(property: impl Into<String>, expected: &'static str) -> Self {
        KaguraError::TypeMismatch {
            property: property.into(),
            expected,
        }
    }

    /// InvalidDuration エラーを生成
    pub fn invalid_duration(detail: impl Into<String>) -> Self {
        KaguraError::InvalidDuration(detail.into())
    }

    /// 構築時の不正引数（継続時間・プロパティ名・値・空のターゲット）か
    ///
    /// 参照切れ（`ShapeNotFound` など）や文書の名前エラーは含まない。
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            KaguraError::InvalidProperty { .. }
                | KaguraError::UnknownProperty(_)
                | KaguraError::TypeMismatch { .. }
                | KaguraError::InvalidColor(_)
                | KaguraError::ValueOutOfRange { .. }
                | KaguraError::InvalidDuration(_)
                | KaguraError::EmptyTargets
        )
    }
}
