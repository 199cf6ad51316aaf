use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KaguraError, Result};

/// 呼び出し側・シーン文書で書かれるアニメーション継続時間
///
/// - 数値: ミリ秒（`1000`）
/// - 文字列: 人間向け表記（`"1s"`, `"250ms"`, `"1m 30s"`）または
///   ミリ秒の数字（`"1000"`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationSpec {
    Millis(f64),
    Text(String),
}

impl DurationSpec {
    /// 正の `Duration` に解決
    pub fn resolve(&self) -> Result<Duration> {
        match self {
            DurationSpec::Millis(ms) => millis_to_duration(*ms),
            DurationSpec::Text(text) => parse_duration(text),
        }
    }
}

/// 文字列から正の継続時間をパース
pub fn parse_duration(text: &str) -> Result<Duration> {
    let trimmed = text.trim();
    if let Ok(ms) = trimmed.parse::<f64>() {
        return millis_to_duration(ms);
    }
    let duration = humantime::parse_duration(trimmed)
        .map_err(|e| KaguraError::invalid_duration(format!("'{}': {}", text, e)))?;
    positive(duration)
}

fn millis_to_duration(ms: f64) -> Result<Duration> {
    if !ms.is_finite() || ms <= 0.0 {
        return Err(KaguraError::invalid_duration(format!("{}ms", ms)));
    }
    positive(Duration::from_nanos((ms * 1_000_000.0).round() as u64))
}

pub(crate) fn positive(duration: Duration) -> Result<Duration> {
    if duration.is_zero() {
        return Err(KaguraError::invalid_duration("duration must be positive"));
    }
    Ok(duration)
}

impl From<Duration> for DurationSpec {
    fn from(d: Duration) -> Self {
        DurationSpec::Millis(d.as_nanos() as f64 / 1_000_000.0)
    }
}

impl From<f64> for DurationSpec {
    fn from(ms: f64) -> Self {
        DurationSpec::Millis(ms)
    }
}

impl From<u64> for DurationSpec {
    fn from(ms: u64) -> Self {
        DurationSpec::Millis(ms as f64)
    }
}

impl From<&str> for DurationSpec {
    fn from(s: &str) -> Self {
        DurationSpec::Text(s.to_string())
    }
}

impl From<String> for DurationSpec {
    fn from(s: String) -> Self {
        DurationSpec::Text(s)
    }
}
