use serde::{Deserialize, Serialize};

/// 再生状態
///
/// ```text
/// Idle -> Running -> Finished
///            |  ^        |
///            v  |        v
///          Paused     Running (replay)
///            |
///            v
///          Idle (stop)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// 未開始、または停止済み
    #[default]
    Idle,
    Running,
    /// 現在の進行度で一時停止中
    Paused,
    /// 終端到達。サブジェクトは目標値を保持
    Finished,
}

impl PlaybackState {
    pub fn is_running(self) -> bool {
        self == PlaybackState::Running
    }
}
