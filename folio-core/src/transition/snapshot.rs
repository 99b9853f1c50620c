//! 每帧传给视图的只读状态快照。

use serde::Serialize;

use super::phase::{Scene, TransitionPhase};

/// 编排器状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionSnapshot {
    /// 当前场景
    pub scene: Scene,
    /// 当前阶段
    pub phase: TransitionPhase,
    /// 待切换目标（非 Idle 时必有值）
    pub pending: Option<Scene>,
    /// 文字是否可见
    pub text_visible: bool,
    /// 遮罩是否显示
    pub overlay_visible: bool,
}

impl TransitionSnapshot {
    pub fn is_idle(&self) -> bool {
        self.phase.is_idle()
    }
}

/// 一次阶段变更记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseChange {
    pub from: TransitionPhase,
    pub to: TransitionPhase,
    /// 变更发生时的场景
    pub scene: Scene,
    /// 编排器时钟（秒）
    pub at: f32,
}
