//! 场景与过渡阶段定义。

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseSceneError;

/// 四个顶层视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    Home,
    Work,
    About,
    Contact,
}

impl Scene {
    /// 全部场景（导航顺序）
    pub const ALL: [Scene; 4] = [Scene::Home, Scene::Work, Scene::About, Scene::Contact];

    /// 小写名称
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Home => "home",
            Scene::Work => "work",
            Scene::About => "about",
            Scene::Contact => "contact",
        }
    }

    /// 锚点元素标识（`hero-<scene>`）
    pub fn anchor_id(&self) -> &'static str {
        match self {
            Scene::Home => "hero-home",
            Scene::Work => "hero-work",
            Scene::About => "hero-about",
            Scene::Contact => "hero-contact",
        }
    }
}

impl std::fmt::Display for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scene {
    type Err = ParseSceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Scene::ALL
            .into_iter()
            .find(|scene| scene.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseSceneError {
                input: s.to_string(),
            })
    }
}

/// 过渡阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    /// 空闲：遮罩隐藏，文字可见
    #[default]
    Idle,
    /// 旧场景文字退场
    ExitingText,
    /// 遮罩从源锚点扩展到全屏（快门路径：条带合拢）
    Expanding,
    /// 新场景已挂载，等待一帧布局稳定
    Switching,
    /// 遮罩收缩到目标锚点（About：淡出）
    Shrinking,
    /// 新场景文字进场
    EnteringText,
}

impl TransitionPhase {
    /// 该阶段是否允许文字显示
    pub fn allows_text(&self) -> bool {
        matches!(self, Self::Idle | Self::EnteringText)
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::Idle
    }
}

/// 过渡路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRoute {
    /// 遮罩形变：源锚点 → 全屏 → 目标锚点
    Standard,
    /// 快门条带：涉及 Contact 的过渡
    Shutter,
}

impl TransitionRoute {
    /// 根据起止场景选择路径
    pub fn between(from: Scene, to: Scene) -> Self {
        if from == Scene::Contact || to == Scene::Contact {
            Self::Shutter
        } else {
            Self::Standard
        }
    }
}
