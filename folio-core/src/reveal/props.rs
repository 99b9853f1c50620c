//! 文字动画的输入参数。

use serde::{Deserialize, Serialize};

/// 动画变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealVariant {
    /// 惯性滑入 + 残影，退场为进场的倒放
    #[default]
    LinearTrail,
    /// 全屏缩放，每次显隐变化都新建一次性时间线
    Zoom,
}

/// 字符的运动方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// 逐字交错
    #[default]
    Stagger,
    /// 整体同步
    Sync,
}

/// 构建输入：任何一项变化都会重建时间线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealProps {
    pub content: String,
    #[serde(default)]
    pub variant: RevealVariant,
    #[serde(default)]
    pub mode: RevealMode,
    /// 整体延迟（秒）
    #[serde(default)]
    pub delay: f32,
}

impl RevealProps {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            variant: RevealVariant::default(),
            mode: RevealMode::default(),
            delay: 0.0,
        }
    }

    pub fn variant(mut self, variant: RevealVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn mode(mut self, mode: RevealMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// 拆分为渲染字符，空格替换为不换行空格
    pub fn characters(&self) -> Vec<char> {
        self.content
            .chars()
            .map(|c| if c == ' ' { '\u{00A0}' } else { c })
            .collect()
    }
}
