//! # Easing 模块
//!
//! 缓动函数库，用于动画的时间插值。
//!
//! 转场编排使用 GSAP 风格的 power 曲线，对应关系：
//! `power1 = Quad`、`power2 = Cubic`、`power3 = Quart`、`power4 = Quint`。
//! 配置文件中既可以写 snake_case 名称（`ease_in_out_quart`），也可以写 GSAP 名称（`power3.inOut`）。

use serde::{Deserialize, Serialize};

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum EasingFunction {
    /// 线性（匀速）
    Linear,
    /// 二次缓出（power1.out）
    EaseOutQuad,
    /// 二次缓入缓出（power1.inOut）
    #[default]
    EaseInOutQuad,
    /// 三次缓出（power2.out）
    EaseOutCubic,
    /// 三次缓入缓出（power2.inOut）
    EaseInOutCubic,
    /// 四次缓出（power3.out）
    EaseOutQuart,
    /// 四次缓入缓出（power3.inOut）
    EaseInOutQuart,
    /// 五次缓出（power4.out）
    EaseOutQuint,
    /// 五次缓入缓出（power4.inOut）
    EaseInOutQuint,
}

impl EasingFunction {
    pub const ALL: [EasingFunction; 9] = [
        EasingFunction::Linear,
        EasingFunction::EaseOutQuad,
        EasingFunction::EaseInOutQuad,
        EasingFunction::EaseOutCubic,
        EasingFunction::EaseInOutCubic,
        EasingFunction::EaseOutQuart,
        EasingFunction::EaseInOutQuart,
        EasingFunction::EaseOutQuint,
        EasingFunction::EaseInOutQuint,
    ];

    /// 序列化名称（snake_case）
    pub fn name(&self) -> &'static str {
        match self {
            EasingFunction::Linear => "linear",
            EasingFunction::EaseOutQuad => "ease_out_quad",
            EasingFunction::EaseInOutQuad => "ease_in_out_quad",
            EasingFunction::EaseOutCubic => "ease_out_cubic",
            EasingFunction::EaseInOutCubic => "ease_in_out_cubic",
            EasingFunction::EaseOutQuart => "ease_out_quart",
            EasingFunction::EaseInOutQuart => "ease_in_out_quart",
            EasingFunction::EaseOutQuint => "ease_out_quint",
            EasingFunction::EaseInOutQuint => "ease_in_out_quint",
        }
    }

    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)
    ///
    /// # 返回
    /// - 缓动后的进度值 (0.0 - 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOutQuad => ease_out_pow(t, 2),
            EasingFunction::EaseInOutQuad => ease_in_out_pow(t, 2),
            EasingFunction::EaseOutCubic => ease_out_pow(t, 3),
            EasingFunction::EaseInOutCubic => ease_in_out_pow(t, 3),
            EasingFunction::EaseOutQuart => ease_out_pow(t, 4),
            EasingFunction::EaseInOutQuart => ease_in_out_pow(t, 4),
            EasingFunction::EaseOutQuint => ease_out_pow(t, 5),
            EasingFunction::EaseInOutQuint => ease_in_out_pow(t, 5),
        }
    }

    /// 按 GSAP 名称解析（如 `"power3.inOut"`）
    ///
    /// 未知名称返回 `None`。`"none"` 视为线性。
    pub fn from_gsap(name: &str) -> Option<Self> {
        let easing = match name {
            "none" | "linear" => Self::Linear,
            "power1.out" => Self::EaseOutQuad,
            "power1.inOut" => Self::EaseInOutQuad,
            "power2.out" => Self::EaseOutCubic,
            "power2.inOut" => Self::EaseInOutCubic,
            "power3.out" => Self::EaseOutQuart,
            "power3.inOut" => Self::EaseInOutQuart,
            "power4.out" => Self::EaseOutQuint,
            "power4.inOut" => Self::EaseInOutQuint,
            _ => return None,
        };
        Some(easing)
    }
}

impl TryFrom<String> for EasingFunction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|easing| easing.name() == value)
            .or_else(|| Self::from_gsap(&value))
            .ok_or_else(|| format!("未知的缓动函数: {}", value))
    }
}

/// 缓出：`1 - (1 - t)^n`
fn ease_out_pow(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

/// 缓入缓出：前半段 `2^(n-1) t^n`，后半段镜像
fn ease_in_out_pow(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        2.0_f32.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}
