//! # Config 模块
//!
//! 舞台配置管理，集中管理视口、转场时长、快门条带、文字动画参数和锚点布局。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (stage.json)
//! 3. 默认值（最低）
//!
//! 默认值与文字动画的退场时长相互约定：`timings.text_exit` 应等于
//! 文字退场所需时间，否则遮罩会在字符收回前出现。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::animation::EasingFunction;
use crate::error::ConfigError;
use crate::geometry::{Color, Rect, Viewport};
use crate::transition::Scene;

/// 舞台配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// 视口尺寸
    #[serde(default)]
    pub viewport: Viewport,

    /// 转场各阶段时长
    #[serde(default)]
    pub timings: TransitionTimings,

    /// Contact 快门条带
    #[serde(default)]
    pub shutter: ShutterConfig,

    /// 文字动画参数
    #[serde(default)]
    pub reveal: RevealTimings,

    /// 遮罩颜色（品牌红）
    #[serde(default = "default_overlay_color")]
    pub overlay_color: Color,

    /// 加载动画时长（秒），结束前文字保持隐藏
    #[serde(default = "default_loader_duration")]
    pub loader_duration: f32,

    /// 各场景锚点的布局矩形
    #[serde(default)]
    pub anchors: AnchorLayout,
}

/// 转场时长（秒）与缓动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTimings {
    /// 文字退场等待
    #[serde(default = "default_text_exit")]
    pub text_exit: f32,

    /// 遮罩扩展到全屏
    #[serde(default = "default_expand")]
    pub expand: f32,

    /// 遮罩收缩到目标锚点
    #[serde(default = "default_shrink")]
    pub shrink: f32,

    /// About 的遮罩淡出
    #[serde(default = "default_about_fade")]
    pub about_fade: f32,

    /// 找不到目标锚点时的遮罩淡出
    #[serde(default = "default_fallback_fade")]
    pub fallback_fade: f32,

    /// 收缩开始后多久进入 EnteringText
    #[serde(default = "default_enter_text_delay")]
    pub enter_text_delay: f32,

    /// 收缩结束后等待文字进场完成
    #[serde(default = "default_settle_after_shrink")]
    pub settle_after_shrink: f32,

    /// 找不到源锚点时直接切换后的等待
    #[serde(default = "default_no_anchor_fallback")]
    pub no_anchor_fallback: f32,

    #[serde(default = "default_expand_easing")]
    pub expand_easing: EasingFunction,

    #[serde(default = "default_shrink_easing")]
    pub shrink_easing: EasingFunction,

    #[serde(default = "default_about_fade_easing")]
    pub about_fade_easing: EasingFunction,

    #[serde(default = "default_fallback_fade_easing")]
    pub fallback_fade_easing: EasingFunction,
}

/// 快门条带配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutterConfig {
    /// 竖向条带数量
    #[serde(default = "default_slice_count")]
    pub slice_count: usize,

    /// 合拢 / 打开各自的时长（秒）
    #[serde(default = "default_shutter_duration")]
    pub duration: f32,

    /// 每一步交错（秒）
    #[serde(default = "default_shutter_stagger")]
    pub stagger: f32,

    #[serde(default = "default_shutter_easing")]
    pub easing: EasingFunction,
}

/// 文字动画参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealTimings {
    /// 主层与残影 1 的进场时长（秒）
    #[serde(default = "default_trail_duration")]
    pub trail_duration: f32,

    /// 残影 2 的进场时长（秒）
    #[serde(default = "default_ghost_trail_duration")]
    pub ghost_trail_duration: f32,

    /// 残影 1 / 残影 2 相对主层的额外延迟（秒）
    #[serde(default = "default_ghost_offsets")]
    pub ghost_offsets: [f32; 2],

    /// 逐字交错（秒）
    #[serde(default = "default_char_stagger")]
    pub char_stagger: f32,

    /// 静止态的下移量（字符高度百分比）
    #[serde(default = "default_rest_offset")]
    pub rest_offset: f32,

    /// 静止态的倾斜角度（度）
    #[serde(default = "default_rest_skew")]
    pub rest_skew: f32,

    /// zoom 进场时长（秒）
    #[serde(default = "default_zoom_enter")]
    pub zoom_enter: f32,

    /// zoom 退场时长（秒）
    #[serde(default = "default_zoom_exit")]
    pub zoom_exit: f32,

    /// zoom 交错（秒）
    #[serde(default = "default_zoom_stagger")]
    pub zoom_stagger: f32,

    /// zoom 隐藏态的缩放倍数
    #[serde(default = "default_zoom_scale")]
    pub zoom_scale: f32,

    /// zoom 退场的倾斜角度（度）
    #[serde(default = "default_zoom_exit_skew")]
    pub zoom_exit_skew: f32,

    #[serde(default = "default_reveal_easing")]
    pub easing: EasingFunction,
}

/// 各场景锚点的布局矩形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorLayout {
    #[serde(default = "default_home_anchor")]
    pub home: Rect,
    #[serde(default = "default_work_anchor")]
    pub work: Rect,
    #[serde(default = "default_about_anchor")]
    pub about: Rect,
    #[serde(default = "default_contact_anchor")]
    pub contact: Rect,
}

impl AnchorLayout {
    /// 获取场景锚点矩形
    pub fn rect(&self, scene: Scene) -> Rect {
        match scene {
            Scene::Home => self.home,
            Scene::Work => self.work,
            Scene::About => self.about,
            Scene::Contact => self.contact,
        }
    }
}

// 默认值函数
fn default_overlay_color() -> Color {
    Color::BRAND_RED
}

fn default_loader_duration() -> f32 {
    2.0
}

fn default_text_exit() -> f32 {
    0.6
}

fn default_expand() -> f32 {
    0.6
}

fn default_shrink() -> f32 {
    0.8
}

fn default_about_fade() -> f32 {
    0.6
}

fn default_fallback_fade() -> f32 {
    0.5
}

fn default_enter_text_delay() -> f32 {
    0.1
}

fn default_settle_after_shrink() -> f32 {
    0.8
}

fn default_no_anchor_fallback() -> f32 {
    1.0
}

fn default_expand_easing() -> EasingFunction {
    EasingFunction::EaseInOutQuart
}

fn default_shrink_easing() -> EasingFunction {
    EasingFunction::EaseOutQuint
}

fn default_about_fade_easing() -> EasingFunction {
    EasingFunction::EaseOutCubic
}

fn default_fallback_fade_easing() -> EasingFunction {
    EasingFunction::EaseOutQuad
}

fn default_slice_count() -> usize {
    7
}

fn default_shutter_duration() -> f32 {
    0.35
}

fn default_shutter_stagger() -> f32 {
    0.003
}

fn default_shutter_easing() -> EasingFunction {
    EasingFunction::EaseInOutQuart
}

fn default_trail_duration() -> f32 {
    0.8
}

fn default_ghost_trail_duration() -> f32 {
    0.9
}

fn default_ghost_offsets() -> [f32; 2] {
    [0.04, 0.08]
}

fn default_char_stagger() -> f32 {
    0.03
}

fn default_rest_offset() -> f32 {
    120.0
}

fn default_rest_skew() -> f32 {
    -20.0
}

fn default_zoom_enter() -> f32 {
    0.9
}

fn default_zoom_exit() -> f32 {
    0.6
}

fn default_zoom_stagger() -> f32 {
    0.02
}

fn default_zoom_scale() -> f32 {
    8.0
}

fn default_zoom_exit_skew() -> f32 {
    8.0
}

fn default_reveal_easing() -> EasingFunction {
    EasingFunction::EaseOutQuint
}

// 以 1920x1080 视口、左侧 64px 导航栏为基准
fn default_home_anchor() -> Rect {
    Rect::new(64.0, 0.0, 1856.0, 810.0)
}

fn default_work_anchor() -> Rect {
    Rect::new(992.0, 0.0, 928.0, 1080.0)
}

fn default_about_anchor() -> Rect {
    Rect::new(64.0, 0.0, 1856.0, 810.0)
}

fn default_contact_anchor() -> Rect {
    Rect::new(398.0, 0.0, 1188.0, 810.0)
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timings: TransitionTimings::default(),
            shutter: ShutterConfig::default(),
            reveal: RevealTimings::default(),
            overlay_color: default_overlay_color(),
            loader_duration: default_loader_duration(),
            anchors: AnchorLayout::default(),
        }
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            text_exit: default_text_exit(),
            expand: default_expand(),
            shrink: default_shrink(),
            about_fade: default_about_fade(),
            fallback_fade: default_fallback_fade(),
            enter_text_delay: default_enter_text_delay(),
            settle_after_shrink: default_settle_after_shrink(),
            no_anchor_fallback: default_no_anchor_fallback(),
            expand_easing: default_expand_easing(),
            shrink_easing: default_shrink_easing(),
            about_fade_easing: default_about_fade_easing(),
            fallback_fade_easing: default_fallback_fade_easing(),
        }
    }
}

impl Default for ShutterConfig {
    fn default() -> Self {
        Self {
            slice_count: default_slice_count(),
            duration: default_shutter_duration(),
            stagger: default_shutter_stagger(),
            easing: default_shutter_easing(),
        }
    }
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            trail_duration: default_trail_duration(),
            ghost_trail_duration: default_ghost_trail_duration(),
            ghost_offsets: default_ghost_offsets(),
            char_stagger: default_char_stagger(),
            rest_offset: default_rest_offset(),
            rest_skew: default_rest_skew(),
            zoom_enter: default_zoom_enter(),
            zoom_exit: default_zoom_exit(),
            zoom_stagger: default_zoom_stagger(),
            zoom_scale: default_zoom_scale(),
            zoom_exit_skew: default_zoom_exit_skew(),
            easing: default_reveal_easing(),
        }
    }
}

impl Default for AnchorLayout {
    fn default() -> Self {
        Self {
            home: default_home_anchor(),
            work: default_work_anchor(),
            about: default_about_anchor(),
            contact: default_contact_anchor(),
        }
    }
}

impl StageConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = ?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 严格加载：文件缺失或格式错误时返回错误
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "视口尺寸必须为正数: {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }

        if self.shutter.slice_count == 0 {
            return Err(ConfigError::Validation(
                "快门条带数量至少为 1".to_string(),
            ));
        }

        let t = &self.timings;
        let r = &self.reveal;
        let durations = [
            ("timings.text_exit", t.text_exit),
            ("timings.expand", t.expand),
            ("timings.shrink", t.shrink),
            ("timings.about_fade", t.about_fade),
            ("timings.fallback_fade", t.fallback_fade),
            ("timings.enter_text_delay", t.enter_text_delay),
            ("timings.settle_after_shrink", t.settle_after_shrink),
            ("timings.no_anchor_fallback", t.no_anchor_fallback),
            ("shutter.duration", self.shutter.duration),
            ("shutter.stagger", self.shutter.stagger),
            ("reveal.trail_duration", r.trail_duration),
            ("reveal.ghost_trail_duration", r.ghost_trail_duration),
            ("reveal.char_stagger", r.char_stagger),
            ("reveal.zoom_enter", r.zoom_enter),
            ("reveal.zoom_exit", r.zoom_exit),
            ("reveal.zoom_stagger", r.zoom_stagger),
            ("loader_duration", self.loader_duration),
        ];
        if let Some((name, value)) = durations
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(ConfigError::Validation(format!(
                "{} 必须是非负数，当前为 {}",
                name, value
            )));
        }

        if r.ghost_offsets.iter().any(|offset| *offset < 0.0) {
            return Err(ConfigError::Validation(
                "reveal.ghost_offsets 必须是非负数".to_string(),
            ));
        }

        if r.zoom_scale <= 0.0 {
            return Err(ConfigError::Validation(
                "reveal.zoom_scale 必须为正数".to_string(),
            ));
        }

        Ok(())
    }
}
