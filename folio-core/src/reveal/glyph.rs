//! # Glyph 模块
//!
//! 单个字符在某一层上的可动画状态。
//!
//! ## 设计说明
//!
//! `AnimatableGlyph` 使用 `RefCell<GlyphStyle>` 实现内部可变性，
//! 同一字符的多个属性可以被同一条时间线同时驱动。

use std::cell::RefCell;

use serde::Serialize;

use crate::animation::Animatable;
use crate::geometry::Color;

/// 三层叠放的文字层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// 主文字（最上层）
    Main,
    /// 残影 1（品牌红）
    Ghost1,
    /// 残影 2（纯红，拖尾最长）
    Ghost2,
}

impl LayerKind {
    /// 从上到下的渲染顺序
    pub const ALL: [LayerKind; 3] = [LayerKind::Main, LayerKind::Ghost1, LayerKind::Ghost2];

    /// 完全显示时的透明度
    pub fn opacity_tier(&self) -> f32 {
        match self {
            LayerKind::Main => 1.0,
            LayerKind::Ghost1 => 0.6,
            LayerKind::Ghost2 => 0.3,
        }
    }

    /// 层颜色（`None` 继承视图颜色）
    pub fn color(&self) -> Option<Color> {
        match self {
            LayerKind::Main => None,
            LayerKind::Ghost1 => Some(Color::BRAND_RED),
            LayerKind::Ghost2 => Some(Color::PURE_RED),
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            LayerKind::Main => 0,
            LayerKind::Ghost1 => 1,
            LayerKind::Ghost2 => 2,
        }
    }
}

/// 字符的变换与透明度
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlyphStyle {
    /// 纵向偏移（字符高度的百分比，向下为正）
    pub y_percent: f32,
    /// 水平倾斜（度）
    pub skew_x: f32,
    /// 缩放
    pub scale: f32,
    /// 透明度 (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            y_percent: 0.0,
            skew_x: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl GlyphStyle {
    /// 某一层完全显示时的样式
    pub fn shown(layer: LayerKind) -> Self {
        Self {
            opacity: layer.opacity_tier(),
            ..Default::default()
        }
    }

    /// 线性拖尾的静止态：下移、倾斜、透明
    pub fn trail_rest(offset_percent: f32, skew_x: f32) -> Self {
        Self {
            y_percent: offset_percent,
            skew_x,
            scale: 1.0,
            opacity: 0.0,
        }
    }

    /// zoom 的隐藏态：放大、透明
    pub fn zoom_hidden(scale: f32) -> Self {
        Self {
            y_percent: 0.0,
            skew_x: 0.0,
            scale,
            opacity: 0.0,
        }
    }
}

/// 可动画字符
///
/// ## 支持的属性
///
/// - `"y"`: 纵向偏移（百分比）
/// - `"skew_x"`: 水平倾斜（度）
/// - `"scale"`: 缩放
/// - `"opacity"`: 透明度 (0.0 - 1.0)
#[derive(Debug)]
pub struct AnimatableGlyph {
    layer: LayerKind,
    index: usize,
    character: char,
    style: RefCell<GlyphStyle>,
}

impl AnimatableGlyph {
    pub const PROPERTIES: &'static [&'static str] = &["y", "skew_x", "scale", "opacity"];

    pub fn new(layer: LayerKind, index: usize, character: char, style: GlyphStyle) -> Self {
        Self {
            layer,
            index,
            character,
            style: RefCell::new(style),
        }
    }

    pub fn layer(&self) -> LayerKind {
        self.layer
    }

    /// 字符在文本中的位置
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn style(&self) -> GlyphStyle {
        *self.style.borrow()
    }

    pub fn set_style(&self, style: GlyphStyle) {
        *self.style.borrow_mut() = style;
    }

    pub fn opacity(&self) -> f32 {
        self.style.borrow().opacity
    }
}

impl Animatable for AnimatableGlyph {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        let style = self.style.borrow();
        match property_id {
            "y" => Some(style.y_percent),
            "skew_x" => Some(style.skew_x),
            "scale" => Some(style.scale),
            "opacity" => Some(style.opacity),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        let mut style = self.style.borrow_mut();
        match property_id {
            "y" => style.y_percent = value,
            "skew_x" => style.skew_x = value,
            "scale" => style.scale = value,
            "opacity" => style.opacity = value.clamp(0.0, 1.0),
            _ => return false,
        }
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        Self::PROPERTIES
    }
}
