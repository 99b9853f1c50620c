//! # Overlay 模块
//!
//! 全屏遮罩表面，由编排器独占。
//!
//! 两种形态：
//! - 单块遮罩：位置、尺寸与透明度可动画（标准路径）
//! - 快门条带：N 条等宽竖条，各自的纵向缩放可动画（Contact 路径）
//!
//! 遮罩和条带都以 `Rc` 注册到时间线，属性通过内部可变性写入。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use crate::animation::Animatable;
use crate::geometry::{Color, Rect, Viewport};

/// 遮罩内部数据
#[derive(Debug, Clone, PartialEq)]
struct OverlayData {
    displayed: bool,
    rect: Rect,
    opacity: f32,
    color: Color,
}

impl Default for OverlayData {
    fn default() -> Self {
        Self {
            displayed: false,
            rect: Rect::default(),
            opacity: 0.0,
            color: Color::TRANSPARENT,
        }
    }
}

/// 遮罩表面
///
/// ## 支持的属性
///
/// - `"x"` / `"y"`: 左上角位置
/// - `"width"` / `"height"`: 尺寸
/// - `"opacity"`: 透明度 (0.0 - 1.0)
#[derive(Debug, Default)]
pub struct OverlaySurface {
    data: RefCell<OverlayData>,
    slices: RefCell<Vec<Rc<ShutterSlice>>>,
}

impl OverlaySurface {
    pub const PROPERTIES: &'static [&'static str] = &["x", "y", "width", "height", "opacity"];

    pub fn new() -> Self {
        Self::default()
    }

    /// 显示为不透明的实心矩形
    pub fn show_at(&self, rect: Rect, color: Color) {
        let mut data = self.data.borrow_mut();
        data.displayed = true;
        data.rect = rect;
        data.opacity = 1.0;
        data.color = color;
    }

    /// 隐藏遮罩（同时移除条带）
    pub fn hide(&self) {
        *self.data.borrow_mut() = OverlayData::default();
        self.slices.borrow_mut().clear();
    }

    /// 把遮罩切成 `count` 条竖条，初始纵向缩放为 0、原点在底部
    ///
    /// 遮罩本身透明且铺满视口，只作为条带的容器。
    pub fn build_slices(
        &self,
        viewport: Viewport,
        count: usize,
        color: Color,
    ) -> Vec<Rc<ShutterSlice>> {
        {
            let mut data = self.data.borrow_mut();
            data.displayed = true;
            data.rect = viewport.bounds();
            data.opacity = 1.0;
            data.color = Color::TRANSPARENT;
        }

        let count = count.max(1);
        let slice_width = viewport.width / count as f32;
        let slices: Vec<Rc<ShutterSlice>> = (0..count)
            .map(|index| {
                // 每条多出 1px，避免相邻条带间露缝
                let rect = Rect::new(
                    index as f32 * slice_width,
                    0.0,
                    slice_width + 1.0,
                    viewport.height,
                );
                Rc::new(ShutterSlice::new(index, rect, color))
            })
            .collect();

        *self.slices.borrow_mut() = slices.clone();
        slices
    }

    /// 修改全部条带的缩放原点
    pub fn set_slice_origin(&self, origin: SliceOrigin) {
        for slice in self.slices.borrow().iter() {
            slice.set_origin(origin);
        }
    }

    pub fn slices(&self) -> Vec<Rc<ShutterSlice>> {
        self.slices.borrow().clone()
    }

    pub fn slice_count(&self) -> usize {
        self.slices.borrow().len()
    }

    pub fn is_displayed(&self) -> bool {
        self.data.borrow().displayed
    }

    /// 是否在屏幕上可见
    pub fn is_visible(&self) -> bool {
        let data = self.data.borrow();
        data.displayed && (data.opacity > 0.0 || !self.slices.borrow().is_empty())
    }

    pub fn rect(&self) -> Rect {
        self.data.borrow().rect
    }

    pub fn opacity(&self) -> f32 {
        self.data.borrow().opacity
    }

    pub fn color(&self) -> Color {
        self.data.borrow().color
    }

    /// 当前状态的只读视图
    pub fn frame(&self) -> OverlayFrame {
        let data = self.data.borrow();
        OverlayFrame {
            displayed: data.displayed,
            rect: data.rect,
            opacity: data.opacity,
            color: data.color,
            slices: self.slices.borrow().iter().map(|s| s.frame()).collect(),
        }
    }
}

impl Animatable for OverlaySurface {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        let data = self.data.borrow();
        match property_id {
            "x" => Some(data.rect.x),
            "y" => Some(data.rect.y),
            "width" => Some(data.rect.width),
            "height" => Some(data.rect.height),
            "opacity" => Some(data.opacity),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        let mut data = self.data.borrow_mut();
        match property_id {
            "x" => data.rect.x = value,
            "y" => data.rect.y = value,
            "width" => data.rect.width = value,
            "height" => data.rect.height = value,
            "opacity" => data.opacity = value.clamp(0.0, 1.0),
            _ => return false,
        }
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        Self::PROPERTIES
    }
}

/// 条带的纵向缩放原点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceOrigin {
    /// 自底向上生长（合拢）
    #[default]
    Bottom,
    /// 向顶部收起（打开）
    Top,
}

/// 快门条带
///
/// ## 支持的属性
///
/// - `"scale_y"`: 纵向缩放 (0.0 - 1.0)
#[derive(Debug)]
pub struct ShutterSlice {
    index: usize,
    rect: Rect,
    color: Color,
    scale_y: Cell<f32>,
    origin: Cell<SliceOrigin>,
}

impl ShutterSlice {
    pub const PROPERTIES: &'static [&'static str] = &["scale_y"];

    fn new(index: usize, rect: Rect, color: Color) -> Self {
        Self {
            index,
            rect,
            color,
            scale_y: Cell::new(0.0),
            origin: Cell::new(SliceOrigin::Bottom),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y.get()
    }

    pub fn origin(&self) -> SliceOrigin {
        self.origin.get()
    }

    pub fn set_origin(&self, origin: SliceOrigin) {
        self.origin.set(origin);
    }

    pub fn frame(&self) -> SliceFrame {
        SliceFrame {
            rect: self.rect,
            color: self.color,
            scale_y: self.scale_y.get(),
            origin: self.origin.get(),
        }
    }
}

impl Animatable for ShutterSlice {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            "scale_y" => Some(self.scale_y.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            "scale_y" => {
                self.scale_y.set(value.max(0.0));
                true
            }
            _ => false,
        }
    }

    fn property_list(&self) -> &'static [&'static str] {
        Self::PROPERTIES
    }
}

/// 遮罩的只读视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub displayed: bool,
    pub rect: Rect,
    pub opacity: f32,
    pub color: Color,
    pub slices: Vec<SliceFrame>,
}

impl OverlayFrame {
    /// 是否在屏幕上可见
    pub fn is_visible(&self) -> bool {
        self.displayed && (self.opacity > 0.0 || !self.slices.is_empty())
    }
}

/// 条带的只读视图
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliceFrame {
    /// 未缩放时的矩形
    pub rect: Rect,
    pub color: Color,
    pub scale_y: f32,
    pub origin: SliceOrigin,
}

impl SliceFrame {
    /// 应用缩放后实际覆盖的矩形
    pub fn visible_rect(&self) -> Rect {
        let height = self.rect.height * self.scale_y;
        let y = match self.origin {
            SliceOrigin::Bottom => self.rect.bottom() - height,
            SliceOrigin::Top => self.rect.y,
        };
        Rect::new(self.rect.x, y, self.rect.width, height)
    }
}
