//! # Animation 模块
//!
//! 动画引擎适配层：时间线、缓动、交错。
//!
//! ## 核心设计理念
//!
//! 动画系统只负责 **时间轴管理**：
//! - 知道某个属性从 A 到 B 需要在 duration 内变化
//! - 通过 `Animatable` trait 直接写入对象属性
//! - **不假设对象类型**，对象自己决定如何使用这些值
//!
//! ## 核心概念
//!
//! - `Timeline`: 可正放、倒放、拖动进度的补间集合
//! - `Tween`: 时间线上的单条补间
//! - `Stagger`: 多目标交错偏移
//! - `EasingFunction`: 缓动函数
//!
//! 引擎是否可用由 [`crate::capability::MotionCapability`] 决定，调用方在使用前检查。

mod easing;
mod stagger;
mod timeline;
mod traits;
mod tween;

pub use easing::EasingFunction;
pub use stagger::{Stagger, StaggerFrom};
pub use timeline::{
    PlayDirection, Position, Timeline, TimelineEvent, TimelineState, TweenVars,
};
pub use traits::{Animatable, ObjectId, TweenKey};
pub use tween::Tween;
