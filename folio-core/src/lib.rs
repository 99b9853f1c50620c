//! # Folio Core
//!
//! 四视图作品集的转场核心库：视图过渡编排器 + 文字显隐动画。
//!
//! ## 架构概述
//!
//! `folio-core` 是无渲染的纯逻辑核心，以帧驱动：宿主每帧调用一次 `update(dt)`。
//!
//! ```text
//! Host                      Stage
//!   │                         │
//!   │──── navigate(scene) ───►│ TransitionOrchestrator（状态机）
//!   │                         │   ├─ OverlaySurface（遮罩 / 快门条带）
//!   │──── update(dt) ────────►│   └─ AnchorRegistry（场景 → 锚点矩形）
//!   │◄─── TransitionSnapshot ─│ SceneView（锚点 + TextReveal 标题）
//!   │                         │
//! ```
//!
//! 编排器在阶段变化时重新计算文字可见性，视图只消费快照，
//! 在过渡中点提交场景后由舞台挂载新视图。
//!
//! ## 使用示例
//!
//! ```ignore
//! use folio_core::{MotionCapability, Scene, Stage, StageConfig};
//!
//! let mut stage = Stage::new(StageConfig::default(), MotionCapability::loaded());
//! stage.navigate(Scene::Work);
//!
//! loop {
//!     let snapshot = stage.update(1.0 / 60.0);
//!     if snapshot.is_idle() {
//!         break;
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`animation`]：时间线、补间、缓动、交错
//! - [`capability`]：动画引擎可用性开关
//! - [`geometry`]：矩形、视口、颜色
//! - [`overlay`]：全屏遮罩与快门条带
//! - [`reveal`]：三层逐字显隐动画
//! - [`transition`]：场景、阶段、锚点注册表、调度器、编排器
//! - [`views`]：视图外壳与舞台
//! - [`config`]：舞台配置
//! - [`error`]：错误类型定义

pub mod animation;
pub mod capability;
pub mod config;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod reveal;
pub mod transition;
pub mod views;

// 重导出核心类型
pub use capability::MotionCapability;
pub use config::StageConfig;
pub use error::{AnimationError, ConfigError, ParseSceneError, TransitionError, TransitionResult};
pub use geometry::{Color, Rect, Viewport};
pub use overlay::{OverlayFrame, SliceFrame, SliceOrigin};
pub use reveal::{LayerKind, RevealMode, RevealProps, RevealVariant, TextReveal};
pub use transition::{
    AnchorRegistry, Cue, IgnoreReason, NavigateOutcome, PhaseChange, Scene, TransitionOrchestrator,
    TransitionPhase, TransitionRoute, TransitionSnapshot,
};
pub use views::{SceneView, Stage};
