//! # Stage 模块
//!
//! 把编排器、锚点注册表和当前视图串起来的舞台。
//!
//! 每帧：
//! 1. 推进编排器
//! 2. 取快照；场景变化时先卸载旧视图再挂载新视图
//! 3. 把文字可见性传给视图并推进它的标题动画

use std::collections::HashSet;

use tracing::{debug, warn};

use super::shell::SceneView;
use crate::capability::MotionCapability;
use crate::config::StageConfig;
use crate::geometry::Rect;
use crate::overlay::OverlayFrame;
use crate::transition::{
    AnchorRegistry, NavigateOutcome, PhaseChange, Scene, TransitionOrchestrator,
    TransitionSnapshot,
};

/// 舞台
#[derive(Debug)]
pub struct Stage {
    config: StageConfig,
    capability: MotionCapability,
    anchors: AnchorRegistry,
    orchestrator: TransitionOrchestrator,
    view: Option<SceneView>,
    /// 不渲染锚点元素的场景
    suppressed_anchors: HashSet<Scene>,
}

impl Stage {
    /// 创建舞台并挂载 Home
    pub fn new(config: StageConfig, capability: MotionCapability) -> Self {
        let anchors = AnchorRegistry::new();
        let orchestrator = TransitionOrchestrator::new(&config, capability.clone(), anchors.clone());

        let mut stage = Self {
            config,
            capability,
            anchors,
            orchestrator,
            view: None,
            suppressed_anchors: HashSet::new(),
        };
        stage.sync_view();
        stage
    }

    /// 指定场景不渲染锚点元素（需在该场景挂载前调用才生效）
    pub fn suppress_anchor(&mut self, scene: Scene) {
        self.suppressed_anchors.insert(scene);
    }

    /// 请求切换场景
    pub fn navigate(&mut self, target: Scene) -> NavigateOutcome {
        let outcome = self.orchestrator.navigate(target);
        if outcome == NavigateOutcome::CommittedImmediately {
            self.sync_view();
        }
        outcome
    }

    /// 宿主布局变化后移动当前视图的锚点
    ///
    /// 下一次过渡从新矩形开始扩展或收缩到新矩形。
    pub fn relayout(&mut self, rect: Rect) {
        if let Some(view) = self.view.as_ref() {
            debug!(scene = %view.scene(), ?rect, "锚点布局变化");
            view.relayout(rect);
        }
    }

    /// 推进一帧
    pub fn update(&mut self, dt: f32) -> TransitionSnapshot {
        self.orchestrator.update(dt);
        let snapshot = self.sync_view();
        if let Some(view) = self.view.as_mut() {
            view.update(dt);
        }
        snapshot
    }

    /// 持续推进直到回到 Idle
    ///
    /// # 返回
    /// 是否在 `timeout` 秒内回到 Idle
    pub fn settle(&mut self, dt: f32, timeout: f32) -> bool {
        if dt <= 0.0 {
            warn!(dt, "帧间隔必须为正数");
            return !self.orchestrator.is_transitioning();
        }
        let mut elapsed = 0.0;
        while self.orchestrator.is_transitioning() {
            if elapsed >= timeout {
                return false;
            }
            self.update(dt);
            elapsed += dt;
        }
        true
    }

    /// 按快照挂载视图并同步文字可见性
    fn sync_view(&mut self) -> TransitionSnapshot {
        let snapshot = self.orchestrator.snapshot();

        if self.view.as_ref().map(|view| view.scene()) != Some(snapshot.scene) {
            // 先卸载旧视图，锚点随之移除
            self.view = None;

            let anchor = if self.suppressed_anchors.contains(&snapshot.scene) {
                debug!(scene = %snapshot.scene, "该场景不渲染锚点");
                None
            } else {
                Some(self.config.anchors.rect(snapshot.scene))
            };
            self.view = Some(SceneView::mount(
                snapshot.scene,
                anchor,
                &self.anchors,
                snapshot.text_visible,
                &self.config.reveal,
                &self.capability,
            ));
        }

        if let Some(view) = self.view.as_mut() {
            view.set_text_visible(snapshot.text_visible);
        }
        snapshot
    }

    /// 立即结束加载动画
    pub fn finish_loading(&mut self) {
        self.orchestrator.finish_loading();
        self.sync_view();
    }

    // ========== 查询方法 ==========

    pub fn snapshot(&self) -> TransitionSnapshot {
        self.orchestrator.snapshot()
    }

    pub fn orchestrator(&self) -> &TransitionOrchestrator {
        &self.orchestrator
    }

    pub fn view(&self) -> Option<&SceneView> {
        self.view.as_ref()
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn capability(&self) -> &MotionCapability {
        &self.capability
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn overlay_frame(&self) -> OverlayFrame {
        self.orchestrator.overlay_frame()
    }

    /// 取出并清空阶段变更记录
    pub fn take_phase_changes(&mut self) -> Vec<PhaseChange> {
        self.orchestrator.take_phase_changes()
    }
}
