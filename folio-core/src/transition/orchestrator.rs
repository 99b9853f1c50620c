//! # Orchestrator 模块
//!
//! 视图过渡编排器：状态机 + 单一驱动循环。
//!
//! ## 标准路径
//!
//! ```text
//! Idle ─navigate→ ExitingText ─600ms→ Expanding ─扩展完成/提交→ Switching
//!      ─下一帧→ Shrinking ─100ms→ EnteringText ─收缩完成 + 800ms→ Idle
//! ```
//!
//! 目标为 About 时 Shrinking 改为淡出，淡出开始即进入 EnteringText。
//!
//! ## 快门路径（涉及 Contact）
//!
//! ```text
//! Idle → ExitingText ─600ms→ Expanding（条带合拢）─提交→ 条带打开（开始即 EnteringText）→ Idle
//! ```
//!
//! 所有推进都发生在 `update(dt)` 中：调度器交付到期的定时器与帧等待，
//! 当前动画交付开始 / 完成事件。阶段处理函数返回 `Result`，
//! 出错时在 `dispatch` 处记录日志并强制恢复到 Idle（新场景可见）。

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::anchors::AnchorRegistry;
use super::phase::{Scene, TransitionPhase, TransitionRoute};
use super::scheduler::{Scheduler, SchedulerEvent, TimerKind};
use super::snapshot::{PhaseChange, TransitionSnapshot};
use crate::animation::{Stagger, Timeline, TimelineEvent, TweenVars};
use crate::capability::MotionCapability;
use crate::config::{ShutterConfig, StageConfig, TransitionTimings};
use crate::error::{TransitionError, TransitionResult};
use crate::geometry::{Color, Rect, Viewport};
use crate::overlay::{OverlayFrame, OverlaySurface, SliceOrigin};

/// 编排器启动的动画
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// 遮罩扩展到全屏
    Expand,
    /// 遮罩收缩到目标锚点
    Shrink,
    /// About 的遮罩淡出
    AboutFade,
    /// 找不到目标锚点时的淡出
    FallbackFade,
    /// 快门合拢
    ShutterClose,
    /// 快门打开
    ShutterOpen,
}

/// 驱动状态机的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    Timer(TimerKind),
    FrameReady,
    AnimationStarted(Cue),
    AnimationCompleted(Cue),
}

impl From<SchedulerEvent> for TransitionEvent {
    fn from(event: SchedulerEvent) -> Self {
        match event {
            SchedulerEvent::Timer(kind) => Self::Timer(kind),
            SchedulerEvent::FrameReady => Self::FrameReady,
        }
    }
}

/// 导航请求被忽略的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// 目标就是当前场景
    SameScene,
    /// 已有过渡在进行
    Busy(TransitionPhase),
}

/// 导航请求的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigateOutcome {
    Ignored(IgnoreReason),
    /// 开始过渡
    Started(TransitionRoute),
    /// 动画引擎不可用，已同步切换
    CommittedImmediately,
}

/// 视图过渡编排器
pub struct TransitionOrchestrator {
    timings: TransitionTimings,
    shutter: ShutterConfig,
    viewport: Viewport,
    overlay_color: Color,

    capability: MotionCapability,
    anchors: AnchorRegistry,
    overlay: Rc<OverlaySurface>,
    scheduler: Scheduler,
    /// 进行中的遮罩动画（启动新动画时整体替换）
    active: Option<(Cue, Timeline)>,

    scene: Scene,
    phase: TransitionPhase,
    pending: Option<Scene>,
    source_geometry: Option<Rect>,
    route: Option<TransitionRoute>,

    /// 加载动画剩余时间（秒）
    loader_remaining: f32,
    /// 编排器时钟（秒）
    clock: f32,
    commit_count: u64,
    phase_changes: Vec<PhaseChange>,
}

impl std::fmt::Debug for TransitionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionOrchestrator")
            .field("scene", &self.scene)
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .field("route", &self.route)
            .field("active", &self.active.as_ref().map(|(cue, _)| *cue))
            .field("commit_count", &self.commit_count)
            .finish()
    }
}

impl TransitionOrchestrator {
    /// 创建编排器，初始场景为 Home
    pub fn new(config: &StageConfig, capability: MotionCapability, anchors: AnchorRegistry) -> Self {
        Self {
            timings: config.timings.clone(),
            shutter: config.shutter.clone(),
            viewport: config.viewport,
            overlay_color: config.overlay_color,
            capability,
            anchors,
            overlay: Rc::new(OverlaySurface::new()),
            scheduler: Scheduler::new(),
            active: None,
            scene: Scene::Home,
            phase: TransitionPhase::Idle,
            pending: None,
            source_geometry: None,
            route: None,
            loader_remaining: config.loader_duration.max(0.0),
            clock: 0.0,
            commit_count: 0,
            phase_changes: Vec::new(),
        }
    }

    /// 指定初始场景
    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = scene;
        self
    }

    // ========== 导航 ==========

    /// 请求切换到目标场景
    pub fn navigate(&mut self, target: Scene) -> NavigateOutcome {
        if target == self.scene {
            debug!(scene = %target, "已在目标场景，忽略导航");
            return NavigateOutcome::Ignored(IgnoreReason::SameScene);
        }
        if !self.phase.is_idle() {
            debug!(to = %target, phase = ?self.phase, "过渡进行中，忽略导航");
            return NavigateOutcome::Ignored(IgnoreReason::Busy(self.phase));
        }

        if !self.capability.is_loaded() {
            warn!(to = %target, "{}，直接切换", TransitionError::CapabilityUnavailable);
            self.commit(target);
            return NavigateOutcome::CommittedImmediately;
        }

        let route = TransitionRoute::between(self.scene, target);
        info!(from = %self.scene, to = %target, route = ?route, "开始过渡");

        self.pending = Some(target);
        self.route = Some(route);
        self.set_phase(TransitionPhase::ExitingText);
        self.scheduler.start(TimerKind::TextExit, self.timings.text_exit);
        NavigateOutcome::Started(route)
    }

    // ========== 驱动循环 ==========

    /// 推进一帧
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.clock += dt;
        self.tick_loader(dt);

        if self.phase.is_idle() {
            return;
        }

        if !self.capability.is_loaded() {
            warn!(phase = ?self.phase, "动画引擎在过渡中被卸载，强制结束过渡");
            self.recover();
            return;
        }

        for event in self.scheduler.advance(dt) {
            self.dispatch(event.into());
        }

        self.step_animation(dt);
    }

    fn step_animation(&mut self, dt: f32) {
        let Some((cue, timeline)) = self.active.as_mut() else {
            return;
        };
        let cue = *cue;

        for event in timeline.update(dt) {
            let event = match event {
                TimelineEvent::Started => TransitionEvent::AnimationStarted(cue),
                TimelineEvent::Completed => TransitionEvent::AnimationCompleted(cue),
                TimelineEvent::ReverseCompleted => continue,
            };
            self.dispatch(event);
        }
    }

    /// 回调边界：处理失败时记录并恢复
    fn dispatch(&mut self, event: TransitionEvent) {
        if self.phase.is_idle() {
            return;
        }
        if let Err(e) = self.handle(event) {
            error!(error = %e, event = ?event, phase = ?self.phase, "过渡处理失败，强制恢复");
            self.recover();
        }
    }

    fn handle(&mut self, event: TransitionEvent) -> TransitionResult<()> {
        use TransitionEvent::*;
        use TransitionPhase::*;

        match (self.phase, event) {
            (ExitingText, Timer(TimerKind::TextExit)) => self.on_text_exited(),

            // 标准路径
            (Expanding, AnimationCompleted(Cue::Expand)) => self.on_expanded(),
            (Switching, FrameReady) => self.on_frame_ready(),
            (Switching, AnimationCompleted(Cue::FallbackFade)) => {
                self.overlay.hide();
                self.finish();
                Ok(())
            }
            (Shrinking, AnimationStarted(Cue::AboutFade)) => {
                self.set_phase(EnteringText);
                Ok(())
            }
            (Shrinking | EnteringText, AnimationCompleted(Cue::AboutFade)) => {
                self.overlay.hide();
                self.finish();
                Ok(())
            }
            (Shrinking, Timer(TimerKind::EnterTextDelay)) => {
                self.set_phase(EnteringText);
                Ok(())
            }
            (Shrinking | EnteringText, AnimationCompleted(Cue::Shrink)) => {
                self.on_shrunk();
                Ok(())
            }
            (EnteringText, Timer(TimerKind::SettleAfterShrink)) => {
                self.finish();
                Ok(())
            }
            (EnteringText, Timer(TimerKind::NoAnchorFallback)) => {
                self.finish();
                Ok(())
            }

            // 快门路径
            (Expanding, AnimationCompleted(Cue::ShutterClose)) => self.on_shutter_closed(),
            (Expanding, AnimationStarted(Cue::ShutterOpen)) => {
                self.set_phase(EnteringText);
                Ok(())
            }
            (Expanding | EnteringText, AnimationCompleted(Cue::ShutterOpen)) => {
                self.overlay.hide();
                self.finish();
                Ok(())
            }

            (phase, event) => {
                debug!(phase = ?phase, event = ?event, "忽略过期事件");
                Ok(())
            }
        }
    }

    // ========== 阶段处理 ==========

    fn on_text_exited(&mut self) -> TransitionResult<()> {
        let target = self.require_pending()?;

        if self.route == Some(TransitionRoute::Shutter) {
            return self.close_shutter();
        }

        match self.anchors.resolve(self.scene) {
            Ok(rect) => self.expand_from(rect),
            Err(e) => {
                warn!(error = %e, "找不到源锚点，直接切换");
                self.commit(target);
                self.set_phase(TransitionPhase::EnteringText);
                self.scheduler
                    .start(TimerKind::NoAnchorFallback, self.timings.no_anchor_fallback);
                Ok(())
            }
        }
    }

    fn expand_from(&mut self, source: Rect) -> TransitionResult<()> {
        self.source_geometry = Some(source);
        self.overlay.show_at(source, self.overlay_color);

        let vars = rect_vars(self.timings.expand, self.viewport.bounds())
            .easing(self.timings.expand_easing);
        let timeline = self.overlay_timeline(&vars)?;

        self.set_phase(TransitionPhase::Expanding);
        self.start_cue(Cue::Expand, timeline)
    }

    fn on_expanded(&mut self) -> TransitionResult<()> {
        let target = self.require_pending()?;
        self.commit(target);
        self.set_phase(TransitionPhase::Switching);
        // 等一帧，让新视图完成挂载并注册锚点
        self.scheduler.request_frame();
        Ok(())
    }

    fn on_frame_ready(&mut self) -> TransitionResult<()> {
        let destination = match self.anchors.resolve(self.scene) {
            Ok(rect) => rect,
            Err(e) => {
                warn!(error = %e, "找不到目标锚点，遮罩淡出");
                let vars = TweenVars::new(self.timings.fallback_fade)
                    .prop("opacity", 0.0)
                    .easing(self.timings.fallback_fade_easing);
                let timeline = self.overlay_timeline(&vars)?;
                return self.start_cue(Cue::FallbackFade, timeline);
            }
        };

        self.set_phase(TransitionPhase::Shrinking);

        if self.scene == Scene::About {
            let vars = TweenVars::new(self.timings.about_fade)
                .prop("opacity", 0.0)
                .easing(self.timings.about_fade_easing);
            let timeline = self.overlay_timeline(&vars)?;
            return self.start_cue(Cue::AboutFade, timeline);
        }

        let vars = rect_vars(self.timings.shrink, destination).easing(self.timings.shrink_easing);
        let timeline = self.overlay_timeline(&vars)?;
        self.start_cue(Cue::Shrink, timeline)?;
        self.scheduler
            .start(TimerKind::EnterTextDelay, self.timings.enter_text_delay);
        Ok(())
    }

    fn on_shrunk(&mut self) {
        self.scheduler.cancel(TimerKind::EnterTextDelay);
        if self.phase == TransitionPhase::Shrinking {
            self.set_phase(TransitionPhase::EnteringText);
        }
        self.overlay.hide();
        self.scheduler
            .start(TimerKind::SettleAfterShrink, self.timings.settle_after_shrink);
    }

    fn close_shutter(&mut self) -> TransitionResult<()> {
        let slices = self.overlay.build_slices(
            self.viewport,
            self.shutter.slice_count,
            self.overlay_color,
        );

        let mut timeline = Timeline::new().with_default_easing(self.shutter.easing);
        let ids = timeline.register_all(slices);
        timeline.to(
            &ids,
            &TweenVars::new(self.shutter.duration)
                .prop("scale_y", 1.0)
                .stagger(Stagger::from_edges(self.shutter.stagger)),
        )?;

        self.set_phase(TransitionPhase::Expanding);
        self.start_cue(Cue::ShutterClose, timeline)
    }

    fn on_shutter_closed(&mut self) -> TransitionResult<()> {
        let target = self.require_pending()?;
        self.commit(target);

        self.overlay.set_slice_origin(SliceOrigin::Top);
        let mut timeline = Timeline::new().with_default_easing(self.shutter.easing);
        let ids = timeline.register_all(self.overlay.slices());
        timeline.to(
            &ids,
            &TweenVars::new(self.shutter.duration)
                .prop("scale_y", 0.0)
                .stagger(Stagger::from_center(self.shutter.stagger)),
        )?;

        self.start_cue(Cue::ShutterOpen, timeline)
    }

    // ========== 辅助 ==========

    fn overlay_timeline(&self, vars: &TweenVars) -> TransitionResult<Timeline> {
        let mut timeline = Timeline::new();
        let id = timeline.register(self.overlay.clone());
        timeline.to(&[id], vars)?;
        Ok(timeline)
    }

    /// 开始播放新动画，替换进行中的动画
    fn start_cue(&mut self, cue: Cue, mut timeline: Timeline) -> TransitionResult<()> {
        if !self.capability.is_loaded() {
            return Err(TransitionError::CapabilityUnavailable);
        }
        timeline.play_from(0.0);
        debug!(cue = ?cue, duration = timeline.duration(), "开始遮罩动画");
        self.active = Some((cue, timeline));
        Ok(())
    }

    fn require_pending(&self) -> TransitionResult<Scene> {
        self.pending
            .ok_or(TransitionError::MissingPendingTarget { phase: self.phase })
    }

    /// 提交场景（同一目标只提交一次）
    fn commit(&mut self, target: Scene) {
        if self.scene == target {
            return;
        }
        info!(from = %self.scene, to = %target, "提交场景");
        self.scene = target;
        self.commit_count += 1;
    }

    fn set_phase(&mut self, phase: TransitionPhase) {
        if self.phase == phase {
            return;
        }
        debug!(from = ?self.phase, to = ?phase, scene = %self.scene, "阶段变更");
        self.phase_changes.push(PhaseChange {
            from: self.phase,
            to: phase,
            scene: self.scene,
            at: self.clock,
        });
        self.phase = phase;
    }

    /// 正常结束过渡
    fn finish(&mut self) {
        self.active = None;
        self.scheduler.clear();
        self.pending = None;
        self.source_geometry = None;
        self.route = None;
        self.set_phase(TransitionPhase::Idle);
        info!(scene = %self.scene, "过渡完成");
    }

    /// 强制恢复到 Idle，目标场景可见
    pub fn recover(&mut self) {
        if self.phase.is_idle() {
            return;
        }
        if let Some(target) = self.pending {
            self.commit(target);
        }
        self.overlay.hide();
        self.finish();
    }

    fn tick_loader(&mut self, dt: f32) {
        if self.loader_remaining <= 0.0 {
            return;
        }
        self.loader_remaining -= dt;
        if self.loader_remaining <= 0.0 {
            self.loader_remaining = 0.0;
            info!("加载动画结束");
        }
    }

    /// 立即结束加载动画
    pub fn finish_loading(&mut self) {
        self.loader_remaining = 0.0;
    }

    // ========== 查询方法 ==========

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn pending_target(&self) -> Option<Scene> {
        self.pending
    }

    pub fn source_geometry(&self) -> Option<Rect> {
        self.source_geometry
    }

    pub fn route(&self) -> Option<TransitionRoute> {
        self.route
    }

    pub fn is_loading(&self) -> bool {
        self.loader_remaining > 0.0
    }

    /// 文字是否可见：加载完成且阶段允许
    pub fn text_visible(&self) -> bool {
        !self.is_loading() && self.phase.allows_text()
    }

    pub fn is_transitioning(&self) -> bool {
        !self.phase.is_idle()
    }

    /// 当前遮罩动画
    pub fn active_cue(&self) -> Option<Cue> {
        self.active.as_ref().map(|(cue, _)| *cue)
    }

    /// 场景提交次数
    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn capability(&self) -> &MotionCapability {
        &self.capability
    }

    pub fn overlay_frame(&self) -> OverlayFrame {
        self.overlay.frame()
    }

    pub fn snapshot(&self) -> TransitionSnapshot {
        TransitionSnapshot {
            scene: self.scene,
            phase: self.phase,
            pending: self.pending,
            text_visible: self.text_visible(),
            overlay_visible: self.overlay.is_visible(),
        }
    }

    /// 取出并清空阶段变更记录
    pub fn take_phase_changes(&mut self) -> Vec<PhaseChange> {
        std::mem::take(&mut self.phase_changes)
    }
}

/// 把遮罩补间到矩形
fn rect_vars(duration: f32, rect: Rect) -> TweenVars {
    TweenVars::new(duration)
        .prop("x", rect.x)
        .prop("y", rect.y)
        .prop("width", rect.width)
        .prop("height", rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn orchestrator(capability: MotionCapability) -> (TransitionOrchestrator, AnchorRegistry) {
        let anchors = AnchorRegistry::new();
        let mut orchestrator =
            TransitionOrchestrator::new(&StageConfig::default(), capability, anchors.clone());
        orchestrator.finish_loading();
        (orchestrator, anchors)
    }

    fn run_until_idle(orchestrator: &mut TransitionOrchestrator) -> usize {
        for frame in 0..1000 {
            orchestrator.update(DT);
            if !orchestrator.is_transitioning() {
                return frame + 1;
            }
        }
        panic!("过渡没有结束: {:?}", orchestrator);
    }

    #[test]
    fn test_navigate_same_scene_is_noop() {
        let (mut orchestrator, _) = orchestrator(MotionCapability::loaded());

        assert_eq!(
            orchestrator.navigate(Scene::Home),
            NavigateOutcome::Ignored(IgnoreReason::SameScene)
        );
        assert_eq!(orchestrator.phase(), TransitionPhase::Idle);
        assert!(!orchestrator.overlay_frame().displayed);
        assert!(orchestrator.take_phase_changes().is_empty());
    }

    #[test]
    fn test_navigate_while_busy_is_ignored() {
        let (mut orchestrator, _) = orchestrator(MotionCapability::loaded());

        assert_eq!(
            orchestrator.navigate(Scene::Work),
            NavigateOutcome::Started(TransitionRoute::Standard)
        );
        assert_eq!(
            orchestrator.navigate(Scene::About),
            NavigateOutcome::Ignored(IgnoreReason::Busy(TransitionPhase::ExitingText))
        );
        assert_eq!(orchestrator.pending_target(), Some(Scene::Work));
        assert_eq!(orchestrator.scene(), Scene::Home);
    }

    #[test]
    fn test_no_capability_commits_synchronously() {
        let (mut orchestrator, _) = orchestrator(MotionCapability::unavailable());

        assert_eq!(
            orchestrator.navigate(Scene::Contact),
            NavigateOutcome::CommittedImmediately
        );
        assert_eq!(orchestrator.scene(), Scene::Contact);
        assert_eq!(orchestrator.phase(), TransitionPhase::Idle);
        assert_eq!(orchestrator.commit_count(), 1);
        assert!(orchestrator.take_phase_changes().is_empty());
    }

    #[test]
    fn test_standard_path_phases() {
        let (mut orchestrator, anchors) = orchestrator(MotionCapability::loaded());
        let _home = anchors.register(Scene::Home, Rect::new(64.0, 0.0, 1856.0, 810.0));
        let _work = anchors.register(Scene::Work, Rect::new(992.0, 0.0, 928.0, 1080.0));

        orchestrator.navigate(Scene::Work);
        run_until_idle(&mut orchestrator);

        let phases: Vec<_> = orchestrator
            .take_phase_changes()
            .iter()
            .map(|c| c.to)
            .collect();
        assert_eq!(
            phases,
            vec![
                TransitionPhase::ExitingText,
                TransitionPhase::Expanding,
                TransitionPhase::Switching,
                TransitionPhase::Shrinking,
                TransitionPhase::EnteringText,
                TransitionPhase::Idle,
            ]
        );
        assert_eq!(orchestrator.scene(), Scene::Work);
        assert_eq!(orchestrator.commit_count(), 1);
        assert_eq!(orchestrator.pending_target(), None);
        assert_eq!(orchestrator.source_geometry(), None);
        assert!(!orchestrator.overlay_frame().displayed);
    }

    #[test]
    fn test_expand_captures_source_geometry() {
        let (mut orchestrator, anchors) = orchestrator(MotionCapability::loaded());
        let source = Rect::new(64.0, 0.0, 1856.0, 810.0);
        let _home = anchors.register(Scene::Home, source);

        orchestrator.navigate(Scene::Work);
        while orchestrator.phase() != TransitionPhase::Expanding {
            orchestrator.update(DT);
        }

        assert_eq!(orchestrator.source_geometry(), Some(source));
        assert_eq!(orchestrator.active_cue(), Some(Cue::Expand));
        let frame = orchestrator.overlay_frame();
        assert_eq!(frame.color, Color::BRAND_RED);
        assert!(frame.rect.approx_eq(source, 0.1));
        assert!(!orchestrator.text_visible());
    }

    #[test]
    fn test_missing_source_anchor_switches_directly() {
        let (mut orchestrator, _) = orchestrator(MotionCapability::loaded());

        orchestrator.navigate(Scene::Work);
        run_until_idle(&mut orchestrator);

        let phases: Vec<_> = orchestrator
            .take_phase_changes()
            .iter()
            .map(|c| c.to)
            .collect();
        assert_eq!(
            phases,
            vec![
                TransitionPhase::ExitingText,
                TransitionPhase::EnteringText,
                TransitionPhase::Idle,
            ]
        );
        assert_eq!(orchestrator.scene(), Scene::Work);
        assert!(!orchestrator.overlay_frame().displayed);
    }

    #[test]
    fn test_missing_destination_anchor_fades_out() {
        let (mut orchestrator, anchors) = orchestrator(MotionCapability::loaded());
        let _home = anchors.register(Scene::Home, Rect::new(64.0, 0.0, 1856.0, 810.0));

        orchestrator.navigate(Scene::Work);
        let mut saw_fallback = false;
        while orchestrator.is_transitioning() {
            orchestrator.update(DT);
            saw_fallback |= orchestrator.active_cue() == Some(Cue::FallbackFade);
            assert!(orchestrator.phase() != TransitionPhase::Shrinking);
        }

        assert!(saw_fallback);
        assert_eq!(orchestrator.scene(), Scene::Work);
        assert_eq!(orchestrator.commit_count(), 1);
    }

    #[test]
    fn test_capability_lost_mid_transition_recovers() {
        let capability = MotionCapability::loaded();
        let (mut orchestrator, anchors) = orchestrator(capability.clone());
        let _home = anchors.register(Scene::Home, Rect::new(64.0, 0.0, 1856.0, 810.0));

        orchestrator.navigate(Scene::About);
        while orchestrator.phase() != TransitionPhase::Expanding {
            orchestrator.update(DT);
        }

        capability.unload();
        orchestrator.update(DT);

        assert_eq!(orchestrator.phase(), TransitionPhase::Idle);
        assert_eq!(orchestrator.scene(), Scene::About);
        assert_eq!(orchestrator.pending_target(), None);
        assert_eq!(orchestrator.source_geometry(), None);
        assert!(!orchestrator.overlay_frame().displayed);
        assert!(orchestrator.text_visible());
    }

    #[test]
    fn test_handler_error_forces_idle() {
        let (mut orchestrator, anchors) = orchestrator(MotionCapability::loaded());
        let _home = anchors.register(Scene::Home, Rect::new(64.0, 0.0, 1856.0, 810.0));

        orchestrator.navigate(Scene::Work);
        assert_eq!(orchestrator.phase(), TransitionPhase::ExitingText);
        // 文字退场结束时缺少待切换目标，处理函数返回 MissingPendingTarget
        orchestrator.pending = None;

        for _ in 0..60 {
            orchestrator.update(DT);
        }

        assert_eq!(orchestrator.phase(), TransitionPhase::Idle);
        assert_eq!(orchestrator.scene(), Scene::Home);
        assert_eq!(orchestrator.pending_target(), None);
        assert_eq!(orchestrator.source_geometry(), None);
        assert_eq!(orchestrator.active_cue(), None);
        assert!(!orchestrator.overlay_frame().displayed);
        assert!(orchestrator.text_visible());
        assert_eq!(orchestrator.commit_count(), 0);
    }

    #[test]
    fn test_shutter_open_starts_unadvanced() {
        let (mut orchestrator, _) = orchestrator(MotionCapability::loaded());
        orchestrator.navigate(Scene::Contact);

        while orchestrator.active_cue() != Some(Cue::ShutterOpen) {
            orchestrator.update(DT);
        }

        // 在合拢完成的那一帧启动，下一帧才开始推进
        let frame = orchestrator.overlay_frame();
        assert_eq!(orchestrator.phase(), TransitionPhase::Expanding);
        assert_eq!(orchestrator.scene(), Scene::Contact);
        assert!(frame.slices.iter().all(|s| s.origin == SliceOrigin::Top));
        assert!(frame.slices.iter().all(|s| (s.scale_y - 1.0).abs() < 1e-6));

        orchestrator.update(DT);
        assert_eq!(orchestrator.phase(), TransitionPhase::EnteringText);
        let frame = orchestrator.overlay_frame();
        assert!(frame.slices.iter().any(|s| s.scale_y < 1.0));
    }

    #[test]
    fn test_shutter_commits_once() {
        let (mut orchestrator, _) = orchestrator(MotionCapability::loaded());

        assert_eq!(
            orchestrator.navigate(Scene::Contact),
            NavigateOutcome::Started(TransitionRoute::Shutter)
        );
        run_until_idle(&mut orchestrator);

        assert_eq!(orchestrator.scene(), Scene::Contact);
        assert_eq!(orchestrator.commit_count(), 1);
        assert!(orchestrator.overlay_frame().slices.is_empty());
    }

    #[test]
    fn test_loader_gates_text() {
        let anchors = AnchorRegistry::new();
        let mut orchestrator = TransitionOrchestrator::new(
            &StageConfig::default(),
            MotionCapability::loaded(),
            anchors,
        );

        assert!(orchestrator.is_loading());
        assert!(!orchestrator.text_visible());

        for _ in 0..130 {
            orchestrator.update(DT);
        }
        assert!(!orchestrator.is_loading());
        assert!(orchestrator.snapshot().text_visible);
    }
}
