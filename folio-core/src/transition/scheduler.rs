//! 具名定时器与单帧等待。

use serde::Serialize;

/// 编排器使用的定时器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// 文字退场结束
    TextExit,
    /// 收缩开始后进入 EnteringText
    EnterTextDelay,
    /// 收缩结束后的额外等待
    SettleAfterShrink,
    /// 找不到源锚点时的直接切换等待
    NoAnchorFallback,
}

/// 调度器产生的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// 定时器到期
    Timer(TimerKind),
    /// 请求的下一帧已到达
    FrameReady,
}

/// 调度器
///
/// 只在 `advance` 中推进。在某次 `advance` 之后请求的帧，
/// 会在下一次 `advance` 时以 `FrameReady` 交付。
#[derive(Debug, Default)]
pub struct Scheduler {
    /// (定时器, 剩余秒数)
    timers: Vec<(TimerKind, f32)>,
    frame_requested: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 启动定时器，同名定时器会被重置
    pub fn start(&mut self, kind: TimerKind, delay: f32) {
        self.cancel(kind);
        self.timers.push((kind, delay.max(0.0)));
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers.retain(|(k, _)| *k != kind);
    }

    /// 请求等待一帧
    pub fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    /// 清除全部定时器与帧请求
    pub fn clear(&mut self) {
        self.timers.clear();
        self.frame_requested = false;
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|(k, _)| *k == kind)
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && !self.frame_requested
    }

    /// 推进时间
    ///
    /// # 返回
    /// 本帧到期的事件：先是 `FrameReady`，然后按到期先后排列的定时器
    pub fn advance(&mut self, dt: f32) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();

        if self.frame_requested {
            self.frame_requested = false;
            events.push(SchedulerEvent::FrameReady);
        }

        let dt = dt.max(0.0);
        for (_, remaining) in &mut self.timers {
            *remaining -= dt;
        }

        let mut fired: Vec<(TimerKind, f32)> = self
            .timers
            .iter()
            .copied()
            .filter(|(_, remaining)| *remaining <= 0.0)
            .collect();
        fired.sort_by(|a, b| a.1.total_cmp(&b.1));
        self.timers.retain(|(_, remaining)| *remaining > 0.0);

        events.extend(fired.into_iter().map(|(kind, _)| SchedulerEvent::Timer(kind)));
        events
    }
}
