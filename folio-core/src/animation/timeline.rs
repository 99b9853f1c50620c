//! # Timeline 模块
//!
//! 可正放、倒放、拖动进度的动画时间线。
//!
//! ```rust,ignore
//! let mut timeline = Timeline::new();
//! let id = timeline.register(glyph.clone());
//! timeline.to(&[id], &TweenVars::new(0.8).prop("opacity", 1.0))?;
//! timeline.play_from(0.0);
//!
//! // 每帧
//! for event in timeline.update(dt) { ... }
//!
//! // 从当前进度倒放回起点
//! timeline.reverse();
//! ```
//!
//! 所有属性值都是播放头位置的纯函数，因此倒放是正放的严格镜像。

use std::collections::HashMap;
use std::rc::Rc;

use super::stagger::Stagger;
use super::traits::{Animatable, ObjectId, TweenKey};
use super::tween::Tween;
use super::EasingFunction;
use crate::error::AnimationError;

/// 时间线事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    /// 正向播放开始（播放头离开起点后的第一帧）
    Started,
    /// 正向播放到达终点
    Completed,
    /// 倒放回到起点
    ReverseCompleted,
}

/// 播放方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayDirection {
    #[default]
    Forward,
    Reverse,
}

impl PlayDirection {
    fn sign(&self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

/// 时间线状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineState {
    /// 已暂停（新建的时间线默认暂停）
    #[default]
    Paused,
    /// 正在播放
    Playing,
    /// 已到达当前方向的端点
    Finished,
}

/// 补间在时间线上的插入位置
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// 追加到时间线末尾
    #[default]
    End,
    /// 与上一组补间同时开始（GSAP 的 `"<"`）
    WithPrevious,
    /// 绝对时刻（秒）
    At(f32),
}

/// 一组补间的参数
#[derive(Debug, Clone, PartialEq)]
pub struct TweenVars {
    /// 目标属性值
    pub properties: Vec<(&'static str, f32)>,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数（`None` 使用时间线默认值）
    pub easing: Option<EasingFunction>,
    /// 相对插入位置的延迟（秒）
    pub delay: f32,
    /// 多目标交错
    pub stagger: Option<Stagger>,
    /// 插入位置
    pub position: Position,
}

impl TweenVars {
    pub fn new(duration: f32) -> Self {
        Self {
            properties: Vec::new(),
            duration,
            easing: None,
            delay: 0.0,
            stagger: None,
            position: Position::End,
        }
    }

    pub fn prop(mut self, property_id: &'static str, value: f32) -> Self {
        self.properties.push((property_id, value));
        self
    }

    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// 动画时间线
///
/// 拥有注册进来的目标对象的共享引用，以及作用于这些对象的补间。
/// 丢弃时间线即释放它：目标保留最后一次渲染的值。
pub struct Timeline {
    /// 已注册的对象（ObjectId -> 对象）
    objects: HashMap<ObjectId, Rc<dyn Animatable>>,
    /// 补间（按插入顺序渲染）
    tweens: Vec<Tween>,
    /// 下一个对象 ID
    next_object_id: u64,
    /// 播放头（秒）
    playhead: f32,
    /// 总时长（秒）
    duration: f32,
    /// 最近一组补间的起始时刻，供 `Position::WithPrevious` 使用
    last_start: f32,
    direction: PlayDirection,
    state: TimelineState,
    /// 本次正向播放是否已发出 `Started`
    started: bool,
    default_easing: EasingFunction,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("objects", &self.objects.len())
            .field("tweens", &self.tweens.len())
            .field("playhead", &self.playhead)
            .field("duration", &self.duration)
            .field("direction", &self.direction)
            .field("state", &self.state)
            .finish()
    }
}

impl Timeline {
    /// 创建新的（暂停的）时间线
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            tweens: Vec::new(),
            next_object_id: 1,
            playhead: 0.0,
            duration: 0.0,
            last_start: 0.0,
            direction: PlayDirection::Forward,
            state: TimelineState::Paused,
            started: false,
            default_easing: EasingFunction::default(),
        }
    }

    /// 设置默认缓动（对应 GSAP `defaults: { ease }`）
    pub fn with_default_easing(mut self, easing: EasingFunction) -> Self {
        self.default_easing = easing;
        self
    }

    // ========== 对象管理 ==========

    /// 注册可动画对象，返回时间线内唯一的 `ObjectId`
    pub fn register<T: Animatable>(&mut self, object: Rc<T>) -> ObjectId {
        let id = ObjectId::new(self.next_object_id);
        self.next_object_id += 1;
        self.objects.insert(id, object as Rc<dyn Animatable>);
        id
    }

    /// 批量注册
    pub fn register_all<T: Animatable>(
        &mut self,
        objects: impl IntoIterator<Item = Rc<T>>,
    ) -> Vec<ObjectId> {
        objects.into_iter().map(|obj| self.register(obj)).collect()
    }

    /// 检查对象是否已注册
    pub fn is_registered(&self, object_id: ObjectId) -> bool {
        self.objects.contains_key(&object_id)
    }

    /// 获取已注册对象数量
    pub fn registered_count(&self) -> usize {
        self.objects.len()
    }

    fn object(&self, object_id: ObjectId) -> Result<&Rc<dyn Animatable>, AnimationError> {
        self.objects
            .get(&object_id)
            .ok_or(AnimationError::ObjectNotRegistered(object_id))
    }

    // ========== 构建 ==========

    /// 立即设置属性（不经过动画）
    pub fn set(
        &self,
        object_id: ObjectId,
        properties: &[(&'static str, f32)],
    ) -> Result<(), AnimationError> {
        let object = self.object(object_id)?;
        for &(property_id, value) in properties {
            if !object.set_property(property_id, value) {
                return Err(AnimationError::PropertyNotFound {
                    object: object_id,
                    property: property_id,
                });
            }
        }
        Ok(())
    }

    /// 批量立即设置属性
    pub fn set_all(
        &self,
        targets: &[ObjectId],
        properties: &[(&'static str, f32)],
    ) -> Result<(), AnimationError> {
        targets.iter().try_for_each(|&id| self.set(id, properties))
    }

    /// 添加一组补间：把 `targets` 的属性从当前值补间到 `vars` 中的目标值
    ///
    /// 起始值在添加时读取。同一对象同一属性的旧补间会被覆盖。
    pub fn to(&mut self, targets: &[ObjectId], vars: &TweenVars) -> Result<(), AnimationError> {
        // 先校验全部目标，避免部分写入
        for &object_id in targets {
            let object = self.object(object_id)?;
            for &(property_id, _) in &vars.properties {
                if object.get_property(property_id).is_none() {
                    return Err(AnimationError::PropertyNotFound {
                        object: object_id,
                        property: property_id,
                    });
                }
            }
        }

        let base = match vars.position {
            Position::End => self.duration,
            Position::WithPrevious => self.last_start,
            Position::At(time) => time.max(0.0),
        };
        let start = base + vars.delay;
        let easing = vars.easing.unwrap_or(self.default_easing);
        let count = targets.len();

        for (index, &object_id) in targets.iter().enumerate() {
            let offset = vars
                .stagger
                .map(|stagger| stagger.offset(index, count))
                .unwrap_or(0.0);
            let object = self.object(object_id)?.clone();

            for &(property_id, to) in &vars.properties {
                let key = TweenKey::new(object_id, property_id);
                let from = object.get_property(property_id).unwrap_or(to);
                let tween = Tween::new(key, from, to, start + offset, vars.duration)
                    .with_easing(easing);

                self.tweens.retain(|existing| existing.key != key);
                self.duration = self.duration.max(tween.end());
                self.tweens.push(tween);
            }
        }

        self.last_start = start;
        Ok(())
    }

    // ========== 播放控制 ==========

    /// 从指定时刻开始正向播放
    pub fn play_from(&mut self, time: f32) {
        self.playhead = time.clamp(0.0, self.duration);
        self.direction = PlayDirection::Forward;
        self.state = TimelineState::Playing;
        self.started = false;
        self.render();
    }

    /// 从当前播放头倒放回起点
    ///
    /// 播放头已在起点时不做任何事。
    pub fn reverse(&mut self) {
        self.direction = PlayDirection::Reverse;
        if self.playhead <= 0.0 {
            self.state = TimelineState::Finished;
            return;
        }
        self.state = TimelineState::Playing;
    }

    /// 终止时间线：停止播放并丢弃所有补间
    ///
    /// 目标对象保留当前值。
    pub fn kill(&mut self) {
        self.tweens.clear();
        self.state = TimelineState::Finished;
    }

    /// 跳到终点并渲染终值
    pub fn finish(&mut self) {
        self.playhead = self.duration;
        self.direction = PlayDirection::Forward;
        self.state = TimelineState::Finished;
        self.render();
    }

    /// 直接设置进度（0.0 - 1.0）并渲染，不改变播放状态
    pub fn set_progress(&mut self, progress: f32) {
        self.playhead = progress.clamp(0.0, 1.0) * self.duration;
        self.render();
    }

    /// 推进时间线
    ///
    /// # 返回
    /// 本帧产生的事件
    pub fn update(&mut self, dt: f32) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        if self.state != TimelineState::Playing {
            return events;
        }

        if self.direction == PlayDirection::Forward && !self.started {
            self.started = true;
            events.push(TimelineEvent::Started);
        }

        self.playhead += dt.max(0.0) * self.direction.sign();

        match self.direction {
            PlayDirection::Forward if self.playhead >= self.duration => {
                self.playhead = self.duration;
                self.state = TimelineState::Finished;
                events.push(TimelineEvent::Completed);
            }
            PlayDirection::Reverse if self.playhead <= 0.0 => {
                self.playhead = 0.0;
                self.state = TimelineState::Finished;
                events.push(TimelineEvent::ReverseCompleted);
            }
            _ => {}
        }

        self.render();
        events
    }

    /// 把播放头位置写入所有目标
    fn render(&self) {
        for tween in &self.tweens {
            if let Some(object) = self.objects.get(&tween.key.object_id) {
                object.set_property(tween.key.property_id, tween.value_at(self.playhead));
            }
        }
    }

    // ========== 查询方法 ==========

    /// 当前进度（0.0 - 1.0）
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            let at_end = self.state == TimelineState::Finished
                && self.direction == PlayDirection::Forward;
            return if at_end { 1.0 } else { 0.0 };
        }
        (self.playhead / self.duration).clamp(0.0, 1.0)
    }

    /// 播放头（秒）
    pub fn time(&self) -> f32 {
        self.playhead
    }

    /// 总时长（秒）
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// 是否正在播放
    pub fn is_active(&self) -> bool {
        self.state == TimelineState::Playing
    }

    /// 补间数量
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// 查询某条轨道的补间
    pub fn tween(&self, object_id: ObjectId, property_id: &str) -> Option<&Tween> {
        self.tweens
            .iter()
            .find(|t| t.key.object_id == object_id && t.key.property_id == property_id)
    }
}
