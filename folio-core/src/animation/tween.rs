//! # Tween 模块
//!
//! 时间线上的单条补间。
//!
//! 与独立动画不同，补间自身不记录播放状态：它在时间线上占据
//! `[start, start + duration]` 区间，值是时间线播放头的纯函数。
//! 这保证了正放与倒放经过完全相同的轨迹。

use super::EasingFunction;
use super::traits::TweenKey;

/// 时间线上的单条补间
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    /// 轨道键（对象 + 属性）
    pub key: TweenKey,
    /// 起始值
    pub from: f32,
    /// 目标值
    pub to: f32,
    /// 在时间线上的起始时刻（秒）
    pub start: f32,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
}

impl Tween {
    /// 创建补间
    pub fn new(key: TweenKey, from: f32, to: f32, start: f32, duration: f32) -> Self {
        Self {
            key,
            from,
            to,
            start: start.max(0.0),
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 结束时刻
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// 播放头位于 `time` 时的局部进度（0.0 - 1.0，未应用缓动）
    pub fn local_progress(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return if time >= self.start { 1.0 } else { 0.0 };
        }
        ((time - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// 播放头位于 `time` 时的属性值
    pub fn value_at(&self, time: f32) -> f32 {
        let progress = self.easing.apply(self.local_progress(time));
        self.from + (self.to - self.from) * progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::traits::ObjectId;

    fn create_test_tween() -> Tween {
        Tween::new(TweenKey::new(ObjectId::new(1), "opacity"), 0.0, 1.0, 0.5, 1.0)
    }

    #[test]
    fn test_tween_creation() {
        let tween = create_test_tween();
        assert_eq!(tween.start, 0.5);
        assert_eq!(tween.end(), 1.5);
        assert_eq!(tween.easing, EasingFunction::EaseInOutQuad);
    }

    #[test]
    fn test_value_before_start_is_from() {
        let tween = create_test_tween();
        assert_eq!(tween.value_at(0.0), 0.0);
        assert_eq!(tween.value_at(0.5), 0.0);
    }

    #[test]
    fn test_value_in_range() {
        let tween = create_test_tween().with_easing(EasingFunction::Linear);
        assert!((tween.value_at(1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_value_after_end_is_to() {
        let tween = create_test_tween();
        assert_eq!(tween.value_at(2.0), 1.0);
    }

    #[test]
    fn test_zero_duration() {
        let tween = Tween::new(TweenKey::new(ObjectId::new(1), "opacity"), 0.0, 1.0, 0.2, 0.0);
        assert_eq!(tween.value_at(0.1), 0.0);
        assert_eq!(tween.value_at(0.2), 1.0);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let tween = Tween::new(TweenKey::new(ObjectId::new(1), "opacity"), 1.0, 0.0, -1.0, -2.0);
        assert_eq!(tween.start, 0.0);
        assert_eq!(tween.duration, 0.0);
    }
}
