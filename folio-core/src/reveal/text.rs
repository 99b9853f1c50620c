//! # Text 模块
//!
//! 三层叠放的逐字动画文本。
//!
//! ## 两种变体
//!
//! - **linear-trail**: 每组构建输入（内容、延迟、方式、变体）只构建一次时间线，
//!   可见时从头正放，隐藏时从当前进度倒放，退场是进场的严格镜像
//! - **zoom**: 每次显隐变化都丢弃旧时间线，新建一次性的进场或退场时间线
//!
//! 动画引擎不可用时，直接渲染完全显示的最终状态。
//! 可见性只是输入：文本只修改自己的字符，不会反向影响编排器。

use std::rc::Rc;

use tracing::{debug, warn};

use super::glyph::{AnimatableGlyph, GlyphStyle, LayerKind};
use super::props::{RevealMode, RevealProps, RevealVariant};
use crate::animation::{Position, Stagger, Timeline, TimelineState, TweenVars};
use crate::capability::MotionCapability;
use crate::config::RevealTimings;
use crate::error::AnimationError;

/// 文本拥有的时间线，记录构建它的输入
///
/// drop 即释放。
#[derive(Debug)]
pub struct RevealTimeline {
    props: RevealProps,
    timeline: Timeline,
}

impl RevealTimeline {
    /// 构建这条时间线时的输入
    pub fn props(&self) -> &RevealProps {
        &self.props
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

/// 逐字动画文本
#[derive(Debug)]
pub struct TextReveal {
    props: RevealProps,
    visible: bool,
    timings: RevealTimings,
    capability: MotionCapability,
    /// 渲染字符（空格已替换为不换行空格）
    characters: Vec<char>,
    /// 按 `LayerKind::index` 排列的三层字符
    layers: [Vec<Rc<AnimatableGlyph>>; 3],
    timeline: Option<RevealTimeline>,
    /// 时间线构建次数
    build_count: u32,
}

impl TextReveal {
    /// 挂载文本并按当前可见性开始动画
    pub fn mount(
        props: RevealProps,
        visible: bool,
        timings: &RevealTimings,
        capability: MotionCapability,
    ) -> Self {
        let mut reveal = Self {
            props,
            visible,
            timings: timings.clone(),
            capability,
            characters: Vec::new(),
            layers: Default::default(),
            timeline: None,
            build_count: 0,
        };
        reveal.rebuild();
        reveal
    }

    // ========== 输入 ==========

    /// 更新可见性
    ///
    /// linear-trail 不会因此重建时间线；zoom 每次变化都新建一次性时间线。
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.apply_visibility(false);
    }

    /// 更新构建输入，变化时丢弃旧时间线并按当前可见性重建
    pub fn set_props(&mut self, props: RevealProps) {
        if self.props == props {
            return;
        }
        debug!(from = %self.props.content, to = %props.content, "文字构建输入变化，重建时间线");
        self.props = props;
        self.rebuild();
    }

    /// 推进一帧
    ///
    /// # 返回
    /// 是否仍在播放
    pub fn update(&mut self, dt: f32) -> bool {
        if self.timeline.is_some() && !self.capability.is_loaded() {
            debug!(content = %self.props.content, "动画引擎已卸载，显示最终状态");
            self.timeline = None;
            self.render_end_state();
            return false;
        }
        if let Some(reveal_timeline) = self.timeline.as_mut() {
            reveal_timeline.timeline.update(dt);
        }
        self.is_animating()
    }

    /// 拖动时间线进度（0.0 - 1.0），不改变播放状态
    pub fn set_progress(&mut self, progress: f32) {
        if let Some(reveal_timeline) = self.timeline.as_mut() {
            reveal_timeline.timeline.set_progress(progress);
        }
    }

    // ========== 构建 ==========

    fn rebuild(&mut self) {
        self.timeline = None;
        self.characters = self.props.characters();

        let rest = self.rest_style();
        let characters = &self.characters;
        self.layers = LayerKind::ALL.map(|layer| {
            characters
                .iter()
                .enumerate()
                .map(|(index, &character)| {
                    Rc::new(AnimatableGlyph::new(layer, index, character, rest))
                })
                .collect()
        });

        self.apply_visibility(true);
    }

    fn apply_visibility(&mut self, mounting: bool) {
        if !self.capability.is_loaded() {
            self.timeline = None;
            self.render_end_state();
            return;
        }

        let result = match self.props.variant {
            RevealVariant::LinearTrail => self.play_trail(),
            // 隐藏挂载的 zoom 直接停在隐藏态
            RevealVariant::Zoom if mounting && !self.visible => Ok(()),
            RevealVariant::Zoom => self.build_zoom(self.visible),
        };

        if let Err(e) = result {
            warn!(error = %e, content = %self.props.content, "文字动画构建失败，显示最终状态");
            self.timeline = None;
            self.render_end_state();
        }
    }

    fn play_trail(&mut self) -> Result<(), AnimationError> {
        if self.timeline.is_none() {
            // 引擎恢复后从静止态重新构建
            let rest = self.rest_style();
            self.glyphs().for_each(|glyph| glyph.set_style(rest));
            self.build_trail()?;
        }

        if let Some(reveal_timeline) = self.timeline.as_mut() {
            if self.visible {
                reveal_timeline.timeline.play_from(0.0);
            } else {
                reveal_timeline.timeline.reverse();
            }
        }
        Ok(())
    }

    fn build_trail(&mut self) -> Result<(), AnimationError> {
        let t = &self.timings;
        let each = match self.props.mode {
            RevealMode::Stagger => t.char_stagger,
            RevealMode::Sync => 0.0,
        };

        let mut timeline = Timeline::new().with_default_easing(t.easing);
        for layer in LayerKind::ALL {
            let (duration, offset) = match layer {
                LayerKind::Main => (t.trail_duration, 0.0),
                LayerKind::Ghost1 => (t.trail_duration, t.ghost_offsets[0]),
                LayerKind::Ghost2 => (t.ghost_trail_duration, t.ghost_offsets[1]),
            };
            let ids = timeline.register_all(self.layers[layer.index()].iter().cloned());
            timeline.to(
                &ids,
                &TweenVars::new(duration)
                    .prop("y", 0.0)
                    .prop("skew_x", 0.0)
                    .prop("opacity", layer.opacity_tier())
                    .stagger(Stagger::each(each))
                    .position(Position::At(0.0))
                    .delay(self.props.delay + offset),
            )?;
        }

        self.install(timeline);
        Ok(())
    }

    /// 一次性 zoom 时间线，逐层按组合列表交错
    fn build_zoom(&mut self, entering: bool) -> Result<(), AnimationError> {
        let t = &self.timings;
        let count = self.characters.len();
        let mut timeline = Timeline::new().with_default_easing(t.easing);

        let (order, delay) = if entering {
            (
                [LayerKind::Ghost2, LayerKind::Ghost1, LayerKind::Main],
                self.props.delay,
            )
        } else {
            (LayerKind::ALL, 0.0)
        };

        for (position, layer) in order.into_iter().enumerate() {
            let ids = timeline.register_all(self.layers[layer.index()].iter().cloned());
            let vars = if entering {
                // 进场总是从隐藏态开始
                timeline.set_all(
                    &ids,
                    &[
                        ("y", 0.0),
                        ("skew_x", 0.0),
                        ("scale", t.zoom_scale),
                        ("opacity", 0.0),
                    ],
                )?;
                TweenVars::new(t.zoom_enter)
                    .prop("scale", 1.0)
                    .prop("skew_x", 0.0)
                    .prop("opacity", layer.opacity_tier())
            } else {
                TweenVars::new(t.zoom_exit)
                    .prop("scale", t.zoom_scale)
                    .prop("skew_x", t.zoom_exit_skew)
                    .prop("opacity", 0.0)
            };

            let layer_start = delay + (position * count) as f32 * t.zoom_stagger;
            timeline.to(
                &ids,
                &vars
                    .stagger(Stagger::each(t.zoom_stagger))
                    .position(Position::At(layer_start)),
            )?;
        }

        timeline.play_from(0.0);
        self.install(timeline);
        Ok(())
    }

    fn install(&mut self, timeline: Timeline) {
        self.build_count += 1;
        debug!(
            content = %self.props.content,
            variant = ?self.props.variant,
            duration = timeline.duration(),
            "文字时间线已构建"
        );
        self.timeline = Some(RevealTimeline {
            props: self.props.clone(),
            timeline,
        });
    }

    fn rest_style(&self) -> GlyphStyle {
        match self.props.variant {
            RevealVariant::LinearTrail => {
                GlyphStyle::trail_rest(self.timings.rest_offset, self.timings.rest_skew)
            }
            RevealVariant::Zoom => GlyphStyle::zoom_hidden(self.timings.zoom_scale),
        }
    }

    fn render_end_state(&self) {
        for layer in LayerKind::ALL {
            let shown = GlyphStyle::shown(layer);
            self.layers[layer.index()]
                .iter()
                .for_each(|glyph| glyph.set_style(shown));
        }
    }

    fn glyphs(&self) -> impl Iterator<Item = &Rc<AnimatableGlyph>> {
        self.layers.iter().flatten()
    }

    // ========== 查询方法 ==========

    pub fn props(&self) -> &RevealProps {
        &self.props
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// 可访问标签（原始内容）
    pub fn label(&self) -> &str {
        &self.props.content
    }

    /// 渲染字符
    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    /// 某一层的全部字符
    pub fn layer(&self, layer: LayerKind) -> &[Rc<AnimatableGlyph>] {
        &self.layers[layer.index()]
    }

    /// 某一层第 `index` 个字符的样式
    pub fn glyph_style(&self, layer: LayerKind, index: usize) -> Option<GlyphStyle> {
        self.layers[layer.index()].get(index).map(|glyph| glyph.style())
    }

    /// 当前时间线的进度（0.0 - 1.0）
    ///
    /// 没有时间线时：静态最终状态为 1.0，其余为 0.0。
    pub fn progress(&self) -> f32 {
        match &self.timeline {
            Some(reveal_timeline) => reveal_timeline.timeline.progress(),
            None if !self.capability.is_loaded() => 1.0,
            None => 0.0,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.timeline
            .as_ref()
            .is_some_and(|t| t.timeline.state() == TimelineState::Playing)
    }

    pub fn reveal_timeline(&self) -> Option<&RevealTimeline> {
        self.timeline.as_ref()
    }

    /// 时间线构建次数
    pub fn build_count(&self) -> u32 {
        self.build_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn mount(props: RevealProps, visible: bool) -> TextReveal {
        TextReveal::mount(
            props,
            visible,
            &RevealTimings::default(),
            MotionCapability::loaded(),
        )
    }

    fn run(reveal: &mut TextReveal, seconds: f32) {
        let steps = (seconds / 0.05).round() as usize;
        for _ in 0..steps {
            reveal.update(0.05);
        }
    }

    #[test]
    fn test_trail_plays_to_end_state() {
        let mut reveal = mount(RevealProps::new("HELLO"), true);

        let rest = reveal.glyph_style(LayerKind::Main, 0).unwrap();
        assert_eq!(rest.y_percent, 120.0);
        assert_eq!(rest.skew_x, -20.0);
        assert_eq!(rest.opacity, 0.0);
        assert!(reveal.is_animating());

        run(&mut reveal, 2.0);

        assert!(!reveal.is_animating());
        assert_eq!(reveal.progress(), 1.0);
        for layer in LayerKind::ALL {
            for index in 0..5 {
                let style = reveal.glyph_style(layer, index).unwrap();
                assert!((style.opacity - layer.opacity_tier()).abs() < EPSILON);
                assert!(style.y_percent.abs() < EPSILON);
                assert!(style.skew_x.abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_trail_reverse_is_mirror() {
        let mut reveal = mount(RevealProps::new("HELLO"), true);

        let mut forward = Vec::new();
        for _ in 0..6 {
            reveal.update(0.05);
            forward.push(reveal.glyph_style(LayerKind::Main, 0).unwrap());
        }

        reveal.set_visible(false);
        let mut previous = forward[5].opacity;
        for step in (0..5).rev() {
            reveal.update(0.05);
            let style = reveal.glyph_style(LayerKind::Main, 0).unwrap();
            assert!((style.opacity - forward[step].opacity).abs() < EPSILON);
            assert!((style.y_percent - forward[step].y_percent).abs() < 1e-2);
            assert!(style.opacity <= previous);
            previous = style.opacity;
        }

        // 与进场相同的时长后回到静止态
        reveal.update(0.05);
        let style = reveal.glyph_style(LayerKind::Main, 0).unwrap();
        assert!(style.opacity.abs() < EPSILON);
        assert!((style.y_percent - 120.0).abs() < 1e-2);
        assert!((style.skew_x + 20.0).abs() < 1e-2);
    }

    #[test]
    fn test_trail_built_once_across_toggles() {
        let mut reveal = mount(RevealProps::new("WORK"), true);
        for visible in [false, true, false, true] {
            reveal.set_visible(visible);
            run(&mut reveal, 0.2);
        }
        assert_eq!(reveal.build_count(), 1);
    }

    #[test]
    fn test_trail_stagger_order() {
        let mut reveal = mount(RevealProps::new("ABC"), true);
        run(&mut reveal, 0.1);

        let first = reveal.glyph_style(LayerKind::Main, 0).unwrap().opacity;
        let last = reveal.glyph_style(LayerKind::Main, 2).unwrap().opacity;
        assert!(first > last);

        // 残影晚于主层开始
        let ghost = reveal.glyph_style(LayerKind::Ghost2, 0).unwrap().opacity;
        assert!(ghost < first);
    }

    #[test]
    fn test_sync_mode_moves_together() {
        let mut reveal = mount(RevealProps::new("SYNC").mode(RevealMode::Sync), true);
        run(&mut reveal, 0.2);

        let first = reveal.glyph_style(LayerKind::Main, 0).unwrap();
        for index in 1..4 {
            assert_eq!(reveal.glyph_style(LayerKind::Main, index).unwrap(), first);
        }
    }

    #[test]
    fn test_mount_hidden_trail_stays_at_rest() {
        let mut reveal = mount(RevealProps::new("HIDDEN"), false);
        run(&mut reveal, 1.0);

        assert!(!reveal.is_animating());
        assert_eq!(reveal.progress(), 0.0);
        assert_eq!(reveal.glyph_style(LayerKind::Ghost1, 0).unwrap().opacity, 0.0);
    }

    #[test]
    fn test_delay_postpones_entry() {
        let mut reveal = mount(RevealProps::new("LATE").delay(0.4), true);
        run(&mut reveal, 0.35);
        assert_eq!(reveal.glyph_style(LayerKind::Main, 0).unwrap().opacity, 0.0);

        run(&mut reveal, 0.2);
        assert!(reveal.glyph_style(LayerKind::Main, 0).unwrap().opacity > 0.0);
    }

    #[test]
    fn test_zoom_rebuilds_on_each_toggle() {
        let props = RevealProps::new("WHO").variant(RevealVariant::Zoom);
        let mut reveal = mount(props, true);
        assert_eq!(reveal.build_count(), 1);

        run(&mut reveal, 2.0);
        for layer in LayerKind::ALL {
            let style = reveal.glyph_style(layer, 1).unwrap();
            assert!((style.scale - 1.0).abs() < EPSILON);
            assert!((style.opacity - layer.opacity_tier()).abs() < EPSILON);
        }

        reveal.set_visible(false);
        assert_eq!(reveal.build_count(), 2);
        run(&mut reveal, 1.0);
        let style = reveal.glyph_style(LayerKind::Main, 0).unwrap();
        assert!((style.scale - 8.0).abs() < EPSILON);
        assert!((style.skew_x - 8.0).abs() < EPSILON);
        assert!(style.opacity.abs() < EPSILON);

        reveal.set_visible(true);
        assert_eq!(reveal.build_count(), 3);
    }

    #[test]
    fn test_zoom_exit_starts_from_current_state() {
        let props = RevealProps::new("WHO").variant(RevealVariant::Zoom);
        let mut reveal = mount(props, true);
        run(&mut reveal, 0.3);
        let mid = reveal.glyph_style(LayerKind::Main, 0).unwrap();

        reveal.set_visible(false);
        assert_eq!(reveal.glyph_style(LayerKind::Main, 0).unwrap(), mid);
    }

    #[test]
    fn test_zoom_reenter_starts_hidden() {
        let props = RevealProps::new("WHO").variant(RevealVariant::Zoom);
        let mut reveal = mount(props, true);
        run(&mut reveal, 2.0);
        reveal.set_visible(false);
        run(&mut reveal, 0.2);

        reveal.set_visible(true);
        for layer in LayerKind::ALL {
            let style = reveal.glyph_style(layer, 0).unwrap();
            assert_eq!(style, GlyphStyle::zoom_hidden(8.0));
        }
        run(&mut reveal, 2.0);
        let style = reveal.glyph_style(LayerKind::Main, 0).unwrap();
        assert!((style.scale - 1.0).abs() < EPSILON);
        assert!((style.opacity - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_capability_lost_while_playing_shows_end_state() {
        let capability = MotionCapability::loaded();
        let mut reveal = TextReveal::mount(
            RevealProps::new("GONE"),
            true,
            &RevealTimings::default(),
            capability.clone(),
        );
        run(&mut reveal, 0.2);
        assert!(reveal.is_animating());

        capability.unload();
        assert!(!reveal.update(0.05));

        assert!(reveal.reveal_timeline().is_none());
        assert_eq!(reveal.progress(), 1.0);
        for layer in LayerKind::ALL {
            for index in 0..4 {
                assert_eq!(
                    reveal.glyph_style(layer, index),
                    Some(GlyphStyle::shown(layer))
                );
            }
        }
    }

    #[test]
    fn test_zoom_mounted_hidden_is_static() {
        let props = RevealProps::new("WHO").variant(RevealVariant::Zoom);
        let mut reveal = mount(props, false);

        assert_eq!(reveal.build_count(), 0);
        assert!(reveal.reveal_timeline().is_none());
        run(&mut reveal, 0.5);

        let style = reveal.glyph_style(LayerKind::Main, 2).unwrap();
        assert_eq!(style.scale, 8.0);
        assert_eq!(style.opacity, 0.0);
    }

    #[test]
    fn test_zoom_enter_order() {
        let props = RevealProps::new("AB").variant(RevealVariant::Zoom);
        let mut reveal = mount(props, true);
        reveal.update(0.05);

        // 组合列表顺序：残影 2、残影 1、主层
        let ghost2 = reveal.glyph_style(LayerKind::Ghost2, 0).unwrap().scale;
        let main = reveal.glyph_style(LayerKind::Main, 0).unwrap().scale;
        assert!(ghost2 < main);
    }

    #[test]
    fn test_without_capability_renders_end_state() {
        let mut reveal = TextReveal::mount(
            RevealProps::new("STATIC"),
            false,
            &RevealTimings::default(),
            MotionCapability::unavailable(),
        );

        assert!(reveal.reveal_timeline().is_none());
        assert_eq!(reveal.progress(), 1.0);
        for layer in LayerKind::ALL {
            assert_eq!(reveal.glyph_style(layer, 0), Some(GlyphStyle::shown(layer)));
        }

        reveal.set_visible(true);
        assert!(!reveal.update(0.1));
        assert_eq!(reveal.build_count(), 0);
    }

    #[test]
    fn test_capability_restored_rebuilds_from_rest() {
        let capability = MotionCapability::unavailable();
        let mut reveal = TextReveal::mount(
            RevealProps::new("BACK"),
            false,
            &RevealTimings::default(),
            capability.clone(),
        );

        capability.load();
        reveal.set_visible(true);

        assert_eq!(reveal.build_count(), 1);
        assert!(reveal.is_animating());
        assert_eq!(reveal.glyph_style(LayerKind::Main, 0).unwrap().opacity, 0.0);
    }

    #[test]
    fn test_set_props_rebuilds_and_replays() {
        let mut reveal = mount(RevealProps::new("OLD"), true);
        run(&mut reveal, 2.0);

        reveal.set_props(RevealProps::new("NEW TEXT"));
        assert_eq!(reveal.build_count(), 2);
        assert_eq!(reveal.label(), "NEW TEXT");
        assert_eq!(reveal.characters()[3], '\u{00A0}');
        assert_eq!(reveal.layer(LayerKind::Ghost1).len(), 8);
        assert!(reveal.is_animating());
        assert_eq!(
            reveal.reveal_timeline().unwrap().props(),
            &RevealProps::new("NEW TEXT")
        );

        // 相同输入不重建
        reveal.set_props(RevealProps::new("NEW TEXT"));
        assert_eq!(reveal.build_count(), 2);
    }

    #[test]
    fn test_set_progress_scrubs() {
        let mut reveal = mount(RevealProps::new("A").mode(RevealMode::Sync), false);
        reveal.set_progress(1.0);

        let style = reveal.glyph_style(LayerKind::Main, 0).unwrap();
        assert!((style.opacity - 1.0).abs() < EPSILON);
        assert!(!reveal.is_animating());
    }
}
