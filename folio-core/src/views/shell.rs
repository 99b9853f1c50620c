//! 视图外壳：注册锚点，持有标题文字。

use tracing::debug;

use crate::capability::MotionCapability;
use crate::config::RevealTimings;
use crate::geometry::Rect;
use crate::reveal::{RevealMode, RevealProps, RevealVariant, TextReveal};
use crate::transition::{AnchorHandle, AnchorRegistry, Scene};

/// 场景的标题文字
pub fn headlines(scene: Scene) -> Vec<RevealProps> {
    match scene {
        Scene::Home => vec![
            RevealProps::new("CREATION OF").delay(0.2),
            RevealProps::new("SOMETHING SPECIAL").delay(0.4),
            RevealProps::new("WELCOME TO THE WONDERLAND").delay(0.6),
            RevealProps::new("In the shadowed depths of yon ancient keep,")
                .delay(0.7)
                .mode(RevealMode::Sync),
            RevealProps::new("lurketh secrets darker than the night.")
                .delay(0.8)
                .mode(RevealMode::Sync),
        ],
        Scene::About => {
            let mut reveals = vec![RevealProps::new("WHO").variant(RevealVariant::Zoom)];
            reveals.extend(
                ["CINEMA", "THEATER", "CODE"]
                    .into_iter()
                    .enumerate()
                    .map(|(index, category)| {
                        RevealProps::new(category).delay(0.5 + index as f32 * 0.1)
                    }),
            );
            reveals
        }
        Scene::Work | Scene::Contact => Vec::new(),
    }
}

/// 已挂载的视图
///
/// drop 时锚点随 `AnchorHandle` 一起移除。
#[derive(Debug)]
pub struct SceneView {
    scene: Scene,
    anchor: Option<AnchorHandle>,
    reveals: Vec<TextReveal>,
}

impl SceneView {
    /// 挂载视图
    ///
    /// `anchor` 为 `None` 表示该视图没有渲染锚点元素。
    pub fn mount(
        scene: Scene,
        anchor: Option<Rect>,
        anchors: &AnchorRegistry,
        text_visible: bool,
        timings: &RevealTimings,
        capability: &MotionCapability,
    ) -> Self {
        debug!(scene = %scene, has_anchor = anchor.is_some(), "挂载视图");
        let anchor = anchor.map(|rect| anchors.register(scene, rect));
        let reveals = headlines(scene)
            .into_iter()
            .map(|props| TextReveal::mount(props, text_visible, timings, capability.clone()))
            .collect();

        Self {
            scene,
            anchor,
            reveals,
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    /// 当前锚点矩形
    pub fn anchor_rect(&self) -> Option<Rect> {
        self.anchor.as_ref().and_then(|handle| handle.rect())
    }

    /// 布局变化后移动锚点
    pub fn relayout(&self, rect: Rect) {
        if let Some(handle) = &self.anchor {
            handle.set_rect(rect);
        }
    }

    pub fn reveals(&self) -> &[TextReveal] {
        &self.reveals
    }

    /// 查找标题文字
    pub fn reveal(&self, content: &str) -> Option<&TextReveal> {
        self.reveals.iter().find(|reveal| reveal.label() == content)
    }

    /// 把文字可见性传给所有标题
    pub fn set_text_visible(&mut self, visible: bool) {
        for reveal in &mut self.reveals {
            reveal.set_visible(visible);
        }
    }

    /// 推进所有标题
    ///
    /// # 返回
    /// 是否还有标题在播放
    pub fn update(&mut self, dt: f32) -> bool {
        self.reveals
            .iter_mut()
            .fold(false, |animating, reveal| reveal.update(dt) || animating)
    }
}

impl Drop for SceneView {
    fn drop(&mut self) {
        debug!(scene = %self.scene, "卸载视图");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headlines() {
        let home = headlines(Scene::Home);
        assert_eq!(home.len(), 5);
        assert_eq!(home[0].content, "CREATION OF");
        assert_eq!(home[3].mode, RevealMode::Sync);

        let about = headlines(Scene::About);
        assert_eq!(about[0].variant, RevealVariant::Zoom);
        assert!((about[3].delay - 0.7).abs() < 1e-6);

        assert!(headlines(Scene::Work).is_empty());
    }

    #[test]
    fn test_mount_registers_anchor_until_drop() {
        let anchors = AnchorRegistry::new();
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let view = SceneView::mount(
            Scene::Home,
            Some(rect),
            &anchors,
            true,
            &RevealTimings::default(),
            &MotionCapability::loaded(),
        );

        assert_eq!(anchors.lookup(Scene::Home), Some(rect));
        assert_eq!(view.anchor_rect(), Some(rect));
        assert_eq!(view.reveals().len(), 5);

        drop(view);
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_mount_without_anchor() {
        let anchors = AnchorRegistry::new();
        let view = SceneView::mount(
            Scene::Work,
            None,
            &anchors,
            true,
            &RevealTimings::default(),
            &MotionCapability::loaded(),
        );

        assert!(!anchors.contains(Scene::Work));
        assert_eq!(view.anchor_rect(), None);
    }

    #[test]
    fn test_text_visibility_reaches_reveals() {
        let anchors = AnchorRegistry::new();
        let mut view = SceneView::mount(
            Scene::About,
            None,
            &anchors,
            false,
            &RevealTimings::default(),
            &MotionCapability::loaded(),
        );
        assert!(!view.update(0.1));

        view.set_text_visible(true);
        assert!(view.reveals().iter().all(|reveal| reveal.is_visible()));
        assert!(view.update(0.1));
        assert!(view.reveal("WHO").is_some());
    }
}
