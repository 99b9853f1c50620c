//! 锚点注册表：场景 → 锚点矩形。
//!
//! 视图挂载时注册自己的锚点，卸载时（句柄 drop）移除；编排器只读。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::phase::Scene;
use crate::error::TransitionError;
use crate::geometry::Rect;

#[derive(Debug, Default)]
struct Registry {
    /// 场景 -> (注册代数, 矩形)
    entries: HashMap<Scene, (u64, Rect)>,
    next_generation: u64,
}

/// 锚点注册表（可克隆，共享同一份数据）
#[derive(Debug, Clone, Default)]
pub struct AnchorRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册锚点，返回的句柄 drop 时自动移除
    ///
    /// 同一场景重复注册时，新句柄接管，旧句柄失效。
    pub fn register(&self, scene: Scene, rect: Rect) -> AnchorHandle {
        let mut registry = self.inner.borrow_mut();
        registry.next_generation += 1;
        let generation = registry.next_generation;
        registry.entries.insert(scene, (generation, rect));
        debug!(scene = %scene, anchor = scene.anchor_id(), "锚点已注册");

        AnchorHandle {
            registry: self.clone(),
            scene,
            generation,
        }
    }

    /// 查询锚点矩形
    pub fn lookup(&self, scene: Scene) -> Option<Rect> {
        self.inner
            .borrow()
            .entries
            .get(&scene)
            .map(|(_, rect)| *rect)
    }

    /// 查询锚点矩形，不存在时返回 `AnchorNotFound`
    pub fn resolve(&self, scene: Scene) -> Result<Rect, TransitionError> {
        self.lookup(scene)
            .ok_or(TransitionError::AnchorNotFound(scene))
    }

    pub fn contains(&self, scene: Scene) -> bool {
        self.inner.borrow().entries.contains_key(&scene)
    }

    /// 已注册的锚点数量
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, scene: Scene, generation: u64) {
        let mut registry = self.inner.borrow_mut();
        if registry
            .entries
            .get(&scene)
            .is_some_and(|(current, _)| *current == generation)
        {
            registry.entries.remove(&scene);
            debug!(scene = %scene, "锚点已移除");
        }
    }

    fn update(&self, scene: Scene, generation: u64, rect: Rect) {
        if let Some(entry) = self.inner.borrow_mut().entries.get_mut(&scene)
            && entry.0 == generation
        {
            entry.1 = rect;
        }
    }
}

/// 锚点注册句柄，由视图持有
#[derive(Debug)]
pub struct AnchorHandle {
    registry: AnchorRegistry,
    scene: Scene,
    generation: u64,
}

impl AnchorHandle {
    pub fn scene(&self) -> Scene {
        self.scene
    }

    /// 布局变化后更新矩形
    pub fn set_rect(&self, rect: Rect) {
        self.registry.update(self.scene, self.generation, rect);
    }

    /// 当前矩形（已被新注册接管时为 `None`）
    pub fn rect(&self) -> Option<Rect> {
        self.registry
            .inner
            .borrow()
            .entries
            .get(&self.scene)
            .filter(|(generation, _)| *generation == self.generation)
            .map(|(_, rect)| *rect)
    }
}

impl Drop for AnchorHandle {
    fn drop(&mut self) {
        self.registry.remove(self.scene, self.generation);
    }
}
