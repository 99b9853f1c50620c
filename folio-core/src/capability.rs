//! # Capability 模块
//!
//! 动画引擎的可用性开关。
//!
//! 编排器和文字动画在每次需要动画时检查引擎是否可用；不可用时走无动画的降级路径。
//! 句柄可克隆，所有克隆共享同一状态。

use std::cell::Cell;
use std::rc::Rc;

/// 动画引擎可用性句柄
#[derive(Debug, Clone)]
pub struct MotionCapability {
    loaded: Rc<Cell<bool>>,
}

impl MotionCapability {
    /// 已加载的引擎
    pub fn loaded() -> Self {
        Self {
            loaded: Rc::new(Cell::new(true)),
        }
    }

    /// 未加载的引擎
    pub fn unavailable() -> Self {
        Self {
            loaded: Rc::new(Cell::new(false)),
        }
    }

    /// 调用时检查引擎是否可用
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// 标记引擎已加载
    pub fn load(&self) {
        self.loaded.set(true);
    }

    /// 标记引擎已卸载
    pub fn unload(&self) {
        self.loaded.set(false);
    }
}

impl Default for MotionCapability {
    fn default() -> Self {
        Self::loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let capability = MotionCapability::loaded();
        let observer = capability.clone();
        assert!(observer.is_loaded());

        capability.unload();
        assert!(!observer.is_loaded());

        observer.load();
        assert!(capability.is_loaded());
    }

    #[test]
    fn test_unavailable() {
        assert!(!MotionCapability::unavailable().is_loaded());
        assert!(MotionCapability::default().is_loaded());
    }
}
