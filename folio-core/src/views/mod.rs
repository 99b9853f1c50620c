//! # Views 模块
//!
//! 四个视图的外壳与驱动它们的舞台。视图内部布局不在本库范围内，
//! 外壳只负责注册锚点和消费文字可见性。

mod shell;
mod stage;

pub use shell::{SceneView, headlines};
pub use stage::Stage;
