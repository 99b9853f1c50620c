//! # Error 模块
//!
//! 定义 folio-core 中使用的错误类型。

use thiserror::Error;

use crate::animation::ObjectId;
use crate::transition::{Scene, TransitionPhase};

/// 动画错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// 对象未注册到时间线
    #[error("对象 {0} 未注册")]
    ObjectNotRegistered(ObjectId),

    /// 对象不存在该属性
    #[error("对象 {object} 不存在属性 '{property}'")]
    PropertyNotFound {
        object: ObjectId,
        property: &'static str,
    },
}

/// 过渡错误
///
/// 全部在编排器内部恢复，不会暴露给用户。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// 动画引擎未加载
    #[error("动画引擎不可用")]
    CapabilityUnavailable,

    /// 场景锚点不存在
    #[error("场景 {0} 的锚点元素不存在")]
    AnchorNotFound(Scene),

    /// 非空闲阶段缺少待切换目标
    #[error("阶段 {phase:?} 缺少待切换目标")]
    MissingPendingTarget { phase: TransitionPhase },

    /// 动画构建失败
    #[error("动画错误: {0}")]
    Animation(#[from] AnimationError),
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// 场景名解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知场景 '{input}'，可选值：home、work、about、contact")]
pub struct ParseSceneError {
    pub input: String,
}

/// Result 类型别名
pub type TransitionResult<T> = Result<T, TransitionError>;
