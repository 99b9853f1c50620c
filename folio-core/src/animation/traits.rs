//! # Traits 模块
//!
//! 基于 Trait 的动画系统核心接口定义。
//!
//! ## 核心概念
//!
//! - `ObjectId`: 由 Timeline 分配的对象标识符
//! - `TweenKey`: 对象 + 属性，唯一标识一条补间轨道
//! - `Animatable`: 可动画对象接口

/// 对象标识符
///
/// 由 `Timeline` 在对象注册时分配，在同一条时间线内唯一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    /// 创建新的对象 ID（仅供 Timeline 内部使用）
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// 补间轨道键
///
/// 同一时间线中，同一对象的同一属性只保留一条补间（后加入的覆盖先前的）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenKey {
    /// 对象 ID
    pub object_id: ObjectId,
    /// 属性名称
    pub property_id: &'static str,
}

impl TweenKey {
    /// 创建轨道键
    pub fn new(object_id: ObjectId, property_id: &'static str) -> Self {
        Self {
            object_id,
            property_id,
        }
    }
}

impl std::fmt::Display for TweenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.object_id, self.property_id)
    }
}

/// 可动画对象接口
///
/// 对象通过实现此 trait 声明自己有哪些属性可以被动画。
/// 实现方使用内部可变性（`Cell` / `RefCell`），时间线通过共享引用写入属性。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Fader {
///     alpha: Cell<f32>,
/// }
///
/// impl Animatable for Fader {
///     fn get_property(&self, property_id: &str) -> Option<f32> {
///         match property_id {
///             "alpha" => Some(self.alpha.get()),
///             _ => None,
///         }
///     }
///
///     fn set_property(&self, property_id: &str, value: f32) -> bool {
///         match property_id {
///             "alpha" => { self.alpha.set(value); true }
///             _ => false,
///         }
///     }
///
///     fn property_list(&self) -> &'static [&'static str] {
///         &["alpha"]
///     }
/// }
/// ```
pub trait Animatable: 'static {
    /// 获取属性的当前值
    ///
    /// # 返回
    /// - `Some(value)`: 属性存在，返回当前值
    /// - `None`: 属性不存在
    fn get_property(&self, property_id: &str) -> Option<f32>;

    /// 设置属性的新值
    ///
    /// # 返回
    /// - `true`: 设置成功
    /// - `false`: 属性不存在
    fn set_property(&self, property_id: &str, value: f32) -> bool;

    /// 获取所有可动画属性的列表
    ///
    /// 用于调试和验证。
    fn property_list(&self) -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_object_id() {
        let id1 = ObjectId::new(1);
        let id2 = ObjectId::new(2);
        let id1_copy = ObjectId::new(1);

        assert_eq!(id1, id1_copy);
        assert_ne!(id1, id2);
        assert_eq!(id1.value(), 1);
    }

    #[test]
    fn test_tween_key() {
        let id = ObjectId::new(1);
        let key1 = TweenKey::new(id, "opacity");
        let key2 = TweenKey::new(id, "opacity");
        let key3 = TweenKey::new(id, "scale");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        assert_eq!(key1.to_string(), "ObjectId(1):opacity");
    }

    struct TestAnimatable {
        alpha: Cell<f32>,
        scale: Cell<f32>,
    }

    impl Animatable for TestAnimatable {
        fn get_property(&self, property_id: &str) -> Option<f32> {
            match property_id {
                "alpha" => Some(self.alpha.get()),
                "scale" => Some(self.scale.get()),
                _ => None,
            }
        }

        fn set_property(&self, property_id: &str, value: f32) -> bool {
            match property_id {
                "alpha" => {
                    self.alpha.set(value);
                    true
                }
                "scale" => {
                    self.scale.set(value);
                    true
                }
                _ => false,
            }
        }

        fn property_list(&self) -> &'static [&'static str] {
            &["alpha", "scale"]
        }
    }

    #[test]
    fn test_animatable_trait() {
        let obj = TestAnimatable {
            alpha: Cell::new(1.0),
            scale: Cell::new(1.0),
        };

        assert_eq!(obj.get_property("alpha"), Some(1.0));
        assert_eq!(obj.get_property("unknown"), None);

        assert!(obj.set_property("alpha", 0.5));
        assert_eq!(obj.get_property("alpha"), Some(0.5));
        assert!(!obj.set_property("unknown", 0.0));

        assert_eq!(obj.property_list(), &["alpha", "scale"]);
    }
}
