//! # Stagger 模块
//!
//! 多目标补间的交错偏移。语义对齐 GSAP 的 `stagger: { each, from }`。

use serde::{Deserialize, Serialize};

/// 交错的起点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaggerFrom {
    /// 从第一个目标开始依次延后
    #[default]
    Start,
    /// 从两端向中心收拢
    Edges,
    /// 从中心向两端扩散
    Center,
}

/// 交错配置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stagger {
    /// 每一步的延迟（秒）
    pub each: f32,
    /// 起点
    #[serde(default)]
    pub from: StaggerFrom,
}

impl Stagger {
    /// 从第一个目标开始的等步交错
    pub fn each(each: f32) -> Self {
        Self {
            each,
            from: StaggerFrom::Start,
        }
    }

    /// 从两端开始
    pub fn from_edges(each: f32) -> Self {
        Self {
            each,
            from: StaggerFrom::Edges,
        }
    }

    /// 从中心开始
    pub fn from_center(each: f32) -> Self {
        Self {
            each,
            from: StaggerFrom::Center,
        }
    }

    /// 计算第 `index` 个目标（共 `count` 个）的步数
    ///
    /// 偶数个目标时，中心位于两个中间目标之间，步数可能为小数。
    pub fn steps(&self, index: usize, count: usize) -> f32 {
        if count <= 1 {
            return 0.0;
        }
        let index = index.min(count - 1) as f32;
        let middle = (count - 1) as f32 / 2.0;
        match self.from {
            StaggerFrom::Start => index,
            StaggerFrom::Center => (index - middle).abs(),
            StaggerFrom::Edges => middle - (index - middle).abs(),
        }
    }

    /// 计算第 `index` 个目标的延迟（秒）
    pub fn offset(&self, index: usize, count: usize) -> f32 {
        self.each.max(0.0) * self.steps(index, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start() {
        let stagger = Stagger::each(0.03);
        assert_eq!(stagger.steps(0, 5), 0.0);
        assert_eq!(stagger.steps(4, 5), 4.0);
        assert!((stagger.offset(4, 5) - 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_edges_converge_to_center() {
        let stagger = Stagger::from_edges(0.003);
        let steps: Vec<f32> = (0..7).map(|i| stagger.steps(i, 7)).collect();
        assert_eq!(steps, vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_center_spreads_outward() {
        let stagger = Stagger::from_center(0.003);
        let steps: Vec<f32> = (0..7).map(|i| stagger.steps(i, 7)).collect();
        assert_eq!(steps, vec![3.0, 2.0, 1.0, 0.0, 1.0, 2.0, 3.0]);
        assert!((stagger.offset(0, 7) - 0.009).abs() < 1e-6);
    }

    #[test]
    fn test_single_target() {
        let stagger = Stagger::from_center(0.5);
        assert_eq!(stagger.offset(0, 1), 0.0);
        assert_eq!(stagger.offset(0, 0), 0.0);
    }

    #[test]
    fn test_even_count_center() {
        let stagger = Stagger::from_center(1.0);
        assert_eq!(stagger.steps(1, 4), 0.5);
        assert_eq!(stagger.steps(2, 4), 0.5);
        assert_eq!(stagger.steps(0, 4), 1.5);
    }
}
