//! # Camera 模块
//!
//! 镜头平移求解。
//!
//! 每次攻击前根据双方当前的 X 偏移和逻辑视口宽度，算出攻击方/防守方的平移目标：
//!
//! - 双方能同框：两个目标都取中点，镜头居中
//! - 双方距离过远：镜头分别越过各自一侧，贴近边距
//!
//! 单位会移动，所以每次攻击都要重新求解。

use std::time::Duration;

/// 默认越界边距
pub const DEFAULT_PAN_MARGIN: f64 = 75.0;

/// 平移目标（逻辑坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanTargets {
    /// 左侧行动时的平移目标
    pub left: f64,
    /// 右侧行动时的平移目标
    pub right: f64,
    /// 是否采用居中策略
    pub centered: bool,
}

/// 平移求解器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSolver {
    /// 越界边距
    pub margin: f64,
}

impl Default for PanSolver {
    fn default() -> Self {
        Self::new(DEFAULT_PAN_MARGIN)
    }
}

impl PanSolver {
    /// 创建求解器
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    /// 求解平移目标
    ///
    /// # 参数
    /// - `left_x` / `right_x`：双方当前 X 偏移
    /// - `viewport_width`：逻辑视口宽度
    pub fn solve(&self, left_x: f64, right_x: f64, viewport_width: f64) -> PanTargets {
        let center = (left_x + right_x) / 2.0;
        let centered = (left_x - right_x).abs() <= viewport_width - self.margin;

        if centered {
            PanTargets {
                left: center,
                right: center,
                centered,
            }
        } else {
            let half = viewport_width / 2.0;
            PanTargets {
                left: -left_x + self.margin - half,
                right: -right_x - self.margin + half,
                centered,
            }
        }
    }
}

/// 平移耗时：与移动距离成正比
///
/// 非有限值或非正值退化为 0。
pub fn pan_duration(from: f64, to: f64, ms_per_pixel: f64) -> Duration {
    let millis = (to - from).abs() * ms_per_pixel;
    if millis.is_finite() && millis > 0.0 {
        Duration::from_nanos((millis * 1_000_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}
