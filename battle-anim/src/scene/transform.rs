//! # Transform 模块
//!
//! 节点的局部变换：平移、缩放、旋转。

use serde::Serialize;

use super::Point;

/// 局部变换
///
/// 应用顺序：缩放 → 旋转 → 平移。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    /// 平移
    pub translate: Point,
    /// 缩放因子（`x = -1` 即水平镜像）
    pub scale: Point,
    /// 旋转角度（弧度）
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: Point::ZERO,
            scale: Point::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// 单位变换
    pub fn identity() -> Self {
        Self::default()
    }

    /// 只有平移的变换
    pub fn with_translate(x: f64, y: f64) -> Self {
        Self {
            translate: Point::new(x, y),
            ..Self::default()
        }
    }

    /// 只有缩放的变换
    pub fn with_scale(x: f64, y: f64) -> Self {
        Self {
            scale: Point::new(x, y),
            ..Self::default()
        }
    }

    /// 均匀缩放
    pub fn with_uniform_scale(s: f64) -> Self {
        Self::with_scale(s, s)
    }

    /// 线性插值到另一个变换
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            translate: self.translate.lerp(other.translate, t),
            scale: self.scale.lerp(other.scale, t),
            rotation: self.rotation + (other.rotation - self.rotation) * t,
        }
    }

    /// 把局部坐标映射到父节点坐标
    pub fn apply(&self, point: Point) -> Point {
        let x = point.x * self.scale.x;
        let y = point.y * self.scale.y;
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(
            x * cos - y * sin + self.translate.x,
            x * sin + y * cos + self.translate.y,
        )
    }
}
