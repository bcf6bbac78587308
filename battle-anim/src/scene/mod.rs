//! # Scene 模块
//!
//! 渲染无关的场景树。编排器搭建节点层级，时间轴改写节点属性，
//! 宿主（或导出工具）读取快照绘制。

mod geometry;
mod node;
mod transform;

pub use geometry::{Color, Point, ViewportSize};
pub use node::{NODE_PROPERTIES, NodeKind, NodeSnapshot, SceneNode};
pub use transform::Transform;
