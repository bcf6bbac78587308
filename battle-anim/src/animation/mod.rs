//! # Animation 模块
//!
//! 声明式动画核心：插值属性、组合时间轴与播放控制。
//!
//! ## 核心设计理念
//!
//! 时间轴只描述 **某个属性在一段时间内从哪里到哪里**：
//! - 叶子持有 [`PropertyRef`]，不假设对象类型
//! - 顺序 / 并行节点只负责时长的组合
//! - 播放位置、状态与通知全部由 [`Transport`] 维护
//!
//! ## 核心概念
//!
//! - `Animatable`: 可动画对象接口
//! - `Timeline`: 顺序 / 并行 / 叶子组成的不可变树
//! - `Schedule`: 展开后的叶子列表，用于精确跳转
//! - `Transport`: 播放、暂停、停止、跳转
//! - `TransportHandle`: 其他线程使用的阻塞式控制句柄
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let alpha = ValueCell::new(0.0);
//! let timeline = Timeline::sequential([
//!     Timeline::tween(alpha.property(), 0.0, 1.0, Duration::from_millis(300)),
//!     Timeline::pause(Duration::from_millis(500)),
//! ]);
//!
//! let mut transport = Transport::new(timeline);
//! transport.play();
//! transport.advance(Duration::from_millis(150));
//! assert_eq!(alpha.get(), 0.5);
//! ```

mod easing;
mod remote;
mod schedule;
mod timeline;
mod traits;
mod transport;

pub use easing::EasingFunction;
pub use remote::{TransportCommand, TransportHandle};
pub use schedule::{LeafPhase, Schedule, ScheduledLeaf};
pub use timeline::{Leaf, Timeline};
pub use traits::{Animatable, PropertyRef, ValueCell};
pub use transport::{Transport, TransportEvent, TransportState, TransportStatus};
