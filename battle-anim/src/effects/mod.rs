//! # Effects 模块
//!
//! 最简单的内置效果：一个矩形单位和一个飞行光球法术。
//!
//! 供模拟工具与测试使用，同时演示提供者应当如何满足"恰好一次"约定。

mod spell;
mod unit;

pub use spell::BasicSpell;
pub use unit::BasicUnit;
