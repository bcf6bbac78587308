//! # Analyzer 模块
//!
//! 连续攻击分析：找出包含某次攻击的、同一攻击方的最长连续段，
//! 供单位根据"第几下、一共几下"选择不同的攻击动作。
//!
//! 攻击列表是静态输入，每个下标都重新计算，不保留增量状态。

use serde::Serialize;

use crate::strike::Strike;

/// 连续攻击描述
///
/// 不变式：`1 <= current <= total`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ConsecutiveAttack {
    /// 在连续段中的位置（从 1 开始）
    pub current: usize,
    /// 连续段长度
    pub total: usize,
}

impl ConsecutiveAttack {
    /// 单独一次攻击
    pub const ONLY: Self = Self {
        current: 1,
        total: 1,
    };

    /// 是否为连续段的第一下
    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    /// 是否为连续段的最后一下
    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// 是否没有同一攻击方的相邻攻击
    pub fn is_only(&self) -> bool {
        self.total == 1
    }
}

/// 分析第 `index` 次攻击所在的连续段
///
/// 从 `index` 向前、向后分别扫描同一攻击方的攻击：
/// `current = left`，`total = left + right - 1`（两侧计数都包含 `index` 自身）。
///
/// # Panics
///
/// `index` 越界时 panic，与切片下标一致。
pub fn analyze(strikes: &[Strike], index: usize) -> ConsecutiveAttack {
    let attacker = strikes[index].attacker;

    let left = strikes[..=index]
        .iter()
        .rev()
        .take_while(|s| s.attacker == attacker)
        .count();
    let right = strikes[index..]
        .iter()
        .take_while(|s| s.attacker == attacker)
        .count();

    ConsecutiveAttack {
        current: left,
        total: left + right - 1,
    }
}

/// 逐个分析所有攻击
pub fn analyze_all(strikes: &[Strike]) -> Vec<ConsecutiveAttack> {
    (0..strikes.len()).map(|i| analyze(strikes, i)).collect()
}
