//! # Schedule 模块
//!
//! 把组合时间轴展开为带绝对起点的叶子列表。
//!
//! 顺序节点的子节点起点按前缀和累加，并行节点的子节点共享起点。
//! 求值时：
//!
//! 1. 尚未开始的叶子按倒序写入初始值（同一属性最早的叶子生效）
//! 2. 已经开始的叶子按顺序写入当前值（超出时长则为终值，后开始的覆盖先开始的）
//!
//! 因此任意方向跳转都能得到"自然播放到该位置"的结果。

use std::time::Duration;

use super::{Leaf, Timeline};

/// 叶子所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafPhase {
    /// 尚未开始
    Pending,
    /// 正在进行
    Active,
    /// 已结束
    Done,
}

/// 带绝对起点的叶子
#[derive(Debug, Clone)]
pub struct ScheduledLeaf {
    /// 绝对起点
    pub start: Duration,
    /// 叶子
    pub leaf: Leaf,
}

impl ScheduledLeaf {
    /// 绝对终点
    pub fn end(&self) -> Duration {
        self.start + self.leaf.duration()
    }

    /// 时间 `t` 时所处阶段
    ///
    /// 零时长叶子在起点即视为结束。
    pub fn phase_at(&self, t: Duration) -> LeafPhase {
        if t < self.start {
            LeafPhase::Pending
        } else if t < self.end() {
            LeafPhase::Active
        } else {
            LeafPhase::Done
        }
    }
}

/// 展开后的时间轴
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<ScheduledLeaf>,
    total: Duration,
}

impl Schedule {
    /// 展开时间轴
    ///
    /// 停顿叶子只贡献时长，不进入列表。
    pub fn compile(root: Timeline) -> Self {
        let total = root.duration();
        let mut entries = Vec::new();
        collect(root, Duration::ZERO, &mut entries);
        // 稳定排序：同一起点保持文档顺序
        entries.sort_by_key(|entry| entry.start);
        Self { entries, total }
    }

    /// 总时长
    pub fn total(&self) -> Duration {
        self.total
    }

    /// 所有写属性的叶子（按起点排序）
    pub fn entries(&self) -> &[ScheduledLeaf] {
        &self.entries
    }

    /// 把所有属性解析到时间 `t`（截断到 `[0, total]`）
    pub fn apply(&self, t: Duration) {
        let t = t.min(self.total);

        for entry in self.entries.iter().rev().filter(|e| e.start > t) {
            entry.leaf.apply_initial();
        }

        for entry in self.entries.iter().filter(|e| e.start <= t) {
            entry.leaf.apply_at(t - entry.start);
        }
    }

    /// 时间 `t` 时正在进行的叶子数量
    pub fn active_count(&self, t: Duration) -> usize {
        self.entries
            .iter()
            .filter(|e| e.phase_at(t) == LeafPhase::Active)
            .count()
    }
}

fn collect(node: Timeline, offset: Duration, out: &mut Vec<ScheduledLeaf>) {
    match node {
        Timeline::Sequential(children) => {
            let mut start = offset;
            for child in children {
                let duration = child.duration();
                collect(child, start, out);
                start += duration;
            }
        }
        Timeline::Parallel(children) => {
            for child in children {
                collect(child, offset, out);
            }
        }
        Timeline::Leaf(Leaf::Pause(_)) => {}
        Timeline::Leaf(leaf) => out.push(ScheduledLeaf {
            start: offset,
            leaf,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ValueCell;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_offsets() {
        let a = ValueCell::new(0.0);
        let b = ValueCell::new(0.0);
        let schedule = Schedule::compile(Timeline::sequential([
            Timeline::pause(ms(100)),
            Timeline::parallel([
                Timeline::tween(a.property(), 0.0, 1.0, ms(50)),
                Timeline::sequential([
                    Timeline::pause(ms(20)),
                    Timeline::tween(b.property(), 0.0, 1.0, ms(10)),
                ]),
            ]),
            Timeline::tween(a.property(), 1.0, 2.0, ms(30)),
        ]));

        let starts: Vec<u128> = schedule
            .entries()
            .iter()
            .map(|e| e.start.as_millis())
            .collect();
        assert_eq!(starts, vec![100, 120, 150]);
        assert_eq!(schedule.total(), ms(180));
    }

    #[test]
    fn test_seek_forward_and_back() {
        let pan = ValueCell::new(0.0);
        let schedule = Schedule::compile(Timeline::sequential([
            Timeline::tween(pan.property(), 0.0, 100.0, ms(100)),
            Timeline::tween(pan.property(), 100.0, -50.0, ms(150)),
        ]));

        schedule.apply(ms(50));
        assert_eq!(pan.get(), 50.0);

        schedule.apply(ms(175));
        assert_eq!(pan.get(), 25.0);

        // 倒退回第一段：后一段尚未开始，不应覆盖
        schedule.apply(ms(25));
        assert_eq!(pan.get(), 25.0);

        schedule.apply(Duration::ZERO);
        assert_eq!(pan.get(), 0.0);
    }

    #[test]
    fn test_parallel_child_holds_end_state() {
        let short = ValueCell::new(0.0);
        let long = ValueCell::new(0.0);
        let schedule = Schedule::compile(Timeline::parallel([
            Timeline::tween(short.property(), 0.0, 1.0, ms(10)),
            Timeline::tween(long.property(), 0.0, 1.0, ms(100)),
        ]));

        schedule.apply(ms(50));
        assert_eq!(short.get(), 1.0);
        assert_eq!(long.get(), 0.5);
        assert_eq!(schedule.active_count(ms(50)), 1);
    }

    #[test]
    fn test_seek_to_end_gives_declared_end_values() {
        let cells: Vec<ValueCell> = (0..4).map(|_| ValueCell::new(0.0)).collect();
        let schedule = Schedule::compile(Timeline::sequential([
            Timeline::tween(cells[0].property(), 0.0, 3.0, ms(40)),
            Timeline::parallel([
                Timeline::switch(cells[1].property(), 0.0, 7.0, ms(10)),
                Timeline::tween(cells[2].property(), 0.0, -2.0, ms(60)),
            ]),
            Timeline::set(cells[3].property(), 9.0),
        ]));

        schedule.apply(schedule.total());
        for entry in schedule.entries() {
            let property = entry.leaf.property().unwrap();
            assert_eq!(Some(property.get()), entry.leaf.final_value());
        }
    }

    #[test]
    fn test_unstarted_switch_restores_from_value() {
        let label = ValueCell::new(-1.0);
        let schedule = Schedule::compile(Timeline::sequential([
            Timeline::pause(ms(100)),
            Timeline::set(label.property(), 2.0),
            Timeline::pause(ms(100)),
        ]));

        schedule.apply(ms(150));
        assert_eq!(label.get(), 2.0);
        schedule.apply(ms(50));
        assert_eq!(label.get(), -1.0);
    }

    #[test]
    fn test_phase_at() {
        let cell = ValueCell::new(0.0);
        let entry = ScheduledLeaf {
            start: ms(10),
            leaf: Leaf::Switch {
                property: cell.property(),
                from: 0.0,
                to: 1.0,
                duration: ms(5),
            },
        };
        assert_eq!(entry.phase_at(ms(9)), LeafPhase::Pending);
        assert_eq!(entry.phase_at(ms(10)), LeafPhase::Active);
        assert_eq!(entry.phase_at(ms(15)), LeafPhase::Done);
    }
}
