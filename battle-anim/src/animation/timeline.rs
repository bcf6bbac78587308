//! # Timeline 模块
//!
//! 组合时间轴：顺序节点、并行节点与叶子。
//!
//! - `Sequential`：子节点依次播放，总时长 = 子节点时长之和
//! - `Parallel`：子节点同时播放，总时长 = 子节点时长最大值；
//!   较短的子节点结束后保持终值
//! - `Leaf`：停顿、补间或离散切换
//!
//! 树一旦构建就不再修改，要改变内容只能重新构建。
//! 叶子只描述"某个属性在多长时间内从哪里到哪里"，播放位置由 [`Transport`] 维护。
//!
//! [`Transport`]: super::Transport

use std::fmt;
use std::time::Duration;

use super::{EasingFunction, PropertyRef};

/// 时间轴叶子
#[derive(Debug, Clone)]
pub enum Leaf {
    /// 停顿：只占用时间，不写任何属性
    Pause(Duration),

    /// 补间：在 `duration` 内从 `from` 插值到 `to`
    Tween {
        property: PropertyRef,
        from: f64,
        to: f64,
        duration: Duration,
        easing: EasingFunction,
    },

    /// 离散切换：整段时间保持 `from`，结束时切换为 `to`
    ///
    /// 时长为 0 时即"一次性设置"。
    Switch {
        property: PropertyRef,
        from: f64,
        to: f64,
        duration: Duration,
    },
}

impl Leaf {
    /// 叶子时长
    pub fn duration(&self) -> Duration {
        match self {
            Leaf::Pause(duration) => *duration,
            Leaf::Tween { duration, .. } | Leaf::Switch { duration, .. } => *duration,
        }
    }

    /// 目标属性（停顿没有）
    pub fn property(&self) -> Option<&PropertyRef> {
        match self {
            Leaf::Pause(_) => None,
            Leaf::Tween { property, .. } | Leaf::Switch { property, .. } => Some(property),
        }
    }

    /// 开始前的值
    pub fn initial_value(&self) -> Option<f64> {
        match self {
            Leaf::Pause(_) => None,
            Leaf::Tween { from, .. } | Leaf::Switch { from, .. } => Some(*from),
        }
    }

    /// 声明的终值
    pub fn final_value(&self) -> Option<f64> {
        match self {
            Leaf::Pause(_) => None,
            Leaf::Tween { to, .. } | Leaf::Switch { to, .. } => Some(*to),
        }
    }

    /// 局部时间 `local` 处的值，超出时长按终值处理
    pub fn value_at(&self, local: Duration) -> Option<f64> {
        match self {
            Leaf::Pause(_) => None,
            Leaf::Tween {
                from,
                to,
                duration,
                easing,
                ..
            } => {
                if local >= *duration {
                    return Some(*to);
                }
                let t = local.as_secs_f64() / duration.as_secs_f64();
                Some(from + (to - from) * easing.apply(t))
            }
            Leaf::Switch {
                from, to, duration, ..
            } => {
                if local >= *duration {
                    Some(*to)
                } else {
                    Some(*from)
                }
            }
        }
    }

    /// 写入开始前的值
    pub fn apply_initial(&self) {
        if let (Some(property), Some(value)) = (self.property(), self.initial_value()) {
            property.set(value);
        }
    }

    /// 写入局部时间 `local` 处的值
    pub fn apply_at(&self, local: Duration) {
        if let (Some(property), Some(value)) = (self.property(), self.value_at(local)) {
            property.set(value);
        }
    }
}

/// 组合时间轴节点
///
/// 不实现 `Clone`：注入给效果提供者的片段只能被移动，不能被复制。
#[derive(Debug)]
pub enum Timeline {
    /// 顺序播放
    Sequential(Vec<Timeline>),
    /// 并行播放
    Parallel(Vec<Timeline>),
    /// 叶子
    Leaf(Leaf),
}

impl Default for Timeline {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Leaf> for Timeline {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl Timeline {
    // ========== 构建 ==========

    /// 零时长空操作
    pub fn empty() -> Self {
        Self::Sequential(Vec::new())
    }

    /// 停顿
    pub fn pause(duration: Duration) -> Self {
        Self::Leaf(Leaf::Pause(duration))
    }

    /// 顺序节点；没有子节点时为零时长空操作
    pub fn sequential(children: impl IntoIterator<Item = Timeline>) -> Self {
        Self::Sequential(children.into_iter().collect())
    }

    /// 并行节点；没有子节点时为零时长空操作
    pub fn parallel(children: impl IntoIterator<Item = Timeline>) -> Self {
        Self::Parallel(children.into_iter().collect())
    }

    /// 线性补间
    ///
    /// `from == to` 时退化为同等时长的停顿。
    pub fn tween(property: PropertyRef, from: f64, to: f64, duration: Duration) -> Self {
        Self::tween_eased(property, from, to, duration, EasingFunction::Linear)
    }

    /// 带缓动的补间
    pub fn tween_eased(
        property: PropertyRef,
        from: f64,
        to: f64,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        if from == to {
            return Self::pause(duration);
        }
        Self::Leaf(Leaf::Tween {
            property,
            from,
            to,
            duration,
            easing,
        })
    }

    /// 离散切换：保持 `from` 直到结束时切换为 `to`
    ///
    /// `from == to` 时退化为同等时长的停顿。
    pub fn switch(property: PropertyRef, from: f64, to: f64, duration: Duration) -> Self {
        if from == to {
            return Self::pause(duration);
        }
        Self::Leaf(Leaf::Switch {
            property,
            from,
            to,
            duration,
        })
    }

    /// 一次性设置，开始前的值取构建时属性的当前值
    ///
    /// 与 `switch` 不同，即使当前值已等于 `value` 也会生成叶子：
    /// 同一属性在之前的叶子中可能已被改写。
    pub fn set(property: PropertyRef, value: f64) -> Self {
        let from = property.get();
        Self::Leaf(Leaf::Switch {
            property,
            from,
            to: value,
            duration: Duration::ZERO,
        })
    }

    // ========== 查询 ==========

    /// 总时长
    pub fn duration(&self) -> Duration {
        match self {
            Timeline::Sequential(children) => children.iter().map(Timeline::duration).sum(),
            Timeline::Parallel(children) => children
                .iter()
                .map(Timeline::duration)
                .max()
                .unwrap_or(Duration::ZERO),
            Timeline::Leaf(leaf) => leaf.duration(),
        }
    }

    /// 顺序节点中局部时间 `t` 所对应的子节点及其局部时间
    ///
    /// 按子节点时长做前缀和定位；超出总时长时落在最后一个子节点的终点。
    /// 非顺序节点或没有子节点时返回 `None`。
    pub fn child_at(&self, t: Duration) -> Option<(usize, Duration)> {
        let Timeline::Sequential(children) = self else {
            return None;
        };

        let mut start = Duration::ZERO;
        for (index, child) in children.iter().enumerate() {
            let end = start + child.duration();
            if t < end {
                return Some((index, t - start));
            }
            start = end;
        }

        let last = children.len().checked_sub(1)?;
        Some((last, children[last].duration()))
    }

    /// 子节点列表（叶子没有）
    pub fn children(&self) -> &[Timeline] {
        match self {
            Timeline::Sequential(children) | Timeline::Parallel(children) => children,
            Timeline::Leaf(_) => &[],
        }
    }

    /// 叶子总数（含停顿）
    pub fn leaf_count(&self) -> usize {
        match self {
            Timeline::Leaf(_) => 1,
            _ => self.children().iter().map(Timeline::leaf_count).sum(),
        }
    }

    /// 写入指定属性的叶子数量
    pub fn count_leaves_targeting(&self, property: &PropertyRef) -> usize {
        match self {
            Timeline::Leaf(leaf) => leaf
                .property()
                .is_some_and(|p| p.same_as(property))
                .into(),
            _ => self
                .children()
                .iter()
                .map(|child| child.count_leaves_targeting(property))
                .sum(),
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let millis = self.duration().as_millis();
        match self {
            Timeline::Sequential(children) | Timeline::Parallel(children) => {
                let kind = if matches!(self, Timeline::Sequential(_)) {
                    "seq"
                } else {
                    "par"
                };
                writeln!(f, "{indent}{kind} {millis}ms")?;
                for child in children {
                    child.write_outline(f, depth + 1)?;
                }
                Ok(())
            }
            Timeline::Leaf(Leaf::Pause(_)) => writeln!(f, "{indent}pause {millis}ms"),
            Timeline::Leaf(Leaf::Tween {
                property, from, to, ..
            }) => writeln!(
                f,
                "{indent}tween {} {from:.1} -> {to:.1} {millis}ms",
                property.property_id()
            ),
            Timeline::Leaf(Leaf::Switch {
                property, from, to, ..
            }) => writeln!(
                f,
                "{indent}switch {} {from:.1} -> {to:.1} {millis}ms",
                property.property_id()
            ),
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
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
    fn test_sequential_duration_is_sum() {
        let cell = ValueCell::new(0.0);
        let timeline = Timeline::sequential([
            Timeline::tween(cell.property(), 0.0, 1.0, ms(100)),
            Timeline::pause(ms(50)),
            Timeline::tween(cell.property(), 1.0, 0.0, ms(250)),
        ]);
        assert_eq!(timeline.duration(), ms(400));
    }

    #[test]
    fn test_parallel_duration_is_max() {
        let cell = ValueCell::new(0.0);
        let timeline = Timeline::parallel([
            Timeline::tween(cell.property(), 0.0, 1.0, ms(100)),
            Timeline::sequential([Timeline::pause(ms(200)), Timeline::pause(ms(150))]),
            Timeline::pause(ms(10)),
        ]);
        assert_eq!(timeline.duration(), ms(350));
    }

    #[test]
    fn test_empty_composites_are_zero_length() {
        assert_eq!(Timeline::sequential([]).duration(), Duration::ZERO);
        assert_eq!(Timeline::parallel([]).duration(), Duration::ZERO);
        assert_eq!(Timeline::empty().leaf_count(), 0);
        assert_eq!(Timeline::empty().child_at(ms(10)), None);
    }

    #[test]
    fn test_unchanging_tween_is_pause() {
        let cell = ValueCell::new(3.0);
        let timeline = Timeline::tween(cell.property(), 3.0, 3.0, ms(120));
        assert!(matches!(timeline, Timeline::Leaf(Leaf::Pause(d)) if d == ms(120)));
    }

    #[test]
    fn test_set_always_emits_leaf() {
        let cell = ValueCell::new(1.0);
        let timeline = Timeline::set(cell.property(), 1.0);
        assert_eq!(timeline.count_leaves_targeting(&cell.property()), 1);
        assert_eq!(timeline.duration(), Duration::ZERO);
    }

    #[test]
    fn test_child_at_prefix_sum() {
        let timeline = Timeline::sequential([
            Timeline::pause(ms(100)),
            Timeline::pause(Duration::ZERO),
            Timeline::pause(ms(50)),
        ]);

        assert_eq!(timeline.child_at(ms(0)), Some((0, ms(0))));
        assert_eq!(timeline.child_at(ms(99)), Some((0, ms(99))));
        // 零时长子节点被跳过
        assert_eq!(timeline.child_at(ms(100)), Some((2, ms(0))));
        assert_eq!(timeline.child_at(ms(120)), Some((2, ms(20))));
        // 超出总时长：停在最后一个子节点的终点
        assert_eq!(timeline.child_at(ms(999)), Some((2, ms(50))));
    }

    #[test]
    fn test_leaf_values() {
        let cell = ValueCell::new(0.0);
        let Timeline::Leaf(tween) = Timeline::tween(cell.property(), 0.0, 10.0, ms(100)) else {
            panic!("expected leaf");
        };
        assert_eq!(tween.value_at(ms(0)), Some(0.0));
        assert_eq!(tween.value_at(ms(50)), Some(5.0));
        assert_eq!(tween.value_at(ms(100)), Some(10.0));
        assert_eq!(tween.value_at(ms(500)), Some(10.0));

        let Timeline::Leaf(switch) = Timeline::switch(cell.property(), 1.0, 2.0, ms(100)) else {
            panic!("expected leaf");
        };
        assert_eq!(switch.value_at(ms(99)), Some(1.0));
        assert_eq!(switch.value_at(ms(100)), Some(2.0));
    }

    #[test]
    fn test_count_leaves_targeting() {
        let a = ValueCell::new(0.0);
        let b = ValueCell::new(0.0);
        let timeline = Timeline::sequential([
            Timeline::tween(a.property(), 0.0, 1.0, ms(10)),
            Timeline::parallel([
                Timeline::tween(a.property(), 1.0, 2.0, ms(10)),
                Timeline::tween(b.property(), 0.0, 1.0, ms(10)),
            ]),
        ]);
        assert_eq!(timeline.count_leaves_targeting(&a.property()), 2);
        assert_eq!(timeline.count_leaves_targeting(&b.property()), 1);
        assert_eq!(timeline.leaf_count(), 3);
    }

    #[test]
    fn test_outline() {
        let cell = ValueCell::new(0.0);
        let timeline = Timeline::sequential([
            Timeline::pause(ms(100)),
            Timeline::tween(cell.property(), 0.0, 1.0, ms(20)),
        ]);
        insta::assert_snapshot!(timeline.to_string().trim_end(), @r"
        seq 120ms
          pause 100ms
          tween value 0.0 -> 1.0 20ms
        ");
    }
}
