//! # Provider 模块
//!
//! 单位与法术效果的外部接口。
//!
//! 编排器只依赖这里的两个 trait，具体的外观（形状、颜色、粒子）由实现方决定。
//!
//! ## 恰好一次约定
//!
//! 编排器为每次攻击构建三个片段并交给提供者嵌入：
//!
//! - [`SpellFactory`]：单位的攻击动画必须调用一次 `spawn`
//! - 镜头平移与受击反应（[`Injected`]）：法术动画必须各 `embed` 一次
//!
//! 这些值只能被移动、不能被复制，所以"两次"在类型上就做不到；
//! "零次"由共享的使用计数在构建结束后检查，违反时记录错误日志，
//! debug 构建下直接 panic。

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::analyzer::ConsecutiveAttack;
use crate::animation::Timeline;
use crate::error::ContractViolation;
use crate::scene::{Point, SceneNode};
use crate::strike::Modifier;

/// 单位效果提供者
///
/// 单位节点按"面朝 -x"绘制，左侧单位由编排器水平镜像。
pub trait UnitProvider {
    /// 单位节点，每次调用返回同一节点
    fn node(&self) -> SceneNode;

    /// 法术发射点（单位节点局部坐标）
    fn spell_anchor_point(&self) -> Point;

    /// 攻击动画
    ///
    /// 返回的时间轴必须恰好调用一次 `spell.spawn`，传入发射时刻
    /// 单位所在槽位的局部坐标。
    ///
    /// # 参数
    /// - `target_offset`: 与对手的水平距离
    /// - `run`: 本次攻击在连续攻击中的位置
    /// - `modifiers`: 本次触发的技能
    /// - `is_finisher`: 本次攻击是否让对手 HP ≤ 0
    fn attack_animation(
        &self,
        spell: SpellFactory<'_>,
        target_offset: f64,
        run: ConsecutiveAttack,
        modifiers: &BTreeSet<Modifier>,
        is_finisher: bool,
    ) -> Timeline;

    /// 入场动画
    fn initiate_animation(&self) -> Timeline {
        Timeline::empty()
    }

    /// 胜利动画
    fn victory_animation(&self) -> Timeline {
        Timeline::empty()
    }

    /// 攻击结束后单位停留在离原位多远处（朝对手方向）
    fn approach_distance(&self, _run: ConsecutiveAttack, _target_offset: f64) -> f64 {
        0.0
    }
}

/// 法术效果提供者
pub trait SpellProvider {
    /// 位于单位之后的图层，每次调用返回同一节点
    fn background_node(&self) -> SceneNode;

    /// 位于单位之前的图层，每次调用返回同一节点
    fn foreground_node(&self) -> SceneNode;

    /// 法术动画
    ///
    /// 返回的时间轴必须恰好嵌入一次 `pan` 与一次 `hit_reaction`。
    ///
    /// # 参数
    /// - `origin` / `target`: 发射点与命中点（镜头平移层坐标）
    /// - `pan`: 从进攻视角平移到防守视角
    /// - `hit_reaction`: 震屏、血条变化等受击反应
    fn animation(
        &self,
        origin: Point,
        target: Point,
        pan: Injected,
        hit_reaction: Injected,
    ) -> Timeline;
}

/// 使用计数
///
/// 克隆共享同一计数。
#[derive(Debug, Clone, Default)]
pub struct UseCounter(Rc<Cell<u32>>);

impl UseCounter {
    /// 新计数（0 次）
    pub fn new() -> Self {
        Self::default()
    }

    /// 已使用次数
    pub fn uses(&self) -> u32 {
        self.0.get()
    }

    fn record(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }

    /// 检查是否恰好使用一次
    pub fn check(&self, hook: &'static str, strike: usize) -> Result<(), ContractViolation> {
        match self.uses() {
            1 => Ok(()),
            uses => Err(ContractViolation { hook, uses, strike }),
        }
    }
}

/// 法术生成器
///
/// 单位在攻击动画中调用一次 [`spawn`](Self::spawn)，得到法术的时间轴。
pub struct SpellFactory<'a> {
    spawn: Box<dyn FnOnce(Point) -> Timeline + 'a>,
    counter: UseCounter,
}

impl<'a> SpellFactory<'a> {
    /// 创建生成器
    pub fn new(spawn: impl FnOnce(Point) -> Timeline + 'a) -> Self {
        Self::tracked(spawn).0
    }

    /// 创建生成器并返回其使用计数
    pub fn tracked(spawn: impl FnOnce(Point) -> Timeline + 'a) -> (Self, UseCounter) {
        let counter = UseCounter::new();
        let factory = Self {
            spawn: Box::new(spawn),
            counter: counter.clone(),
        };
        (factory, counter)
    }

    /// 在 `anchor`（单位槽位局部坐标）处生成法术
    pub fn spawn(self, anchor: Point) -> Timeline {
        self.counter.record();
        (self.spawn)(anchor)
    }
}

impl fmt::Debug for SpellFactory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpellFactory")
            .field("uses", &self.counter.uses())
            .finish_non_exhaustive()
    }
}

/// 需要恰好嵌入一次的时间轴片段
#[derive(Debug)]
pub struct Injected {
    timeline: Timeline,
    counter: UseCounter,
}

impl Injected {
    /// 包装时间轴片段
    pub fn new(timeline: Timeline) -> Self {
        Self::tracked(timeline).0
    }

    /// 包装时间轴片段并返回其使用计数
    pub fn tracked(timeline: Timeline) -> (Self, UseCounter) {
        let counter = UseCounter::new();
        let injected = Self {
            timeline,
            counter: counter.clone(),
        };
        (injected, counter)
    }

    /// 片段时长（嵌入前即可查询，用于对齐其他动画）
    pub fn duration(&self) -> Duration {
        self.timeline.duration()
    }

    /// 取出片段以嵌入时间轴
    pub fn embed(self) -> Timeline {
        self.counter.record();
        self.timeline
    }
}
