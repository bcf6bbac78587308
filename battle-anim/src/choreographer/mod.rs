//! # Choreographer 模块
//!
//! 战斗编排：从攻击列表构建场景树与一条完整的时间轴。
//!
//! ## 时间轴结构
//!
//! ```text
//! seq
//! ├── 停顿
//! ├── par(左侧入场, 右侧入场)
//! ├── 停顿
//! ├── 攻击 1 .. 攻击 n          （见 sequence 模块）
//! ├── 半个停顿                  ─┐ 有一方 HP ≤ 0 时
//! ├── par(倒下 / 胜利动画)      ─┘
//! └── 停顿
//! ```
//!
//! 每次调用都重新搭建场景与时间轴，没有增量修改接口。
//! 编排本身不会失败：空攻击列表、零距离平移、数值不变的补间都退化为停顿。

mod profile;
mod sequence;
mod stage;
mod state;

pub use profile::{CombatantProfile, CombatantSide};
pub use stage::Stage;
pub use state::{BattleOutcome, HpState};

use std::time::Duration;
use tracing::info;

use crate::animation::{Timeline, Transport};
use crate::config::BattleConfig;
use crate::error::ContractViolation;
use crate::scene::{SceneNode, ViewportSize};
use crate::strike::{Side, Strike};
use sequence::Composer;

/// 编排结果
#[derive(Debug)]
pub struct BattleAnimation {
    /// 场景根节点
    pub scene: SceneNode,
    /// 完整时间轴
    pub timeline: Timeline,
    /// HP 轨迹：开战时一项，之后每次攻击一项
    pub trajectory: Vec<HpState>,
    /// 战斗结果
    pub outcome: BattleOutcome,
    /// 场景布局（用于直接访问镜头、槽位与 HUD）
    pub stage: Stage,
    /// 提供者约定违反记录（release 构建下不会 panic）
    pub violations: Vec<ContractViolation>,
}

impl BattleAnimation {
    /// 总时长
    pub fn duration(&self) -> Duration {
        self.timeline.duration()
    }

    /// 最终 HP
    pub fn final_hp(&self) -> HpState {
        self.trajectory
            .last()
            .copied()
            .unwrap_or(HpState::new(0, 0))
    }

    /// 拆分为场景与时间轴
    pub fn into_parts(self) -> (SceneNode, Timeline) {
        (self.scene, self.timeline)
    }

    /// 交给播放控制器（绑定场景以便快照）
    pub fn into_transport(self) -> Transport {
        Transport::new(self.timeline).with_scene(self.scene)
    }
}

/// 战斗编排器
#[derive(Debug, Clone, Default)]
pub struct Choreographer {
    config: BattleConfig,
}

impl Choreographer {
    /// 创建编排器
    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    /// 当前配置
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// 构建战斗动画
    ///
    /// # 参数
    /// - `background`: 背景工厂，接收视口尺寸
    /// - `viewport`: 视口尺寸（像素）
    /// - `distance`: 双方初始水平距离（逻辑坐标）
    /// - `left` / `right`: 双方战斗者
    /// - `strikes`: 有序攻击列表
    ///
    /// debug 构建下，提供者违反"恰好一次"约定会 panic。
    pub fn build_animation<F>(
        &self,
        background: F,
        viewport: ViewportSize,
        distance: f64,
        left: &CombatantSide,
        right: &CombatantSide,
        strikes: &[Strike],
    ) -> BattleAnimation
    where
        F: FnOnce(ViewportSize) -> SceneNode,
    {
        let stage = Stage::build(
            background(viewport),
            viewport,
            &self.config.camera,
            distance,
            left,
            right,
        );
        let timing = &self.config.timing;

        let mut composer = Composer::new(&self.config, &stage, left, right);
        let mut trajectory = Vec::with_capacity(strikes.len() + 1);
        trajectory.push(composer.hp);

        let mut fragments = Vec::with_capacity(strikes.len() + 6);
        fragments.push(Timeline::pause(timing.pause()));
        fragments.push(Timeline::parallel([
            left.unit.initiate_animation(),
            right.unit.initiate_animation(),
        ]));
        fragments.push(Timeline::pause(timing.pause()));

        for index in 0..strikes.len() {
            fragments.push(composer.strike(strikes, index));
            trajectory.push(composer.hp);
        }

        let outcome = BattleOutcome::from_hp(composer.hp);
        if outcome != BattleOutcome::BothStanding {
            fragments.push(Timeline::pause(timing.half_pause()));
            fragments.push(Timeline::parallel([Side::Left, Side::Right].map(|side| {
                if outcome.is_defeated(side) {
                    composer.death(stage.slot(side))
                } else {
                    composer.side(side).unit.victory_animation()
                }
            })));
        }
        fragments.push(Timeline::pause(timing.pause()));

        let violations = std::mem::take(&mut composer.violations);
        let final_hp = composer.hp;
        let timeline = Timeline::sequential(fragments);

        info!(
            strikes = strikes.len(),
            duration_ms = timeline.duration().as_millis() as u64,
            left_hp = final_hp.left,
            right_hp = final_hp.right,
            outcome = ?outcome,
            "战斗动画构建完成"
        );

        debug_assert!(
            violations.is_empty(),
            "效果提供者违反恰好一次约定: {violations:?}"
        );

        BattleAnimation {
            scene: stage.root.clone(),
            timeline,
            trajectory,
            outcome,
            stage,
            violations,
        }
    }
}
