//! # Sequence 模块
//!
//! 逐次攻击的时间轴编排。
//!
//! 每次攻击生成：
//!
//! ```text
//! seq
//! ├── 攻击方技能标签（有技能时）
//! ├── 镜头平移：当前 → 进攻视角
//! ├── 攻击方单位动画
//! │   └── spawn(锚点) ──► 法术动画
//! │                       ├── 镜头平移：进攻视角 → 防守视角   （恰好一次）
//! │                       └── 受击反应                        （恰好一次）
//! │                           par
//! │                           ├── 震屏（有伤害时）
//! │                           ├── 攻击方血条
//! │                           ├── 防守方血条
//! │                           └── 防守方技能标签（有技能时）
//! └── 隐藏技能标签
//! ```

use std::time::Duration;
use tracing::{debug, error};

use super::state::{HpState, Offsets};
use super::{CombatantSide, Stage};
use crate::analyzer::analyze;
use crate::animation::Timeline;
use crate::camera::{PanSolver, pan_duration};
use crate::config::BattleConfig;
use crate::error::ContractViolation;
use crate::hud::HIDDEN_PAGE;
use crate::provider::{Injected, SpellFactory};
use crate::scene::{Point, SceneNode};
use crate::strike::{Side, Strike};

/// 一次编排过程中的可变状态
pub(crate) struct Composer<'a> {
    config: &'a BattleConfig,
    solver: PanSolver,
    stage: &'a Stage,
    left: &'a CombatantSide,
    right: &'a CombatantSide,
    pub hp: HpState,
    pub offsets: Offsets,
    pub current_pan: f64,
    pub violations: Vec<ContractViolation>,
}

impl<'a> Composer<'a> {
    pub fn new(
        config: &'a BattleConfig,
        stage: &'a Stage,
        left: &'a CombatantSide,
        right: &'a CombatantSide,
    ) -> Self {
        Self {
            config,
            solver: PanSolver::new(config.camera.pan_margin),
            stage,
            left,
            right,
            hp: HpState::new(left.profile.current_hp, right.profile.current_hp),
            offsets: Offsets {
                left: stage.home_x(Side::Left),
                right: stage.home_x(Side::Right),
            },
            current_pan: 0.0,
            violations: Vec::new(),
        }
    }

    pub fn side(&self, side: Side) -> &'a CombatantSide {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// 编排第 `index` 次攻击并推进状态
    pub fn strike(&mut self, strikes: &[Strike], index: usize) -> Timeline {
        let strike = &strikes[index];
        let attacker = strike.attacker;
        let defender = strike.defender();
        let run = analyze(strikes, index);

        let targets =
            self.solver
                .solve(self.offsets.left, self.offsets.right, self.stage.logical_width);
        // 越界目标已是平移层的 translate_x；居中目标是中点位置，取反后才能把中点移到屏幕中央
        let to_layer = |target: f64| if targets.centered { -target } else { target };
        let (attack_pan, defend_pan) = match attacker {
            Side::Left => (to_layer(targets.left), to_layer(targets.right)),
            Side::Right => (to_layer(targets.right), to_layer(targets.left)),
        };

        let before = self.hp;
        let after = before.apply(strike);
        let is_finisher = after.is_defeated(defender);

        let attacker_side = self.side(attacker);
        let defender_side = self.side(defender);
        let attacker_label = &self.stage.hud.side(attacker).modifier_label;
        let defender_label = &self.stage.hud.side(defender).modifier_label;
        let ms_per_pixel = self.config.camera.pan_ms_per_pixel;
        let pan = self.stage.pan.property("translate_x");

        // 受击反应
        let mut reaction = Vec::with_capacity(4);
        if strike.damage > 0 {
            reaction.push(self.shake(is_finisher));
        }
        reaction.push(self.hp_tween(attacker, before, after));
        reaction.push(self.hp_tween(defender, before, after));
        let defender_page = defender_label.add_page(&strike.defender_modifiers);
        if let Some(page) = defender_page {
            reaction.push(Timeline::set(defender_label.page_property(), page as f64));
        }
        let (hit_reaction, hit_uses) = Injected::tracked(Timeline::parallel(reaction));

        let (pan_across, pan_uses) = Injected::tracked(Timeline::tween(
            pan.clone(),
            attack_pan,
            defend_pan,
            pan_duration(attack_pan, defend_pan, ms_per_pixel),
        ));

        // 法术在攻击方槽位坐标系中发射，命中防守方当前位置的锚点
        let footline = self.config.camera.footline_y;
        let attacker_home = self.stage.home_x(attacker);
        let defender_anchor = defender_side.unit.spell_anchor_point();
        let target = Point::new(
            self.offsets.get(defender) + defender.mirror() * defender_anchor.x,
            footline + defender_anchor.y,
        );
        let spell = &*attacker_side.spell;
        let (factory, spawn_uses) = SpellFactory::tracked(move |anchor: Point| {
            let origin = Point::new(
                attacker_home + attacker.mirror() * anchor.x,
                footline + anchor.y,
            );
            spell.animation(origin, target, pan_across, hit_reaction)
        });

        let target_offset = self.offsets.spread();
        let attack = attacker_side.unit.attack_animation(
            factory,
            target_offset,
            run,
            &strike.attacker_modifiers,
            is_finisher,
        );

        for (hook, uses) in [
            ("spell_factory", &spawn_uses),
            ("pan", &pan_uses),
            ("hit_reaction", &hit_uses),
        ] {
            if let Err(violation) = uses.check(hook, index) {
                error!(
                    strike = index,
                    hook,
                    uses = violation.uses,
                    "效果提供者违反恰好一次约定"
                );
                self.violations.push(violation);
            }
        }

        let mut steps = Vec::with_capacity(5);
        let attacker_page = attacker_label.add_page(&strike.attacker_modifiers);
        if let Some(page) = attacker_page {
            steps.push(Timeline::set(attacker_label.page_property(), page as f64));
        }
        steps.push(Timeline::tween(
            pan,
            self.current_pan,
            attack_pan,
            pan_duration(self.current_pan, attack_pan, ms_per_pixel),
        ));
        steps.push(attack);
        if attacker_page.is_some() {
            steps.push(Timeline::set(attacker_label.page_property(), HIDDEN_PAGE));
        }
        if defender_page.is_some() {
            steps.push(Timeline::set(defender_label.page_property(), HIDDEN_PAGE));
        }
        let timeline = Timeline::sequential(steps);

        debug!(
            strike = index,
            attacker = %attacker,
            damage = strike.damage,
            drain = strike.drain,
            run_current = run.current,
            run_total = run.total,
            attack_pan,
            defend_pan,
            centered = targets.centered,
            is_finisher,
            left_hp = after.left,
            right_hp = after.right,
            duration_ms = timeline.duration().as_millis() as u64,
            "编排攻击"
        );

        // 推进状态
        let approach = attacker_side.unit.approach_distance(run, target_offset);
        self.offsets
            .set(attacker, attacker_home - attacker.mirror() * approach);
        self.current_pan = defend_pan;
        self.hp = after;

        timeline
    }

    /// 血条补间，时长与 HP 变化量成正比
    fn hp_tween(&self, side: Side, before: HpState, after: HpState) -> Timeline {
        let from = before.get(side);
        let to = after.get(side);
        let per_point = self.config.timing.hp_ms_per_point;
        let duration = Duration::from_millis(u64::from(from.abs_diff(to)) * per_point);
        Timeline::tween(
            self.stage.hud.side(side).health_bar.hp_property(),
            f64::from(from),
            f64::from(to),
            duration,
        )
    }

    /// 震屏：振幅逐步衰减、左右交替，最后回到 0
    fn shake(&self, is_finisher: bool) -> Timeline {
        let config = &self.config.shake;
        if config.amplitude <= 0.0 || config.steps == 0 {
            return Timeline::empty();
        }
        let amplitude = if is_finisher {
            config.amplitude * config.finisher_multiplier
        } else {
            config.amplitude
        };
        let step = Duration::from_millis(config.step_ms);
        let property = self.stage.shake.property("translate_x");

        let mut previous = 0.0;
        let mut steps = Vec::with_capacity(config.steps as usize + 1);
        for i in 0..config.steps {
            let decay = 1.0 - f64::from(i) / f64::from(config.steps);
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let offset = amplitude * decay * sign;
            steps.push(Timeline::tween(property.clone(), previous, offset, step));
            previous = offset;
        }
        steps.push(Timeline::tween(property, previous, 0.0, step));
        Timeline::sequential(steps)
    }

    /// 倒下：先泛白，再淡出
    pub fn death(&self, slot: &SceneNode) -> Timeline {
        let timing = &self.config.timing;
        Timeline::sequential([
            Timeline::tween(
                slot.property("whiten"),
                0.0,
                1.0,
                Duration::from_millis(timing.death_whiten_ms),
            ),
            Timeline::tween(
                slot.property("opacity"),
                1.0,
                0.0,
                Duration::from_millis(timing.death_fade_ms),
            ),
        ])
    }
}
