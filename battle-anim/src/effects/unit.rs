//! # BasicUnit
//!
//! 矩形单位：入场淡入，攻击时前冲、发射法术、退回，胜利时跳一下。

use std::collections::BTreeSet;
use std::time::Duration;

use crate::analyzer::ConsecutiveAttack;
use crate::animation::{EasingFunction, Timeline};
use crate::provider::{SpellFactory, UnitProvider};
use crate::scene::{Color, Point, SceneNode};
use crate::strike::Modifier;

const FADE_IN_MS: u64 = 300;
const WIND_UP_MS: u64 = 80;
const LUNGE_MS: u64 = 120;
const RETURN_MS: u64 = 160;
const HOP_MS: u64 = 150;
const HOP_HEIGHT: f64 = 8.0;

/// 触发技能时身体泛白的程度
const MODIFIER_FLASH: f64 = 0.5;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// 矩形单位
#[derive(Debug, Clone)]
pub struct BasicUnit {
    node: SceneNode,
    body: SceneNode,
    width: f64,
    height: f64,
    lunge: f64,
    advance: f64,
}

impl BasicUnit {
    /// 创建 16×24 的单位
    pub fn new(name: &str, color: Color) -> Self {
        Self::with_size(name, color, 16.0, 24.0)
    }

    /// 指定身体尺寸
    pub fn with_size(name: &str, color: Color, width: f64, height: f64) -> Self {
        let body =
            SceneNode::rect(format!("{name}.body"), width, height, color).at(-width / 2.0, -height);
        let node = SceneNode::group(name).with_child(body.clone());
        Self {
            node,
            body,
            width,
            height,
            lunge: 24.0,
            advance: 0.0,
        }
    }

    /// 前冲距离（终结一击时加倍，不超过双方距离的一半）
    pub fn with_lunge(mut self, lunge: f64) -> Self {
        self.lunge = lunge.max(0.0);
        self
    }

    /// 连续攻击期间停留在离原位多远处
    pub fn with_advance(mut self, advance: f64) -> Self {
        self.advance = advance.max(0.0);
        self
    }

    /// 身体节点
    pub fn body(&self) -> &SceneNode {
        &self.body
    }

    fn rest_x(&self, run: ConsecutiveAttack) -> f64 {
        if run.is_last() { 0.0 } else { -self.advance }
    }

    fn start_x(&self, run: ConsecutiveAttack) -> f64 {
        if run.is_first() { 0.0 } else { -self.advance }
    }

    fn wind_up(&self) -> Timeline {
        let scale_y = self.node.property("scale_y");
        let half = ms(WIND_UP_MS / 2);
        Timeline::sequential([
            Timeline::tween(scale_y.clone(), 1.0, 0.85, half),
            Timeline::tween(scale_y, 0.85, 1.0, half),
        ])
    }

    fn flash(&self) -> Timeline {
        let whiten = self.body.property("whiten");
        let half = ms(LUNGE_MS / 2);
        Timeline::sequential([
            Timeline::tween(whiten.clone(), 0.0, MODIFIER_FLASH, half),
            Timeline::tween(whiten, MODIFIER_FLASH, 0.0, half),
        ])
    }
}

impl UnitProvider for BasicUnit {
    fn node(&self) -> SceneNode {
        self.node.clone()
    }

    fn spell_anchor_point(&self) -> Point {
        Point::new(-self.width / 2.0, -self.height * 0.6)
    }

    fn attack_animation(
        &self,
        spell: SpellFactory<'_>,
        target_offset: f64,
        run: ConsecutiveAttack,
        modifiers: &BTreeSet<Modifier>,
        is_finisher: bool,
    ) -> Timeline {
        let start = self.start_x(run);
        let multiplier = if is_finisher { 2.0 } else { 1.0 };
        let reach = (self.lunge * multiplier).min((target_offset / 2.0).max(0.0));
        let struck = start - reach;
        let x = self.node.property("translate_x");

        let lunge = Timeline::tween_eased(
            x.clone(),
            start,
            struck,
            ms(LUNGE_MS),
            EasingFunction::EaseOut,
        );
        let lunge = if modifiers.is_empty() {
            lunge
        } else {
            Timeline::parallel([lunge, self.flash()])
        };

        let anchor = self.spell_anchor_point();
        let mut steps = Vec::with_capacity(4);
        if run.is_first() {
            steps.push(self.wind_up());
        }
        steps.push(lunge);
        steps.push(spell.spawn(Point::new(anchor.x + struck, anchor.y)));
        steps.push(Timeline::tween_eased(
            x,
            struck,
            self.rest_x(run),
            ms(RETURN_MS),
            EasingFunction::EaseInOutSine,
        ));
        Timeline::sequential(steps)
    }

    fn initiate_animation(&self) -> Timeline {
        Timeline::tween(self.node.property("opacity"), 0.0, 1.0, ms(FADE_IN_MS))
    }

    fn victory_animation(&self) -> Timeline {
        let y = self.node.property("translate_y");
        Timeline::sequential([
            Timeline::tween_eased(y.clone(), 0.0, -HOP_HEIGHT, ms(HOP_MS), EasingFunction::EaseOut),
            Timeline::tween_eased(y, -HOP_HEIGHT, 0.0, ms(HOP_MS), EasingFunction::EaseOutBounce),
        ])
    }

    fn approach_distance(&self, run: ConsecutiveAttack, _target_offset: f64) -> f64 {
        -self.rest_x(run)
    }
}
