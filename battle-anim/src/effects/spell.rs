//! # BasicSpell
//!
//! 光球法术：从发射点飞向命中点（与镜头平移同时进行），命中后触发受击反应，
//! 背景层同时闪一下。

use std::time::Duration;

use crate::animation::Timeline;
use crate::provider::{Injected, SpellProvider};
use crate::scene::{Color, Point, SceneNode};

const ORB_SIZE: f64 = 6.0;
const GLOW_OPACITY: f64 = 0.35;
const DEFAULT_TRAVEL_MS: u64 = 240;

/// 光球法术
#[derive(Debug, Clone)]
pub struct BasicSpell {
    foreground: SceneNode,
    background: SceneNode,
    orb: SceneNode,
    glow: SceneNode,
    travel: Duration,
}

impl BasicSpell {
    /// 创建法术
    ///
    /// # 参数
    /// - `name`: 节点名称前缀
    /// - `color`: 光球颜色
    /// - `glow_size`: 背景闪光范围（镜头平移层坐标，以原点为中心）
    pub fn new(name: &str, color: Color, glow_size: (f64, f64)) -> Self {
        let orb = SceneNode::group(format!("{name}.orb"))
            .with_opacity(0.0)
            .with_child(
                SceneNode::rect(format!("{name}.orb.shape"), ORB_SIZE, ORB_SIZE, color)
                    .at(-ORB_SIZE / 2.0, -ORB_SIZE / 2.0),
            );
        let (glow_width, glow_height) = glow_size;
        let glow = SceneNode::rect(format!("{name}.glow"), glow_width, glow_height, color)
            .at(-glow_width / 2.0, 0.0)
            .with_opacity(0.0);

        Self {
            foreground: SceneNode::group(format!("{name}.foreground")).with_child(orb.clone()),
            background: SceneNode::group(format!("{name}.background")).with_child(glow.clone()),
            orb,
            glow,
            travel: Duration::from_millis(DEFAULT_TRAVEL_MS),
        }
    }

    /// 飞行时长
    pub fn with_travel(mut self, travel: Duration) -> Self {
        self.travel = travel;
        self
    }

    /// 光球节点
    pub fn orb(&self) -> &SceneNode {
        &self.orb
    }
}

impl SpellProvider for BasicSpell {
    fn background_node(&self) -> SceneNode {
        self.background.clone()
    }

    fn foreground_node(&self) -> SceneNode {
        self.foreground.clone()
    }

    fn animation(
        &self,
        origin: Point,
        target: Point,
        pan: Injected,
        hit_reaction: Injected,
    ) -> Timeline {
        let opacity = self.orb.property("opacity");
        let x = self.orb.property("translate_x");
        let y = self.orb.property("translate_y");
        let glow = self.glow.property("opacity");

        Timeline::sequential([
            Timeline::parallel([
                Timeline::set(x.clone(), origin.x),
                Timeline::set(y.clone(), origin.y),
                Timeline::set(opacity.clone(), 1.0),
                Timeline::set(glow.clone(), GLOW_OPACITY),
            ]),
            Timeline::parallel([
                Timeline::tween(x, origin.x, target.x, self.travel),
                Timeline::tween(y, origin.y, target.y, self.travel),
                Timeline::tween(glow, GLOW_OPACITY, 0.0, self.travel),
                pan.embed(),
            ]),
            Timeline::parallel([Timeline::set(opacity, 0.0), hit_reaction.embed()]),
        ])
    }
}
