//! # Stage 模块
//!
//! 战斗场景布局。
//!
//! ```text
//! root
//! ├── backdrop                    （视口像素，由调用方提供）
//! ├── camera   scale = 视口高 / 逻辑高
//! │   └── center   translate_x = 逻辑宽 / 2
//! │       └── shake    translate_x 由震屏改写
//! │           └── pan      translate_x 由镜头平移改写
//! │               ├── 左侧法术背景层
//! │               ├── 右侧法术背景层
//! │               ├── left_slot   (-d/2, footline)，水平镜像
//! │               │   └── 左侧单位
//! │               ├── right_slot  (+d/2, footline)
//! │               │   └── 右侧单位
//! │               ├── 左侧法术前景层
//! │               └── 右侧法术前景层
//! └── hud                         （视口像素）
//! ```
//!
//! 单位按"面朝 -x"绘制，左侧槽位 `scale_x = -1` 使双方面对面。

use super::CombatantSide;
use crate::config::CameraConfig;
use crate::hud::Hud;
use crate::scene::{Point, SceneNode, Transform, ViewportSize};
use crate::strike::Side;

/// 战斗场景
#[derive(Debug, Clone)]
pub struct Stage {
    pub root: SceneNode,
    pub backdrop: SceneNode,
    pub camera: SceneNode,
    pub center: SceneNode,
    pub shake: SceneNode,
    pub pan: SceneNode,
    pub left_slot: SceneNode,
    pub right_slot: SceneNode,
    pub hud: Hud,
    /// 逻辑坐标到像素的缩放
    pub magnification: f64,
    /// 逻辑视口宽度
    pub logical_width: f64,
    /// 双方初始水平距离
    pub distance: f64,
}

impl Stage {
    /// 搭建场景
    pub(crate) fn build(
        backdrop: SceneNode,
        viewport: ViewportSize,
        camera_config: &CameraConfig,
        distance: f64,
        left: &CombatantSide,
        right: &CombatantSide,
    ) -> Self {
        let magnification = if viewport.height > 0.0 {
            viewport.height / camera_config.logical_height
        } else {
            1.0
        };
        let logical_width = viewport.width / magnification;
        let footline = camera_config.footline_y;

        let left_slot = SceneNode::group("left_slot")
            .with_transform(Transform {
                scale: Point::new(-1.0, 1.0),
                ..Transform::with_translate(Side::Left.mirror() * distance / 2.0, footline)
            })
            .with_child(left.unit.node());
        let right_slot = SceneNode::group("right_slot")
            .at(Side::Right.mirror() * distance / 2.0, footline)
            .with_child(right.unit.node());

        let pan = SceneNode::group("pan")
            .with_child(left.spell.background_node())
            .with_child(right.spell.background_node())
            .with_child(left_slot.clone())
            .with_child(right_slot.clone())
            .with_child(left.spell.foreground_node())
            .with_child(right.spell.foreground_node());
        let shake = SceneNode::group("shake").with_child(pan.clone());
        let center = SceneNode::group("center")
            .at(logical_width / 2.0, 0.0)
            .with_child(shake.clone());
        let camera = SceneNode::group("camera")
            .with_transform(Transform::with_uniform_scale(magnification))
            .with_child(center.clone());

        let hud = Hud::new(viewport, &left.profile, &right.profile);

        let root = SceneNode::group("battle")
            .with_child(backdrop.clone())
            .with_child(camera.clone())
            .with_child(hud.node.clone());

        Self {
            root,
            backdrop,
            camera,
            center,
            shake,
            pan,
            left_slot,
            right_slot,
            hud,
            magnification,
            logical_width,
            distance,
        }
    }

    /// 指定一侧的单位槽位
    pub fn slot(&self, side: Side) -> &SceneNode {
        match side {
            Side::Left => &self.left_slot,
            Side::Right => &self.right_slot,
        }
    }

    /// 指定一侧的原位（镜头平移层坐标）
    pub fn home_x(&self, side: Side) -> f64 {
        side.mirror() * self.distance / 2.0
    }
}
