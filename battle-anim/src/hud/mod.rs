//! # HUD 模块
//!
//! 屏幕空间的战斗信息面板：每侧一个血条、一个技能标签、名字、武器名与武器图标。
//!
//! HUD 挂在场景根节点下，使用视口像素坐标，不受镜头缩放与平移影响。
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ [技能标签]                       [技能标签]   │
//! │┌────────────────────┐┌────────────────────┐  │
//! ││ 名字        ▓▓▓▓░ 40││ 名字        ▓▓▓▓▓ 35││
//! ││ ◆ 武器              ││ ◆ 武器              ││
//! │└────────────────────┘└────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

mod health_bar;
mod modifier_label;

pub use health_bar::{BAR_HEIGHT, HealthBar};
pub use modifier_label::{HIDDEN_PAGE, ModifierLabel};

use crate::choreographer::CombatantProfile;
use crate::scene::{Color, SceneNode, Transform, ViewportSize};
use crate::strike::Side;

/// 面板高度（像素）
pub const PANEL_HEIGHT: f64 = 44.0;

/// 面板内边距（像素）
pub const PANEL_PADDING: f64 = 8.0;

/// 单侧 HUD
#[derive(Debug, Clone)]
pub struct SideHud {
    /// 面板根节点
    pub node: SceneNode,
    pub health_bar: HealthBar,
    pub modifier_label: ModifierLabel,
    pub name: SceneNode,
    pub weapon: SceneNode,
    pub weapon_icon: SceneNode,
}

impl SideHud {
    fn new(side: Side, profile: &CombatantProfile, viewport: ViewportSize) -> Self {
        let width = viewport.width / 2.0;
        let x = match side {
            Side::Left => 0.0,
            Side::Right => width,
        };
        let y = viewport.height - PANEL_HEIGHT;
        let prefix = format!("hud.{side}");

        let bar_width = (width / 2.0 - PANEL_PADDING * 2.0).max(0.0);
        let health_bar = HealthBar::new(
            &format!("{prefix}.hp"),
            profile.max_hp,
            profile.current_hp,
            bar_width,
            profile.team_color,
        );
        health_bar
            .node()
            .set_transform(Transform::with_translate(width / 2.0, PANEL_PADDING));

        let modifier_label = ModifierLabel::new(&format!("{prefix}.modifiers"), Color::WHITE);
        modifier_label
            .node()
            .set_transform(Transform::with_translate(PANEL_PADDING, -16.0));

        let name = SceneNode::text(
            format!("{prefix}.name"),
            profile.display_name.clone(),
            Color::WHITE,
        )
        .at(PANEL_PADDING, PANEL_PADDING);
        let weapon_icon =
            SceneNode::icon(format!("{prefix}.weapon_icon"), profile.weapon_icon.clone())
                .at(PANEL_PADDING, PANEL_HEIGHT / 2.0);
        let weapon = SceneNode::text(
            format!("{prefix}.weapon"),
            profile.weapon_name.clone(),
            Color::WHITE,
        )
        .at(PANEL_PADDING + 16.0, PANEL_HEIGHT / 2.0);

        let background = SceneNode::rect(
            format!("{prefix}.panel"),
            width,
            PANEL_HEIGHT,
            Color {
                a: 192,
                ..profile.team_color
            },
        );

        let node = SceneNode::group(prefix)
            .at(x, y)
            .with_child(background)
            .with_child(name.clone())
            .with_child(weapon_icon.clone())
            .with_child(weapon.clone())
            .with_child(health_bar.node().clone())
            .with_child(modifier_label.node().clone());

        Self {
            node,
            health_bar,
            modifier_label,
            name,
            weapon,
            weapon_icon,
        }
    }
}

/// 双方 HUD
#[derive(Debug, Clone)]
pub struct Hud {
    /// HUD 根节点
    pub node: SceneNode,
    pub left: SideHud,
    pub right: SideHud,
}

impl Hud {
    /// 按视口尺寸布局双方面板
    pub fn new(viewport: ViewportSize, left: &CombatantProfile, right: &CombatantProfile) -> Self {
        let left = SideHud::new(Side::Left, left, viewport);
        let right = SideHud::new(Side::Right, right, viewport);
        let node = SceneNode::group("hud")
            .with_child(left.node.clone())
            .with_child(right.node.clone());
        Self { node, left, right }
    }

    /// 指定一侧
    pub fn side(&self, side: Side) -> &SideHud {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;

    fn profile(name: &str, hp: i32) -> CombatantProfile {
        CombatantProfile {
            team_color: Color::rgb(48, 96, 224),
            display_name: name.to_string(),
            weapon_name: "Fire".to_string(),
            weapon_icon: "fire.png".to_string(),
            max_hp: hp,
            current_hp: hp,
        }
    }

    #[test]
    fn test_layout() {
        let viewport = ViewportSize::new(640.0, 320.0);
        let hud = Hud::new(viewport, &profile("Anna", 40), &profile("Bors", 35));

        assert_eq!(hud.node.child_count(), 2);
        assert_eq!(hud.left.node.transform().translate.x, 0.0);
        assert_eq!(hud.right.node.transform().translate.x, 320.0);
        assert_eq!(
            hud.right.node.transform().translate.y,
            320.0 - PANEL_HEIGHT
        );
        assert_eq!(hud.side(Side::Right).health_bar.display_hp(), 35);
        assert!(matches!(
            hud.left.name.kind(),
            NodeKind::Text { content, .. } if content == "Anna"
        ));
        assert!(hud.node.find("hud.right.weapon_icon").is_some());
    }
}
