//! # HealthBar 模块
//!
//! 血条：时间轴改写 `hp` 属性，血条据此刷新填充宽度与数字。
//!
//! 逻辑 HP 可以为负（过量伤害），显示时截断到 `[0, max]`。

use std::cell::Cell;
use std::rc::Rc;

use crate::animation::{Animatable, PropertyRef};
use crate::scene::{Color, SceneNode};

/// 血条高度（像素）
pub const BAR_HEIGHT: f64 = 6.0;

const TRACK_COLOR: Color = Color::rgb(40, 40, 48);

#[derive(Debug)]
struct HealthBarInner {
    hp: Cell<f64>,
    max_hp: f64,
    width: f64,
    fill: SceneNode,
    readout: SceneNode,
}

impl HealthBarInner {
    fn refresh(&self) {
        let shown = display_hp(self.hp.get(), self.max_hp);
        let ratio = if self.max_hp > 0.0 {
            f64::from(shown) / self.max_hp
        } else {
            0.0
        };
        self.fill.set_rect_width(self.width * ratio);
        self.readout.set_text(shown.to_string());
    }
}

impl Animatable for HealthBarInner {
    fn get_property(&self, property_id: &str) -> Option<f64> {
        match property_id {
            "hp" => Some(self.hp.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f64) -> bool {
        match property_id {
            "hp" => {
                self.hp.set(value);
                self.refresh();
                true
            }
            _ => false,
        }
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["hp"]
    }
}

/// 显示用 HP：四舍五入后截断到 `[0, max]`
fn display_hp(hp: f64, max_hp: f64) -> i32 {
    hp.round().clamp(0.0, max_hp.max(0.0)) as i32
}

/// 血条
///
/// 克隆共享同一血条。
#[derive(Debug, Clone)]
pub struct HealthBar {
    inner: Rc<HealthBarInner>,
    node: SceneNode,
}

impl HealthBar {
    /// 创建血条
    ///
    /// # 参数
    /// - `name`: 节点名称前缀
    /// - `max_hp` / `current_hp`: 上限与初始值（初始值不做截断）
    /// - `width`: 满血时填充宽度（像素）
    /// - `color`: 填充颜色
    pub fn new(name: &str, max_hp: i32, current_hp: i32, width: f64, color: Color) -> Self {
        let fill = SceneNode::rect(format!("{name}.fill"), width, BAR_HEIGHT, color);
        let readout = SceneNode::text(format!("{name}.readout"), "", Color::WHITE)
            .at(width + 4.0, -2.0);
        let node = SceneNode::group(name)
            .with_child(SceneNode::rect(
                format!("{name}.track"),
                width,
                BAR_HEIGHT,
                TRACK_COLOR,
            ))
            .with_child(fill.clone())
            .with_child(readout.clone());

        let inner = Rc::new(HealthBarInner {
            hp: Cell::new(f64::from(current_hp)),
            max_hp: f64::from(max_hp),
            width,
            fill,
            readout,
        });
        inner.refresh();

        Self { inner, node }
    }

    /// 血条根节点
    pub fn node(&self) -> &SceneNode {
        &self.node
    }

    /// 当前逻辑 HP（可能为负）
    pub fn hp(&self) -> f64 {
        self.inner.hp.get()
    }

    /// 当前显示的 HP
    pub fn display_hp(&self) -> i32 {
        display_hp(self.inner.hp.get(), self.inner.max_hp)
    }

    /// HP 上限
    pub fn max_hp(&self) -> i32 {
        self.inner.max_hp as i32
    }

    /// 填充比例 (0.0 - 1.0)
    pub fn fill_ratio(&self) -> f64 {
        match self.inner.fill.kind() {
            crate::scene::NodeKind::Rect { width, .. } if self.inner.width > 0.0 => {
                width / self.inner.width
            }
            _ => 0.0,
        }
    }

    /// `hp` 属性引用
    pub fn hp_property(&self) -> PropertyRef {
        PropertyRef::new(self.inner.clone(), "hp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;

    fn readout(bar: &HealthBar) -> String {
        match bar.node().find("bar.readout").map(|n| n.kind()) {
            Some(NodeKind::Text { content, .. }) => content,
            other => panic!("unexpected readout: {other:?}"),
        }
    }

    #[test]
    fn test_initial_state() {
        let bar = HealthBar::new("bar", 60, 40, 90.0, Color::WHITE);
        assert_eq!(bar.hp(), 40.0);
        assert_eq!(bar.display_hp(), 40);
        assert_eq!(bar.max_hp(), 60);
        assert!((bar.fill_ratio() - 40.0 / 60.0).abs() < 1e-9);
        assert_eq!(readout(&bar), "40");
    }

    #[test]
    fn test_property_drives_display() {
        let bar = HealthBar::new("bar", 40, 40, 80.0, Color::WHITE);
        let hp = bar.hp_property();

        hp.set(19.6);
        assert_eq!(bar.display_hp(), 20);
        assert_eq!(bar.fill_ratio(), 0.5);
        assert_eq!(readout(&bar), "20");
    }

    #[test]
    fn test_negative_hp_clamped_for_display_only() {
        let bar = HealthBar::new("bar", 35, 35, 70.0, Color::WHITE);
        bar.hp_property().set(-12.0);

        assert_eq!(bar.hp(), -12.0);
        assert_eq!(bar.display_hp(), 0);
        assert_eq!(bar.fill_ratio(), 0.0);
    }

    #[test]
    fn test_overheal_clamped_for_display() {
        let bar = HealthBar::new("bar", 30, 30, 60.0, Color::WHITE);
        bar.hp_property().set(45.0);
        assert_eq!(bar.display_hp(), 30);
        assert_eq!(bar.fill_ratio(), 1.0);
    }

    #[test]
    fn test_zero_max_hp() {
        let bar = HealthBar::new("bar", 0, 0, 60.0, Color::WHITE);
        assert_eq!(bar.display_hp(), 0);
        assert_eq!(bar.fill_ratio(), 0.0);
    }
}
