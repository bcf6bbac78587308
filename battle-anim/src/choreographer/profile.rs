//! # Profile 模块
//!
//! 战斗者参数：外观提供者与 HUD 资料。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::provider::{SpellProvider, UnitProvider};
use crate::scene::Color;

/// 战斗者资料（可序列化部分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantProfile {
    /// 队伍颜色
    #[serde(default)]
    pub team_color: Color,

    /// 显示名称
    pub display_name: String,

    /// 武器名称
    #[serde(default)]
    pub weapon_name: String,

    /// 武器图标资源名
    #[serde(default)]
    pub weapon_icon: String,

    /// HP 上限
    pub max_hp: i32,

    /// 开战时 HP（不要求 ≤ 上限）
    pub current_hp: i32,
}

impl CombatantProfile {
    /// 创建资料
    pub fn new(display_name: impl Into<String>, max_hp: i32, current_hp: i32) -> Self {
        Self {
            team_color: Color::WHITE,
            display_name: display_name.into(),
            weapon_name: String::new(),
            weapon_icon: String::new(),
            max_hp,
            current_hp,
        }
    }

    /// 设置队伍颜色
    pub fn with_team_color(mut self, color: Color) -> Self {
        self.team_color = color;
        self
    }

    /// 设置武器
    pub fn with_weapon(mut self, name: impl Into<String>, icon: impl Into<String>) -> Self {
        self.weapon_name = name.into();
        self.weapon_icon = icon.into();
        self
    }
}

/// 一侧战斗者
///
/// 由调用方持有，编排器只读。
pub struct CombatantSide {
    pub unit: Box<dyn UnitProvider>,
    pub spell: Box<dyn SpellProvider>,
    pub profile: CombatantProfile,
}

impl CombatantSide {
    /// 创建战斗者
    pub fn new(
        unit: impl UnitProvider + 'static,
        spell: impl SpellProvider + 'static,
        profile: CombatantProfile,
    ) -> Self {
        Self {
            unit: Box::new(unit),
            spell: Box::new(spell),
            profile,
        }
    }
}

impl fmt::Debug for CombatantSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatantSide")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
