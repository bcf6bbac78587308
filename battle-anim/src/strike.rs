//! # Strike 模块
//!
//! 攻击事件数据模型。攻击在编排前由调用方构造，编排期间只读。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 战斗方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 左侧
    Left,
    /// 右侧
    Right,
}

impl Side {
    /// 对手
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// 水平镜像符号：左侧单位被水平翻转
    pub fn mirror(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// 攻击时触发的技能
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifier(pub String);

impl Modifier {
    /// 创建技能
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 技能名称
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 一次攻击
///
/// - `damage`：防守方 HP 减少量
/// - `drain`：攻击方自身 HP 变化量（可为负）
///
/// 两者互相独立，一次攻击可以同时造成伤害并吸血。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    /// 攻击方
    pub attacker: Side,
    /// 伤害
    #[serde(default)]
    pub damage: i32,
    /// 吸取
    #[serde(default)]
    pub drain: i32,
    /// 攻击方触发的技能
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attacker_modifiers: BTreeSet<Modifier>,
    /// 防守方触发的技能
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub defender_modifiers: BTreeSet<Modifier>,
}

impl Strike {
    /// 创建没有技能的攻击
    pub fn new(attacker: Side, damage: i32, drain: i32) -> Self {
        Self {
            attacker,
            damage,
            drain,
            attacker_modifiers: BTreeSet::new(),
            defender_modifiers: BTreeSet::new(),
        }
    }

    /// 添加攻击方技能
    pub fn with_attacker_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.attacker_modifiers.insert(Modifier::new(modifier));
        self
    }

    /// 添加防守方技能
    pub fn with_defender_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.defender_modifiers.insert(Modifier::new(modifier));
        self
    }

    /// 防守方
    pub fn defender(&self) -> Side {
        self.attacker.opponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Left.opponent(), Side::Right);
        assert_eq!(Side::Right.opponent(), Side::Left);
        assert_eq!(Side::Left.mirror(), -1.0);
    }

    #[test]
    fn test_strike_builder() {
        let strike = Strike::new(Side::Right, 20, 10)
            .with_attacker_modifier("Sol")
            .with_defender_modifier("Pavise");

        assert_eq!(strike.defender(), Side::Left);
        assert!(strike.attacker_modifiers.contains(&Modifier::new("Sol")));
        assert!(strike.defender_modifiers.contains(&Modifier::new("Pavise")));
    }

    #[test]
    fn test_strike_json_defaults() {
        let strike: Strike = serde_json::from_str(r#"{ "attacker": "left", "damage": 7 }"#).unwrap();
        assert_eq!(strike, Strike::new(Side::Left, 7, 0));

        let json = serde_json::to_string(&strike).unwrap();
        assert!(!json.contains("modifiers"));
    }
}
