//! # State 模块
//!
//! 编排期间的战斗状态：双方 HP、水平位置与最终结果。
//!
//! HP 不做截断：过量伤害会得到负值，对已倒下一方的攻击照常结算。

use serde::Serialize;

use crate::strike::{Side, Strike};

/// 双方 HP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HpState {
    pub left: i32,
    pub right: i32,
}

impl HpState {
    /// 创建 HP 状态
    pub fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }

    /// 指定一侧的 HP
    pub fn get(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut i32 {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// 结算一次攻击
    ///
    /// 攻击方 HP `+drain`，防守方 HP `-damage`，两者独立。
    pub fn apply(mut self, strike: &Strike) -> Self {
        let attacker = self.get_mut(strike.attacker);
        *attacker = attacker.saturating_add(strike.drain);
        let defender = self.get_mut(strike.defender());
        *defender = defender.saturating_sub(strike.damage);
        self
    }

    /// 指定一侧是否倒下（HP ≤ 0）
    pub fn is_defeated(&self, side: Side) -> bool {
        self.get(side) <= 0
    }
}

/// 战斗结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    LeftDefeated,
    RightDefeated,
    BothDefeated,
    BothStanding,
}

impl BattleOutcome {
    /// 由最终 HP 判定结果
    pub fn from_hp(hp: HpState) -> Self {
        match (hp.is_defeated(Side::Left), hp.is_defeated(Side::Right)) {
            (true, true) => Self::BothDefeated,
            (true, false) => Self::LeftDefeated,
            (false, true) => Self::RightDefeated,
            (false, false) => Self::BothStanding,
        }
    }

    /// 指定一侧是否倒下
    pub fn is_defeated(self, side: Side) -> bool {
        matches!(
            (self, side),
            (Self::BothDefeated, _)
                | (Self::LeftDefeated, Side::Left)
                | (Self::RightDefeated, Side::Right)
        )
    }
}

/// 双方当前水平位置（镜头平移层坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Offsets {
    pub left: f64,
    pub right: f64,
}

impl Offsets {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Side, x: f64) {
        match side {
            Side::Left => self.left = x,
            Side::Right => self.right = x,
        }
    }

    /// 双方水平距离
    pub fn spread(&self) -> f64 {
        (self.right - self.left).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_and_drain_are_independent() {
        let hp = HpState::new(20, 5).apply(&Strike::new(Side::Right, 20, 10));
        assert_eq!(hp, HpState::new(0, 15));
    }

    #[test]
    fn test_no_clamping() {
        let hp = HpState::new(3, 10).apply(&Strike::new(Side::Right, 8, 0));
        assert_eq!(hp.left, -5);
        assert!(hp.is_defeated(Side::Left));

        let hp = hp.apply(&Strike::new(Side::Left, 0, -20));
        assert_eq!(hp.left, -25);
    }

    #[test]
    fn test_outcome() {
        assert_eq!(
            BattleOutcome::from_hp(HpState::new(0, 30)),
            BattleOutcome::LeftDefeated
        );
        assert_eq!(
            BattleOutcome::from_hp(HpState::new(-1, 0)),
            BattleOutcome::BothDefeated
        );
        assert_eq!(
            BattleOutcome::from_hp(HpState::new(1, 1)),
            BattleOutcome::BothStanding
        );
        assert!(BattleOutcome::RightDefeated.is_defeated(Side::Right));
        assert!(!BattleOutcome::RightDefeated.is_defeated(Side::Left));
    }

    #[test]
    fn test_offsets() {
        let mut offsets = Offsets {
            left: -120.0,
            right: 120.0,
        };
        offsets.set(Side::Left, -100.0);
        assert_eq!(offsets.get(Side::Left), -100.0);
        assert_eq!(offsets.spread(), 220.0);
    }
}
