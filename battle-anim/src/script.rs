//! # Script 模块
//!
//! 战斗描述文件（JSON）：双方资料、初始距离与攻击列表。
//!
//! ```json
//! {
//!   "distance": 240,
//!   "left":  { "display_name": "Anna", "team_color": "#3060e0", "max_hp": 60, "current_hp": 40 },
//!   "right": { "display_name": "Bors", "team_color": "#e03030", "max_hp": 35, "current_hp": 35 },
//!   "strikes": [
//!     { "attacker": "right", "damage": 20 },
//!     { "attacker": "left", "damage": 15, "attacker_modifiers": ["Crit"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::choreographer::CombatantProfile;
use crate::error::ScriptError;
use crate::scene::ViewportSize;
use crate::strike::{Side, Strike};

/// 战斗描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleScript {
    /// 双方初始水平距离
    pub distance: f64,

    /// 视口尺寸（缺省时由调用方决定）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<ViewportSize>,

    /// 左侧资料
    pub left: CombatantProfile,

    /// 右侧资料
    pub right: CombatantProfile,

    /// 攻击列表
    #[serde(default)]
    pub strikes: Vec<Strike>,
}

impl BattleScript {
    /// 从 JSON 字符串解析并验证
    pub fn from_json(content: &str) -> Result<Self, ScriptError> {
        let script: Self =
            serde_json::from_str(content).map_err(|e| ScriptError::Parse(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// 从文件加载并验证
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// 验证内容
    ///
    /// HP 允许为任意值（过量伤害、开战即倒下都是合法输入），
    /// 只拒绝无法布局的数值。
    pub fn validate(&self) -> Result<(), ScriptError> {
        if !(self.distance.is_finite() && self.distance >= 0.0) {
            return Err(ScriptError::Invalid(format!(
                "distance 必须是非负有限数，实际为 {}",
                self.distance
            )));
        }

        if let Some(viewport) = self.viewport {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !(valid(viewport.width) && valid(viewport.height)) {
                return Err(ScriptError::Invalid(format!(
                    "viewport 尺寸必须为正数，实际为 {}x{}",
                    viewport.width, viewport.height
                )));
            }
        }

        for (side, profile) in [(Side::Left, &self.left), (Side::Right, &self.right)] {
            if profile.max_hp < 0 {
                return Err(ScriptError::Invalid(format!(
                    "{side} 的 max_hp 不能为负: {}",
                    profile.max_hp
                )));
            }
        }

        Ok(())
    }

    /// 视口尺寸，缺省时使用 `fallback`
    pub fn viewport_or(&self, fallback: ViewportSize) -> ViewportSize {
        self.viewport.unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r##"{
        "distance": 240,
        "left":  { "display_name": "Anna", "team_color": "#3060e0", "max_hp": 60, "current_hp": 40 },
        "right": { "display_name": "Bors", "max_hp": 35, "current_hp": 35 },
        "strikes": [
            { "attacker": "right", "damage": 20 },
            { "attacker": "left", "damage": 15, "attacker_modifiers": ["Crit"] },
            { "attacker": "right", "damage": 20, "drain": 10 }
        ]
    }"##;

    #[test]
    fn test_parse_sample() {
        let script = BattleScript::from_json(SAMPLE).unwrap();
        assert_eq!(script.distance, 240.0);
        assert_eq!(script.viewport, None);
        assert_eq!(script.left.current_hp, 40);
        assert_eq!(script.strikes.len(), 3);
        assert_eq!(script.strikes[1].attacker, Side::Left);
        assert_eq!(script.strikes[1].attacker_modifiers.len(), 1);
        assert_eq!(script.strikes[2].drain, 10);
        assert_eq!(
            script.viewport_or(ViewportSize::default()),
            ViewportSize::default()
        );
    }

    #[test]
    fn test_invalid_distance() {
        let json = SAMPLE.replace("\"distance\": 240", "\"distance\": -1");
        assert!(matches!(
            BattleScript::from_json(&json),
            Err(ScriptError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            BattleScript::from_json("{ \"distance\": 240 }"),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let script = BattleScript::load(file.path()).unwrap();
        assert_eq!(script.right.display_name, "Bors");

        let missing = BattleScript::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ScriptError::Io { .. })));
    }
}
