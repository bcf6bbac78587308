//! # Config 模块
//!
//! 编排参数集中管理：镜头、节奏、震屏。
//!
//! ## 配置优先级
//!
//! 1. 调用方直接构造的 `BattleConfig`（最高）
//! 2. 配置文件 (battle.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ConfigError;

/// 编排配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BattleConfig {
    /// 镜头配置
    #[serde(default)]
    pub camera: CameraConfig,

    /// 节奏配置
    #[serde(default)]
    pub timing: TimingConfig,

    /// 震屏配置
    #[serde(default)]
    pub shake: ShakeConfig,
}

/// 镜头配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 逻辑视口高度（放大倍率 = 实际高度 / 逻辑高度）
    #[serde(default = "default_logical_height")]
    pub logical_height: f64,

    /// 双方无法同框时，镜头越过攻击方留出的边距
    #[serde(default = "default_pan_margin")]
    pub pan_margin: f64,

    /// 每像素平移耗时（毫秒）
    #[serde(default = "default_pan_ms_per_pixel")]
    pub pan_ms_per_pixel: f64,

    /// 单位站立的基线 Y（逻辑坐标）
    #[serde(default = "default_footline_y")]
    pub footline_y: f64,
}

/// 节奏配置（毫秒）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// 标准停顿
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// 阵亡时泛白耗时
    #[serde(default = "default_death_whiten_ms")]
    pub death_whiten_ms: u64,

    /// 阵亡时淡出耗时
    #[serde(default = "default_death_fade_ms")]
    pub death_fade_ms: u64,

    /// 血条每变化 1 点的耗时
    #[serde(default = "default_hp_ms_per_point")]
    pub hp_ms_per_point: u64,
}

/// 震屏配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShakeConfig {
    /// 振幅（逻辑像素），0 表示关闭震屏
    #[serde(default = "default_shake_amplitude")]
    pub amplitude: f64,

    /// 每一步耗时（毫秒）
    #[serde(default = "default_shake_step_ms")]
    pub step_ms: u64,

    /// 往返次数
    #[serde(default = "default_shake_steps")]
    pub steps: u32,

    /// 终结一击的振幅倍率
    #[serde(default = "default_finisher_multiplier")]
    pub finisher_multiplier: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            logical_height: default_logical_height(),
            pan_margin: default_pan_margin(),
            pan_ms_per_pixel: default_pan_ms_per_pixel(),
            footline_y: default_footline_y(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
            death_whiten_ms: default_death_whiten_ms(),
            death_fade_ms: default_death_fade_ms(),
            hp_ms_per_point: default_hp_ms_per_point(),
        }
    }
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            amplitude: default_shake_amplitude(),
            step_ms: default_shake_step_ms(),
            steps: default_shake_steps(),
            finisher_multiplier: default_finisher_multiplier(),
        }
    }
}

// 默认值函数
fn default_logical_height() -> f64 {
    160.0
}

fn default_pan_margin() -> f64 {
    75.0
}

fn default_pan_ms_per_pixel() -> f64 {
    1.0
}

fn default_footline_y() -> f64 {
    120.0
}

fn default_pause_ms() -> u64 {
    500
}

fn default_death_whiten_ms() -> u64 {
    400
}

fn default_death_fade_ms() -> u64 {
    600
}

fn default_hp_ms_per_point() -> u64 {
    40
}

fn default_shake_amplitude() -> f64 {
    4.0
}

fn default_shake_step_ms() -> u64 {
    30
}

fn default_shake_steps() -> u32 {
    4
}

fn default_finisher_multiplier() -> f64 {
    2.0
}

impl TimingConfig {
    /// 标准停顿
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// 半个标准停顿
    pub fn half_pause(&self) -> Duration {
        self.pause() / 2
    }
}

impl BattleConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并输出警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = ?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 从 JSON 字符串解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.logical_height.is_finite() && camera.logical_height > 0.0) {
            return Err(ConfigError::Validation(
                "logical_height 必须是正数".to_string(),
            ));
        }

        if !(camera.pan_margin.is_finite() && camera.pan_margin >= 0.0) {
            return Err(ConfigError::Validation(
                "pan_margin 不能为负".to_string(),
            ));
        }

        if !(camera.pan_ms_per_pixel.is_finite() && camera.pan_ms_per_pixel >= 0.0) {
            return Err(ConfigError::Validation(
                "pan_ms_per_pixel 不能为负".to_string(),
            ));
        }

        if !camera.footline_y.is_finite() {
            return Err(ConfigError::Validation(
                "footline_y 必须是有限数".to_string(),
            ));
        }

        let shake = &self.shake;
        if !(shake.amplitude.is_finite() && shake.amplitude >= 0.0) {
            return Err(ConfigError::Validation(
                "震屏振幅不能为负".to_string(),
            ));
        }

        if shake.amplitude > 0.0 && shake.steps == 0 {
            return Err(ConfigError::Validation(
                "开启震屏时 steps 至少为 1".to_string(),
            ));
        }

        if !(shake.finisher_multiplier.is_finite() && shake.finisher_multiplier >= 0.0) {
            return Err(ConfigError::Validation(
                "finisher_multiplier 不能为负".to_string(),
            ));
        }

        Ok(())
    }
}
