//! # Error 模块
//!
//! 定义 battle-anim 中使用的错误类型。
//!
//! 编排本身不会失败（数值边界一律退化为空操作），
//! 这里的错误只来自配置、战斗描述文件和跨线程播放控制。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 读取失败
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 序列化/反序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// 战斗描述文件错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// 读取失败
    #[error("无法读取战斗描述 '{path}': {message}")]
    Io { path: String, message: String },

    /// JSON 解析失败
    #[error("战斗描述解析失败: {0}")]
    Parse(String),

    /// 内容无效
    #[error("战斗描述无效: {0}")]
    Invalid(String),
}

/// 播放控制错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 时钟线程已经不再处理请求（Transport 被丢弃）
    #[error("时钟驱动已断开")]
    Disconnected,

    /// 请求快照但 Transport 未绑定场景
    #[error("Transport 未绑定场景，无法生成快照")]
    NoScene,
}

/// 效果提供者违反"恰好一次"约定
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{hook} 应当恰好被使用一次，实际 {uses} 次（第 {strike} 次攻击）")]
pub struct ContractViolation {
    /// 注入点名称
    pub hook: &'static str,
    /// 实际使用次数
    pub uses: u32,
    /// 攻击序号（从 0 开始）
    pub strike: usize,
}

/// battle-anim 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 战斗描述错误
    #[error("战斗描述错误: {0}")]
    Script(#[from] ScriptError),

    /// 播放控制错误
    #[error("播放控制错误: {0}")]
    Transport(#[from] TransportError),

    /// 提供者约定违反
    #[error("提供者约定违反: {0}")]
    Contract(#[from] ContractViolation),
}

/// Result 类型别名
pub type BattleResult<T> = Result<T, BattleError>;
