//! # Battle Anim
//!
//! 回合制战斗动画编排库。
//!
//! ## 架构概述
//!
//! `battle-anim` 是纯逻辑核心，不依赖窗口或渲染后端。
//! 调用方给出双方战斗者与有序的攻击列表，库返回：
//!
//! - 一棵可渲染的场景树（[`SceneNode`]）
//! - 一条可暂停、可跳转的组合时间轴（[`Timeline`]），交由 [`Transport`] 播放
//!
//! ```text
//! Strike 列表 ──► Choreographer ──► (SceneNode, Timeline)
//!                    │                        │
//!      analyzer / camera / hud                ▼
//!      UnitProvider / SpellProvider      Transport ◄── TransportHandle（其他线程）
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! use battle_anim::{Choreographer, BattleConfig, Transport};
//!
//! let choreographer = Choreographer::new(BattleConfig::default());
//! let battle = choreographer.build_animation(backdrop, viewport, 240.0, &left, &right, &strikes);
//!
//! let mut transport = battle.into_transport();
//! transport.play();
//! loop {
//!     transport.pump();
//!     transport.advance(frame_time);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`animation`]：插值属性、时间轴组合与播放控制
//! - [`analyzer`]：连续攻击分析
//! - [`camera`]：镜头平移求解
//! - [`provider`]：单位与法术效果的外部接口
//! - [`choreographer`]：战斗编排
//! - [`hud`]：血条与技能标签
//! - [`scene`]：场景树
//! - [`effects`]：最简单的内置效果实现
//! - [`config`] / [`error`] / [`strike`] / [`script`]

pub mod analyzer;
pub mod animation;
pub mod camera;
pub mod choreographer;
pub mod config;
pub mod effects;
pub mod error;
pub mod hud;
pub mod provider;
pub mod scene;
pub mod script;
pub mod strike;

pub use analyzer::{ConsecutiveAttack, analyze};
pub use animation::{
    Animatable, EasingFunction, Leaf, PropertyRef, Timeline, Transport, TransportEvent,
    TransportCommand, TransportHandle, TransportState, TransportStatus, ValueCell,
};
pub use camera::{PanSolver, PanTargets};
pub use choreographer::{
    BattleAnimation, BattleOutcome, Choreographer, CombatantProfile, CombatantSide, HpState,
    Stage,
};
pub use config::{BattleConfig, CameraConfig, ShakeConfig, TimingConfig};
pub use error::{
    BattleError, BattleResult, ConfigError, ContractViolation, ScriptError, TransportError,
};
pub use hud::{HealthBar, Hud, ModifierLabel, SideHud};
pub use provider::{Injected, SpellFactory, SpellProvider, UnitProvider};
pub use scene::{Color, NodeKind, NodeSnapshot, Point, SceneNode, Transform, ViewportSize};
pub use script::BattleScript;
pub use strike::{Modifier, Side, Strike};
