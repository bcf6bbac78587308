//! # Transport 模块
//!
//! 时间轴播放控制：播放、暂停、恢复、停止、跳转与进度。
//!
//! ## 状态转换
//!
//! ```text
//! Idle ──play──► Running ──pause──► Paused ──resume──► Running
//!                   │                                     │
//!                   └──────────── 到达终点 ───────────────► Finished
//!
//! 任意状态 ──stop──► Idle（若本轮尚未通知则先触发 on_finished）
//! Idle / Finished ──seek──► Paused
//! ```
//!
//! 时间只由外部时钟通过 [`Transport::advance`] 推进，内部不开线程。
//! 其他线程通过 [`TransportHandle`] 发送请求，时钟线程每帧调用
//! [`Transport::pump`] 处理。

use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::debug;

use super::remote::{RemoteReply, RemoteRequest, TransportCommand, TransportHandle};
use super::schedule::Schedule;
use super::Timeline;
use crate::error::TransportError;
use crate::scene::SceneNode;

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportStatus {
    /// 未开始 / 已停止
    #[default]
    Idle,
    /// 正在播放
    Running,
    /// 已暂停
    Paused,
    /// 自然播放到终点
    Finished,
}

/// 播放事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// 状态变化
    StatusChanged {
        from: TransportStatus,
        to: TransportStatus,
    },
    /// 本轮播放结束（自然结束或被停止）
    Finished,
}

/// 播放状态快照（可跨线程传递）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransportState {
    /// 状态
    pub status: TransportStatus,
    /// 当前位置
    pub position: Duration,
    /// 总时长
    pub total: Duration,
    /// 进度 (0.0 - 1.0)
    pub progress: f64,
}

type StatusListener = Box<dyn FnMut(TransportStatus, TransportStatus)>;

/// 播放控制器
///
/// 独占一棵时间轴。叶子会改写场景属性，所以同一份时间轴不能被两个控制器共享，
/// 需要并行播放时请重新构建。
pub struct Transport {
    schedule: Schedule,
    status: TransportStatus,
    position: Duration,
    /// 本轮是否已经触发过结束通知
    finished_fired: bool,
    on_finished: Option<Box<dyn FnMut()>>,
    listeners: Vec<StatusListener>,
    events: Vec<TransportEvent>,
    scene: Option<SceneNode>,
    inbox: Option<(Sender<RemoteRequest>, Receiver<RemoteRequest>)>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("status", &self.status)
            .field("position", &self.position)
            .field("total", &self.schedule.total())
            .field("leaves", &self.schedule.entries().len())
            .finish()
    }
}

impl Transport {
    /// 接管时间轴
    pub fn new(root: Timeline) -> Self {
        Self {
            schedule: Schedule::compile(root),
            status: TransportStatus::Idle,
            position: Duration::ZERO,
            finished_fired: false,
            on_finished: None,
            listeners: Vec::new(),
            events: Vec::new(),
            scene: None,
            inbox: None,
        }
    }

    /// 绑定场景（用于快照）
    pub fn with_scene(mut self, scene: SceneNode) -> Self {
        self.scene = Some(scene);
        self
    }

    /// 设置结束回调
    ///
    /// 每轮播放恰好触发一次：自然结束或 `stop()`。
    pub fn set_on_finished(&mut self, callback: impl FnMut() + 'static) {
        self.on_finished = Some(Box::new(callback));
    }

    /// 注册状态变化监听
    pub fn on_status_change(
        &mut self,
        listener: impl FnMut(TransportStatus, TransportStatus) + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    // ========== 查询 ==========

    /// 当前状态
    pub fn status(&self) -> TransportStatus {
        self.status
    }

    /// 当前位置
    pub fn position(&self) -> Duration {
        self.position
    }

    /// 总时长
    pub fn total_duration(&self) -> Duration {
        self.schedule.total()
    }

    /// 进度 (0.0 - 1.0)，空闲时为 0
    pub fn progress(&self) -> f64 {
        match self.status {
            TransportStatus::Idle => 0.0,
            _ if self.schedule.total().is_zero() => {
                if self.status == TransportStatus::Finished {
                    1.0
                } else {
                    0.0
                }
            }
            _ => (self.position.as_secs_f64() / self.schedule.total().as_secs_f64())
                .clamp(0.0, 1.0),
        }
    }

    /// 状态快照
    pub fn state(&self) -> TransportState {
        TransportState {
            status: self.status,
            position: self.position,
            total: self.schedule.total(),
            progress: self.progress(),
        }
    }

    /// 绑定的场景
    pub fn scene(&self) -> Option<&SceneNode> {
        self.scene.as_ref()
    }

    /// 展开后的时间轴
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// 取出并清空事件队列
    pub fn drain_events(&mut self) -> Vec<TransportEvent> {
        std::mem::take(&mut self.events)
    }

    // ========== 控制 ==========

    /// 开始播放
    ///
    /// - 空闲 / 已结束：从 0 开始新一轮
    /// - 暂停：恢复
    /// - 播放中：无操作
    pub fn play(&mut self) {
        match self.status {
            TransportStatus::Running => {}
            TransportStatus::Paused => self.resume(),
            TransportStatus::Idle | TransportStatus::Finished => {
                self.position = Duration::ZERO;
                self.finished_fired = false;
                self.schedule.apply(Duration::ZERO);
                self.set_status(TransportStatus::Running);
                if self.schedule.total().is_zero() {
                    self.complete();
                }
            }
        }
    }

    /// 暂停
    pub fn pause(&mut self) {
        if self.status == TransportStatus::Running {
            self.set_status(TransportStatus::Paused);
        }
    }

    /// 恢复
    pub fn resume(&mut self) {
        if self.status == TransportStatus::Paused {
            self.set_status(TransportStatus::Running);
            if self.position >= self.schedule.total() {
                self.complete();
            }
        }
    }

    /// 停止并回到空闲
    ///
    /// 任何时刻都可以调用；本轮尚未通知结束时会先触发 `on_finished`。
    pub fn stop(&mut self) {
        self.fire_finished();
        self.position = Duration::ZERO;
        self.set_status(TransportStatus::Idle);
    }

    /// 跳转到指定位置（截断到 `[0, total]`），立即解析所有属性
    ///
    /// 空闲或已结束时跳转会进入暂停状态，开始新一轮。
    pub fn seek(&mut self, position: Duration) {
        self.position = position.min(self.schedule.total());
        self.schedule.apply(self.position);

        if matches!(
            self.status,
            TransportStatus::Idle | TransportStatus::Finished
        ) {
            self.finished_fired = false;
            self.set_status(TransportStatus::Paused);
        }
    }

    /// 推进时钟
    ///
    /// # 返回
    /// - `true`: 仍在播放
    /// - `false`: 未在播放或本次推进后结束
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.status != TransportStatus::Running {
            return false;
        }

        self.position = (self.position + dt).min(self.schedule.total());
        self.schedule.apply(self.position);

        if self.position >= self.schedule.total() {
            self.complete();
            return false;
        }
        true
    }

    fn complete(&mut self) {
        self.set_status(TransportStatus::Finished);
        self.fire_finished();
    }

    fn fire_finished(&mut self) {
        if self.finished_fired {
            return;
        }
        self.finished_fired = true;
        self.events.push(TransportEvent::Finished);
        if let Some(callback) = self.on_finished.as_mut() {
            callback();
        }
    }

    fn set_status(&mut self, status: TransportStatus) {
        let from = self.status;
        if from == status {
            return;
        }
        self.status = status;
        debug!(
            ?from,
            to = ?status,
            position_ms = self.position.as_millis() as u64,
            "播放状态变化"
        );
        self.events.push(TransportEvent::StatusChanged { from, to: status });
        for listener in &mut self.listeners {
            listener(from, status);
        }
    }

    // ========== 跨线程 ==========

    /// 获取可跨线程使用的控制句柄
    pub fn remote(&mut self) -> TransportHandle {
        let (sender, _) = self.inbox.get_or_insert_with(mpsc::channel);
        TransportHandle::new(sender.clone())
    }

    /// 处理其他线程提交的请求，由时钟线程每帧调用
    ///
    /// # 返回
    /// 本次处理的请求数量
    pub fn pump(&mut self) -> usize {
        let requests: Vec<RemoteRequest> = match &self.inbox {
            Some((_, receiver)) => receiver.try_iter().collect(),
            None => return 0,
        };

        let count = requests.len();
        for request in requests {
            self.execute(request.command);

            let Some(reply) = request.reply else {
                continue;
            };
            let result = if request.snapshot {
                match &self.scene {
                    Some(scene) => Ok(RemoteReply {
                        state: self.state(),
                        snapshot: Some(scene.snapshot()),
                    }),
                    None => Err(TransportError::NoScene),
                }
            } else {
                Ok(RemoteReply {
                    state: self.state(),
                    snapshot: None,
                })
            };
            // 请求方可能已放弃等待
            let _ = reply.send(result);
        }
        count
    }

    /// 执行一条控制命令
    pub fn execute(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::Play => self.play(),
            TransportCommand::Pause => self.pause(),
            TransportCommand::Resume => self.resume(),
            TransportCommand::Stop => self.stop(),
            TransportCommand::Seek(position) => self.seek(position),
        }
    }
}
