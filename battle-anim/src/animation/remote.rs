//! # Remote 模块
//!
//! 跨线程播放控制。
//!
//! 时间轴与场景只在时钟线程上读写。其他线程（例如逐帧导出）通过
//! [`TransportHandle`] 把命令投递到通道里，时钟线程在
//! [`Transport::pump`](super::Transport::pump) 中依次执行，
//! 并通过一次性回执通道把执行后的状态（以及可选的场景快照）送回。
//!
//! ```text
//! 工作线程                          时钟线程
//!   seek_blocking(t) ──request──►  pump(): seek(t) + state()
//!        (阻塞)      ◄──reply────
//! ```

use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use super::TransportState;
use crate::error::TransportError;
use crate::scene::NodeSnapshot;

/// 播放控制命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    Play,
    Pause,
    Resume,
    Stop,
    Seek(Duration),
}

/// 执行结果回执
#[derive(Debug, Clone)]
pub(crate) struct RemoteReply {
    pub state: TransportState,
    pub snapshot: Option<NodeSnapshot>,
}

/// 投递给时钟线程的请求
pub(crate) struct RemoteRequest {
    pub command: TransportCommand,
    /// 是否在执行后生成场景快照
    pub snapshot: bool,
    /// 回执通道；`None` 表示不等待
    pub reply: Option<Sender<Result<RemoteReply, TransportError>>>,
}

/// 跨线程控制句柄
///
/// 可以克隆并发送到任意线程。Transport 被丢弃后所有调用返回
/// [`TransportError::Disconnected`]。
#[derive(Clone)]
pub struct TransportHandle {
    sender: Sender<RemoteRequest>,
}

impl std::fmt::Debug for TransportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportHandle").finish_non_exhaustive()
    }
}

impl TransportHandle {
    pub(crate) fn new(sender: Sender<RemoteRequest>) -> Self {
        Self { sender }
    }

    /// 投递命令，不等待执行
    pub fn send(&self, command: TransportCommand) -> Result<(), TransportError> {
        self.sender
            .send(RemoteRequest {
                command,
                snapshot: false,
                reply: None,
            })
            .map_err(|_| TransportError::Disconnected)
    }

    /// 投递命令并阻塞到时钟线程执行完毕
    pub fn request(&self, command: TransportCommand) -> Result<TransportState, TransportError> {
        self.round_trip(command, false).map(|reply| reply.state)
    }

    /// 阻塞式跳转，返回跳转后的播放状态
    pub fn seek_blocking(&self, position: Duration) -> Result<TransportState, TransportError> {
        self.request(TransportCommand::Seek(position))
    }

    /// 跳转并返回该时刻的场景快照
    pub fn snapshot_at(&self, position: Duration) -> Result<NodeSnapshot, TransportError> {
        self.round_trip(TransportCommand::Seek(position), true)?
            .snapshot
            .ok_or(TransportError::NoScene)
    }

    fn round_trip(
        &self,
        command: TransportCommand,
        snapshot: bool,
    ) -> Result<RemoteReply, TransportError> {
        let (reply, ack) = mpsc::channel();
        self.sender
            .send(RemoteRequest {
                command,
                snapshot,
                reply: Some(reply),
            })
            .map_err(|_| TransportError::Disconnected)?;

        // Transport 在处理前被丢弃时回执通道随之关闭
        ack.recv().map_err(|_| TransportError::Disconnected)?
    }
}
