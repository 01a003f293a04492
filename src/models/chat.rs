//! # 对话数据模型
//!
//! 定义对话记录中的消息（ChatMessage）、消息标识（MessageId）
//! 以及推送给前端的快照和事件载荷。

use serde::Serialize;

/// 消息的稳定标识
///
/// 由对话记录按创建顺序单调递增分配，用于定位占位消息，
/// 不依赖消息在列表中的下标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// 对话消息
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface ChatMessage {
///   id: number;
///   role: 'user' | 'model';
///   text: string;
///   timestamp: number;
///   pending: boolean;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    /// 消息文本：模型占位消息在流式接收期间逐段追加
    pub text: String,
    /// 创建时间：Unix 毫秒时间戳
    pub timestamp: u64,
    /// 是否仍在接收片段（仅模型占位消息在流结束前为 true）
    pub pending: bool,
}

/// 对话记录快照，供前端渲染（只读）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSnapshot {
    pub messages: Vec<ChatMessage>,
    /// 是否有请求正在进行
    pub in_flight: bool,
}

/// 提交消息的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    /// false 表示空输入或已有请求进行中，对话记录未改变
    pub accepted: bool,
    pub transcript: TranscriptSnapshot,
}

/// `chat://fragment` 事件载荷：占位消息的累计文本
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentEvent {
    pub id: MessageId,
    pub text: String,
}

/// `chat://done` 事件载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDoneEvent {
    pub id: MessageId,
}
