//! # 神经链接终端 Tauri Commands
//!
//! - `get_transcript` - 获取对话记录快照
//! - `send_chat_message` - 提交一条用户消息并在后台驱动流式回复
//!
//! 流式回复通过事件推送给前端：
//! - `chat://fragment` - 每收到一个片段推送一次占位消息的累计文本
//! - `chat://done` - 流结束（成功或失败）

use std::sync::Arc;

use log::warn;
use tauri::{AppHandle, Emitter, State};

use crate::models::chat::{StreamDoneEvent, SubmitOutcome, TranscriptSnapshot};
use crate::services::transcript::ChatController;

/// 片段事件名
pub const FRAGMENT_EVENT: &str = "chat://fragment";

/// 流结束事件名
pub const DONE_EVENT: &str = "chat://done";

/// 获取对话记录快照
#[tauri::command]
pub async fn get_transcript(
    chat: State<'_, Arc<ChatController>>,
) -> Result<TranscriptSnapshot, String> {
    Ok(chat.snapshot())
}

/// 提交用户消息
///
/// 空白输入或已有请求进行中时不做任何修改，返回 `accepted: false`。
/// 接受后立即返回包含用户消息和空占位消息的快照，
/// 流式回复在异步运行时中驱动，关闭聊天面板不会中断它。
#[tauri::command]
pub async fn send_chat_message(
    app: AppHandle,
    text: String,
    chat: State<'_, Arc<ChatController>>,
) -> Result<SubmitOutcome, String> {
    let Some(turn) = chat.submit(&text) else {
        return Ok(SubmitOutcome {
            accepted: false,
            transcript: chat.snapshot(),
        });
    };

    let transcript = chat.snapshot();
    let controller = Arc::clone(&chat);
    let placeholder_id = turn.placeholder_id;

    tauri::async_runtime::spawn(async move {
        controller
            .drive(turn, |event| {
                if let Err(e) = app.emit(FRAGMENT_EVENT, &event) {
                    warn!("推送对话片段失败: {}", e);
                }
            })
            .await;

        if let Err(e) = app.emit(DONE_EVENT, StreamDoneEvent { id: placeholder_id }) {
            warn!("推送对话结束事件失败: {}", e);
        }
    });

    Ok(SubmitOutcome {
        accepted: true,
        transcript,
    })
}
