//! # 对话记录控制器
//!
//! 维护有序的对话消息序列，并保证同一时刻最多只有一个请求在进行。
//!
//! ## 存储结构
//! 消息按稳定的 `MessageId` 存放在 HashMap 中，另用 `Vec<MessageId>` 记录创建顺序。
//! 流式片段按 id 定位占位消息，不依赖下标，序列增长不影响定位。
//!
//! ## 并发约束
//! - 请求进行中时 `submit` 直接返回 None（不排队），对话记录不变
//! - 不提供取消：请求一旦开始，只会自然完成或失败
//! - 控制器自身没有错误分支：失败由对话客户端转换为普通片段文本

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::StreamExt;
use log::{debug, info};

use crate::models::chat::{
    ChatMessage, ChatRole, FragmentEvent, MessageId, TranscriptSnapshot,
};
use crate::services::gemini::FragmentSource;

/// 打开终端时的欢迎语
pub const GREETING: &str = "Connection established. I am the digital echo of Shen Si Ting. How may I assist you in this timeline?";

/// 已被接受、等待驱动的一轮对话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub user_id: MessageId,
    pub placeholder_id: MessageId,
    /// 发送给模型的原始用户输入
    pub prompt: String,
}

/// 对话记录（仅追加）
#[derive(Debug, Default)]
pub struct Transcript {
    order: Vec<MessageId>,
    messages: HashMap<MessageId, ChatMessage>,
    next_id: u64,
    last_timestamp: u64,
    /// 正在接收片段的占位消息
    in_flight: Option<MessageId>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以欢迎语开头的对话记录
    pub fn with_greeting() -> Self {
        let mut transcript = Self::new();
        transcript.push(ChatRole::Model, GREETING.to_string(), false);
        transcript
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.get(&id)
    }

    /// 按创建顺序遍历消息
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.order.iter().filter_map(|id| self.messages.get(id))
    }

    /// 提交用户输入
    ///
    /// 空白输入或已有请求进行中时返回 None，且不修改记录。
    /// 否则依次追加用户消息和空的模型占位消息，并标记请求进行中。
    pub fn submit(&mut self, user_text: &str) -> Option<PendingTurn> {
        if user_text.trim().is_empty() {
            return None;
        }
        if let Some(active) = self.in_flight {
            debug!("请求进行中（占位消息 {:?}），忽略新的提交", active);
            return None;
        }

        let user_id = self.push(ChatRole::User, user_text.to_string(), false);
        let placeholder_id = self.push(ChatRole::Model, String::new(), true);
        self.in_flight = Some(placeholder_id);

        Some(PendingTurn {
            user_id,
            placeholder_id,
            prompt: user_text.to_string(),
        })
    }

    /// 把片段追加到指定占位消息，返回累计文本
    ///
    /// 占位消息已结束或 id 不存在时忽略片段并返回 None。
    pub fn append_chunk(&mut self, id: MessageId, fragment: &str) -> Option<String> {
        let message = self.messages.get_mut(&id)?;
        if !message.pending {
            return None;
        }
        message.text.push_str(fragment);
        Some(message.text.clone())
    }

    /// 结束占位消息并清除进行中标记
    pub fn finish(&mut self, id: MessageId) {
        if let Some(message) = self.messages.get_mut(&id) {
            message.pending = false;
        }
        if self.in_flight == Some(id) {
            self.in_flight = None;
        }
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            messages: self.iter().cloned().collect(),
            in_flight: self.is_in_flight(),
        }
    }

    fn push(&mut self, role: ChatRole, text: String, pending: bool) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);

        // 时间戳严格递增，同一毫秒内创建的消息也能区分先后
        let timestamp = now_millis().max(self.last_timestamp + 1);
        self.last_timestamp = timestamp;

        self.messages.insert(
            id,
            ChatMessage {
                id,
                role,
                text,
                timestamp,
                pending,
            },
        );
        self.order.push(id);
        id
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// 对话控制器
///
/// 通过 Tauri 的 `manage()` 注册为应用状态（`Arc<ChatController>`），
/// 流式驱动任务持有同一个 Arc。对话记录只由控制器修改，渲染层只读快照。
pub struct ChatController {
    transcript: Mutex<Transcript>,
    source: Arc<dyn FragmentSource>,
}

impl ChatController {
    pub fn new(source: Arc<dyn FragmentSource>) -> Self {
        Self {
            transcript: Mutex::new(Transcript::with_greeting()),
            source,
        }
    }

    fn transcript(&self) -> MutexGuard<'_, Transcript> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 提交用户输入，规则见 `Transcript::submit`
    pub fn submit(&self, user_text: &str) -> Option<PendingTurn> {
        let mut transcript = self.transcript();
        let turn = transcript.submit(user_text);
        if let Some(turn) = &turn {
            info!(
                "接受新的对话请求，占位消息 {:?}，当前共 {} 条消息",
                turn.placeholder_id,
                transcript.len()
            );
        }
        turn
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.transcript().snapshot()
    }

    /// 驱动一轮对话直到流结束
    ///
    /// 按到达顺序逐个应用片段，每个片段之后调用一次 `on_update`（不合并）。
    /// 流结束后结束占位消息并返回其最终内容。
    pub async fn drive<F>(&self, turn: PendingTurn, mut on_update: F) -> Option<ChatMessage>
    where
        F: FnMut(FragmentEvent) + Send,
    {
        let mut fragments = self.source.stream_response(&turn.prompt);

        while let Some(fragment) = fragments.next().await {
            let text = self.transcript().append_chunk(turn.placeholder_id, &fragment);
            if let Some(text) = text {
                on_update(FragmentEvent {
                    id: turn.placeholder_id,
                    text,
                });
            }
        }

        let mut transcript = self.transcript();
        transcript.finish(turn.placeholder_id);
        transcript.get(turn.placeholder_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::services::gemini::{ChatClient, FragmentStream, OFFLINE_NOTICE};
    use crate::services::profile_store::ProfileStore;
    use crate::utils::config::ChatConfig;
    use tokio::sync::mpsc;

    /// 按脚本返回固定片段的来源
    struct ScriptedSource {
        fragments: Vec<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new(fragments: Vec<&'static str>) -> Self {
            Self {
                fragments,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl FragmentSource for ScriptedSource {
        fn stream_response(&self, message: &str) -> FragmentStream {
            self.prompts.lock().unwrap().push(message.to_string());
            let fragments: Vec<String> = self.fragments.iter().map(|s| s.to_string()).collect();
            Box::pin(futures_util::stream::iter(fragments))
        }
    }

    /// 由测试逐个推送片段的来源
    struct ChannelSource {
        rx: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
    }

    impl FragmentSource for ChannelSource {
        fn stream_response(&self, _message: &str) -> FragmentStream {
            let mut rx = self.rx.lock().unwrap().take().expect("single use");
            Box::pin(async_stream::stream! {
                while let Some(fragment) = rx.recv().await {
                    yield fragment;
                }
            })
        }
    }

    #[test]
    fn test_transcript_starts_with_greeting() {
        let transcript = Transcript::with_greeting();
        let first = transcript.iter().next().unwrap();
        assert_eq!(first.role, ChatRole::Model);
        assert_eq!(first.text, GREETING);
        assert!(!first.pending);
    }

    #[test]
    fn test_submit_appends_user_then_placeholder() {
        let mut transcript = Transcript::new();
        let turn = transcript.submit("hello").unwrap();

        let messages: Vec<&ChatMessage> = transcript.iter().collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, turn.user_id);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].text, "hello");
        assert_eq!(messages[1].id, turn.placeholder_id);
        assert_eq!(messages[1].role, ChatRole::Model);
        assert!(messages[1].text.is_empty());
        assert!(messages[1].pending);
        assert!(messages[1].timestamp > messages[0].timestamp);
        assert!(transcript.is_in_flight());
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut transcript = Transcript::new();
        assert!(transcript.submit("").is_none());
        assert!(transcript.submit("  \n\t").is_none());
        assert_eq!(transcript.len(), 0);
        assert!(!transcript.is_in_flight());
    }

    #[test]
    fn test_submit_while_in_flight_is_noop() {
        let mut transcript = Transcript::with_greeting();
        transcript.submit("first").unwrap();
        let before = transcript.len();

        assert!(transcript.submit("second").is_none());
        assert_eq!(transcript.len(), before);
    }

    #[test]
    fn test_chunks_are_cumulative_by_id() {
        let mut transcript = Transcript::new();
        let turn = transcript.submit("q").unwrap();

        transcript.append_chunk(turn.placeholder_id, "A");
        transcript.append_chunk(turn.placeholder_id, "B");
        let text = transcript.append_chunk(turn.placeholder_id, "C");
        assert_eq!(text.as_deref(), Some("ABC"));

        transcript.finish(turn.placeholder_id);
        assert!(!transcript.is_in_flight());
        assert!(transcript.append_chunk(turn.placeholder_id, "late").is_none());
        assert_eq!(transcript.get(turn.placeholder_id).unwrap().text, "ABC");
        assert!(transcript.append_chunk(turn.user_id, "x").is_none());
    }

    #[tokio::test]
    async fn test_drive_who_are_you() {
        let source = Arc::new(ScriptedSource::new(vec!["I am ", "the Digital Ghost."]));
        let controller = ChatController::new(source.clone());

        let turn = controller.submit("Who are you?").unwrap();
        let mut updates = Vec::new();
        let last = controller
            .drive(turn, |event| updates.push(event.text))
            .await
            .unwrap();

        assert_eq!(updates, vec!["I am ", "I am the Digital Ghost."]);
        assert_eq!(last.text, "I am the Digital Ghost.");
        assert_eq!(*source.prompts.lock().unwrap(), vec!["Who are you?"]);

        let snapshot = controller.snapshot();
        assert!(!snapshot.in_flight);
        let summary: Vec<(ChatRole, &str, bool)> = snapshot
            .messages
            .iter()
            .map(|m| (m.role, m.text.as_str(), m.pending))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ChatRole::Model, GREETING, false),
                (ChatRole::User, "Who are you?", false),
                (ChatRole::Model, "I am the Digital Ghost.", false),
            ]
        );
    }

    #[tokio::test]
    async fn test_snapshot_already_holds_each_emitted_fragment() {
        let source = Arc::new(ScriptedSource::new(vec!["Neural ", "link ", "online."]));
        let controller = ChatController::new(source);

        let turn = controller.submit("status").unwrap();
        let mut seen = Vec::new();
        controller
            .drive(turn.clone(), |event| {
                // 前端收到片段时重新拉取快照，快照中必须已包含该片段
                let snapshot = controller.snapshot();
                let placeholder = snapshot
                    .messages
                    .iter()
                    .find(|m| m.id == event.id)
                    .unwrap();
                assert_eq!(placeholder.text, event.text);
                assert!(placeholder.pending);
                assert!(snapshot.in_flight);
                seen.push(event.text);
            })
            .await;

        assert_eq!(seen, vec!["Neural ", "Neural link ", "Neural link online."]);

        let snapshot = controller.snapshot();
        assert!(!snapshot.in_flight);
        let last = snapshot.messages.last().unwrap();
        assert_eq!(last.id, turn.placeholder_id);
        assert!(!last.pending);
    }

    #[tokio::test]
    async fn test_offline_client_finishes_with_single_notice() {
        let client = ChatClient::from_config(&ChatConfig::with_api_key(None), &ProfileStore::load());
        let controller = ChatController::new(Arc::new(client));

        let turn = controller.submit("ping").unwrap();
        let mut updates = 0;
        let last = controller.drive(turn, |_| updates += 1).await.unwrap();

        assert_eq!(updates, 1);
        assert_eq!(last.text, OFFLINE_NOTICE);
        assert!(!last.pending);
        assert!(!controller.snapshot().in_flight);
    }

    #[tokio::test]
    async fn test_submit_rejected_during_stream() {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Arc::new(ChatController::new(Arc::new(ChannelSource {
            rx: Mutex::new(Some(rx)),
        })));

        let turn = controller.submit("first").unwrap();
        let driver = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.drive(turn, |_| {}).await })
        };

        tx.send("A".to_string()).unwrap();
        let before = controller.snapshot().messages.len();
        assert!(controller.submit("second").is_none());
        assert_eq!(controller.snapshot().messages.len(), before);

        tx.send("B".to_string()).unwrap();
        drop(tx);
        let last = driver.await.unwrap().unwrap();
        assert_eq!(last.text, "AB");

        // 流结束后可以再次提交
        assert!(controller.submit("third").is_some());
    }
}
