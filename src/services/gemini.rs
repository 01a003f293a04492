//! # Gemini 流式对话客户端
//!
//! 把一条用户输入转换为来自 Gemini `streamGenerateContent` 接口的文本片段流。
//!
//! ## 客户端构造
//! 启动时根据 `ChatConfig` 显式构造 `ChatClient`：
//! - 未配置 API 凭据时为 `ChatClient::Unconfigured`，调用时只产出一条离线提示
//! - 否则为 `ChatClient::Gemini`，每条消息发起一次独立的流式请求
//!
//! ## 请求生命周期
//! `Idle → Requesting → Streaming → {Completed | Failed}`
//!
//! 任何失败（连接、非 2xx 状态、流中断、事件解析失败）都会在已产出的片段之后
//! 追加一条固定的错误提示片段并结束流，不向调用方返回错误，也不自动重试。
//! 本模块不设置超时，完全依赖底层传输的生命周期。

use std::fmt;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use log::{debug, error, info, warn};
use serde_json::{Value, json};

use crate::services::persona;
use crate::services::profile_store::ProfileStore;
use crate::services::sse::{self, SseDecoder};
use crate::utils::config::ChatConfig;

/// 未配置凭据时返回的离线提示
pub const OFFLINE_NOTICE: &str = "Error: Neural Link Offline. API_KEY missing.";

/// 请求失败时追加的错误提示
pub const ERROR_NOTICE: &str = "\n[SYSTEM ERROR]: Connection to the digital void interrupted.";

/// 文本片段流：有限、不可重启，按服务端产出顺序排列
pub type FragmentStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// 片段来源
///
/// 对话控制器只依赖此 trait，测试中可替换为脚本化的片段来源。
pub trait FragmentSource: Send + Sync {
    /// 为一条用户消息发起请求，返回片段流
    fn stream_response(&self, message: &str) -> FragmentStream;
}

/// 单次请求的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Idle => "IDLE",
            RequestState::Requesting => "REQUESTING",
            RequestState::Streaming => "STREAMING",
            RequestState::Completed => "COMPLETED",
            RequestState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

fn transition(request_id: u64, from: &mut RequestState, to: RequestState) {
    debug!("Gemini 请求 #{}: {} -> {}", request_id, from, to);
    *from = to;
}

/// 对话客户端
pub enum ChatClient {
    /// 未配置 API 凭据
    Unconfigured,
    /// 已配置的 Gemini 客户端
    Gemini(GeminiClient),
}

impl ChatClient {
    /// 根据配置构造客户端
    ///
    /// 缺少凭据或 HTTP 客户端初始化失败时软失败为 `Unconfigured`。
    pub fn from_config(config: &ChatConfig, store: &ProfileStore) -> Self {
        let Some(api_key) = config.api_key.clone() else {
            warn!("未配置 API_KEY，神经链接以离线模式启动");
            return ChatClient::Unconfigured;
        };

        match reqwest::Client::builder().build() {
            Ok(http) => {
                info!("Gemini 客户端已就绪，模型: {}", config.model);
                ChatClient::Gemini(GeminiClient::new(
                    http,
                    api_key,
                    config,
                    persona::build_system_instruction(store),
                ))
            }
            Err(e) => {
                error!("初始化 HTTP 客户端失败: {}", e);
                ChatClient::Unconfigured
            }
        }
    }
}

impl FragmentSource for ChatClient {
    fn stream_response(&self, message: &str) -> FragmentStream {
        match self {
            ChatClient::Unconfigured => {
                Box::pin(futures_util::stream::iter([OFFLINE_NOTICE.to_string()]))
            }
            ChatClient::Gemini(client) => client.stream(message),
        }
    }
}

/// Gemini REST 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    system_instruction: String,
    next_request_id: std::sync::atomic::AtomicU64,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        api_key: String,
        config: &ChatConfig,
        system_instruction: String,
    ) -> Self {
        let endpoint = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Self {
            http,
            api_key,
            endpoint,
            system_instruction,
            next_request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// 构造请求体：固定系统指令 + 唯一的一轮用户消息，不携带历史记录
    fn request_body(&self, message: &str) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": self.system_instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": message }]
            }]
        })
    }

    /// 发起一次流式请求
    pub fn stream(&self, message: &str) -> FragmentStream {
        let request_id = self
            .next_request_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let request = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(message));

        Box::pin(async_stream::stream! {
            let mut state = RequestState::Idle;
            transition(request_id, &mut state, RequestState::Requesting);

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    error!("Gemini 请求 #{} 发送失败: {}", request_id, e);
                    transition(request_id, &mut state, RequestState::Failed);
                    yield ERROR_NOTICE.to_string();
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(
                    "Gemini 请求 #{} 返回错误状态 {}: {}",
                    request_id,
                    status,
                    body.chars().take(200).collect::<String>()
                );
                transition(request_id, &mut state, RequestState::Failed);
                yield ERROR_NOTICE.to_string();
                return;
            }

            transition(request_id, &mut state, RequestState::Streaming);
            let mut body = response.bytes_stream();
            let mut decoder = SseDecoder::new();
            let mut fragments = 0usize;

            loop {
                let (payloads, ended) = match body.next().await {
                    Some(Ok(chunk)) => (decoder.push(&chunk), false),
                    Some(Err(e)) => {
                        error!("Gemini 请求 #{} 流中断: {}", request_id, e);
                        transition(request_id, &mut state, RequestState::Failed);
                        yield ERROR_NOTICE.to_string();
                        return;
                    }
                    None => (decoder.finish(), true),
                };

                for payload in payloads {
                    match sse::extract_text(&payload) {
                        Ok(text) if !text.is_empty() => {
                            fragments += 1;
                            yield text;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Gemini 请求 #{} {}", request_id, e);
                            transition(request_id, &mut state, RequestState::Failed);
                            yield ERROR_NOTICE.to_string();
                            return;
                        }
                    }
                }

                if ended {
                    break;
                }
            }

            transition(request_id, &mut state, RequestState::Completed);
            info!("Gemini 请求 #{} 完成，共 {} 个片段", request_id, fragments);
        })
    }
}
