//! # SSE 增量解码器
//!
//! Gemini 的 `streamGenerateContent?alt=sse` 接口以 Server-Sent Events 返回结果。
//! 网络分块与事件边界无关：一个事件可能跨多个分块，一个分块也可能包含多个事件，
//! 因此解码器在内部缓冲字节，只在遇到完整行时处理。
//!
//! ## 解析规则
//! - 以 `\n` 分行，行尾的 `\r` 被去除
//! - `data:` 行的内容（去掉冒号后的一个可选空格）累积到当前事件
//! - 空行结束当前事件；同一事件的多条 `data:` 行以 `\n` 连接
//! - 注释行（以 `:` 开头）和其他字段被忽略

use bytes::BytesMut;
use serde_json::Value;

/// SSE 增量解码器
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// 尚未构成完整行的字节
    buf: BytesMut,
    /// 当前事件已累积的 data 行
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送入一个网络分块，返回其中已完整的事件 data 载荷
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = memchr::memchr(b'\n', &self.buf) {
            let line = self.buf.split_to(pos + 1);
            let line = trim_line_end(&line);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// 流结束时调用：处理末尾没有换行的残留行，并派发未以空行结束的事件
    pub fn finish(&mut self) -> Vec<String> {
        let mut events = Vec::new();
        if !self.buf.is_empty() {
            let rest = self.buf.split();
            if let Some(event) = self.process_line(trim_line_end(&rest)) {
                events.push(event);
            }
        }
        if let Some(event) = self.take_event() {
            events.push(event);
        }
        events
    }

    fn process_line(&mut self, line: &[u8]) -> Option<String> {
        if line.is_empty() {
            return self.take_event();
        }
        let line = String::from_utf8_lossy(line);
        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.data.push(value.to_string());
        }
        None
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let event = self.data.join("\n");
        self.data.clear();
        Some(event)
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// 从一个 `GenerateContentResponse` 事件中提取文本片段
///
/// 拼接 `candidates[0].content.parts[*].text`；没有文本的事件
///（如仅含 finishReason 或 usageMetadata）返回空字符串。
///
/// # 错误
/// 载荷不是合法 JSON，或服务在流中返回 `error` 对象时返回错误
pub fn extract_text(payload: &str) -> Result<String, String> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| format!("解析流式事件失败: {}", e))?;

    if let Some(err) = value.get("error") {
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("未知错误");
        return Err(format!("服务返回错误: {}", message));
    }

    let text = value
        .pointer("/candidates/0/content/parts")
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}
