//! # 对话客户端配置
//!
//! 唯一的外部配置是 Gemini API 凭据，从进程环境变量 `API_KEY` 读取。
//! 模型名称和服务地址为内置常量，测试中可直接改写结构体字段指向本地模拟服务。

/// 存放 API 凭据的环境变量名
pub const API_KEY_ENV: &str = "API_KEY";

/// 默认模型
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini 服务根地址
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// 对话客户端配置
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API 凭据：为 None 时对话客户端以离线模式构造
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl ChatConfig {
    /// 从进程环境读取配置
    pub fn from_env() -> Self {
        Self::with_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// 使用给定凭据构造配置；空白凭据视为缺失
    pub fn with_api_key(api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
