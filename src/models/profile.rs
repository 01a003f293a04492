//! # 名片资料数据模型
//!
//! 定义名片页面展示所需的静态资料结构：个人资料（ProfileRecord）、
//! 统计项（StatItem）和社交链接（SocialLink）。
//!
//! 所有结构体均派生 `Serialize`，字段名按 camelCase 传给前端。
//! 这些数据在进程启动时由 `services::profile_store` 构造，之后不再修改。

use serde::Serialize;

/// 联系方式
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// 微信号：复制按钮和二维码都使用该值
    pub wx: String,
}

/// 个人资料记录
///
/// 中英文双语的名称、头衔、机构和角色，以及联系方式与默认头像地址。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: String,
    pub english_name: String,
    pub title: String,
    pub english_title: String,
    pub org: String,
    pub english_org: String,
    pub role: String,
    pub english_role: String,
    pub contact: Contact,
    /// 默认头像地址（远程图片 URL）
    pub avatar: String,
}

/// 统计项
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface StatItem {
///   label: string;
///   value: string;
///   subValue: string;
///   icon: string;
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatItem {
    pub label: String,
    pub value: String,
    pub sub_value: String,
    /// 图标标签（如 "film"、"music"），由前端映射为具体图标
    pub icon: String,
}

/// 社交链接
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 名片页面一次性拉取的完整资料视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub profile: ProfileRecord,
    pub stats: Vec<StatItem>,
    pub collaborations: Vec<String>,
    pub links: Vec<SocialLink>,
}
