//! # 名片视图状态模型

use serde::Serialize;

/// 名片视图的本地状态快照
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface CardSnapshot {
///   avatarUrl: string;
///   avatarOverridden: boolean;
///   qrVisible: boolean;
///   copied: boolean;
///   exporting: boolean;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    /// 当前显示的头像：默认远程地址，或本次会话替换的 data URL
    pub avatar_url: String,
    /// 头像是否已被本地文件替换
    pub avatar_overridden: bool,
    /// 二维码面板是否可见
    pub qr_visible: bool,
    /// "已复制"提示是否显示中
    pub copied: bool,
    /// 是否正在导出名片图片
    pub exporting: bool,
}
