//! # 名片资料存储
//!
//! 保存名片页面的全部静态资料：个人资料、统计项、合作方向和社交链接。
//! 资料在启动时构造一次（`ProfileStore::load`），之后只读，
//! 被名片视图、对话人设和 IPC 层共享。

use crate::models::profile::{Contact, ProfileRecord, ProfileView, SocialLink, StatItem};

/// 微信号：复制按钮、二维码和对话人设共用
pub const CONTACT_WX: &str = "Shensi-ST";

/// 默认头像：青色"思"字、深色底的 Logo 风格头像
pub const DEFAULT_AVATAR: &str = "https://ui-avatars.com/api/?name=思&background=0f172a&color=22d3ee&size=512&length=1&font-size=0.5&bold=true&rounded=true";

/// 只读资料存储
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profile: ProfileRecord,
    stats: Vec<StatItem>,
    collaborations: Vec<String>,
    links: Vec<SocialLink>,
}

impl ProfileStore {
    /// 构造内置资料
    pub fn load() -> Self {
        Self {
            profile: ProfileRecord {
                name: "神思庭".into(),
                english_name: "Shen Si Ting".into(),
                title: "灵愿循环数字宇宙主理人".into(),
                english_title: "Master of the Spirit Wish Loop Digital Universe".into(),
                org: "天算AI实验室".into(),
                english_org: "TianSuan AI Lab".into(),
                role: "超个体构建者".into(),
                english_role: "Super Individual Builder".into(),
                contact: Contact {
                    wx: CONTACT_WX.into(),
                },
                avatar: DEFAULT_AVATAR.into(),
            },
            stats: vec![
                stat("视觉创作", "20,000", "部AI短片", "film"),
                stat("音乐创作", "7,000", "分钟原创交响", "music"),
            ],
            collaborations: vec![
                "NFT发行与策划".into(),
                "数字内容版权授权".into(),
                "前沿科技项目投资".into(),
            ],
            links: vec![
                link(
                    "Web3 核心身份",
                    "https://hey.xyz/u/mmmmmmmm1r",
                    "globe",
                    "Hey.xyz Social Graph",
                ),
                link(
                    "SORA2APP 未来工厂",
                    "https://sora.chatgpt.com/profile/mmmmmmmm1r",
                    "cpu",
                    "AI Gen Video Portfolio",
                ),
                link(
                    "X 广播塔",
                    "https://x.com/jinvbar46275",
                    "twitter",
                    "Real-time Signal",
                ),
                link(
                    "Audius 音乐宇宙",
                    "https://audius.co/shensi_st",
                    "headphones",
                    "Sonic Creations",
                ),
                link(
                    "Odysee 频道",
                    "https://odysee.com/@invjinvbar:b",
                    "video",
                    "Decentralized Video",
                ),
                link(
                    "开发日志",
                    "https://jinv2.github.io",
                    "code",
                    "Web2 Development Log",
                ),
            ],
        }
    }

    pub fn profile(&self) -> &ProfileRecord {
        &self.profile
    }

    pub fn stats(&self) -> &[StatItem] {
        &self.stats
    }

    pub fn collaborations(&self) -> &[String] {
        &self.collaborations
    }

    pub fn links(&self) -> &[SocialLink] {
        &self.links
    }

    /// 判断 URL 是否属于已配置的社交链接
    ///
    /// `open_link` command 只允许打开资料中列出的地址。
    pub fn is_known_link(&self, url: &str) -> bool {
        self.links.iter().any(|l| l.url == url)
    }

    /// 组装前端一次性拉取的完整视图
    pub fn view(&self) -> ProfileView {
        ProfileView {
            profile: self.profile.clone(),
            stats: self.stats.clone(),
            collaborations: self.collaborations.clone(),
            links: self.links.clone(),
        }
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::load()
    }
}

fn stat(label: &str, value: &str, sub_value: &str, icon: &str) -> StatItem {
    StatItem {
        label: label.into(),
        value: value.into(),
        sub_value: sub_value.into(),
        icon: icon.into(),
    }
}

fn link(label: &str, url: &str, icon: &str, description: &str) -> SocialLink {
    SocialLink {
        label: label.into(),
        url: url.into(),
        icon: icon.into(),
        description: Some(description.into()),
    }
}
