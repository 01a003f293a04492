//! # 名片视图状态
//!
//! 保存名片页面的本地 UI 状态：当前头像、二维码面板、复制提示和导出进度。
//! 通过 `Arc<CardView>` 注册为 Tauri managed state。
//!
//! ## 导出约束
//! 开始导出时强制隐藏二维码面板，前端必须用 `begin_export` 返回的快照截图，
//! 保证导出的图片中不出现二维码浮层。同一时刻只允许一次导出。

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::models::card::CardSnapshot;
use crate::services::clipboard::ClipboardWriter;
use crate::services::profile_store::ProfileStore;
use crate::services::qr;

#[derive(Debug, Default)]
struct CardState {
    /// 本次会话替换的头像（data URL）
    avatar_override: Option<String>,
    qr_visible: bool,
    copied: bool,
    /// 每次复制递增；延迟清除提示时只清除自己那一次
    copy_generation: u64,
    exporting: bool,
}

/// 名片视图
pub struct CardView {
    contact: String,
    default_avatar: String,
    state: Mutex<CardState>,
}

impl CardView {
    pub fn new(store: &ProfileStore) -> Self {
        let profile = store.profile();
        Self {
            contact: profile.contact.wx.clone(),
            default_avatar: profile.avatar.clone(),
            state: Mutex::new(CardState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_of(&self, state: &CardState) -> CardSnapshot {
        CardSnapshot {
            avatar_url: state
                .avatar_override
                .clone()
                .unwrap_or_else(|| self.default_avatar.clone()),
            avatar_overridden: state.avatar_override.is_some(),
            qr_visible: state.qr_visible,
            copied: state.copied,
            exporting: state.exporting,
        }
    }

    pub fn snapshot(&self) -> CardSnapshot {
        self.snapshot_of(&self.state())
    }

    /// 切换二维码面板
    pub fn toggle_qr(&self) -> CardSnapshot {
        let mut state = self.state();
        state.qr_visible = !state.qr_visible;
        self.snapshot_of(&state)
    }

    /// 二维码内容：微信深链
    pub fn qr_uri(&self) -> String {
        qr::wechat_uri(&self.contact)
    }

    pub fn qr_svg(&self) -> Result<String, String> {
        qr::render_svg(&self.qr_uri())
    }

    /// 把微信号写入剪贴板并显示"已复制"提示
    ///
    /// 返回本次复制的序号，供延迟清除提示时使用。
    ///
    /// # 错误
    /// 剪贴板写入失败时返回错误，提示状态不变
    pub fn copy_contact(&self, clipboard: &dyn ClipboardWriter) -> Result<u64, String> {
        clipboard.write_text(&self.contact)?;

        let mut state = self.state();
        state.copied = true;
        state.copy_generation += 1;
        debug!("微信号已复制（第 {} 次）", state.copy_generation);
        Ok(state.copy_generation)
    }

    /// 清除"已复制"提示
    ///
    /// 只有当 `generation` 仍是最近一次复制时才清除，返回是否清除。
    pub fn clear_copied(&self, generation: u64) -> bool {
        let mut state = self.state();
        if state.copy_generation == generation && state.copied {
            state.copied = false;
            true
        } else {
            false
        }
    }

    /// 用本地图片替换头像（仅本次会话有效）
    pub fn replace_avatar(&self, data_url: String) -> CardSnapshot {
        let mut state = self.state();
        state.avatar_override = Some(data_url);
        info!("头像已替换为本地图片");
        self.snapshot_of(&state)
    }

    pub fn reset_avatar(&self) -> CardSnapshot {
        let mut state = self.state();
        state.avatar_override = None;
        self.snapshot_of(&state)
    }

    /// 开始导出
    ///
    /// # 错误
    /// 已有导出在进行中时返回错误
    pub fn begin_export(&self) -> Result<CardSnapshot, String> {
        let mut state = self.state();
        if state.exporting {
            return Err("名片图片正在导出中".to_string());
        }
        state.exporting = true;
        state.qr_visible = false;
        Ok(self.snapshot_of(&state))
    }

    /// 结束导出（无论成功与否）
    pub fn finish_export(&self) -> CardSnapshot {
        let mut state = self.state();
        state.exporting = false;
        self.snapshot_of(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::services::clipboard::MemoryClipboard;
    use crate::services::profile_store::{CONTACT_WX, DEFAULT_AVATAR};

    fn card() -> CardView {
        CardView::new(&ProfileStore::load())
    }

    #[test]
    fn test_initial_state() {
        let snapshot = card().snapshot();
        assert_eq!(snapshot.avatar_url, DEFAULT_AVATAR);
        assert!(!snapshot.avatar_overridden);
        assert!(!snapshot.qr_visible);
        assert!(!snapshot.copied);
        assert!(!snapshot.exporting);
    }

    #[test]
    fn test_copy_contact_round_trip() {
        let card = card();
        let clipboard = MemoryClipboard::default();

        let generation = card.copy_contact(&clipboard).unwrap();
        assert_eq!(clipboard.read_text().as_deref(), Some(CONTACT_WX));
        assert!(card.snapshot().copied);

        assert!(card.clear_copied(generation));
        assert!(!card.snapshot().copied);
    }

    #[test]
    fn test_stale_clear_keeps_newer_copy_flag() {
        let card = card();
        let clipboard = MemoryClipboard::default();

        let first = card.copy_contact(&clipboard).unwrap();
        let second = card.copy_contact(&clipboard).unwrap();

        assert!(!card.clear_copied(first));
        assert!(card.snapshot().copied);
        assert!(card.clear_copied(second));
    }

    #[test]
    fn test_failed_copy_leaves_flag_unset() {
        struct Broken;
        impl ClipboardWriter for Broken {
            fn write_text(&self, _text: &str) -> Result<(), String> {
                Err("no display".into())
            }
        }

        let card = card();
        assert!(card.copy_contact(&Broken).is_err());
        assert!(!card.snapshot().copied);
    }

    #[test]
    fn test_export_hides_open_qr_panel() {
        let card = card();
        assert!(card.toggle_qr().qr_visible);

        let capture = card.begin_export().unwrap();
        assert!(!capture.qr_visible);
        assert!(capture.exporting);

        // 导出进行中不允许再次开始
        assert!(card.begin_export().is_err());

        let done = card.finish_export();
        assert!(!done.exporting);
        assert!(!done.qr_visible);
        assert!(card.begin_export().is_ok());
    }

    #[test]
    fn test_capture_plan_carries_hidden_qr_panel() {
        let card = card();
        card.toggle_qr();
        assert!(card.snapshot().qr_visible);

        let plan = crate::services::export::ExportPlan::new(card.begin_export().unwrap());
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["snapshot"]["qrVisible"], false);
        assert_eq!(json["snapshot"]["exporting"], true);

        // 导出结束后二维码面板保持隐藏，需要用户重新打开
        assert!(!card.finish_export().qr_visible);
        assert!(card.toggle_qr().qr_visible);
    }

    #[test]
    fn test_avatar_override_is_session_scoped() {
        let card = card();
        let replaced = card.replace_avatar("data:image/png;base64,AAAA".into());
        assert!(replaced.avatar_overridden);
        assert_eq!(replaced.avatar_url, "data:image/png;base64,AAAA");

        let reset = card.reset_avatar();
        assert!(!reset.avatar_overridden);
        assert_eq!(reset.avatar_url, DEFAULT_AVATAR);
    }

    #[test]
    fn test_qr_uri_uses_contact_handle() {
        assert_eq!(card().qr_uri(), "weixin://dl/chat?Shensi-ST");
    }
}
