//! # 系统剪贴板适配
//!
//! 名片视图只需要"写入一段固定文本"这一种能力，用 `ClipboardWriter` trait 抽象，
//! 桌面端由 `arboard` 实现，测试中使用内存实现。
//!
//! ## 句柄生命周期
//! Linux（X11/Wayland）上剪贴板内容归进程内的 `arboard::Clipboard` 实例所有，
//! 实例被释放后内容只会交给剪贴板管理器（如果有的话）。
//! 因此 `SystemClipboard` 在应用启动时打开一次句柄并一直持有到进程退出；
//! 打开失败时在下一次写入时重试。

use std::sync::{Mutex, PoisonError};

use log::{info, warn};

/// 剪贴板写入能力
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// 平台剪贴板句柄
pub trait ClipboardHandle: Send {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

impl ClipboardHandle for arboard::Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        arboard::Clipboard::set_text(self, text).map_err(|e| format!("写入剪贴板失败: {}", e))
    }
}

type Opener<H> = Box<dyn Fn() -> Result<H, String> + Send + Sync>;

/// 长期持有平台句柄的剪贴板
pub struct HeldClipboard<H> {
    open: Opener<H>,
    handle: Mutex<Option<H>>,
}

/// 基于 `arboard` 的系统剪贴板，通过 Tauri 的 `manage()` 注册为应用状态
pub type SystemClipboard = HeldClipboard<arboard::Clipboard>;

impl SystemClipboard {
    pub fn new() -> Self {
        HeldClipboard::with_opener(|| {
            arboard::Clipboard::new().map_err(|e| format!("打开系统剪贴板失败: {}", e))
        })
    }
}

impl<H: ClipboardHandle> HeldClipboard<H> {
    /// 立即尝试打开一次句柄；失败只记录日志
    pub fn with_opener<F>(open: F) -> Self
    where
        F: Fn() -> Result<H, String> + Send + Sync + 'static,
    {
        let handle = match open() {
            Ok(handle) => {
                info!("系统剪贴板已就绪");
                Some(handle)
            }
            Err(e) => {
                warn!("{}，将在首次复制时重试", e);
                None
            }
        };
        Self {
            open: Box::new(open),
            handle: Mutex::new(handle),
        }
    }
}

impl<H: ClipboardHandle> ClipboardWriter for HeldClipboard<H> {
    fn write_text(&self, text: &str) -> Result<(), String> {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some((self.open)()?);
        }
        slot.as_mut()
            .map_or_else(|| Err("系统剪贴板不可用".to_string()), |handle| handle.set_text(text))
    }
}

/// 内存剪贴板（测试用）
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryClipboard {
    pub fn read_text(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录打开和释放次数的句柄；释放时内容随之丢失
    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        dropped: AtomicUsize,
        contents: Mutex<Option<String>>,
    }

    struct TrackedHandle(Arc<Counters>);

    impl ClipboardHandle for TrackedHandle {
        fn set_text(&mut self, text: &str) -> Result<(), String> {
            *self.0.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    impl Drop for TrackedHandle {
        fn drop(&mut self) {
            self.0.dropped.fetch_add(1, Ordering::SeqCst);
            *self.0.contents.lock().unwrap() = None;
        }
    }

    fn tracked(counters: &Arc<Counters>) -> HeldClipboard<TrackedHandle> {
        let counters = Arc::clone(counters);
        HeldClipboard::with_opener(move || {
            counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(TrackedHandle(Arc::clone(&counters)))
        })
    }

    #[test]
    fn test_contents_survive_after_write_returns() {
        let counters = Arc::new(Counters::default());
        let clipboard = tracked(&counters);

        clipboard.write_text("Shensi-ST").unwrap();
        clipboard.write_text("Shensi-ST").unwrap();

        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.dropped.load(Ordering::SeqCst), 0);
        assert_eq!(
            counters.contents.lock().unwrap().as_deref(),
            Some("Shensi-ST")
        );

        drop(clipboard);
        assert_eq!(counters.dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_open_is_retried_on_write() {
        let counters = Arc::new(Counters::default());
        let attempts = Arc::new(AtomicUsize::new(0));
        let clipboard = {
            let counters = Arc::clone(&counters);
            let attempts = Arc::clone(&attempts);
            HeldClipboard::with_opener(move || {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    return Err("no display".to_string());
                }
                Ok(TrackedHandle(Arc::clone(&counters)))
            })
        };

        // 启动时和第一次写入都失败
        assert!(clipboard.write_text("x").is_err());
        clipboard.write_text("Shensi-ST").unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(
            counters.contents.lock().unwrap().as_deref(),
            Some("Shensi-ST")
        );
    }
}
