//! 用户可见的阻塞式通知

use async_trait::async_trait;

use crate::infrastructure::terminal_prompt::{self, PromptLock};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// 向用户显示警告，直到用户确认才返回
    async fn warn(&self, message: &str);
}

/// 终端通知：写 stderr，交互模式下等待回车
pub struct TerminalNotifier {
    lock: PromptLock,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self {
            lock: terminal_prompt::new_prompt_lock(),
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn warn(&self, message: &str) {
        tracing::warn!(notice = %message, "User notification");
        terminal_prompt::acknowledge(&self.lock, message).await;
    }
}

/// 仅写日志（无人值守运行）
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn warn(&self, message: &str) {
        tracing::warn!(notice = %message, "User notification");
    }
}
