//! 终端交互：授权/签名确认和阻塞式提示
//!
//! 提示写到 stderr，stdout 只留给命令的 JSON 输出。
//! stdin 不是终端时（管道/重定向）自动拒绝。

use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;

use tokio::{sync::Mutex, task::JoinError};

/// 串行化并发任务的 stdin 提示
pub type PromptLock = Arc<Mutex<()>>;

pub fn new_prompt_lock() -> PromptLock {
    Arc::new(Mutex::new(()))
}

/// 询问用户是否同意；返回 false 表示拒绝或无法交互
pub async fn confirm(lock: &PromptLock, action: &str, details: &str) -> bool {
    let _guard = lock.lock().await;

    if !std::io::stdin().is_terminal() {
        tracing::warn!(action, details, "Non-interactive stdin, auto-declining");
        return false;
    }

    let action = action.to_string();
    let details = details.to_string();

    let answer = tokio::task::spawn_blocking(move || {
        let mut stderr = std::io::stderr();
        write!(stderr, "\n[CONFIRM] {}: {}\n  Approve? [y/N]: ", action, details).ok();
        stderr.flush().ok();

        let mut input = String::new();
        std::io::stdin().lock().read_line(&mut input).ok()?;
        Some(input)
    })
    .await;

    prompt_outcome(answer)
        .flatten()
        .map(|input| is_affirmative(&input))
        .unwrap_or(false)
}

/// 阻塞式提示：打印消息，交互模式下等待回车
pub async fn acknowledge(lock: &PromptLock, message: &str) {
    let _guard = lock.lock().await;

    let interactive = std::io::stdin().is_terminal();
    let message = message.to_string();

    let shown = tokio::task::spawn_blocking(move || {
        let mut stderr = std::io::stderr();
        if interactive {
            write!(stderr, "\n[WARNING] {}\n  Press Enter to continue...", message).ok();
            stderr.flush().ok();
            let mut input = String::new();
            std::io::stdin().lock().read_line(&mut input).ok();
        } else {
            writeln!(stderr, "\n[WARNING] {}", message).ok();
        }
    })
    .await;

    prompt_outcome(shown);
}

/// 提示任务异常退出时记录日志，视为无输入
fn prompt_outcome<T>(result: Result<T, JoinError>) -> Option<T> {
    result
        .map_err(|e| tracing::error!(error = %e, "Prompt task failed"))
        .ok()
}

fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
