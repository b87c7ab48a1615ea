use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::util::unix_timestamp;

/// Sending half of a session log. Cloned into widgets and background tasks.
pub type LogSender = mpsc::UnboundedSender<String>;

/// Async session logger that writes timestamped lines to `<log_dir>/latest.log`.
///
/// Uses an mpsc channel so callers never block on disk I/O: `log()` just sends
/// through the channel, and a background task does the actual writing.
pub struct SessionLogger {
    tx: LogSender,
    writer: JoinHandle<()>,
}

impl SessionLogger {
    /// Create a new session logger writing into `logs_dir`.
    ///
    /// - Creates `logs_dir` if it doesn't exist
    /// - Rotates `latest.log` → `session-{timestamp}.log`
    /// - Cleans up old sessions (keeps max 10)
    /// - Spawns a background writer task
    pub async fn new(logs_dir: &Path) -> Option<Self> {
        if tokio::fs::create_dir_all(logs_dir).await.is_err() {
            return None;
        }

        let latest = logs_dir.join("latest.log");

        if latest.exists() {
            let ts = unix_timestamp();
            let rotated = logs_dir.join(format!("session-{ts}.log"));
            let _ = tokio::fs::rename(&latest, &rotated).await;
        }

        cleanup_old_sessions(logs_dir).await;

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&latest)
            .await
            .ok()?;

        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer = tokio::spawn(writer_task(file, rx));

        let header = format!(
            "=== casa-suggest session - {} ===\n\n",
            format_timestamp(unix_timestamp())
        );
        let _ = tx.send(header);

        Some(Self { tx, writer })
    }

    pub fn log(&self, prefix: &str, line: &str) {
        send_log(&self.tx, prefix, line);
    }

    /// Clone the sender so widgets can log without holding the logger.
    pub fn sender(&self) -> LogSender {
        self.tx.clone()
    }

    /// Close this handle's sender and wait for the writer to drain.
    ///
    /// The writer only finishes once every cloned sender has been dropped too.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.writer.await;
    }
}

/// Format a log line and send it through a sender.
pub fn send_log(tx: &LogSender, prefix: &str, line: &str) {
    let _ = tx.send(format_line(prefix, line));
}

fn format_line(prefix: &str, line: &str) -> String {
    let ts = format_timestamp(unix_timestamp());
    format!("[{ts}] [{prefix}] {line}\n")
}

async fn writer_task(file: tokio::fs::File, mut rx: mpsc::UnboundedReceiver<String>) {
    use tokio::io::AsyncWriteExt;
    let mut writer = tokio::io::BufWriter::new(file);

    while let Some(line) = rx.recv().await {
        let _ = writer.write_all(line.as_bytes()).await;
        let _ = writer.flush().await;
    }

    let footer = format!(
        "\n=== Session ended - {} ===\n",
        format_timestamp(unix_timestamp())
    );
    let _ = writer.write_all(footer.as_bytes()).await;
    let _ = writer.flush().await;
}

/// Format a Unix timestamp as ISO 8601 UTC (e.g. "2025-06-15T10:30:00Z").
fn format_timestamp(secs: u64) -> String {
    let s = secs as i64;

    let sec = s % 60;
    let min = (s / 60) % 60;
    let hour = (s / 3600) % 24;
    let mut days = s / 86400;

    let mut year: i64 = 1970;
    loop {
        let days_in_year = if is_leap(year) { 366 } else { 365 };
        if days < days_in_year {
            break;
        }
        days -= days_in_year;
        year += 1;
    }

    let month_days: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month: i64 = 1;
    for (i, base) in month_days.iter().enumerate() {
        let d = if i == 1 && is_leap(year) { base + 1 } else { *base };
        if days < d {
            break;
        }
        days -= d;
        month += 1;
    }
    let day = days + 1;

    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z")
}

fn is_leap(y: i64) -> bool {
    (y % 4 == 0 && y % 100 != 0) || y % 400 == 0
}

/// Keep only the 10 most recent `session-*.log` files.
async fn cleanup_old_sessions(logs_dir: &Path) {
    let mut entries = match tokio::fs::read_dir(logs_dir).await {
        Ok(rd) => rd,
        Err(_) => return,
    };

    let mut session_files: Vec<PathBuf> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        if name_str.starts_with("session-") && name_str.ends_with(".log") {
            session_files.push(entry.path());
        }
    }

    // timestamp is embedded, so lexicographic = chronological
    session_files.sort();

    while session_files.len() > 10 {
        let oldest = session_files.remove(0);
        let _ = tokio::fs::remove_file(&oldest).await;
    }
}
