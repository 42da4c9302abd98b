use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use common::{Result, ScoreRecord};

/// Append-only text record of every analyzed symbol.
///
/// One block per record, written with a single `write_all` under a mutex so
/// concurrent callers never interleave partial blocks. The file is never
/// truncated or rotated here.
pub struct SignalLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SignalLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &ScoreRecord) -> Result<()> {
        let block = record.log_block();
        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
