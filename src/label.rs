//! Destinations for downloaded labels.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

use crate::order::OrderId;

/// Somewhere to put label bytes once they've been downloaded.
///
/// The client never touches a sink itself, so any destination works here.
#[async_trait]
pub trait LabelSink: Send + Sync {
    async fn write_label(&self, order_id: &OrderId, label: &[u8]) -> io::Result<()>;
}

/// Writes every label to one fixed path, replacing whatever was there.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LabelSink for FileSink {
    async fn write_label(&self, order_id: &OrderId, label: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, label).await?;
        tracing::info!(%order_id, path = %self.path.display(), "Saved label");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("nested/label.pdf"));

        let label = [0x25, 0x50, 0x44, 0x46];
        sink.write_label(&OrderId::from("ORD-1"), &label)
            .await
            .unwrap();

        assert_eq!(tokio::fs::read(sink.path()).await.unwrap(), label);
    }

    #[tokio::test]
    async fn overwrites_existing_label() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("label.pdf"));

        sink.write_label(&OrderId::from("ORD-1"), b"first label")
            .await
            .unwrap();
        sink.write_label(&OrderId::from("ORD-2"), b"second")
            .await
            .unwrap();

        assert_eq!(tokio::fs::read(sink.path()).await.unwrap(), b"second");
    }
}
