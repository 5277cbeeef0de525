use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::config::Settings;

/// Which lifecycle stage an upload belongs to; drives the filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileStage {
    Attachment,
    Before,
    After,
}

impl FileStage {
    pub(crate) fn prefix(self) -> &'static str {
        match self {
            Self::Attachment => "",
            Self::Before => "BEFORE_",
            Self::After => "AFTER_",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StoredFile {
    pub(crate) name: String,
    pub(crate) size: i64,
    pub(crate) sha256: String,
}

/// Flat shared upload directory. Files live under generated names only;
/// the original filename is discarded except for its extension.
#[derive(Debug, Clone)]
pub(crate) struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let root = PathBuf::from(&settings.storage().upload_dir);
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub(crate) async fn save(
        &self,
        stage: FileStage,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<StoredFile> {
        let name = generated_name(stage, original_name);
        let size = bytes.len() as i64;
        let hash = Sha256::digest(&bytes);
        let sha256 = hex::encode(hash);

        tokio::fs::write(self.root.join(&name), bytes).await?;

        tracing::debug!(name = %name, size, sha256 = %sha256, "Stored upload");

        Ok(StoredFile { name, size, sha256 })
    }

    /// Read a previously stored file back. `None` for unknown names; names
    /// that are not plain generated filenames are rejected outright.
    pub(crate) async fn read(&self, name: &str) -> anyhow::Result<Option<Vec<u8>>> {
        if !is_safe_name(name) {
            anyhow::bail!("invalid stored file name: {name}");
        }

        match tokio::fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub(crate) fn generated_name(stage: FileStage, original_name: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}{}{}", stage.prefix(), token, file_extension(original_name))
}

pub(crate) fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Extension of the client-supplied filename, dot included, restricted to
/// short alphanumeric suffixes.
fn file_extension(original_name: &str) -> String {
    let extension = Path::new(original_name).extension().and_then(|ext| ext.to_str());

    match extension {
        Some(ext) if !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!(".{ext}")
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_carry_stage_prefix_and_extension() {
        let name = generated_name(FileStage::Before, "leaky pipe.JPG");
        assert!(name.starts_with("BEFORE_"));
        assert!(name.ends_with(".JPG"));

        let name = generated_name(FileStage::After, "done.png");
        assert!(name.starts_with("AFTER_"));
        assert!(name.ends_with(".png"));

        let name = generated_name(FileStage::Attachment, "receipt.pdf");
        assert!(!name.starts_with("BEFORE_"));
        assert!(!name.starts_with("AFTER_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn generated_names_are_unique() {
        let a = generated_name(FileStage::Attachment, "a.png");
        let b = generated_name(FileStage::Attachment, "a.png");
        assert_ne!(a, b);
    }

    #[test]
    fn odd_extensions_are_dropped() {
        assert!(!generated_name(FileStage::Attachment, "noext").contains('.'));
        assert!(!generated_name(FileStage::Attachment, "weird.ex!t").contains('.'));
        assert!(!generated_name(FileStage::Attachment, "long.extensionlongerthanten").contains('.'));
    }

    #[test]
    fn unsafe_names_are_rejected() {
        assert!(is_safe_name("BEFORE_abc123.png"));
        assert!(!is_safe_name(""));
        assert!(!is_safe_name("../secret"));
        assert!(!is_safe_name("a/b.png"));
        assert!(!is_safe_name("a\\b.png"));
    }

    #[tokio::test]
    async fn save_and_read_roundtrip() {
        let root = std::env::temp_dir()
            .join(format!("grievance-storage-test-{}", Uuid::new_v4().simple()));
        tokio::fs::create_dir_all(&root).await.expect("temp dir");
        let storage = LocalStorage { root: root.clone() };

        let stored =
            storage.save(FileStage::After, "proof.png", b"after-bytes".to_vec()).await.expect("save");
        assert!(stored.name.starts_with("AFTER_"));
        assert_eq!(stored.size, 11);
        assert_eq!(stored.sha256.len(), 64);

        let bytes = storage.read(&stored.name).await.expect("read").expect("present");
        assert_eq!(bytes, b"after-bytes");

        assert!(storage.read("missing.png").await.expect("read missing").is_none());
        assert!(storage.read("../escape").await.is_err());

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
