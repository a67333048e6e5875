//! Локальное хранилище обработанных изображений (раздаётся как /media)

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Имя файла по содержимому: sha256 в hex + расширение
pub fn content_file_name(bytes: &[u8], ext: &str) -> String {
    let digest = Sha256::digest(bytes);
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}.{}", hex, ext)
}

/// Сохранить файл; одинаковое содержимое пишется один раз
pub async fn store(dir: &Path, bytes: &[u8], ext: &str) -> anyhow::Result<String> {
    tokio::fs::create_dir_all(dir).await?;
    let name = content_file_name(bytes, ext);
    let path: PathBuf = dir.join(&name);
    if tokio::fs::try_exists(&path).await? {
        tracing::debug!("Media file already stored: {}", name);
    } else {
        tokio::fs::write(&path, bytes).await?;
        tracing::info!("Stored media file {} ({} bytes)", name, bytes.len());
    }
    Ok(name)
}

/// Публичный URL файла для внешних сервисов
pub fn public_url(public_base_url: &str, file_name: &str) -> String {
    format!("{}/media/{}", public_base_url.trim_end_matches('/'), file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_file_name_is_sha256() {
        assert_eq!(
            content_file_name(b"abc", "png"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.png"
        );
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("https://loja.example.com/", "x.png"),
            "https://loja.example.com/media/x.png"
        );
    }

    #[tokio::test]
    async fn test_store_is_idempotent() {
        let dir = std::env::temp_dir().join(format!("media-test-{}", uuid::Uuid::new_v4()));
        let a = store(&dir, b"png-bytes", "png").await.unwrap();
        let b = store(&dir, b"png-bytes", "png").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
