//! Persistence of the structured slide content
//!
//! The saved file feeds downstream tools (e.g. video generation), so it is
//! written as indented UTF-8 JSON with non-ASCII text kept verbatim.

use p2s_api_types::SlideContentBundle;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const SESSION_PREFIX_LEN: usize = 8;

/// File name for a session's content bundle: `slide_content_<prefix>.json`.
pub fn content_file_name(session_id: &str) -> String {
    let prefix: String = session_id
        .chars()
        .take(SESSION_PREFIX_LEN)
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("slide_content_{}.json", prefix)
}

/// Write the bundle into `dir`, creating the directory when needed.
pub async fn save_content(
    dir: &Path,
    session_id: &str,
    content: &SlideContentBundle,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;

    let path = dir.join(content_file_name(session_id));
    let mut json = serde_json::to_string_pretty(content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    json.push('\n');

    fs::write(&path, json).await?;
    log::info!("Saved slide content for session {} to {}", session_id, path.display());
    Ok(path)
}

/// Read a bundle previously written by [`save_content`].
pub async fn load_content(path: &Path) -> io::Result<SlideContentBundle> {
    let text = fs::read_to_string(path).await?;
    serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::content_bundle;
    use p2s_api_types::Attachment;
    use serde_json::Value;

    #[test]
    fn test_content_file_name_uses_session_prefix() {
        assert_eq!(
            content_file_name("3f2a9c1e-5b7d-4e21-9a0f-1c2d3e4f5a6b"),
            "slide_content_3f2a9c1e.json"
        );
        assert_eq!(content_file_name("abc"), "slide_content_abc.json");
        assert_eq!(content_file_name("../x/y.z"), "slide_content____x_y_z.json");
    }

    #[tokio::test]
    async fn test_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = content_bundle(4);
        bundle.slides[1].tables.push(Attachment {
            id: "Table 2".to_string(),
            caption: Some("Ablation".to_string()),
        });
        bundle.slides[2].figures.push(Attachment {
            id: "Figure 1".to_string(),
            caption: None,
        });
        bundle.slides[3].image_url = None;
        bundle
            .extra
            .insert("generated_at".to_string(), Value::String("2025-01-01".to_string()));

        let path = save_content(dir.path(), "3f2a9c1e-5b7d", &bundle).await.unwrap();
        let reloaded = load_content(&path).await.unwrap();

        assert_eq!(reloaded, bundle);
        assert_eq!(
            serde_json::to_value(&reloaded).unwrap(),
            serde_json::to_value(&bundle).unwrap()
        );
    }

    #[tokio::test]
    async fn test_saved_file_is_indented_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = content_bundle(1);

        let path = save_content(&dir.path().join("nested/out"), "abcdefghij", &bundle)
            .await
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(path.ends_with("nested/out/slide_content_abcdefgh.json"));
        assert!(text.contains("\n  \"total_slides\": 1"));
        assert!(text.contains("Ngữ pháp thì hiện tại đơn"));
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_content(&path).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
