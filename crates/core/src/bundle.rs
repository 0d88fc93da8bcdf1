//! Snapshot bundle value types.
//!
//! A bundle is the in-memory output of one generator run: everything needed
//! to write one immutable site version into the artifact store. It has no
//! identity and is never persisted as-is.

use serde::{Deserialize, Serialize};

/// One additional file produced by the renderer (images, fonts, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotAsset {
    /// Relative key below the version prefix, e.g. `assets/photo.jpg`.
    /// Must already be canonical; the store validates the full key.
    pub key_suffix: String,
    /// MIME type reported when serving the object.
    pub content_type: String,
    /// Raw file contents.
    pub body: Vec<u8>,
}

/// The complete rendered output for one publish attempt.
#[derive(Debug, Clone)]
pub struct SnapshotBundle {
    /// The entry page. Required; the resolution path depends on it.
    pub index_html: String,
    /// Stylesheet, when the layout produces one.
    pub styles_css: Option<String>,
    /// Opaque manifest describing the snapshot (layout id, asset list, ...).
    pub manifest: serde_json::Value,
    /// Zero or more additional files.
    pub assets: Vec<SnapshotAsset>,
}

impl SnapshotBundle {
    /// Total number of objects this bundle will write, index included.
    /// Used for logging only.
    pub fn artifact_count(&self) -> usize {
        // index.html + manifest.json + app.js placeholder
        let mut n = 3;
        if self.styles_css.is_some() {
            n += 1;
        }
        n + self.assets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(css: bool, assets: usize) -> SnapshotBundle {
        SnapshotBundle {
            index_html: "<html></html>".into(),
            styles_css: css.then(|| "body{}".into()),
            manifest: serde_json::json!({}),
            assets: (0..assets)
                .map(|i| SnapshotAsset {
                    key_suffix: format!("assets/{i}.jpg"),
                    content_type: "image/jpeg".into(),
                    body: vec![0u8; 4],
                })
                .collect(),
        }
    }

    #[test]
    fn artifact_count_without_css() {
        assert_eq!(bundle(false, 0).artifact_count(), 3);
    }

    #[test]
    fn artifact_count_with_css_and_assets() {
        assert_eq!(bundle(true, 2).artifact_count(), 6);
    }
}
