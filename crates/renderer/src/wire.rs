//! Wire types for the external renderer contract.
//!
//! Request JSON (stdin):
//! `{ "invitation": { "layoutId": ..., "data": ... }, "translations": {} }`
//!
//! Response JSON (stdout, exit code 0):
//! `{ "html": ..., "css": ..., "manifest": ..., "assets": [ { "keySuffix",
//! "contentType", "bodyBase64" } ] }`

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use invita_core::bundle::{SnapshotAsset, SnapshotBundle};
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// The request payload written to the renderer's stdin.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest {
    pub invitation: RenderRequestInvitation,
    /// Reserved for localized rendering; currently always empty.
    pub translations: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequestInvitation {
    pub layout_id: String,
    pub data: serde_json::Value,
}

impl RenderRequest {
    pub fn new(layout_id: &str, data: &serde_json::Value) -> Self {
        Self {
            invitation: RenderRequestInvitation {
                layout_id: layout_id.to_string(),
                data: data.clone(),
            },
            translations: serde_json::json!({}),
        }
    }
}

/// The response payload parsed from the renderer's stdout.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderResponse {
    pub html: String,
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default)]
    pub manifest: serde_json::Value,
    #[serde(default)]
    pub assets: Vec<RenderResponseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponseAsset {
    pub key_suffix: String,
    pub content_type: String,
    pub body_base64: String,
}

impl RenderResponse {
    /// Parse renderer stdout and decode asset bodies into a bundle.
    pub fn parse(stdout: &str) -> Result<SnapshotBundle, RenderError> {
        let response: RenderResponse = serde_json::from_str(stdout.trim())
            .map_err(|e| RenderError::MalformedOutput(e.to_string()))?;

        if response.html.is_empty() {
            return Err(RenderError::MalformedOutput(
                "response is missing html content".into(),
            ));
        }

        let assets = response
            .assets
            .into_iter()
            .map(|asset| {
                let body = BASE64.decode(asset.body_base64.as_bytes()).map_err(|e| {
                    RenderError::MalformedOutput(format!(
                        "asset '{}' has invalid base64 body: {e}",
                        asset.key_suffix
                    ))
                })?;
                Ok(SnapshotAsset {
                    key_suffix: asset.key_suffix,
                    content_type: asset.content_type,
                    body,
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        Ok(SnapshotBundle {
            index_html: response.html,
            styles_css: response.css.filter(|css| !css.is_empty()),
            manifest: response.manifest,
            assets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_layout_id() {
        let req = RenderRequest::new("classic", &serde_json::json!({"title": "Us"}));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["invitation"]["layoutId"], "classic");
        assert_eq!(json["invitation"]["data"]["title"], "Us");
        assert_eq!(json["translations"], serde_json::json!({}));
    }

    #[test]
    fn parses_full_response() {
        let stdout = serde_json::json!({
            "html": "<html></html>",
            "css": "body{}",
            "manifest": {"layout": "classic"},
            "assets": [
                {"keySuffix": "assets/a.jpg", "contentType": "image/jpeg", "bodyBase64": "aGk="}
            ]
        })
        .to_string();

        let bundle = RenderResponse::parse(&stdout).unwrap();
        assert_eq!(bundle.index_html, "<html></html>");
        assert_eq!(bundle.styles_css.as_deref(), Some("body{}"));
        assert_eq!(bundle.manifest["layout"], "classic");
        assert_eq!(bundle.assets.len(), 1);
        assert_eq!(bundle.assets[0].body, b"hi");
    }

    #[test]
    fn css_and_assets_optional() {
        let stdout = r#"{"html": "<html></html>"}"#;
        let bundle = RenderResponse::parse(stdout).unwrap();
        assert!(bundle.styles_css.is_none());
        assert!(bundle.assets.is_empty());
    }

    #[test]
    fn rejects_missing_html() {
        assert!(RenderResponse::parse(r#"{"css": "body{}"}"#).is_err());
        assert!(RenderResponse::parse(r#"{"html": ""}"#).is_err());
    }

    #[test]
    fn rejects_non_json_stdout() {
        let err = RenderResponse::parse("renderer crashed\n").unwrap_err();
        assert!(matches!(err, RenderError::MalformedOutput(_)));
    }

    #[test]
    fn rejects_invalid_base64_asset() {
        let stdout = serde_json::json!({
            "html": "<html></html>",
            "assets": [
                {"keySuffix": "a.bin", "contentType": "application/octet-stream", "bodyBase64": "!!"}
            ]
        })
        .to_string();
        let err = RenderResponse::parse(&stdout).unwrap_err();
        assert!(matches!(err, RenderError::MalformedOutput(_)));
    }
}
