//! Embedded-data encoding for uploaded files: `data:<mime>;base64,<payload>`
//! strings stored directly in record fields.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::FolioError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub fn decode_data_url(s: &str) -> crate::Result<DataUrl> {
    let rest = s
        .strip_prefix("data:")
        .ok_or_else(|| FolioError::MalformedDataUrl("missing data: prefix".to_string()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| FolioError::MalformedDataUrl("missing ;base64, marker".to_string()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| FolioError::MalformedDataUrl(e.to_string()))?;
    Ok(DataUrl {
        mime: mime.to_string(),
        bytes,
    })
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let url = encode_data_url("application/pdf", b"%PDF-1.4");
        assert_eq!(url, "data:application/pdf;base64,JVBERi0xLjQ=");

        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.mime, "application/pdf");
        assert_eq!(decoded.bytes, b"%PDF-1.4");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for bad in [
            "",
            "/assets/cert-aws.jpg",
            "data:image/png,plain",
            "data:image/png;base64,***",
        ] {
            assert!(
                matches!(decode_data_url(bad), Err(FolioError::MalformedDataUrl(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("resume.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("a/b/photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("icon.svg")), "image/svg+xml");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }
}
