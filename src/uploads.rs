use axum::extract::Multipart;
use bytes::Bytes;
use time::OffsetDateTime;

use crate::error::ApiError;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Allow-listed image mime types and their on-disk extensions.
pub fn ext_for_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Image references may be absolute http(s) URLs or app-served `/static` paths.
/// Browser-local schemes (`blob:`, `data:`, `file:`) are never persisted.
pub fn is_allowed_image_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("/static/")
}

pub fn public_url(public_base: &str, rel_path: &str) -> String {
    format!("{}/{}", public_base.trim_end_matches('/'), rel_path)
}

pub fn timestamped_name(prefix: &str, ext: &str) -> String {
    format!(
        "{prefix}-{}.{ext}",
        OffsetDateTime::now_utc().unix_timestamp()
    )
}

/// Timestamp plus random suffix, for files sharing one directory across chefs.
pub fn randomized_name(prefix: &str, ext: &str) -> String {
    format!(
        "{prefix}-{}-{:08x}.{ext}",
        OffsetDateTime::now_utc().unix_timestamp(),
        rand::random::<u32>()
    )
}

pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: String,
}

pub struct MultipartUpload {
    pub file: UploadedFile,
    pub description: Option<String>,
}

/// Drain a multipart body, keeping the named file field and an optional
/// `description` text field. Mime and size policy is enforced here so every
/// upload endpoint shares it.
pub async fn collect_upload(
    mut mp: Multipart,
    file_field: &str,
) -> Result<MultipartUpload, ApiError> {
    let mut file = None;
    let mut description = None;
    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some(n) if n == file_field => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                if ext_for_mime(&content_type).is_none() {
                    return Err(ApiError::BadRequest("Unsupported image type".into()));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(ApiError::BadRequest("File exceeds the 5MB limit".into()));
                }
                file = Some(UploadedFile {
                    bytes: data,
                    content_type,
                });
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?;
                let text = text.trim().to_string();
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {}
        }
    }
    let file = file.ok_or_else(|| ApiError::BadRequest(format!("{file_field} field is required")))?;
    Ok(MultipartUpload { file, description })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ext_for_mime_covers_the_allow_list() {
        assert_eq!(ext_for_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_for_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_for_mime("image/png"), Some("png"));
        assert_eq!(ext_for_mime("image/webp"), Some("webp"));
        assert_eq!(ext_for_mime("image/gif"), Some("gif"));
        assert_eq!(ext_for_mime("image/svg+xml"), None);
        assert_eq!(ext_for_mime("application/octet-stream"), None);
    }

    #[test]
    fn image_url_allow_list() {
        assert!(is_allowed_image_url("https://cdn.example.com/a.jpg"));
        assert!(is_allowed_image_url("http://cdn.example.com/a.jpg"));
        assert!(is_allowed_image_url("/static/dishes/dish-1.jpg"));
        assert!(!is_allowed_image_url("blob:https://app.local/xyz"));
        assert!(!is_allowed_image_url("data:image/png;base64,AAAA"));
        assert!(!is_allowed_image_url("file:///tmp/a.jpg"));
        assert!(!is_allowed_image_url("ftp://example.com/a.jpg"));
        // scheme checks are case-insensitive
        assert!(!is_allowed_image_url("BLOB:https://app.local/xyz"));
    }

    #[test]
    fn public_url_joins_without_double_slash() {
        assert_eq!(
            public_url("/static", "dishes/a.jpg"),
            "/static/dishes/a.jpg"
        );
        assert_eq!(
            public_url("/static/", "dishes/a.jpg"),
            "/static/dishes/a.jpg"
        );
    }

    #[test]
    fn generated_names_carry_prefix_and_extension() {
        let name = timestamped_name("profile", "jpg");
        assert!(name.starts_with("profile-"));
        assert!(name.ends_with(".jpg"));

        let a = randomized_name("dish", "png");
        let b = randomized_name("dish", "png");
        assert!(a.starts_with("dish-"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }
}
