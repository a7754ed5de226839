use std::time::{SystemTime, UNIX_EPOCH};

/// Fallback file name when the binary has none
pub const DEFAULT_FILE_NAME: &str = "audio";

/// Fallback content type when the binary has none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A `multipart/form-data` body with a single `file` part
#[derive(Debug, Clone)]
pub struct FileForm {
    boundary: String,
    body: Vec<u8>,
}

impl FileForm {
    /// Encode `data` as the `file` part
    pub fn new(data: &[u8], file_name: Option<&str>, content_type: Option<&str>) -> Self {
        let boundary = boundary();
        let file_name = safe_file_name(file_name);
        let content_type = safe_content_type(content_type);

        let head = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        );
        let tail = format!("\r\n--{boundary}--\r\n");

        let mut body = Vec::with_capacity(head.len() + data.len() + tail.len());
        body.extend_from_slice(head.as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(tail.as_bytes());

        Self { boundary, body }
    }

    /// Value for the request `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Boundary unique per call: current time plus a random suffix
fn boundary() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix: u64 = rand::random();

    format!("----SonioxFormBoundary{millis:x}{suffix:016x}")
}

/// File name that cannot break out of the `Content-Disposition` header
pub fn safe_file_name(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_FILE_NAME.to_owned()
    } else {
        cleaned.to_owned()
    }
}

/// Content type, or the octet-stream default when missing or malformed
pub fn safe_content_type(content_type: Option<&str>) -> String {
    content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && !ct.chars().any(char::is_control))
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_owned()
}
