//! Report artifact domain types

/// File name used when the server does not suggest a usable one
pub const DEFAULT_ARTIFACT_NAME: &str = "EncountersReport.pdf";

/// Binary report produced by a completed job
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub suggested_name: String,
}

impl Artifact {
    pub fn new(bytes: Vec<u8>, suggested_name: impl Into<String>) -> Self {
        let suggested_name = suggested_name.into();
        let suggested_name = if suggested_name.trim().is_empty() {
            DEFAULT_ARTIFACT_NAME.to_string()
        } else {
            suggested_name
        };

        Self {
            bytes,
            suggested_name,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Payloads can be megabytes; keep Debug output readable.
impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("size", &self.bytes.len())
            .field("suggested_name", &self.suggested_name)
            .finish()
    }
}

/// Extracts the download file name from a `Content-Disposition` header value
///
/// Accepts `filename="X.pdf"`, unquoted `filename=X.pdf`, and RFC 5987
/// `filename*=UTF-8''X%20Y.pdf`. A plain `filename=` token wins over the encoded
/// form. Falls back to [`DEFAULT_ARTIFACT_NAME`] when the header is absent or
/// carries no usable name, so the result is never empty.
pub fn filename_from_content_disposition(header: Option<&str>) -> String {
    let Some(value) = header else {
        return DEFAULT_ARTIFACT_NAME.to_string();
    };

    let mut encoded_name = None;

    for part in split_params(value) {
        let part = part.trim();
        if let Some(raw) = strip_prefix_ignore_case(part, "filename=") {
            let name = raw.trim().trim_matches('"').trim();
            if !name.is_empty() {
                return name.to_string();
            }
        } else if let Some(raw) = strip_prefix_ignore_case(part, "filename*=") {
            // charset'lang'pct-encoded
            if let Some(idx) = raw.rfind('\'')
                && let Ok(decoded) = urlencoding::decode(raw[idx + 1..].trim_matches('"'))
                && !decoded.trim().is_empty()
            {
                encoded_name = Some(decoded.trim().to_string());
            }
        }
    }

    encoded_name.unwrap_or_else(|| DEFAULT_ARTIFACT_NAME.to_string())
}

/// Splits header parameters on `;`, leaving semicolons inside quoted values alone
fn split_params(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (idx, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
