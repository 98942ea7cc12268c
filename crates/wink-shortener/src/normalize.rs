use crate::error::{Result, ShortenerError};
use url::Url;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Normalizes a submitted URL into the form that is stored and compared.
///
/// Surrounding whitespace is trimmed and the URL must be absolute with an
/// `http` or `https` scheme and a non-empty host. The result is the
/// parser's serialization: scheme and host are lower-cased while path,
/// query and trailing slash are kept.
pub fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ShortenerError::InvalidUrl(
            "URL cannot be empty".to_string(),
        ));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| ShortenerError::InvalidUrl(format!("{trimmed}: {e}")))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must have a host: {trimmed}"
        )));
    }

    Ok(parsed.into())
}
