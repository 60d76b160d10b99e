//! Small helpers shared by the client.

use crate::error::{CanopyError, Result};
use url::Url;

/// Reject paths that carry a scheme or authority; store paths are relative.
pub fn validate_path(path: &str) -> Result<()> {
    if path.contains("://") || path.starts_with("//") {
        return Err(CanopyError::Config(format!(
            "absolute URL given as store path: {}",
            path
        )));
    }
    Ok(())
}

/// Join a relative store path onto the base URL.
pub fn join_url(base: &Url, path: &str) -> Result<String> {
    validate_path(path)?;
    let trimmed = path.trim_matches('/');
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| CanopyError::Config(format!("base URL has no path segments: {}", base)))?;
        segments.pop_if_empty();
        if !trimmed.is_empty() {
            segments.extend(trimmed.split('/'));
        }
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://store.example.com/v1").unwrap()
    }

    #[test]
    fn test_join_simple() {
        assert_eq!(
            join_url(&base(), "todos").unwrap(),
            "https://store.example.com/v1/todos"
        );
    }

    #[test]
    fn test_join_nested_and_slashes() {
        assert_eq!(
            join_url(&base(), "/users/alice/").unwrap(),
            "https://store.example.com/v1/users/alice"
        );
    }

    #[test]
    fn test_join_empty_path() {
        assert_eq!(join_url(&base(), "").unwrap(), "https://store.example.com/v1");
    }

    #[test]
    fn test_absolute_url_rejected() {
        let err = join_url(&base(), "https://evil.example.com/x").unwrap_err();
        assert!(matches!(err, CanopyError::Config(_)));
    }

    #[test]
    fn test_protocol_relative_rejected() {
        assert!(validate_path("//evil.example.com/x").is_err());
    }
}
