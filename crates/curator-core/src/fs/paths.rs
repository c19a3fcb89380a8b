//! Virtual path handling shared by the filesystem backends.
//!
//! All backend paths are forward-slash strings rooted at `/`. Normalization
//! folds `.` and empty components and resolves `..` lexically, clamped at
//! the root so a path can never normalize to something above `/`.

/// Normalizes a virtual path to a rooted, canonical form.
///
/// The result always starts with `/` and never contains `.`, `..`, empty
/// components, or a trailing slash (except for the root itself).
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Parent of a normalized path; the root is its own parent.
pub fn parent(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => normalized[..idx].to_string(),
    }
}

/// Base name of a normalized path; empty for the root.
pub fn base_name(path: &str) -> String {
    let normalized = normalize(path);
    if normalized == "/" {
        String::new()
    } else {
        normalized
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}
