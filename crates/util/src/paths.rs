use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Rejection reasons for a caller-supplied staged file path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StagedPathError {
    #[error("file path must not be empty")]
    Empty,
    #[error("file path '{path}' must be relative")]
    Absolute { path: String },
    #[error("file path '{path}' must not contain '..'")]
    ParentTraversal { path: String },
}

/// Normalizes a relative path so it cannot escape the staging directory.
///
/// `.` components are dropped; absolute paths, drive prefixes and `..`
/// components are rejected.
pub fn normalize_relative_path(raw: &str) -> Result<PathBuf, StagedPathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StagedPathError::Empty);
    }

    let mut normalized = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(StagedPathError::ParentTraversal { path: raw.to_string() });
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(StagedPathError::Absolute { path: raw.to_string() });
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(StagedPathError::Empty);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_relative_paths_are_kept() {
        assert_eq!(normalize_relative_path("./src/index.js").unwrap(), PathBuf::from("src/index.js"));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        assert!(matches!(
            normalize_relative_path("../etc/passwd"),
            Err(StagedPathError::ParentTraversal { .. })
        ));
        assert!(matches!(
            normalize_relative_path("lib/../../x"),
            Err(StagedPathError::ParentTraversal { .. })
        ));
        assert!(matches!(normalize_relative_path("/etc/passwd"), Err(StagedPathError::Absolute { .. })));
        assert_eq!(normalize_relative_path("."), Err(StagedPathError::Empty));
        assert_eq!(normalize_relative_path("   "), Err(StagedPathError::Empty));
    }
}
