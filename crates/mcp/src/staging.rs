//! Scratch-space staging for caller-supplied file content.
//!
//! Every staged resource lives in a fresh, uniquely named entry under the
//! configured scratch root and is removed when its handle is dropped. The
//! deploy flow can opt out with [`StagedDirectory::preserve`].

use std::path::{Path, PathBuf};

use coho_mcp_types::StagedFile;
use coho_mcp_util::normalize_relative_path;
use tempfile::{Builder, TempDir, TempPath};
use tracing::debug;

use crate::types::StagingError;

/// Factory for staged resources under one scratch root.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Materialize `files` into a fresh directory, creating nested
    /// directories as needed.
    pub async fn stage_files(&self, prefix: &str, files: &[StagedFile]) -> Result<StagedDirectory, StagingError> {
        self.ensure_root().await?;
        let dir = Builder::new()
            .prefix(prefix)
            .tempdir_in(&self.root)
            .map_err(|source| StagingError::io(&self.root, source))?;
        let staged = StagedDirectory { dir };
        for file in files {
            staged.write_file(&file.path, &file.content).await?;
        }
        debug!(dir = %staged.path().display(), files = files.len(), "staged files");
        Ok(staged)
    }

    /// Write `content` to a fresh file whose name ends with `suffix`.
    pub async fn stage_text(&self, prefix: &str, suffix: &str, content: &str) -> Result<StagedText, StagingError> {
        self.ensure_root().await?;
        let path = Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.root)
            .map_err(|source| StagingError::io(&self.root, source))?
            .into_temp_path();
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StagingError::io(path.to_path_buf(), source))?;
        debug!(file = %path.display(), bytes = content.len(), "staged text");
        Ok(StagedText { path })
    }

    async fn ensure_root(&self) -> Result<(), StagingError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StagingError::io(&self.root, source))
    }
}

/// Staged directory removed on drop unless preserved.
#[derive(Debug)]
pub struct StagedDirectory {
    dir: TempDir,
}

impl StagedDirectory {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write one file below the directory. The relative path is checked again
    /// so callers cannot bypass validation.
    pub async fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf, StagingError> {
        let relative = normalize_relative_path(relative)?;
        let target = self.dir.path().join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StagingError::io(parent, source))?;
        }
        tokio::fs::write(&target, content)
            .await
            .map_err(|source| StagingError::io(&target, source))?;
        Ok(target)
    }

    /// Whether a file exists at `relative` below the directory.
    pub fn contains(&self, relative: &str) -> bool {
        normalize_relative_path(relative)
            .map(|relative| self.dir.path().join(relative).is_file())
            .unwrap_or(false)
    }

    /// Keep the directory on disk and return its location.
    pub fn preserve(self) -> PathBuf {
        self.dir.keep()
    }
}

/// Staged single file removed on drop.
#[derive(Debug)]
pub struct StagedText {
    path: TempPath,
}

impl StagedText {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
