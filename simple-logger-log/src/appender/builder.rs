use std::fmt::{self, Debug};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::{OffsetDateTime, format_description};

/// Second-resolution stamp, e.g. `20240102_030405`.
pub const DEFAULT_STAMP_FORMAT: &str = "[year][month][day]_[hour][minute][second]";

#[derive(Debug, Clone)]
pub struct Builder {
    pub(super) prefix: String,
    pub(super) suffix: String,
    pub(super) stamp_format: String,
}

/// Which provisioning step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Directory,
    File,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Directory => f.write_str("directory"),
            Stage::File => f.write_str("file"),
        }
    }
}

/// Errors returned by [`Builder::build`].
#[derive(Error, Debug)]
pub enum InitError {
    #[error("permission denied when creating log {stage} '{}'", .path.display())]
    PermissionDenied {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create log {stage} '{}': {source}", .path.display())]
    Os {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid file name stamp format '{format}': {source}")]
    StampFormat {
        format: String,
        #[source]
        source: time::error::InvalidFormatDescription,
    },
    #[error("failed to render file name stamp: {0}")]
    Stamp(#[from] time::error::Format),
}

impl InitError {
    pub(crate) fn ctx(stage: Stage, path: PathBuf) -> impl FnOnce(io::Error) -> Self {
        move |source| {
            if source.kind() == io::ErrorKind::PermissionDenied {
                Self::PermissionDenied {
                    stage,
                    path,
                    source,
                }
            } else {
                Self::Os {
                    stage,
                    path,
                    source,
                }
            }
        }
    }

    /// The provisioning step that failed, if the failure came from the filesystem.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::PermissionDenied { stage, .. } | Self::Os { stage, .. } => Some(*stage),
            Self::StampFormat { .. } | Self::Stamp(_) => None,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::from("log"),
            stamp_format: String::from(DEFAULT_STAMP_FORMAT),
        }
    }

    #[must_use]
    pub fn filename_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..self
        }
    }

    #[must_use]
    pub fn filename_suffix(self, suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..self
        }
    }

    #[must_use]
    pub fn stamp_format(self, format: impl Into<String>) -> Self {
        Self {
            stamp_format: format.into(),
            ..self
        }
    }

    /// Renders `<prefix>_<stamp>.<suffix>` for the given instant.
    pub fn file_name(&self, at: &OffsetDateTime) -> Result<String, InitError> {
        let format = format_description::parse(&self.stamp_format).map_err(|source| {
            InitError::StampFormat {
                format: self.stamp_format.clone(),
                source,
            }
        })?;
        let stamp = at.format(&format)?;

        let mut name = String::with_capacity(self.prefix.len() + stamp.len() + self.suffix.len() + 2);
        if !self.prefix.is_empty() {
            name.push_str(&self.prefix);
            name.push('_');
        }
        name.push_str(&stamp);
        if !self.suffix.is_empty() {
            name.push('.');
            name.push_str(&self.suffix);
        }
        Ok(name)
    }

    /// Creates `directory` (and its parents) and opens a fresh, truncated file in it.
    pub fn build(
        &self,
        directory: impl AsRef<Path>,
        at: &OffsetDateTime,
    ) -> Result<SessionFile, InitError> {
        SessionFile::from_builder(self, directory.as_ref(), at)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// The file a single run writes to. Dropping it closes the handle.
pub struct SessionFile {
    path: PathBuf,
    file: File,
}

impl SessionFile {
    fn from_builder(
        builder: &Builder,
        directory: &Path,
        at: &OffsetDateTime,
    ) -> Result<Self, InitError> {
        let file_name = builder.file_name(at)?;

        create_directory(directory)?;
        let path = directory.join(file_name);
        let file = create_writer(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Debug for SessionFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Write for SessionFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn create_directory(directory: &Path) -> Result<(), InitError> {
    fs::create_dir_all(directory).map_err(InitError::ctx(Stage::Directory, directory.to_path_buf()))
}

fn create_writer(path: &Path) -> Result<File, InitError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(InitError::ctx(Stage::File, path.to_path_buf()))
}
