//! # Source Module / 输入源模块
//!
//! One input report: either a loose XML file or an XML entry inside a zip
//! archive. Sources are compared by identity, never by content, so the same
//! file passed twice yields two independent columns.
//!
//! 单个输入报告：独立的 XML 文件，或 zip 压缩包中的 XML 条目。
//! 输入源按身份而非内容比较，因此同一文件传入两次会得到两个独立的列。

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::error::SourceError;
use crate::infra::archive::ArchiveHandle;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

enum SourceKind {
    File {
        path: PathBuf,
        file: Rc<File>,
    },
    ArchiveEntry {
        archive: Rc<ArchiveHandle>,
        index: usize,
        entry_name: String,
    },
}

/// An input report, see the module docs.
pub struct Source {
    id: SourceId,
    name: String,
    kind: SourceKind,
}

impl Source {
    /// Opens `path` immediately; the source is only created if the file is readable.
    /// The name is the base file name.
    pub fn file(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            id: SourceId::next(),
            name,
            kind: SourceKind::File {
                path: path.to_path_buf(),
                file: Rc::new(file),
            },
        })
    }

    /// An entry of a shared archive. The archive handle is owned elsewhere;
    /// the source never closes it.
    pub fn archive_entry(archive: Rc<ArchiveHandle>, index: usize, entry_name: &str) -> Self {
        Self {
            id: SourceId::next(),
            name: format!("{}#{}", archive.display_name(), entry_name),
            kind: SourceKind::ArchiveEntry {
                archive,
                index,
                entry_name: entry_name.to_string(),
            },
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Display name as it appears in the output header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The open file handle of a file-backed source, for registration with the
    /// resource registry.
    pub fn file_handle(&self) -> Option<Rc<File>> {
        match &self.kind {
            SourceKind::File { file, .. } => Some(Rc::clone(file)),
            SourceKind::ArchiveEntry { .. } => None,
        }
    }

    /// Opens a byte stream over the report, positioned at its start.
    pub fn open(&self) -> Result<Box<dyn BufRead + '_>, SourceError> {
        match &self.kind {
            SourceKind::File { path, file } => {
                let mut handle: &File = file;
                handle
                    .seek(SeekFrom::Start(0))
                    .map_err(|source| SourceError::Read {
                        name: path.display().to_string(),
                        source,
                    })?;
                Ok(Box::new(BufReader::new(handle)))
            }
            SourceKind::ArchiveEntry {
                archive,
                index,
                entry_name,
            } => {
                let bytes = archive.read_entry(*index, entry_name)?;
                Ok(Box::new(Cursor::new(bytes)))
            }
        }
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Source {}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
