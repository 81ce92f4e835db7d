//! # Archive Module / 压缩包模块
//!
//! A shared, open zip archive. Every XML entry of the archive becomes its own
//! source, and all of them read through the same handle. The handle is owned by
//! the resource registry and released once, at the end of the run.
//!
//! 共享的已打开 zip 压缩包。压缩包中每个 XML 条目都成为独立的输入源，
//! 并通过同一个句柄读取。句柄由资源注册表持有，并在运行结束时统一释放。

use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

use zip::ZipArchive;

use crate::core::error::SourceError;

/// Upper bound for the buffer reserved up front when reading an entry.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// An open zip archive shared between the sources of its entries.
pub struct ArchiveHandle {
    display_name: String,
    archive: RefCell<ZipArchive<File>>,
}

impl ArchiveHandle {
    /// Opens `path` as a zip archive. The display name is the path as given.
    pub fn open(path: &Path) -> Result<Rc<Self>, SourceError> {
        let display_name = path.display().to_string();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let archive = ZipArchive::new(file).map_err(|source| SourceError::Archive {
            name: display_name.clone(),
            source,
        })?;
        Ok(Rc::new(Self {
            display_name,
            archive: RefCell::new(archive),
        }))
    }

    /// The name used as the prefix of every entry source (`<archive>#<entry>`).
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Lists `(index, name)` for every non-directory entry whose name ends in `suffix`,
    /// in central-directory order.
    pub fn entries_with_suffix(&self, suffix: &str) -> Result<Vec<(usize, String)>, SourceError> {
        let mut archive = self.archive.borrow_mut();
        let mut entries = Vec::new();
        for index in 0..archive.len() {
            let entry = archive.by_index(index).map_err(|source| SourceError::Archive {
                name: self.display_name.clone(),
                source,
            })?;
            if !entry.is_dir() && entry.name().ends_with(suffix) {
                entries.push((index, entry.name().to_string()));
            }
        }
        Ok(entries)
    }

    /// Reads the full decompressed content of the entry at `index`.
    pub fn read_entry(&self, index: usize, entry_name: &str) -> Result<Vec<u8>, SourceError> {
        let qualified = format!("{}#{}", self.display_name, entry_name);
        let mut archive = self.archive.borrow_mut();
        let mut entry = archive.by_index(index).map_err(|source| SourceError::Archive {
            name: qualified.clone(),
            source,
        })?;
        // The declared size comes from the archive and may be corrupt.
        let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| SourceError::Read {
                name: qualified,
                source,
            })?;
        Ok(bytes)
    }
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}
