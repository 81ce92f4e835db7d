//! # Resource Registry Module / 资源注册表模块
//!
//! Open file and archive handles are shared between the sources and this
//! registry for the whole run. The driver releases them all once, after the
//! output has been written, whatever the outcome of the write. A failed
//! release is recorded and the remaining releases still happen.
//!
//! 已打开的文件和压缩包句柄在整个运行期间由输入源和此注册表共享。
//! 驱动程序在写出结果后统一释放它们，无论写入是否成功。
//! 释放失败会被记录，其余资源仍会继续释放。

use std::fs::File;
use std::rc::Rc;

use crate::core::error::ReleaseError;
use crate::infra::archive::ArchiveHandle;

enum Resource {
    Archive(Rc<ArchiveHandle>),
    File { name: String, handle: Rc<File> },
}

impl Resource {
    fn name(&self) -> &str {
        match self {
            Resource::Archive(archive) => archive.display_name(),
            Resource::File { name, .. } => name,
        }
    }

    /// Gives up the registry's share of the handle. The handle is closed here
    /// when this was the last owner.
    fn release(self) -> Result<(), ReleaseError> {
        let name = self.name().to_string();
        let holders = match self {
            Resource::Archive(archive) => Rc::try_unwrap(archive)
                .map(drop)
                .map_err(|shared| Rc::strong_count(&shared) - 1),
            Resource::File { handle, .. } => Rc::try_unwrap(handle)
                .map(drop)
                .map_err(|shared| Rc::strong_count(&shared) - 1),
        };
        holders.map_err(|holders| ReleaseError::StillInUse {
            resource: name,
            holders,
        })
    }
}

/// Owns every handle opened while expanding the inputs.
///
/// Dropping the registry releases whatever is still registered, so an early
/// return from the driver cannot leak handles.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_archive(&mut self, archive: Rc<ArchiveHandle>) {
        self.resources.push(Resource::Archive(archive));
    }

    pub fn register_file(&mut self, name: &str, handle: Rc<File>) {
        self.resources.push(Resource::File {
            name: name.to_string(),
            handle,
        });
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Releases every registered resource, in registration order, and returns
    /// the failures. The registry is empty afterwards.
    pub fn release_all(&mut self) -> Vec<ReleaseError> {
        self.resources
            .drain(..)
            .filter_map(|resource| resource.release().err())
            .collect()
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        for failure in self.release_all() {
            tracing::warn!("{}", failure);
        }
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.resources.iter().map(Resource::name))
            .finish()
    }
}
