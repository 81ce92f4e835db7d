//! # Analysis Planner Module / 分析计划模块
//!
//! This module expands the positional command-line inputs into the ordered list
//! of sources to compare. Directories contribute their `*.xml` children,
//! `*.zip` archives contribute their `*.xml` entries, and `*.xml` files are
//! opened directly. Everything else is rejected with a reason.
//!
//! 此模块将命令行位置参数展开为有序的待比较输入源列表。
//! 目录贡献其中的 `*.xml` 文件，`*.zip` 压缩包贡献其中的 `*.xml` 条目，
//! `*.xml` 文件被直接打开，其余输入均被拒绝并附带原因。

use std::path::Path;
use std::rc::Rc;

use crate::core::error::SourceError;
use crate::core::source::Source;
use crate::infra::archive::ArchiveHandle;
use crate::infra::fs;
use crate::infra::resources::ResourceRegistry;

const XML_SUFFIX: &str = ".xml";
const ZIP_SUFFIX: &str = ".zip";

/// Why an input did not yield any source.
#[derive(Debug)]
pub enum RejectReason {
    /// The path does not exist.
    Missing,
    /// The path exists but is neither a directory, a `.zip` nor a `.xml`.
    UnknownType,
    /// The file, directory or archive could not be opened or listed.
    Unreadable(SourceError),
}

/// An input that was reported and skipped.
#[derive(Debug)]
pub struct RejectedInput {
    pub input: String,
    pub reason: RejectReason,
}

/// The expanded inputs of one comparison run.
/// 一次比较运行的展开输入。
#[derive(Debug, Default)]
pub struct AnalysisPlan {
    /// Sources in resolution order; this is the column order of the output.
    /// 按解析顺序排列的输入源，即输出的列顺序。
    pub sources: Vec<Source>,
    /// Inputs that were skipped.
    /// 被跳过的输入。
    pub rejected: Vec<RejectedInput>,
}

/// Expands `inputs` into sources, registering every opened file and archive
/// with `resources` so they can be released at the end of the run.
///
/// # Arguments
/// * `inputs` - Positional arguments: files, directories or zip archives
/// * `resources` - Registry that takes shared ownership of opened handles
///
/// # Returns
/// An `AnalysisPlan` with the resolved sources and the rejected inputs
pub fn plan_analysis<S: AsRef<str>>(inputs: &[S], resources: &mut ResourceRegistry) -> AnalysisPlan {
    let mut plan = AnalysisPlan::default();
    for input in inputs {
        let input = input.as_ref();
        let path = fs::expand_path(input);
        if let Err(reason) = expand_input(&path, resources, &mut plan.sources) {
            plan.rejected.push(RejectedInput {
                input: input.to_string(),
                reason,
            });
        }
    }
    plan
}

fn expand_input(
    path: &Path,
    resources: &mut ResourceRegistry,
    sources: &mut Vec<Source>,
) -> Result<(), RejectReason> {
    if !path.exists() {
        return Err(RejectReason::Missing);
    }

    if path.is_dir() {
        let children = fs::list_files_with_suffix(path, XML_SUFFIX).map_err(|source| {
            RejectReason::Unreadable(SourceError::Open {
                path: path.to_path_buf(),
                source,
            })
        })?;
        for child in children {
            // A child that cannot be opened skips only that child.
            if let Err(err) = add_xml_file(&child, resources, sources) {
                tracing::warn!("{}", err);
            }
        }
        Ok(())
    } else if has_suffix(path, ZIP_SUFFIX) {
        let archive = ArchiveHandle::open(path).map_err(RejectReason::Unreadable)?;
        resources.register_archive(Rc::clone(&archive));
        let entries = archive
            .entries_with_suffix(XML_SUFFIX)
            .map_err(RejectReason::Unreadable)?;
        for (index, name) in entries {
            sources.push(Source::archive_entry(Rc::clone(&archive), index, &name));
        }
        Ok(())
    } else if has_suffix(path, XML_SUFFIX) {
        add_xml_file(path, resources, sources).map_err(RejectReason::Unreadable)
    } else {
        Err(RejectReason::UnknownType)
    }
}

fn add_xml_file(
    path: &Path,
    resources: &mut ResourceRegistry,
    sources: &mut Vec<Source>,
) -> Result<(), SourceError> {
    let source = Source::file(path)?;
    if let Some(handle) = source.file_handle() {
        resources.register_file(source.name(), handle);
    }
    sources.push(source);
    Ok(())
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
}
