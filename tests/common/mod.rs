// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use zip::write::SimpleFileOptions;

pub fn setup_test_environment() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

/// Wraps test case fragments in a `testsuite` element.
pub fn report(cases: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"suite\" tests=\"{}\">\n{}\n</testsuite>\n",
        cases.len(),
        cases.join("\n")
    )
}

/// A passing test case.
pub fn passed(class_name: &str, name: &str, time: &str) -> String {
    format!(
        "  <testcase classname=\"{}\" name=\"{}\" time=\"{}\"/>",
        class_name, name, time
    )
}

/// A test case with a `<failure>` child.
pub fn failed(class_name: &str, name: &str, time: &str) -> String {
    format!(
        "  <testcase classname=\"{}\" name=\"{}\" time=\"{}\">\n    <failure message=\"expected 1\">trace</failure>\n  </testcase>",
        class_name, name, time
    )
}

/// A test case with an `<error>` child.
pub fn errored(class_name: &str, name: &str, time: &str) -> String {
    format!(
        "  <testcase classname=\"{}\" name=\"{}\" time=\"{}\">\n    <error type=\"java.lang.NullPointerException\"/>\n  </testcase>",
        class_name, name, time
    )
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// Writes a zip archive at `dir/name` with the given `(entry, content)` pairs.
/// Entry names ending in `/` become directory entries.
pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("Failed to create zip file");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (entry, content) in entries {
        if entry.ends_with('/') {
            zip.add_directory(*entry, options)
                .expect("Failed to add zip directory");
        } else {
            zip.start_file(*entry, options)
                .expect("Failed to start zip entry");
            zip.write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
    }
    zip.finish().expect("Failed to finish zip file");
    path
}

/// Converts a path into the string form expected by the planner.
pub fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Writes a zip64 archive with one stored entry and then overwrites the
/// uncompressed size recorded for it in the central directory.
pub fn write_zip_with_declared_size(
    dir: &Path,
    name: &str,
    entry: &str,
    content: &str,
    declared_size: u64,
) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("Failed to create zip file");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .large_file(true);
    zip.start_file(entry, options)
        .expect("Failed to start zip entry");
    zip.write_all(content.as_bytes())
        .expect("Failed to write zip entry");
    zip.finish().expect("Failed to finish zip file");

    let mut bytes = fs::read(&path).expect("Failed to read zip file");
    let central = bytes
        .windows(4)
        .rposition(|w| w == [0x50, 0x4b, 0x01, 0x02])
        .expect("Missing central directory header");
    // Zip64 extended information: tag 0x0001, 16 data bytes, uncompressed size first.
    let extra = central
        + bytes[central..]
            .windows(4)
            .position(|w| w == [0x01, 0x00, 0x10, 0x00])
            .expect("Missing zip64 extra field");
    bytes[extra + 4..extra + 12].copy_from_slice(&declared_size.to_le_bytes());
    fs::write(&path, bytes).expect("Failed to rewrite zip file");
    path
}
