//! # CSV Reporting Module / CSV 报告模块
//!
//! Serializes a [`Model`] as a comparison matrix:
//!
//! ```text
//! class,name,run-a.xml,duration,run-b.xml,duration
//! com.acme.FooTest,testBar,PASS,0.5,FAILURE,0.7
//! com.acme.FooTest,testBaz,PASS,0.1,,
//! ```
//!
//! One row per test in ascending `class#name` order, one `state,duration`
//! pair per source in model order. A source without the test leaves an empty
//! pair.
//!
//! 将 [`Model`] 序列化为比较矩阵：每个测试一行，每个输入源一对 `状态,耗时` 列。

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::models::{Model, TestId, TestResult};

const HEADER: &str = "class,name,";
const SEPARATOR: char = ',';
const DURATION: &str = "duration";

/// Streams a model as CSV into any writer.
pub struct CsvWriter<'m, W: Write> {
    model: &'m Model,
    writer: W,
}

impl<'m, W: Write> CsvWriter<'m, W> {
    pub fn new(model: &'m Model, writer: W) -> Self {
        Self { model, writer }
    }

    /// Writes the header and every row, returning the number of rows.
    pub fn write(&mut self) -> io::Result<usize> {
        self.write_header()?;
        let ids = self.model.sorted_ids();
        for id in &ids {
            if let Some(results) = self.model.results(id) {
                self.write_row(id, results)?;
            }
        }
        self.writer.flush()?;
        Ok(ids.len())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> io::Result<()> {
        let columns: Vec<String> = self
            .model
            .sources()
            .iter()
            .map(|source| format!("{}{}{}", escape_field(source.name()), SEPARATOR, DURATION))
            .collect();
        writeln!(self.writer, "{}{}", HEADER, columns.join(","))
    }

    fn write_row(&mut self, id: &TestId, results: &[Option<TestResult>]) -> io::Result<()> {
        let pairs: Vec<String> = results
            .iter()
            .map(|slot| match slot {
                Some(result) => format!("{}{}{}", result.state, SEPARATOR, result.duration_text()),
                None => SEPARATOR.to_string(),
            })
            .collect();
        writeln!(
            self.writer,
            "{}{}{}{}{}",
            escape_field(id.class_name()),
            SEPARATOR,
            escape_field(id.name()),
            SEPARATOR,
            pairs.join(",")
        )
    }
}

/// Quotes a field only when it would otherwise break the row structure.
fn escape_field(field: &str) -> String {
    if field.contains([SEPARATOR, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes `model` as CSV to `output_path`, returning the number of rows.
///
/// # Errors
/// Returns an error if the file cannot be created or written; this is fatal
/// for the run.
pub fn generate_csv_report(model: &Model, output_path: &Path) -> Result<usize> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = CsvWriter::new(model, BufWriter::new(file));
    writer
        .write()
        .with_context(|| format!("Failed to write {}", output_path.display()))
}
