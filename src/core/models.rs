//! # Data Models Module / 数据模型模块
//!
//! This module defines the result matrix at the heart of the comparison: test
//! identities, per-source outcomes, and the [`Model`] that maps every identity
//! to a fixed-width row with one slot per input source.
//!
//! 此模块定义了比较的核心结果矩阵：测试标识、每个输入源的结果，
//! 以及将每个标识映射到固定宽度行（每个输入源一个槽位）的 [`Model`]。

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::source::{Source, SourceId};

/// Placeholder used for a missing or empty class or test name.
pub const UNKNOWN: &str = "???";

/// The identity of a test: class name plus test (method) name.
///
/// Equality, hashing and ordering all go through the string form
/// `className#testName`.
/// 测试的标识：类名加测试（方法）名。相等、哈希和排序均基于字符串形式 `className#testName`。
#[derive(Debug, Clone)]
pub struct TestId {
    class_name: String,
    name: String,
    key: String,
}

impl TestId {
    /// Creates an identity; empty names are normalized to [`UNKNOWN`].
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        let class_name = normalize(class_name.into());
        let name = normalize(name.into());
        let key = format!("{}#{}", class_name, name);
        Self {
            class_name,
            name,
            key,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `className#testName` string form.
    pub fn key(&self) -> &str {
        &self.key
    }
}

fn normalize(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

impl PartialEq for TestId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TestId {}

impl Hash for TestId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for TestId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TestId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Outcome of a test case within one report.
/// 单个报告中测试用例的结果。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TestState {
    /// No `<failure>` or `<error>` child was seen.
    Pass,
    /// A `<failure>` child was seen (assertion failure).
    Failure,
    /// An `<error>` child was seen (unexpected exception).
    Error,
}

impl TestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestState::Pass => "PASS",
            TestState::Failure => "FAILURE",
            TestState::Error => "ERROR",
        }
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one test in one source.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    /// The source this result was read from.
    pub source: SourceId,
    /// Duration in seconds, absent when the report carried no `time` attribute.
    pub duration: Option<f64>,
    /// Starts as [`TestState::Pass`] and is upgraded while the test case is parsed.
    pub state: TestState,
}

impl TestResult {
    /// A passing result for `source`.
    pub fn new(source: SourceId, duration: Option<f64>) -> Self {
        Self {
            source,
            duration,
            state: TestState::Pass,
        }
    }

    /// Duration in its full default textual form (`0.5`, `1.0`, `12.345`,
    /// `1.0E-7`, `Infinity`); empty when absent.
    pub fn duration_text(&self) -> String {
        self.duration.map(format_seconds).unwrap_or_default()
    }
}

/// Plain decimal between 10^-3 and 10^7, `<mantissa>E<exponent>` outside it.
/// The mantissa always carries a fractional digit.
fn format_seconds(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}Infinity", sign);
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", value);
    }
    let scientific = format!("{:e}", value);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            format!("{}E{}", mantissa, exponent)
        }
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => scientific,
    }
}

/// Per-source presence tallies, used by the console and HTML summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTally {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Tests known to the model that this source has no result for.
    pub absent: usize,
}

impl SourceTally {
    pub fn present(&self) -> usize {
        self.passed + self.failed + self.errored
    }
}

/// Receives the results committed by the report parser.
pub trait ResultSink {
    fn add_result(&mut self, id: TestId, result: TestResult);
}

/// Collects results in commit order, for handing over to a [`Model`] later.
impl ResultSink for Vec<(TestId, TestResult)> {
    fn add_result(&mut self, id: TestId, result: TestResult) {
        self.push((id, result));
    }
}

/// The full aggregation: sources × test identities → results.
///
/// The source list is fixed at construction and defines the column order of
/// every output. Every row is exactly `sources().len()` wide; slot `i` holds
/// the result read from `sources()[i]`, or `None`.
///
/// 完整的聚合结果：输入源 × 测试标识 → 结果。输入源列表在构造时固定，
/// 决定所有输出的列顺序；每一行的宽度恰好等于输入源数量。
#[derive(Debug)]
pub struct Model {
    sources: Vec<Source>,
    results: HashMap<TestId, Box<[Option<TestResult>]>>,
}

impl Model {
    pub fn new(sources: Vec<Source>) -> Self {
        Self {
            sources,
            results: HashMap::new(),
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Records `result` under `id`.
    ///
    /// A row is allocated for an unseen `id` first. The slot is then located by
    /// the identity of `result.source`; a source that is not part of this model
    /// is silently ignored, leaving the (possibly empty) row in place. An
    /// existing value in the slot is overwritten.
    pub fn add_result(&mut self, id: TestId, result: TestResult) {
        let width = self.sources.len();
        let row = self
            .results
            .entry(id)
            .or_insert_with(|| vec![None; width].into_boxed_slice());
        if let Some(index) = self.sources.iter().position(|s| s.id() == result.source) {
            row[index] = Some(result);
        }
    }

    /// Commits a batch of results in order, see [`Model::add_result`].
    pub fn extend(&mut self, results: impl IntoIterator<Item = (TestId, TestResult)>) {
        for (id, result) in results {
            self.add_result(id, result);
        }
    }

    /// The row for `id`, or `None` if no source reported it.
    pub fn results(&self, id: &TestId) -> Option<&[Option<TestResult>]> {
        self.results.get(id).map(|row| &row[..])
    }

    /// All known identities, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &TestId> {
        self.results.keys()
    }

    /// Number of distinct test identities.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// All identities in ascending order of `className#testName`.
    pub fn sorted_ids(&self) -> Vec<&TestId> {
        let mut ids: Vec<&TestId> = self.results.keys().collect();
        ids.sort();
        ids
    }

    /// One tally per source, aligned with [`Model::sources`].
    pub fn tallies(&self) -> Vec<SourceTally> {
        let mut tallies = vec![SourceTally::default(); self.sources.len()];
        for row in self.results.values() {
            for (tally, slot) in tallies.iter_mut().zip(row.iter()) {
                match slot.as_ref().map(|r| r.state) {
                    Some(TestState::Pass) => tally.passed += 1,
                    Some(TestState::Failure) => tally.failed += 1,
                    Some(TestState::Error) => tally.errored += 1,
                    None => tally.absent += 1,
                }
            }
        }
        tallies
    }
}

impl ResultSink for Model {
    fn add_result(&mut self, id: TestId, result: TestResult) {
        Model::add_result(self, id, result);
    }
}
