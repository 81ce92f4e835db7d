//! # Core Module / 核心模块
//!
//! This module contains the core functionality of junit-diff:
//! the result model, input sources, name mapping, report parsing and
//! input planning.
//!
//! 此模块包含 junit-diff 的核心功能：
//! 结果模型、输入源、名称映射、报告解析和输入计划。

pub mod error;
pub mod mapping;
pub mod models;
pub mod parser;
pub mod planner;
pub mod source;

// Re-exports
pub use models::{Model, ResultSink, TestId, TestResult, TestState};
pub use parser::read_report;
pub use source::Source;
