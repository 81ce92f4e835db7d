//! # JUnit Diff Library / JUnit Diff 库
//!
//! This library compares several JUnit-style XML test reports side by side.
//! Every `(class, test)` pair seen in any report becomes one row of a matrix,
//! with one state/duration column pair per report.
//!
//! 此库用于并排比较多个 JUnit 风格的 XML 测试报告。
//! 任意报告中出现的每个 `(类, 测试)` 组合都会成为矩阵中的一行，
//! 每个报告对应一组状态/耗时列。
//!
//! ## Modules / 模块
//!
//! - `core` - Result model, sources, name mapping and the report parser
//! - `infra` - Archive access, resource lifetime, file system helpers and logging
//! - `reporting` - CSV writer, HTML report and console summary
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 结果模型、输入源、名称映射和报告解析器
//! - `infra` - 压缩包访问、资源生命周期、文件系统工具和日志
//! - `reporting` - CSV 写入器、HTML 报告和控制台摘要
//! - `cli` - 命令行接口和命令

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use crate::core::mapping;
pub use crate::core::models;
pub use crate::core::source;

/// Resolves a requested locale against the bundled translations.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the
/// language code (e.g., "en" from "en-US"), and finally falls back to the
/// default language ("en").
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }
    requested
        .split(['-', '_'])
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
