//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the progress of a run and a colored per-source summary
//! of the finished comparison, with internationalization support.
//!
//! 此模块打印运行进度以及比较完成后按输入源划分的彩色摘要，支持国际化。

use colored::*;
use std::io::{self, Write};

use crate::core::models::Model;
use crate::infra::t;

/// Prints one progress dot without a newline.
pub fn print_progress_tick() {
    print!(".");
    let _ = io::stdout().flush();
}

/// Prints a formatted summary of the comparison to the console.
/// Shows, for each source in column order, how many tests passed, failed,
/// errored, or were absent from that source.
///
/// 在控制台打印比较结果的格式化摘要。
/// 按列顺序显示每个输入源中通过、失败、出错或缺失的测试数量。
///
/// # Arguments / 参数
/// * `model` - The completed model
///             已完成的结果模型
/// * `locale` - The language locale to use for messages
///              用于消息的语言区域设置
///
/// # Output Format / 输出格式
/// ```text
/// --- Comparison Summary ---
///   - Source                                   |   Passed   Failed   Errors   Absent
///   - run-a.xml                                |       41        1        0        2
///   - run-b.xml                                |       43        0        0        1
/// ```
pub fn print_summary(model: &Model, locale: &str) {
    println!("\n{}", t!("summary_banner", locale = locale).bold());
    println!(
        "  - {:<40} | {:>8} {:>8} {:>8} {:>8}",
        t!("summary_source", locale = locale),
        t!("summary_passed", locale = locale),
        t!("summary_failed", locale = locale),
        t!("summary_errored", locale = locale),
        t!("summary_absent", locale = locale),
    );

    for (source, tally) in model.sources().iter().zip(model.tallies()) {
        let failed = tally.failed.to_string();
        let errored = tally.errored.to_string();
        println!(
            "  - {:<40} | {:>8} {:>8} {:>8} {:>8}",
            source.name(),
            tally.passed.to_string().green(),
            if tally.failed > 0 { failed.red() } else { failed.normal() },
            if tally.errored > 0 { errored.red() } else { errored.normal() },
            tally.absent.to_string().dimmed(),
        );
    }

    println!(
        "{}",
        t!(
            "summary_distinct",
            locale = locale,
            count = model.len(),
            sources = model.sources().len()
        )
        .cyan()
    );
}
