//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders the comparison matrix as a single self-contained HTML
//! page: the per-source summary on top, then the same rows as the CSV with
//! each state cell colored.
//!
//! 此模块将比较矩阵渲染为单个自包含的 HTML 页面：顶部为按输入源的摘要，
//! 下方为与 CSV 相同的行，每个状态单元格带有颜色。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;

use crate::core::models::{Model, TestResult, TestState};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2em; color: #222; }
h1 { font-size: 1.5em; }
.generated { color: #777; font-size: 0.85em; }
table { border-collapse: collapse; margin-top: 1em; }
th, td { border: 1px solid #ddd; padding: 4px 8px; font-size: 0.9em; }
th { background: #f4f4f4; position: sticky; top: 0; }
td.duration { text-align: right; font-variant-numeric: tabular-nums; }
.state-PASS { background: #e6f4ea; color: #1e7b34; }
.state-FAILURE { background: #fdecea; color: #b3261e; }
.state-ERROR { background: #fff4e5; color: #a15c00; }
.state-absent { background: #fafafa; }
"#;

fn state_class(state: TestState) -> &'static str {
    match state {
        TestState::Pass => "state-PASS",
        TestState::Failure => "state-FAILURE",
        TestState::Error => "state-ERROR",
    }
}

fn render_slot(slot: &Option<TestResult>) -> Markup {
    match slot {
        Some(result) => html! {
            td class=(state_class(result.state)) { (result.state.as_str()) }
            td class="duration" { (result.duration_text()) }
        },
        None => html! {
            td class="state-absent" {}
            td class="state-absent duration" {}
        },
    }
}

/// Renders `model` as an HTML document.
///
/// # Arguments / 参数
/// * `model` - The completed model / 已完成的结果模型
/// * `locale` - The locale to use for internationalization / 用于国际化的语言环境
pub fn render_html_report(model: &Model, locale: &str) -> Markup {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let tallies = model.tallies();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_title", locale = locale).to_string()) }
                style { (maud::PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_header", locale = locale).to_string()) }
                p class="generated" { (t!("html_generated", locale = locale, time = generated).to_string()) }

                table class="summary" {
                    thead {
                        tr {
                            th { (t!("summary_source", locale = locale).to_string()) }
                            th { (t!("summary_passed", locale = locale).to_string()) }
                            th { (t!("summary_failed", locale = locale).to_string()) }
                            th { (t!("summary_errored", locale = locale).to_string()) }
                            th { (t!("summary_absent", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        @for (source, tally) in model.sources().iter().zip(tallies.iter()) {
                            tr {
                                td { (source.name()) }
                                td class="duration" { (tally.passed) }
                                td class="duration" { (tally.failed) }
                                td class="duration" { (tally.errored) }
                                td class="duration" { (tally.absent) }
                            }
                        }
                    }
                }

                table class="matrix" {
                    thead {
                        tr {
                            th { (t!("html_class", locale = locale).to_string()) }
                            th { (t!("html_name", locale = locale).to_string()) }
                            @for source in model.sources() {
                                th { (source.name()) }
                                th { (t!("html_duration", locale = locale).to_string()) }
                            }
                        }
                    }
                    tbody {
                        @for id in model.sorted_ids() {
                            tr {
                                td { (id.class_name()) }
                                td { (id.name()) }
                                @if let Some(results) = model.results(id) {
                                    @for slot in results {
                                        (render_slot(slot))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Generates the HTML report and writes it to `output_path`.
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件则返回错误。
pub fn generate_html_report(model: &Model, output_path: &Path, locale: &str) -> Result<()> {
    let markup = render_html_report(model, locale);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report to {}", output_path.display()))?;
    Ok(())
}
