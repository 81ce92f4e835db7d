//! # Reporting Module / 报告模块
//!
//! This module turns a completed model into output: the CSV comparison matrix,
//! an optional HTML rendering of the same matrix, and a colorful console summary
//! with internationalization support.
//!
//! 此模块将完成的模型转换为输出：CSV 比较矩阵、可选的同一矩阵的 HTML 渲染，
//! 以及支持国际化的彩色控制台摘要。

pub mod console;
pub mod csv;
pub mod html;

// Re-export common reporting functions
pub use console::print_summary;
pub use csv::generate_csv_report;
pub use html::generate_html_report;
