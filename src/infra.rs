//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for junit-diff,
//! including archive access, resource lifetime, file system helpers and logging.
//!
//! 此模块为 junit-diff 提供基础设施服务，
//! 包括压缩包访问、资源生命周期管理、文件系统工具和日志。

pub mod archive;
pub mod fs;
pub mod logging;
pub mod resources;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
