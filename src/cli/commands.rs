//! # Commands Module / 命令模块
//!
//! Subcommand implementations driven by [`crate::cli::run`].
//!
//! 由 [`crate::cli::run`] 驱动的命令实现。

pub mod compare;
