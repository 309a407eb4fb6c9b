//! # 工具函数模块
//!
//! 提供美化输出、进度条与图表公共设置。
//!
//! ## 依赖关系
//! - 被 `commands/`、`batch/`、`xrd/plot.rs`、`usp/plot.rs` 使用
//! - 子模块: chart, output, progress

pub mod chart;
pub mod output;
pub mod progress;
