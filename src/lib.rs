//! # Matai - ZnO 薄膜 XRD 分析与 USP 沉积模拟
//!
//! 两个相互独立的组件：
//! - XRD 峰表（ZnO / ZnO:Mg）：加载、按样品查询、汇总、Scherrer 晶粒尺寸
//! - USP 沉积模型：膜厚/结晶度/粗糙度随时间变化与质量评分
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── xrd/        (峰表数据集、Scherrer、出图、导出)
//!   ├── usp/        (沉积模型、出图、导出)
//!   ├── models/     (数据模型)
//!   ├── config.rs   (TOML 配置)
//!   ├── error.rs    (错误处理)
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   ├── batch/      (批量处理)
//!   └── utils/      (工具函数)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod usp;
pub mod utils;
pub mod xrd;

pub use error::{MataiError, Result};
pub use models::{DepositionParameters, DepositionResult, PeakRecord, PeakSummary, Sample};
pub use usp::DepositionModel;
pub use xrd::{crystallite_size, PeakDataset};
