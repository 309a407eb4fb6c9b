//! # XRD 峰数据模块
//!
//! 提供 X 射线衍射峰数据的加载、统计与晶粒尺寸计算。
//!
//! ## 子模块
//! - `dataset`: 峰数据集加载与查询
//! - `fallback`: 内置 ZnO / ZnO:Mg 峰表
//! - `scherrer`: Scherrer 晶粒尺寸与对比指标
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/xrd.rs` 使用
//! - 使用 `models/peak.rs`

pub mod dataset;
pub mod export;
pub mod fallback;
pub mod plot;
pub mod scherrer;

pub use dataset::{DataSource, DatasetOverview, LoadOptions, PeakDataset};
pub use scherrer::{crystallite_size, ComparisonMetrics, SampleMetrics, ScherrerCalculator};
