//! # USP 沉积模拟模块
//!
//! 超声喷雾热解 (Ultrasonic Spray Pyrolysis) 成膜过程的闭式模型。
//!
//! ## 子模块
//! - `model`: 生长曲线、质量评分与参数扫描
//! - `plot`: 图表生成
//! - `export`: CSV 导出
//!
//! ## 依赖关系
//! - 被 `commands/usp.rs` 使用
//! - 使用 `models/deposition.rs`

pub mod export;
pub mod model;
pub mod plot;

pub use model::{simulate, DepositionModel, SweepPoint, SAMPLE_COUNT};
