//! # 数据模型模块
//!
//! 定义衍射峰数据与 USP 沉积过程的值对象。
//!
//! ## 依赖关系
//! - 被 `xrd/`, `usp/` 和 `commands/` 使用
//! - 子模块: peak, deposition

pub mod deposition;
pub mod peak;

pub use deposition::{DepositionParameters, DepositionResult, ParameterField, QualityBreakdown};
pub use peak::{PeakRecord, PeakSummary, Sample};
