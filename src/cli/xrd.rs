//! # xrd 子命令 CLI 定义
//!
//! XRD 峰表分析统一入口，包含多个子命令：
//! - `summary`: 数据集总览
//! - `peaks`: 峰位表
//! - `size`: Scherrer 晶粒尺寸与对比指标
//! - `plot`: 图表或数据导出
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/xrd.rs`

use crate::utils::chart::OutputFormat;

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// XRD 主命令
// ─────────────────────────────────────────────────────────────

/// xrd 主命令参数
#[derive(Args, Debug)]
pub struct XrdArgs {
    #[command(subcommand)]
    pub command: XrdCommands,
}

/// xrd 子命令
#[derive(Subcommand, Debug)]
pub enum XrdCommands {
    /// Show dataset overview and per-sample summary
    Summary(SummaryArgs),

    /// List diffraction peaks
    Peaks(PeaksArgs),

    /// Estimate crystallite sizes with the Scherrer equation
    Size(SizeArgs),

    /// Plot or export peak data (single file or batch directory)
    Plot(PlotArgs),
}

// ─────────────────────────────────────────────────────────────
// 公共数据源参数
// ─────────────────────────────────────────────────────────────

/// 数据源参数
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Peak table CSV (Sample,H,K,L,2Theta,d_hkl,I); built-in table if missing
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Fail instead of using the built-in table when the file is missing
    #[arg(long, default_value_t = false)]
    pub no_fallback: bool,
}

// ─────────────────────────────────────────────────────────────
// summary / peaks
// ─────────────────────────────────────────────────────────────

/// summary 子命令参数
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

/// peaks 子命令参数
#[derive(Args, Debug)]
pub struct PeaksArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Only show peaks of this sample ("ZnO" or "ZnO:Mg")
    #[arg(short, long)]
    pub sample: Option<String>,
}

// ─────────────────────────────────────────────────────────────
// size
// ─────────────────────────────────────────────────────────────

/// size 子命令参数
#[derive(Args, Debug)]
pub struct SizeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Peak FWHM in degrees 2θ (default 0.2)
    #[arg(long)]
    pub fwhm: Option<f64>,

    /// X-ray wavelength: radiation source name (cu-ka1, mo-ka, etc.) or value in Å
    #[arg(short, long)]
    pub wavelength: Option<String>,

    /// Scherrer shape factor K (default 0.9)
    #[arg(long)]
    pub shape_factor: Option<f64>,
}

// ─────────────────────────────────────────────────────────────
// plot
// ─────────────────────────────────────────────────────────────

/// XRD 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum XrdOutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (input schema)
    Csv,
    /// XY data file (2θ, intensity)
    Xy,
}

impl From<XrdOutputFormat> for OutputFormat {
    fn from(f: XrdOutputFormat) -> Self {
        match f {
            XrdOutputFormat::Png => OutputFormat::Png,
            XrdOutputFormat::Svg => OutputFormat::Svg,
            XrdOutputFormat::Csv => OutputFormat::Csv,
            XrdOutputFormat::Xy => OutputFormat::Xy,
        }
    }
}

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Input: peak table file or directory of peak tables (built-in table if omitted)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Fail instead of using the built-in table when the file is missing
    #[arg(long, default_value_t = false)]
    pub no_fallback: bool,

    /// Output: file path (single mode) or directory (batch mode)
    #[arg(short, long, default_value = "xrd_pattern.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<XrdOutputFormat>,

    /// Overlay both samples on one chart instead of one panel per sample
    #[arg(long, default_value_t = false)]
    pub compare: bool,

    /// Label the strongest peaks with Miller indices (hkl)
    #[arg(long, default_value_t = false)]
    pub label_peaks: bool,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot
    #[arg(long)]
    pub title: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.csv,xrd_*.txt")
    #[arg(long, default_value = "*.csv")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
