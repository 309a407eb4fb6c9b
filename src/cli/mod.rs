//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `xrd`: XRD 峰表分析（嵌套子命令）
//!   - `summary`: 数据集总览
//!   - `peaks`: 峰位表
//!   - `size`: Scherrer 晶粒尺寸
//!   - `plot`: 出图/导出（单文件或批量目录）
//! - `usp`: USP 沉积模拟（嵌套子命令）
//!   - `simulate`: 单次模拟
//!   - `sweep`: 单参数扫描
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: xrd, usp

pub mod usp;
pub mod xrd;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Matai - ZnO 薄膜 XRD 分析与 USP 沉积模拟工具
#[derive(Parser)]
#[command(name = "matai")]
#[command(version)]
#[command(about = "XRD peak analysis and USP deposition modelling for ZnO thin films", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML configuration file with default options
    #[arg(long, global = true, env = "MATAI_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect, size and plot XRD peak tables (ZnO / ZnO:Mg)
    Xrd(xrd::XrdArgs),

    /// Simulate ultrasonic spray pyrolysis film growth
    Usp(usp::UspArgs),
}

impl Cli {
    /// 由 `-v` 次数得到默认日志级别（`RUST_LOG` 优先）
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
