//! # usp 子命令 CLI 定义
//!
//! - `simulate`: 单次沉积模拟，可选出图/导出 CSV
//! - `sweep`: 单参数扫描质量评分
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/usp.rs`

use crate::models::ParameterField;

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// usp 主命令参数
#[derive(Args, Debug)]
pub struct UspArgs {
    #[command(subcommand)]
    pub command: UspCommands,
}

/// usp 子命令
#[derive(Subcommand, Debug)]
pub enum UspCommands {
    /// Run one deposition simulation
    Simulate(SimulateArgs),

    /// Sweep one parameter and tabulate the quality score
    Sweep(SweepArgs),
}

// ─────────────────────────────────────────────────────────────
// 工艺参数
// ─────────────────────────────────────────────────────────────

/// 工艺参数（未给出时取配置文件或内置默认值）
#[derive(Args, Debug, Clone, Default)]
pub struct ProcessArgs {
    /// Substrate temperature in °C [400, 500]
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Ultrasonic frequency in MHz [1.0, 2.5]
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Deposition time in minutes [5, 30]
    #[arg(long)]
    pub time: Option<f64>,

    /// Precursor concentration in mol/L [0.05, 0.3]
    #[arg(long)]
    pub concentration: Option<f64>,

    /// Carrier gas flow rate in mL/min [1, 8]
    #[arg(long)]
    pub flow_rate: Option<f64>,
}

/// simulate 子命令参数
#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub process: ProcessArgs,

    /// Write the time series: .png/.svg chart or .csv table
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub height: u32,
}

// ─────────────────────────────────────────────────────────────
// sweep
// ─────────────────────────────────────────────────────────────

/// 可扫描的参数
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SweepParameter {
    Temperature,
    Frequency,
    Time,
    Concentration,
    FlowRate,
}

impl From<SweepParameter> for ParameterField {
    fn from(p: SweepParameter) -> Self {
        match p {
            SweepParameter::Temperature => ParameterField::Temperature,
            SweepParameter::Frequency => ParameterField::Frequency,
            SweepParameter::Time => ParameterField::Time,
            SweepParameter::Concentration => ParameterField::Concentration,
            SweepParameter::FlowRate => ParameterField::FlowRate,
        }
    }
}

/// sweep 子命令参数
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Parameter to sweep
    #[arg(short, long, value_enum)]
    pub parameter: SweepParameter,

    /// Start value (default: lower bound of the valid range)
    #[arg(long)]
    pub from: Option<f64>,

    /// End value (default: upper bound of the valid range)
    #[arg(long)]
    pub to: Option<f64>,

    /// Number of sweep points
    #[arg(long, default_value_t = 11)]
    pub steps: usize,

    /// Values of the other parameters
    #[command(flatten)]
    pub process: ProcessArgs,
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    use super::*;

    #[test]
    fn test_sweep_args() {
        let cli = Cli::parse_from([
            "matai", "usp", "sweep", "-p", "flow-rate", "--from", "2", "--to", "6", "--time", "20",
        ]);
        let Commands::Usp(args) = cli.command else {
            panic!("expected usp command");
        };
        match args.command {
            UspCommands::Sweep(s) => {
                assert_eq!(ParameterField::from(s.parameter), ParameterField::FlowRate);
                assert_eq!((s.from, s.to, s.steps), (Some(2.0), Some(6.0), 11));
                assert_eq!(s.process.time, Some(20.0));
                assert!(s.process.temperature.is_none());
            }
            _ => panic!("expected sweep"),
        }
    }
}
