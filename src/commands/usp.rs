//! # usp 子命令实现
//!
//! 运行 USP 沉积模拟与单参数扫描，打印最终膜参数和质量评分分解，
//! 可选输出曲线图 (PNG/SVG) 或时间序列 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/usp.rs` 定义的参数
//! - 使用 `usp/` 模块进行模拟、出图与导出

use crate::cli::usp::{ProcessArgs, SimulateArgs, SweepArgs, UspArgs, UspCommands};
use crate::config::Config;
use crate::error::{MataiError, Result};
use crate::models::{DepositionParameters, ParameterField};
use crate::usp::{self, DepositionModel};
use crate::utils::chart::{ChartOptions, OutputFormat};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 执行 usp 子命令
pub fn execute(args: UspArgs, config: &Config) -> Result<()> {
    match args.command {
        UspCommands::Simulate(a) => execute_simulate(a, config),
        UspCommands::Sweep(a) => execute_sweep(a, config),
    }
}

/// 命令行参数覆盖配置文件中的工艺参数
fn resolve_parameters(process: &ProcessArgs, config: &Config) -> DepositionParameters {
    let base = config.deposition.parameters();
    DepositionParameters {
        temperature_c: process.temperature.unwrap_or(base.temperature_c),
        frequency_mhz: process.frequency.unwrap_or(base.frequency_mhz),
        time_min: process.time.unwrap_or(base.time_min),
        concentration_mol_l: process.concentration.unwrap_or(base.concentration_mol_l),
        flow_rate_ml_min: process.flow_rate.unwrap_or(base.flow_rate_ml_min),
    }
}

fn print_parameters(params: &DepositionParameters) {
    for field in ParameterField::ALL {
        output::print_metric(
            field.name(),
            &format!("{} {}", field.get(params), field.unit()),
        );
    }
}

// ─────────────────────────────────────────────────────────────
// simulate
// ─────────────────────────────────────────────────────────────

fn execute_simulate(args: SimulateArgs, config: &Config) -> Result<()> {
    let params = resolve_parameters(&args.process, config);
    let model = DepositionModel::new();

    let result = model.simulate(&params)?;
    let quality = model.quality(&params)?;

    output::print_header("USP Deposition Simulation");
    print_parameters(&params);

    println!();
    output::print_metric("Final thickness", &format!("{:.2} nm", result.final_thickness()));
    output::print_metric(
        "Final crystallinity",
        &format!("{:.2} %", result.final_crystallinity()),
    );
    output::print_metric("Final roughness", &format!("{:.2} nm", result.final_roughness()));

    #[derive(Tabled)]
    struct QualityRow {
        #[tabled(rename = "Component")]
        component: &'static str,
        #[tabled(rename = "Score")]
        score: String,
    }

    let rows = [
        ("Temperature", quality.temperature),
        ("Frequency", quality.frequency),
        ("Time", quality.time),
        ("Concentration", quality.concentration),
        ("Total", quality.total),
    ]
    .map(|(component, score)| QualityRow {
        component,
        score: format!("{:.2}", score),
    });

    println!();
    println!("{}", Table::new(&rows));

    if let Some(path) = &args.output {
        let format = simulation_output_format(path)?;
        match format {
            OutputFormat::Png | OutputFormat::Svg => {
                let options = ChartOptions {
                    title: String::new(),
                    width: args.width,
                    height: args.height,
                    svg: format == OutputFormat::Svg,
                    label_peaks: false,
                };
                usp::plot::generate_deposition_plot(&result, path, &options)?;
            }
            OutputFormat::Csv | OutputFormat::Xy => usp::export::to_csv(&result, path)?,
        }
        output::print_success(&format!("Simulation saved to '{}'", path.display()));
    }

    Ok(())
}

/// 模拟结果只支持 .png / .svg / .csv
fn simulation_output_format(path: &Path) -> Result<OutputFormat> {
    match OutputFormat::from_known_extension(path) {
        Some(f @ (OutputFormat::Png | OutputFormat::Svg | OutputFormat::Csv)) => Ok(f),
        _ => Err(MataiError::InvalidArgument(format!(
            "Unsupported output '{}': use .png, .svg or .csv",
            path.display()
        ))),
    }
}

// ─────────────────────────────────────────────────────────────
// sweep
// ─────────────────────────────────────────────────────────────

fn execute_sweep(args: SweepArgs, config: &Config) -> Result<()> {
    let field = ParameterField::from(args.parameter);
    let base = resolve_parameters(&args.process, config);

    let range = field.range();
    let from = args.from.unwrap_or(*range.start());
    let to = args.to.unwrap_or(*range.end());
    if args.steps == 0 {
        return Err(MataiError::InvalidArgument(
            "--steps must be at least 1".to_string(),
        ));
    }
    let values = field.linspace(from, to, args.steps)?;

    let points = DepositionModel::new().sweep(&base, field, &values)?;

    output::print_header(&format!(
        "Quality Sweep: {} ({} → {} {})",
        field,
        from,
        to,
        field.unit()
    ));

    #[derive(Tabled)]
    struct SweepRow {
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Quality")]
        quality: String,
        #[tabled(rename = "Thickness (nm)")]
        thickness: String,
        #[tabled(rename = "Crystallinity (%)")]
        crystallinity: String,
    }

    let rows: Vec<SweepRow> = points
        .iter()
        .map(|p| SweepRow {
            value: format!("{:.4}", p.value),
            quality: format!("{:.2}", p.quality_score),
            thickness: format!("{:.2}", p.final_thickness),
            crystallinity: format!("{:.2}", p.final_crystallinity),
        })
        .collect();
    println!("{}", Table::new(&rows));

    if let Some(best) = points
        .iter()
        .max_by(|a, b| a.quality_score.total_cmp(&b.quality_score))
    {
        output::print_success(&format!(
            "Best {} = {:.4} {} (quality {:.2})",
            field,
            best.value,
            field.unit(),
            best.quality_score
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_parameters_precedence() {
        let config =
            Config::parse("[deposition]\ntemperature_c = 420.0\ntime_min = 25.0\n").unwrap();
        let process = ProcessArgs {
            time: Some(10.0),
            ..Default::default()
        };

        let params = resolve_parameters(&process, &config);
        assert_eq!(params.temperature_c, 420.0);
        assert_eq!(params.time_min, 10.0);
        assert_eq!(params.frequency_mhz, 1.7);
        assert_eq!(params.flow_rate_ml_min, 3.0);
    }

    #[test]
    fn test_simulation_output_format() {
        assert_eq!(
            simulation_output_format(Path::new("run.SVG")).unwrap(),
            OutputFormat::Svg
        );
        assert_eq!(
            simulation_output_format(Path::new("run.csv")).unwrap(),
            OutputFormat::Csv
        );
        for bad in ["result.pdf", "result", "result.xy"] {
            let err = simulation_output_format(Path::new(bad)).unwrap_err();
            assert!(matches!(err, MataiError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let params = resolve_parameters(&ProcessArgs::default(), &Config::default());
        assert_eq!(params, DepositionParameters::default());
    }
}
