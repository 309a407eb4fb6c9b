//! # xrd 子命令实现
//!
//! 读取 ZnO / ZnO:Mg 峰表，输出总览、峰位表、Scherrer 晶粒尺寸，
//! 以及图表 (PNG/SVG) 或数据文件 (CSV/XY)。
//!
//! ## 功能
//! - 文件缺失时回退到内置峰表（可禁用）
//! - `plot` 支持单文件和批量目录处理，批量模式并行（rayon）
//!
//! ## 依赖关系
//! - 使用 `cli/xrd.rs` 定义的参数
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `xrd/` 模块读取、计算、出图与导出

use super::DatasetSetting;
use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::xrd::{PeaksArgs, PlotArgs, SizeArgs, SummaryArgs, XrdArgs, XrdCommands};
use crate::config::Config;
use crate::error::{MataiError, Result};
use crate::models::{PeakRecord, Sample};
use crate::utils::chart::{ChartOptions, OutputFormat};
use crate::utils::output;
use crate::xrd::scherrer::{self, angstrom_to_nm};
use crate::xrd::{self, LoadOptions, PeakDataset, ScherrerCalculator};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{Table, Tabled};

/// 未指定时的 FWHM（度）
const DEFAULT_FWHM_DEG: f64 = 0.2;

/// 执行 xrd 子命令
pub fn execute(args: XrdArgs, config: &Config) -> Result<()> {
    match args.command {
        XrdCommands::Summary(a) => execute_summary(a, config),
        XrdCommands::Peaks(a) => execute_peaks(a, config),
        XrdCommands::Size(a) => execute_size(a, config),
        XrdCommands::Plot(a) => execute_plot(a, config),
    }
}

// ─────────────────────────────────────────────────────────────
// summary
// ─────────────────────────────────────────────────────────────

fn execute_summary(args: SummaryArgs, config: &Config) -> Result<()> {
    let dataset =
        DatasetSetting::resolve(args.data.data.as_deref(), args.data.no_fallback, config).load()?;

    output::print_header("XRD Dataset Summary");
    output::print_info(&format!("Source: {}", dataset.source()));

    let overview = dataset.overview();
    output::print_metric("Total peaks", &overview.total_peaks.to_string());
    output::print_metric(
        "2θ range (°)",
        &format_range(overview.min_angle, overview.max_angle),
    );
    output::print_metric("Max intensity", &format!("{:.1}", overview.max_intensity));

    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Sample")]
        sample: String,
        #[tabled(rename = "Peaks")]
        peaks: usize,
        #[tabled(rename = "2θ range (°)")]
        range: String,
        #[tabled(rename = "Max I")]
        max_intensity: String,
    }

    let rows: Vec<SummaryRow> = Sample::ALL
        .iter()
        .map(|&s| {
            let summary = dataset.summary(s);
            SummaryRow {
                sample: s.display_name().to_string(),
                peaks: summary.peak_count,
                range: format_range(summary.min_angle, summary.max_angle),
                max_intensity: format!("{:.1}", summary.max_intensity),
            }
        })
        .collect();

    println!();
    println!("{}", Table::new(&rows));
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// peaks
// ─────────────────────────────────────────────────────────────

fn execute_peaks(args: PeaksArgs, config: &Config) -> Result<()> {
    let dataset =
        DatasetSetting::resolve(args.data.data.as_deref(), args.data.no_fallback, config).load()?;

    let records: Vec<&PeakRecord> = match args.sample.as_deref() {
        Some(label) => {
            let sample: Sample = label.parse()?;
            dataset.records(sample).iter().collect()
        }
        None => dataset.iter().collect(),
    };

    if records.is_empty() {
        output::print_warning("No peaks to show");
        return Ok(());
    }

    output::print_header(&format!("{} XRD Peaks ({})", records.len(), dataset.source()));
    print_peak_table(&records);
    Ok(())
}

/// 打印峰位表格
fn print_peak_table(records: &[&PeakRecord]) {
    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "Sample")]
        sample: String,
        #[tabled(rename = "(hkl)")]
        hkl: String,
        #[tabled(rename = "2θ (°)")]
        two_theta: String,
        #[tabled(rename = "d (Å)")]
        d_spacing: String,
        #[tabled(rename = "I")]
        intensity: String,
    }

    let rows: Vec<PeakRow> = records
        .iter()
        .map(|p| PeakRow {
            sample: p.sample.to_string(),
            hkl: p.hkl(),
            two_theta: format!("{:.2}", p.two_theta),
            d_spacing: format!("{:.3}", p.d_spacing),
            intensity: format!("{:.1}", p.intensity),
        })
        .collect();

    println!("{}", Table::new(&rows));
}

// ─────────────────────────────────────────────────────────────
// size
// ─────────────────────────────────────────────────────────────

/// 合并 `--wavelength` / `--shape-factor` 与 `[scherrer]`
fn resolve_calculator(args: &SizeArgs, config: &Config) -> Result<ScherrerCalculator> {
    let wavelength = match (&args.wavelength, &config.scherrer.wavelength) {
        (Some(s), _) => scherrer::parse_wavelength(s)?,
        (None, Some(setting)) => setting.resolve()?,
        (None, None) => scherrer::CU_KA1,
    };
    let shape_factor = args
        .shape_factor
        .or(config.scherrer.shape_factor)
        .unwrap_or(scherrer::SHAPE_FACTOR);

    ScherrerCalculator::new(wavelength, shape_factor)
}

fn execute_size(args: SizeArgs, config: &Config) -> Result<()> {
    let calculator = resolve_calculator(&args, config)?;
    let fwhm_deg = args
        .fwhm
        .or(config.scherrer.fwhm_deg)
        .unwrap_or(DEFAULT_FWHM_DEG);
    let fwhm_rad = fwhm_deg.to_radians();

    let dataset =
        DatasetSetting::resolve(args.data.data.as_deref(), args.data.no_fallback, config).load()?;

    output::print_header("Scherrer Crystallite Size");
    output::print_info(&format!(
        "λ = {:.4} Å, K = {}, FWHM = {:.3}° ({:.5} rad)",
        calculator.wavelength(),
        calculator.shape_factor(),
        fwhm_deg,
        fwhm_rad
    ));

    #[derive(Tabled)]
    struct SizeRow {
        #[tabled(rename = "Sample")]
        sample: String,
        #[tabled(rename = "(hkl)")]
        hkl: String,
        #[tabled(rename = "2θ (°)")]
        two_theta: String,
        #[tabled(rename = "D (Å)")]
        size_a: String,
        #[tabled(rename = "D (nm)")]
        size_nm: String,
    }

    let mut rows = Vec::with_capacity(dataset.len());
    for record in dataset.iter() {
        let size = calculator.crystallite_size(record, fwhm_rad)?;
        rows.push(SizeRow {
            sample: record.sample.to_string(),
            hkl: record.hkl(),
            two_theta: format!("{:.2}", record.two_theta),
            size_a: format!("{:.1}", size),
            size_nm: format!("{:.2}", angstrom_to_nm(size)),
        });
    }
    println!("{}", Table::new(&rows));

    let metrics = calculator.compare(&dataset, fwhm_rad)?;
    output::print_header("Sample Comparison");
    for m in &metrics.samples {
        let size = m
            .crystallite_nm
            .map(|nm| format!("{:.2} nm", nm))
            .unwrap_or_else(|| "-".to_string());
        output::print_metric(
            m.sample.display_name(),
            &format!(
                "{} peaks, max I {:.1}, mean D {}",
                m.peak_count, m.max_intensity, size
            ),
        );
    }
    if let Some(change) = metrics.crystallite_change_pct() {
        output::print_metric("Size change (Mg)", &format!("{:+.2} %", change));
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────
// plot
// ─────────────────────────────────────────────────────────────

/// 出图/导出设置（单文件与批量共用）
struct RenderConfig {
    format: OutputFormat,
    compare: bool,
    chart: ChartOptions,
}

fn execute_plot(args: PlotArgs, config: &Config) -> Result<()> {
    output::print_header("XRD Pattern Output");

    let setting = DatasetSetting::resolve(args.data.as_deref(), args.no_fallback, config);

    match &setting.path {
        Some(dir) if dir.is_dir() => {
            let dir = dir.clone();
            execute_batch(&dir, &args)
        }
        _ => execute_single(&setting, &args),
    }
}

fn render_config(args: &PlotArgs, format: OutputFormat) -> RenderConfig {
    RenderConfig {
        format,
        compare: args.compare,
        chart: ChartOptions {
            title: args.title.clone().unwrap_or_default(),
            width: args.width,
            height: args.height,
            svg: format == OutputFormat::Svg,
            label_peaks: args.label_peaks,
        },
    }
}

/// 单文件模式
fn execute_single(setting: &DatasetSetting, args: &PlotArgs) -> Result<()> {
    let dataset = setting.load()?;
    output::print_info(&format!(
        "Loaded {} peaks from {}",
        dataset.len(),
        dataset.source()
    ));

    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| OutputFormat::from_extension(&args.output));
    let render = render_config(args, format);

    render_dataset(&dataset, &args.output, &render)?;
    output::print_success(&format!("XRD output saved to '{}'", args.output.display()));
    Ok(())
}

/// 批量处理模式
fn execute_batch(input_dir: &Path, args: &PlotArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", input_dir.display()));

    let files = FileCollector::new(input_dir.to_path_buf())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} peak tables", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| MataiError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let format = args.format.map(OutputFormat::from).unwrap_or(OutputFormat::Png);
    output::print_info(&format!("Output format: {:?}", format));

    let batch = Arc::new(BatchConfig {
        output_dir: args.output.clone(),
        overwrite: args.overwrite,
        render: render_config(args, format),
    });

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| process_batch_file(file, &batch))?;

    output::print_done(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量处理配置
struct BatchConfig {
    output_dir: PathBuf,
    overwrite: bool,
    render: RenderConfig,
}

/// 批量输出文件名：`<stem>_xrd.<ext>`
fn batch_output_path(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}_xrd.{}", stem, format.extension()))
}

/// 处理批量模式中的单个文件
fn process_batch_file(input: &PathBuf, config: &BatchConfig) -> ProcessResult {
    let output_file = batch_output_path(input, &config.output_dir, config.render.format);

    if output_file.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    // 批量模式下每个文件都必须存在且可解析
    let options = LoadOptions {
        allow_fallback: false,
    };
    let result = PeakDataset::load_with(Some(input.as_path()), options)
        .and_then(|ds| render_dataset(&ds, &output_file, &config.render));

    match result {
        Ok(()) => ProcessResult::Success(output_file.display().to_string()),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 按格式输出一个数据集
fn render_dataset(dataset: &PeakDataset, output: &Path, render: &RenderConfig) -> Result<()> {
    match render.format {
        OutputFormat::Png | OutputFormat::Svg => {
            if render.compare {
                xrd::plot::generate_comparison_plot(dataset, output, &render.chart)
            } else {
                xrd::plot::generate_pattern_plot(dataset, output, &render.chart)
            }
        }
        OutputFormat::Csv => xrd::export::to_csv(dataset, output),
        OutputFormat::Xy => xrd::export::to_xy(dataset, output),
    }
}

fn format_range(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{:.2} - {:.2}", lo, hi),
        _ => "-".to_string(),
    }
}
