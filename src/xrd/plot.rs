//! # XRD 图表生成
//!
//! 使用 `plotters` 库绘制 XRD 峰数据。
//!
//! ## 功能
//! - 分样品的衍射图谱（每个样品一个子图）
//! - ZnO / ZnO:Mg 叠加对比图
//! - 可选最强峰 hkl 标注
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/xrd.rs` 调用
//! - 使用 `xrd/dataset.rs` 的 PeakDataset
//! - 使用 `utils/chart.rs` 的 ChartOptions

use crate::error::{MataiError, Result};
use crate::models::{PeakRecord, Sample};
use crate::utils::chart::{plot_err, ChartOptions};
use crate::xrd::PeakDataset;

use plotters::chart::SeriesAnno;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 标注的最强峰数
const LABEL_COUNT: usize = 3;

/// 样品配色
fn sample_color(sample: Sample) -> RGBColor {
    match sample {
        Sample::ZnO => RGBColor(0, 170, 200),
        Sample::ZnOMg => RGBColor(200, 0, 160),
    }
}

/// 生成分样品衍射图谱
pub fn generate_pattern_plot(
    dataset: &PeakDataset,
    output_path: &Path,
    options: &ChartOptions,
) -> Result<()> {
    ensure_not_empty(dataset)?;

    if options.svg {
        let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_patterns(&root, dataset, options)?;
        root.present().map_err(plot_err)?;
    } else {
        let root =
            BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_patterns(&root, dataset, options)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 生成叠加对比图
pub fn generate_comparison_plot(
    dataset: &PeakDataset,
    output_path: &Path,
    options: &ChartOptions,
) -> Result<()> {
    ensure_not_empty(dataset)?;

    if options.svg {
        let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_comparison(&root, dataset, options)?;
        root.present().map_err(plot_err)?;
    } else {
        let root =
            BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_comparison(&root, dataset, options)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn ensure_not_empty(dataset: &PeakDataset) -> Result<()> {
    if dataset.is_empty() {
        return Err(MataiError::Plot("dataset contains no peaks".to_string()));
    }
    Ok(())
}

/// 2θ 与强度坐标范围
fn axis_ranges<'a, I>(records: I) -> ((f64, f64), f64)
where
    I: IntoIterator<Item = &'a PeakRecord>,
{
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_max: f64 = 0.0;

    for r in records {
        x_min = x_min.min(r.two_theta);
        x_max = x_max.max(r.two_theta);
        y_max = y_max.max(r.intensity);
    }

    if !x_min.is_finite() {
        return ((5.0, 90.0), 1.0);
    }
    let y_top = if y_max > 0.0 { y_max * 1.15 } else { 1.0 };
    ((x_min.floor() - 2.0, x_max.ceil() + 2.0), y_top)
}

/// 每个样品一个子图
fn draw_patterns<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dataset: &PeakDataset,
    options: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let title = if options.title.is_empty() {
        "XRD Diffraction Patterns"
    } else {
        options.title.as_str()
    };
    let root = root
        .titled(title, ("sans-serif", 28).into_font())
        .map_err(plot_err)?;

    let samples = dataset.samples();
    let panels = root.split_evenly((samples.len(), 1));

    for (panel, sample) in panels.iter().zip(samples) {
        let records = dataset.records(sample);
        let ((x_min, x_max), y_max) = axis_ranges(records);
        let color = sample_color(sample);

        let mut chart = ChartBuilder::on(panel)
            .caption(sample.display_name(), ("sans-serif", 20).into_font())
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("2θ (°)")
            .y_desc("Intensity (a.u.)")
            .x_label_style(("sans-serif", 14))
            .y_label_style(("sans-serif", 14))
            .axis_desc_style(("sans-serif", 16))
            .draw()
            .map_err(plot_err)?;

        draw_sample_series(&mut chart, records, color)?;

        if options.label_peaks {
            draw_peak_labels(&mut chart, records, y_max)?;
        }
    }

    Ok(())
}

/// 叠加对比图
fn draw_comparison<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dataset: &PeakDataset,
    options: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let title = if options.title.is_empty() {
        "XRD Pattern Comparison: Doping Effect"
    } else {
        options.title.as_str()
    };

    let ((x_min, x_max), y_max) = axis_ranges(dataset.iter());

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("2θ (°)")
        .y_desc("Intensity (a.u.)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    for sample in dataset.samples() {
        let records = dataset.records(sample);
        let color = sample_color(sample);

        draw_sample_series(&mut chart, records, color)?
            .label(sample.display_name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));

        if options.label_peaks {
            draw_peak_labels(&mut chart, records, y_max)?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

type XrdChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// 折线 + 数据点，返回折线的 series 句柄用于图例
fn draw_sample_series<'a, 'b, DB: DrawingBackend + 'a>(
    chart: &'b mut XrdChart<'a, DB>,
    records: &[PeakRecord],
    color: RGBColor,
) -> Result<&'b mut SeriesAnno<'a, DB>>
where
    DB::ErrorType: 'static,
{
    chart
        .draw_series(
            records
                .iter()
                .map(|r| Circle::new((r.two_theta, r.intensity), 4, color.filled())),
        )
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.two_theta, r.intensity)),
            color.stroke_width(2),
        ))
        .map_err(plot_err)
}

/// 标注最强的几个峰
fn draw_peak_labels<DB: DrawingBackend>(
    chart: &mut XrdChart<'_, DB>,
    records: &[PeakRecord],
    y_max: f64,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let mut strongest: Vec<&PeakRecord> = records.iter().collect();
    strongest.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));

    let offset = y_max * 0.03;
    for r in strongest.into_iter().take(LABEL_COUNT) {
        chart
            .draw_series(std::iter::once(Text::new(
                r.hkl(),
                (r.two_theta, r.intensity + offset),
                ("sans-serif", 12).into_font().color(&BLACK),
            )))
            .map_err(plot_err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ranges() {
        let ds = PeakDataset::fallback();
        let ((x_min, x_max), y_max) = axis_ranges(ds.records(Sample::ZnO));
        assert_eq!(x_min, 29.0);
        assert_eq!(x_max, 92.0);
        assert!((y_max - 937.5 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_axis_ranges_empty() {
        let ((x_min, x_max), y_max) = axis_ranges(std::iter::empty());
        assert_eq!((x_min, x_max, y_max), (5.0, 90.0, 1.0));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let ds = PeakDataset::from_records(Vec::new()).unwrap();
        let err = generate_comparison_plot(&ds, Path::new("unused.svg"), &ChartOptions::default())
            .unwrap_err();
        assert!(matches!(err, MataiError::Plot(_)));
    }
}
