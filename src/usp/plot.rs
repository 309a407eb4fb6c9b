//! # USP 模拟图表
//!
//! 三个纵向子图：膜厚、结晶度、粗糙度随时间变化，标题中给出质量评分。
//!
//! ## 依赖关系
//! - 被 `commands/usp.rs` 调用
//! - 使用 `models/deposition.rs` 的 DepositionResult
//! - 使用 `plotters` 渲染图表

use crate::error::{MataiError, Result};
use crate::models::DepositionResult;
use crate::utils::chart::{plot_err, ChartOptions};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// 生成 USP 模拟曲线图
pub fn generate_deposition_plot(
    result: &DepositionResult,
    output_path: &Path,
    options: &ChartOptions,
) -> Result<()> {
    if result.is_empty() {
        return Err(MataiError::Plot("simulation has no time points".to_string()));
    }

    if options.svg {
        let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_panels(&root, result, options)?;
        root.present().map_err(plot_err)?;
    } else {
        let root =
            BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_panels(&root, result, options)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    result: &DepositionResult,
    options: &ChartOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let base = if options.title.is_empty() {
        "USP Deposition Simulation"
    } else {
        options.title.as_str()
    };
    let title = format!("{} (quality {:.1}/100)", base, result.quality_score);
    let root = root
        .titled(&title, ("sans-serif", 26).into_font())
        .map_err(plot_err)?;

    let panels = root.split_evenly((3, 1));
    let series: [(&str, &str, &[f64], RGBColor); 3] = [
        ("Film Thickness", "Thickness (nm)", &result.thickness, RGBColor(0, 102, 204)),
        ("Crystallinity", "Crystallinity (%)", &result.crystallinity, RGBColor(0, 153, 76)),
        ("Surface Roughness", "Roughness (nm)", &result.roughness, RGBColor(204, 85, 0)),
    ];

    let t_max = result.time_points.last().copied().unwrap_or(1.0);

    for (panel, (caption, y_desc, values, color)) in panels.iter().zip(series) {
        let (y_min, y_max) = value_range(values);

        let mut chart = ChartBuilder::on(panel)
            .caption(caption, ("sans-serif", 18).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..t_max, y_min..y_max)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("Time (min)")
            .y_desc(y_desc)
            .x_label_style(("sans-serif", 13))
            .y_label_style(("sans-serif", 13))
            .axis_desc_style(("sans-serif", 15))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(LineSeries::new(
                result.time_points.iter().copied().zip(values.iter().copied()),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?;
    }

    Ok(())
}

/// 带 10% 边距的纵轴范围
fn value_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let margin = ((max - min) * 0.1).max(0.5);
    (min - margin, max + margin)
}
