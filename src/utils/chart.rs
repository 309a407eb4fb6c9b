//! # 图表公共设置
//!
//! XRD 与 USP 图表共用的输出选项、格式推断与错误转换。
//!
//! ## 依赖关系
//! - 被 `xrd/plot.rs`, `usp/plot.rs` 使用
//! - 被 `commands/` 使用

use crate::error::MataiError;

use std::path::Path;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG 位图
    Png,
    /// SVG 矢量图
    Svg,
    /// CSV 数据文件
    Csv,
    /// XY 数据文件
    Xy,
}

impl OutputFormat {
    /// 从文件扩展名推断输出格式，未知扩展名默认 PNG
    pub fn from_extension(path: &Path) -> OutputFormat {
        Self::from_known_extension(path).unwrap_or(OutputFormat::Png)
    }

    /// 仅识别已知扩展名
    pub fn from_known_extension(path: &Path) -> Option<OutputFormat> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("png") => Some(OutputFormat::Png),
            Some("svg") => Some(OutputFormat::Svg),
            Some("csv") => Some(OutputFormat::Csv),
            Some("xy") | Some("dat") | Some("txt") => Some(OutputFormat::Xy),
            _ => None,
        }
    }

    /// 对应文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Csv => "csv",
            OutputFormat::Xy => "xy",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Svg)
    }
}

/// 图表选项
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub svg: bool,
    /// 标注最强峰的 (hkl)
    pub label_peaks: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 1200,
            height: 800,
            svg: false,
            label_peaks: false,
        }
    }
}

/// plotters 错误转换
pub fn plot_err<E: std::fmt::Debug>(e: E) -> MataiError {
    MataiError::Plot(format!("{:?}", e))
}
