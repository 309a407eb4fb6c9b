//! # XRD 数据导出
//!
//! 导出峰数据到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: 与输入相同的表结构 `Sample,H,K,L,2Theta,d_hkl,I`，可重新加载
//! - XY: 标准 XRD 数据交换格式（2θ, intensity），按样品分段
//!
//! ## 依赖关系
//! - 被 `commands/xrd.rs` 调用
//! - 使用 `xrd/dataset.rs` 的 PeakDataset
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{MataiError, Result};
use crate::xrd::PeakDataset;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 导出为 CSV（输入表结构）
pub fn to_csv(dataset: &PeakDataset, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| MataiError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    write_csv(dataset, file)?;
    Ok(())
}

/// 写入 CSV 到任意 writer
pub fn write_csv<W: Write>(dataset: &PeakDataset, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["Sample", "H", "K", "L", "2Theta", "d_hkl", "I"])?;

    for r in dataset.iter() {
        wtr.write_record(&[
            r.sample.label().to_string(),
            r.h.to_string(),
            r.k.to_string(),
            r.l.to_string(),
            r.two_theta.to_string(),
            r.d_spacing.to_string(),
            r.intensity.to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| MataiError::FileWriteError {
        path: "csv output".to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出为 XY 格式
pub fn to_xy(dataset: &PeakDataset, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| MataiError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    write_xy(dataset, BufWriter::new(file)).map_err(|e| MataiError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })
}

/// 写入 XY 到任意 writer
pub fn write_xy<W: Write>(dataset: &PeakDataset, mut out: W) -> std::io::Result<()> {
    writeln!(out, "# XRD Peaks: {}", dataset.source())?;
    writeln!(out, "# Columns: 2theta (degrees), Intensity (a.u.)")?;

    for sample in dataset.samples() {
        writeln!(out, "#")?;
        writeln!(out, "# Sample: {}", sample)?;
        for r in dataset.records(sample) {
            writeln!(out, "{:.4}\t{:.4}", r.two_theta, r.intensity)?;
        }
    }

    out.flush()
}
