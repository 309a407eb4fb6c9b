//! # USP 模拟结果导出
//!
//! 将时间序列写为 CSV：`time_min,thickness_nm,crystallinity_pct,roughness_nm`。
//!
//! ## 依赖关系
//! - 被 `commands/usp.rs` 调用
//! - 使用 `csv` 库写入

use crate::error::{MataiError, Result};
use crate::models::DepositionResult;

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 导出为 CSV 文件
pub fn to_csv(result: &DepositionResult, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| MataiError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    write_csv(result, file)
}

/// 写入 CSV 到任意 writer
pub fn write_csv<W: Write>(result: &DepositionResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["time_min", "thickness_nm", "crystallinity_pct", "roughness_nm"])?;

    for (t, thickness, crystallinity, roughness) in result.rows() {
        wtr.write_record(&[
            format!("{:.4}", t),
            format!("{:.6}", thickness),
            format!("{:.6}", crystallinity),
            format!("{:.6}", roughness),
        ])?;
    }

    wtr.flush().map_err(|e| MataiError::FileWriteError {
        path: "csv output".to_string(),
        source: e,
    })?;

    Ok(())
}
