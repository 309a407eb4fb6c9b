//! # 内置 XRD 峰表
//!
//! 数据文件缺失时使用的 ZnO / ZnO:Mg 衍射峰数据（13 + 12 个峰）。
//!
//! ## 依赖关系
//! - 被 `xrd/dataset.rs` 使用

use crate::models::{PeakRecord, Sample};

/// 一行峰数据：(h, k, l, 2θ, d, I)
type Row = (i32, i32, i32, f64, f64, f64);

const ZNO: [Row; 13] = [
    (1, 0, 0, 31.77, 2.809, 267.1),
    (0, 0, 2, 34.43, 2.599, 881.4),
    (1, 0, 1, 36.27, 2.472, 937.5),
    (1, 0, 2, 47.58, 1.908, 250.1),
    (1, 1, 0, 56.65, 1.622, 106.5),
    (1, 0, 3, 62.93, 1.475, 233.7),
    (2, 0, 0, 66.45, 1.405, 52.81),
    (1, 1, 2, 68.03, 1.376, 173.9),
    (2, 0, 1, 69.17, 1.356, 87.51),
    (0, 0, 4, 72.67, 1.299, 60.31),
    (2, 0, 2, 77.07, 1.236, 55.08),
    (1, 0, 4, 81.51, 1.179, 63.01),
    (2, 0, 3, 89.77, 1.091, 76.41),
];

const ZNO_MG: [Row; 12] = [
    (1, 0, 0, 31.84, 2.811, 155.9),
    (0, 0, 2, 34.61, 2.591, 1140.0),
    (1, 0, 1, 36.36, 2.471, 346.6),
    (1, 0, 2, 47.72, 1.905, 136.6),
    (1, 1, 0, 56.71, 1.623, 75.88),
    (1, 0, 3, 63.15, 1.472, 130.8),
    (2, 0, 0, 66.51, 1.405, 69.71),
    (1, 1, 2, 68.15, 1.375, 107.1),
    (2, 0, 1, 69.24, 1.356, 57.24),
    (0, 0, 4, 72.99, 1.295, 78.01),
    (2, 0, 2, 77.18, 1.235, 48.85),
    (1, 0, 4, 81.82, 1.177, 50.47),
];

/// 内置峰表，按样品分组、组内 2θ 升序
pub fn records() -> Vec<PeakRecord> {
    let rows = ZNO
        .iter()
        .map(|r| (Sample::ZnO, r))
        .chain(ZNO_MG.iter().map(|r| (Sample::ZnOMg, r)));

    rows.map(|(sample, &(h, k, l, two_theta, d_spacing, intensity))| PeakRecord {
        sample,
        h,
        k,
        l,
        two_theta,
        d_spacing,
        intensity,
    })
    .collect()
}
