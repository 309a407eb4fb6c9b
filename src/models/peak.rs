//! # 衍射峰数据模型
//!
//! 定义样品标签、单个衍射峰记录以及按样品的统计摘要。
//!
//! ## 依赖关系
//! - 被 `xrd/dataset.rs`, `xrd/scherrer.rs` 使用
//! - 被 `commands/xrd.rs` 使用

use crate::error::{MataiError, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 样品标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sample {
    /// 纯 ZnO
    #[serde(rename = "ZnO")]
    ZnO,
    /// Mg 掺杂 ZnO (0.08 mol)
    #[serde(rename = "ZnO:Mg")]
    ZnOMg,
}

impl Sample {
    /// 所有已知样品（分组顺序）
    pub const ALL: [Sample; 2] = [Sample::ZnO, Sample::ZnOMg];

    /// 数据表中使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            Sample::ZnO => "ZnO",
            Sample::ZnOMg => "ZnO:Mg",
        }
    }

    /// 图表中使用的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Sample::ZnO => "ZnO Pure",
            Sample::ZnOMg => "ZnO:Mg Doped",
        }
    }

    /// 按标签查找，未知标签返回 `None`
    pub fn from_label(label: &str) -> Option<Sample> {
        match label.trim() {
            "ZnO" => Some(Sample::ZnO),
            "ZnO:Mg" => Some(Sample::ZnOMg),
            _ => None,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Sample {
    type Err = MataiError;

    fn from_str(s: &str) -> Result<Self> {
        Sample::from_label(s).ok_or_else(|| {
            MataiError::InvalidArgument(format!(
                "Unknown sample '{}'. Known samples: ZnO, ZnO:Mg",
                s
            ))
        })
    }
}

/// 衍射峰记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    /// 样品
    pub sample: Sample,
    /// Miller 指数 h
    pub h: i32,
    /// Miller 指数 k
    pub k: i32,
    /// Miller 指数 l
    pub l: i32,
    /// 衍射角 2θ（度）
    pub two_theta: f64,
    /// d 间距（Å）
    pub d_spacing: f64,
    /// 强度（a.u.）
    pub intensity: f64,
}

impl PeakRecord {
    /// 创建并校验衍射峰记录
    pub fn new(
        sample: Sample,
        (h, k, l): (i32, i32, i32),
        two_theta: f64,
        d_spacing: f64,
        intensity: f64,
    ) -> Result<Self> {
        let record = PeakRecord {
            sample,
            h,
            k,
            l,
            two_theta,
            d_spacing,
            intensity,
        };
        record.validate()?;
        Ok(record)
    }

    /// 校验数值范围：0 < 2θ < 180, d > 0, I >= 0
    pub fn validate(&self) -> Result<()> {
        if !self.two_theta.is_finite() || self.two_theta <= 0.0 || self.two_theta >= 180.0 {
            return Err(MataiError::invalid_parameter(
                "two_theta",
                self.two_theta,
                "must lie in (0, 180) degrees",
            ));
        }
        if !self.d_spacing.is_finite() || self.d_spacing <= 0.0 {
            return Err(MataiError::invalid_parameter(
                "d_spacing",
                self.d_spacing,
                "must be > 0 Å",
            ));
        }
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(MataiError::invalid_parameter(
                "intensity",
                self.intensity,
                "must be >= 0",
            ));
        }
        Ok(())
    }

    /// Bragg 角 θ（弧度）
    pub fn theta_rad(&self) -> f64 {
        (self.two_theta / 2.0).to_radians()
    }

    /// 格式化 Miller 指数，如 `(1 0 1)`
    pub fn hkl(&self) -> String {
        format!("({} {} {})", self.h, self.k, self.l)
    }
}

/// 单个样品的统计摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakSummary {
    /// 峰数
    pub peak_count: usize,
    /// 最大强度，无峰时为 0
    pub max_intensity: f64,
    /// 最小 2θ，无峰时为 `None`
    pub min_angle: Option<f64>,
    /// 最大 2θ，无峰时为 `None`
    pub max_angle: Option<f64>,
}

impl PeakSummary {
    /// 从一组记录计算摘要
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PeakRecord>,
    {
        let mut summary = PeakSummary {
            peak_count: 0,
            max_intensity: 0.0,
            min_angle: None,
            max_angle: None,
        };

        for r in records {
            summary.peak_count += 1;
            summary.max_intensity = summary.max_intensity.max(r.intensity);
            summary.min_angle = Some(summary.min_angle.map_or(r.two_theta, |a| a.min(r.two_theta)));
            summary.max_angle = Some(summary.max_angle.map_or(r.two_theta, |a| a.max(r.two_theta)));
        }

        summary
    }
}
