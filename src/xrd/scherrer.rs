//! # Scherrer 晶粒尺寸计算
//!
//! 由衍射峰展宽估算晶粒尺寸：
//!
//! ```text
//! D = K·λ / (β·cos θ)
//! ```
//!
//! 其中 K 为形状因子（默认 0.9），λ 为 X 射线波长（默认 Cu Kα1 = 1.5406 Å），
//! β 为半高宽 FWHM（弧度），θ 为 Bragg 角（2θ/2）。结果单位与 λ 相同（Å）。
//!
//! ## 依赖关系
//! - 被 `commands/xrd.rs` 调用
//! - 使用 `models/peak.rs` 的 PeakRecord, Sample
//! - 使用 `xrd/dataset.rs` 的 PeakDataset

use crate::error::{MataiError, Result};
use crate::models::{PeakRecord, Sample};
use crate::xrd::PeakDataset;

/// Cu Kα1 波长（Å）
pub const CU_KA1: f64 = 1.5406;

/// 球形晶粒的 Scherrer 形状因子
pub const SHAPE_FACTOR: f64 = 0.9;

/// 以默认常数计算单个峰的晶粒尺寸（Å）
///
/// `instrumental_broadening` 为 FWHM（弧度），必须为正。
pub fn crystallite_size(record: &PeakRecord, instrumental_broadening: f64) -> Result<f64> {
    ScherrerCalculator::default().crystallite_size(record, instrumental_broadening)
}

/// 埃转纳米
pub fn angstrom_to_nm(value: f64) -> f64 {
    value / 10.0
}

/// 预定义辐射源波长 (Å)
pub fn predefined_wavelength(name: &str) -> Option<f64> {
    match name.to_lowercase().as_str() {
        "cu-ka" | "cuka" => Some(1.5418),
        "cu-ka1" | "cuka1" => Some(CU_KA1),
        "cu-ka2" | "cuka2" => Some(1.5444),
        "cu-kb1" | "cukb1" => Some(1.3922),
        "mo-ka" | "moka" => Some(0.7107),
        "mo-ka1" | "moka1" => Some(0.7093),
        "co-ka" | "coka" => Some(1.7903),
        "fe-ka" | "feka" => Some(1.9373),
        "cr-ka" | "crka" => Some(2.2910),
        "ag-ka" | "agka" => Some(0.5609),
        _ => None,
    }
}

/// 解析波长输入（辐射源名称或数值）
pub fn parse_wavelength(input: &str) -> Result<f64> {
    if let Some(wl) = predefined_wavelength(input.trim()) {
        return Ok(wl);
    }
    input.trim().parse::<f64>().map_err(|_| {
        MataiError::InvalidArgument(format!(
            "Invalid wavelength '{}'. Use a number in Å (e.g., 1.5406) or a name: cu-ka1, cu-ka, mo-ka, co-ka, fe-ka, cr-ka, ag-ka",
            input
        ))
    })
}

/// Scherrer 计算器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScherrerCalculator {
    /// X 射线波长（Å）
    wavelength: f64,
    /// 形状因子 K
    shape_factor: f64,
}

impl Default for ScherrerCalculator {
    fn default() -> Self {
        Self {
            wavelength: CU_KA1,
            shape_factor: SHAPE_FACTOR,
        }
    }
}

impl ScherrerCalculator {
    /// 创建新的计算器
    pub fn new(wavelength: f64, shape_factor: f64) -> Result<Self> {
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(MataiError::invalid_parameter(
                "wavelength",
                wavelength,
                "must be > 0 Å",
            ));
        }
        if !shape_factor.is_finite() || shape_factor <= 0.0 {
            return Err(MataiError::invalid_parameter(
                "shape_factor",
                shape_factor,
                "must be > 0",
            ));
        }
        Ok(Self {
            wavelength,
            shape_factor,
        })
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn shape_factor(&self) -> f64 {
        self.shape_factor
    }

    /// 单个峰的晶粒尺寸（Å）
    pub fn crystallite_size(&self, record: &PeakRecord, fwhm_rad: f64) -> Result<f64> {
        if !fwhm_rad.is_finite() || fwhm_rad <= 0.0 {
            return Err(MataiError::invalid_parameter(
                "instrumental_broadening",
                fwhm_rad,
                "FWHM must be > 0 radians",
            ));
        }

        // 字段为 pub，需重新校验以保证 cos θ > 0
        record.validate()?;
        let cos_theta = record.theta_rad().cos();
        Ok(self.shape_factor * self.wavelength / (fwhm_rad * cos_theta))
    }

    /// 一组峰的平均晶粒尺寸（Å），空集返回 `None`
    pub fn mean_crystallite_size(
        &self,
        records: &[PeakRecord],
        fwhm_rad: f64,
    ) -> Result<Option<f64>> {
        if records.is_empty() {
            return Ok(None);
        }

        let mut total = 0.0;
        for r in records {
            total += self.crystallite_size(r, fwhm_rad)?;
        }
        Ok(Some(total / records.len() as f64))
    }

    /// 生成数据集对比指标
    pub fn compare(&self, dataset: &PeakDataset, fwhm_rad: f64) -> Result<ComparisonMetrics> {
        let mut samples = Vec::with_capacity(Sample::ALL.len());

        for sample in Sample::ALL {
            let summary = dataset.summary(sample);
            let size = self.mean_crystallite_size(dataset.records(sample), fwhm_rad)?;
            samples.push(SampleMetrics {
                sample,
                peak_count: summary.peak_count,
                max_intensity: summary.max_intensity,
                crystallite_nm: size.map(angstrom_to_nm),
            });
        }

        let overview = dataset.overview();
        Ok(ComparisonMetrics {
            samples,
            total_peaks: overview.total_peaks,
            max_intensity: overview.max_intensity,
        })
    }
}

/// 单个样品的对比指标
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMetrics {
    pub sample: Sample,
    pub peak_count: usize,
    pub max_intensity: f64,
    /// 平均晶粒尺寸（nm），无峰时为 `None`
    pub crystallite_nm: Option<f64>,
}

/// ZnO 与 ZnO:Mg 的对比指标
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonMetrics {
    pub samples: Vec<SampleMetrics>,
    pub total_peaks: usize,
    pub max_intensity: f64,
}

impl ComparisonMetrics {
    /// 某样品的指标
    pub fn get(&self, sample: Sample) -> Option<&SampleMetrics> {
        self.samples.iter().find(|m| m.sample == sample)
    }

    /// 掺杂后晶粒尺寸的相对变化（%）
    pub fn crystallite_change_pct(&self) -> Option<f64> {
        let zno = self.get(Sample::ZnO)?.crystallite_nm?;
        let mg = self.get(Sample::ZnOMg)?.crystallite_nm?;
        Some((mg - zno) / zno * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(two_theta: f64) -> PeakRecord {
        PeakRecord::new(Sample::ZnO, (1, 0, 1), two_theta, 2.472, 937.5).unwrap()
    }

    #[test]
    fn test_known_value() {
        let r = peak(36.27);
        let fwhm = 0.2_f64.to_radians();
        let expected = 0.9 * 1.5406 / (fwhm * (36.27_f64 / 2.0).to_radians().cos());

        let size = crystallite_size(&r, fwhm).unwrap();
        assert!((size - expected).abs() < 1e-9);
        // 0.2° 展宽对应约 40 nm 量级
        assert!(angstrom_to_nm(size) > 30.0 && angstrom_to_nm(size) < 50.0);
    }

    #[test]
    fn test_monotonic_in_fwhm() {
        let r = peak(47.58);
        let sizes: Vec<f64> = [0.001, 0.002, 0.005, 0.01, 0.05]
            .iter()
            .map(|&b| crystallite_size(&r, b).unwrap())
            .collect();
        assert!(sizes.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_non_positive_fwhm_rejected() {
        let r = peak(36.27);
        for bad in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let err = crystallite_size(&r, bad).unwrap_err();
            assert_eq!(err.field(), Some("instrumental_broadening"));
        }
    }

    #[test]
    fn test_unvalidated_record_rejected() {
        for bad in [180.0, 200.0, -10.0, f64::NAN] {
            let r = PeakRecord {
                two_theta: bad,
                ..peak(36.27)
            };
            let err = crystallite_size(&r, 0.003).unwrap_err();
            assert_eq!(err.field(), Some("two_theta"));
        }
    }

    #[test]
    fn test_calculator_validation() {
        assert_eq!(
            ScherrerCalculator::new(0.0, 0.9).unwrap_err().field(),
            Some("wavelength")
        );
        assert_eq!(
            ScherrerCalculator::new(1.5406, -1.0).unwrap_err().field(),
            Some("shape_factor")
        );
        assert_eq!(
            ScherrerCalculator::new(CU_KA1, SHAPE_FACTOR).unwrap(),
            ScherrerCalculator::default()
        );
    }

    #[test]
    fn test_parse_wavelength() {
        assert_eq!(parse_wavelength("cu-ka1").unwrap(), CU_KA1);
        assert_eq!(parse_wavelength("Mo-Ka").unwrap(), 0.7107);
        assert_eq!(parse_wavelength(" 0.424589 ").unwrap(), 0.424589);
        assert!(parse_wavelength("tungsten").is_err());
    }

    #[test]
    fn test_mean_of_empty_is_none() {
        let calc = ScherrerCalculator::default();
        assert_eq!(calc.mean_crystallite_size(&[], 0.003).unwrap(), None);
    }

    #[test]
    fn test_compare_fallback() {
        let ds = PeakDataset::fallback();
        let fwhm = 0.2_f64.to_radians();
        let metrics = ScherrerCalculator::default().compare(&ds, fwhm).unwrap();

        assert_eq!(metrics.total_peaks, 25);
        assert_eq!(metrics.max_intensity, 1140.0);

        let zno = metrics.get(Sample::ZnO).unwrap();
        assert_eq!(zno.peak_count, 13);
        assert_eq!(zno.max_intensity, 937.5);
        assert!(zno.crystallite_nm.is_some());

        // 同一 FWHM 下两组尺寸仅由 cos θ 分布决定，差异很小
        let change = metrics.crystallite_change_pct().unwrap();
        assert!(change.abs() < 10.0);
    }

    #[test]
    fn test_change_absent_for_missing_sample() {
        let ds = PeakDataset::from_records(vec![peak(36.27)]).unwrap();
        let metrics = ScherrerCalculator::default().compare(&ds, 0.003).unwrap();
        assert!(metrics.get(Sample::ZnOMg).unwrap().crystallite_nm.is_none());
        assert!(metrics.crystallite_change_pct().is_none());
    }
}
