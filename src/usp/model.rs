//! # USP 沉积模型
//!
//! 超声喷雾热解薄膜生长的闭式模型。在 `[0, time_min]` 上等距取 100 个点：
//!
//! ```text
//! thickness(t)     = 50 · (1 − e^(−t/5)) · (T / 450)
//! crystallinity(t) = 30 + 40 · (1 − e^(−t/8)) · (f / 1.7)
//! roughness(t)     = 5 + 3 · sin(t/2) · e^(−t/10)
//! ```
//!
//! 质量评分为温度、频率、时间、浓度四项子分的平均值，每项反映与标称最优值的距离。
//!
//! ## 依赖关系
//! - 被 `commands/usp.rs` 调用
//! - 使用 `models/deposition.rs`
//! - 使用 `rayon` 并行执行参数扫描

use crate::error::Result;
use crate::models::deposition::linspace;
use crate::models::{DepositionParameters, DepositionResult, ParameterField, QualityBreakdown};

use log::debug;
use rayon::prelude::*;

/// 每条曲线的采样点数
pub const SAMPLE_COUNT: usize = 100;

/// 标称最优温度 (°C)
const OPTIMAL_TEMPERATURE: f64 = 450.0;
/// 标称最优频率 (MHz)
const OPTIMAL_FREQUENCY: f64 = 1.7;
/// 标称最优浓度 (mol/L)
const OPTIMAL_CONCENTRATION: f64 = 0.1;

/// 扫描中的单个点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// 被扫描字段的取值
    pub value: f64,
    pub quality_score: f64,
    pub final_thickness: f64,
    pub final_crystallinity: f64,
}

/// USP 沉积模型（无状态）
#[derive(Debug, Clone, Copy, Default)]
pub struct DepositionModel;

impl DepositionModel {
    pub fn new() -> Self {
        Self
    }

    /// 运行模拟
    pub fn simulate(&self, params: &DepositionParameters) -> Result<DepositionResult> {
        params.validate()?;

        let time_points = linspace(0.0, params.time_min, SAMPLE_COUNT);
        let thickness = time_points
            .iter()
            .map(|&t| thickness(t, params.temperature_c))
            .collect();
        let crystallinity = time_points
            .iter()
            .map(|&t| crystallinity(t, params.frequency_mhz))
            .collect();
        let roughness = time_points.iter().map(|&t| roughness(t)).collect();

        Ok(DepositionResult {
            time_points,
            thickness,
            crystallinity,
            roughness,
            quality_score: quality(params).total,
        })
    }

    /// 质量评分分解
    pub fn quality(&self, params: &DepositionParameters) -> Result<QualityBreakdown> {
        params.validate()?;
        Ok(quality(params))
    }

    /// 对单个字段做参数扫描，结果按输入顺序返回
    pub fn sweep(
        &self,
        base: &DepositionParameters,
        field: ParameterField,
        values: &[f64],
    ) -> Result<Vec<SweepPoint>> {
        // 先整体校验，避免部分计算后才失败
        for &v in values {
            field.with(base, v).validate()?;
        }
        debug!("Sweeping {} over {} values", field, values.len());

        values
            .par_iter()
            .map(|&value| {
                let result = self.simulate(&field.with(base, value))?;
                Ok(SweepPoint {
                    value,
                    quality_score: result.quality_score,
                    final_thickness: result.final_thickness(),
                    final_crystallinity: result.final_crystallinity(),
                })
            })
            .collect()
    }
}

/// 便捷函数：使用默认模型运行模拟
pub fn simulate(params: &DepositionParameters) -> Result<DepositionResult> {
    DepositionModel.simulate(params)
}

/// 膜厚 (nm)
fn thickness(t: f64, temperature_c: f64) -> f64 {
    50.0 * (1.0 - (-t / 5.0).exp()) * (temperature_c / OPTIMAL_TEMPERATURE)
}

/// 结晶度 (%)
fn crystallinity(t: f64, frequency_mhz: f64) -> f64 {
    30.0 + 40.0 * (1.0 - (-t / 8.0).exp()) * (frequency_mhz / OPTIMAL_FREQUENCY)
}

/// 表面粗糙度 (nm)
fn roughness(t: f64) -> f64 {
    5.0 + 3.0 * (t / 2.0).sin() * (-t / 10.0).exp()
}

fn quality(params: &DepositionParameters) -> QualityBreakdown {
    let temperature = (100.0 - (params.temperature_c - OPTIMAL_TEMPERATURE).abs() * 2.0).max(0.0);
    let frequency = (100.0 - (params.frequency_mhz - OPTIMAL_FREQUENCY).abs() * 30.0).max(0.0);
    let time = (params.time_min * 5.0).min(100.0);
    let concentration =
        (100.0 - (params.concentration_mol_l - OPTIMAL_CONCENTRATION).abs() * 200.0).max(0.0);

    QualityBreakdown {
        temperature,
        frequency,
        time,
        concentration,
        total: (temperature + frequency + time + concentration) / 4.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_simulation() {
        let result = simulate(&DepositionParameters::default()).unwrap();

        assert_eq!(result.len(), SAMPLE_COUNT);
        assert_eq!(result.thickness.len(), SAMPLE_COUNT);
        assert_eq!(result.crystallinity.len(), SAMPLE_COUNT);
        assert_eq!(result.roughness.len(), SAMPLE_COUNT);

        assert_eq!(result.time_points[0], 0.0);
        assert_eq!(*result.time_points.last().unwrap(), 15.0);

        assert_eq!(result.thickness[0], 0.0);
        assert_eq!(result.roughness[0], 5.0);
        assert_eq!(result.crystallinity[0], 30.0);

        assert!(result.quality_score >= 90.0 && result.quality_score <= 100.0);
        assert!((result.quality_score - 93.75).abs() < EPS);
    }

    #[test]
    fn test_quality_breakdown() {
        let q = DepositionModel
            .quality(&DepositionParameters::default())
            .unwrap();
        assert!((q.temperature - 100.0).abs() < EPS);
        assert!((q.frequency - 100.0).abs() < EPS);
        assert!((q.time - 75.0).abs() < EPS);
        assert!((q.concentration - 100.0).abs() < EPS);
    }

    #[test]
    fn test_quality_clipping() {
        let params = DepositionParameters {
            temperature_c: 400.0,
            frequency_mhz: 1.0,
            time_min: 30.0,
            concentration_mol_l: 0.3,
            flow_rate_ml_min: 1.0,
        };
        let q = DepositionModel.quality(&params).unwrap();
        assert!((q.temperature - 0.0).abs() < EPS);
        assert!((q.frequency - 79.0).abs() < 1e-6);
        assert_eq!(q.time, 100.0);
        assert!((q.concentration - 60.0).abs() < 1e-6);
        assert!(q.total >= 0.0 && q.total <= 100.0);
    }

    #[test]
    fn test_curves_monotonic() {
        let result = simulate(&DepositionParameters::default()).unwrap();
        assert!(result.thickness.windows(2).all(|w| w[1] >= w[0] - EPS));
        assert!(result.crystallinity.windows(2).all(|w| w[1] >= w[0] - EPS));
        // 饱和：后段增量小于前段
        let first = result.thickness[10] - result.thickness[0];
        let last = result.thickness[99] - result.thickness[89];
        assert!(last < first);
    }

    #[test]
    fn test_out_of_range_temperature() {
        let params = DepositionParameters {
            temperature_c: 600.0,
            ..Default::default()
        };
        let err = simulate(&params).unwrap_err();
        assert_eq!(err.field(), Some("temperature_c"));
    }

    #[test]
    fn test_flow_rate_does_not_affect_curves() {
        let a = simulate(&DepositionParameters::default()).unwrap();
        let b = simulate(&DepositionParameters {
            flow_rate_ml_min: 7.5,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_repeatable() {
        let params = DepositionParameters {
            temperature_c: 470.0,
            frequency_mhz: 2.1,
            time_min: 22.0,
            concentration_mol_l: 0.15,
            flow_rate_ml_min: 4.0,
        };
        let a = simulate(&params).unwrap();
        let b = simulate(&params).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.thickness.iter().zip(&b.thickness) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_sweep_preserves_order() {
        let field = ParameterField::Temperature;
        let values = field.linspace(400.0, 500.0, 11).unwrap();
        let points = DepositionModel
            .sweep(&DepositionParameters::default(), field, &values)
            .unwrap();

        assert_eq!(points.len(), 11);
        for (p, v) in points.iter().zip(&values) {
            assert_eq!(p.value, *v);
        }
        // 最优温度处评分最高
        let best = points
            .iter()
            .max_by(|a, b| a.quality_score.total_cmp(&b.quality_score))
            .unwrap();
        assert_eq!(best.value, 450.0);
    }

    #[test]
    fn test_sweep_rejects_invalid_value() {
        let err = DepositionModel
            .sweep(
                &DepositionParameters::default(),
                ParameterField::Frequency,
                &[1.5, 3.0],
            )
            .unwrap_err();
        assert_eq!(err.field(), Some("frequency_mhz"));
    }

    #[test]
    fn test_linspace() {
        let v = linspace(0.0, 15.0, 100);
        assert_eq!(v.len(), 100);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(v[99], 15.0);
    }
}
