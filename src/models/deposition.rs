//! # USP 沉积过程数据模型
//!
//! 定义超声喷雾热解 (USP) 的工艺参数、参数字段及模拟结果。
//!
//! ## 依赖关系
//! - 被 `usp/model.rs` 使用
//! - 被 `cli/usp.rs`, `commands/usp.rs` 使用

use crate::error::{MataiError, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// USP 工艺参数字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    /// 衬底温度 (°C)
    Temperature,
    /// 超声频率 (MHz)
    Frequency,
    /// 沉积时间 (min)
    Time,
    /// 前驱体浓度 (mol/L)
    Concentration,
    /// 载气流量 (mL/min)
    FlowRate,
}

impl ParameterField {
    /// 校验顺序
    pub const ALL: [ParameterField; 5] = [
        ParameterField::Temperature,
        ParameterField::Frequency,
        ParameterField::Time,
        ParameterField::Concentration,
        ParameterField::FlowRate,
    ];

    /// 字段名（与错误信息、配置键一致）
    pub fn name(&self) -> &'static str {
        match self {
            ParameterField::Temperature => "temperature_c",
            ParameterField::Frequency => "frequency_mhz",
            ParameterField::Time => "time_min",
            ParameterField::Concentration => "concentration_mol_l",
            ParameterField::FlowRate => "flow_rate_ml_min",
        }
    }

    /// 单位
    pub fn unit(&self) -> &'static str {
        match self {
            ParameterField::Temperature => "°C",
            ParameterField::Frequency => "MHz",
            ParameterField::Time => "min",
            ParameterField::Concentration => "mol/L",
            ParameterField::FlowRate => "mL/min",
        }
    }

    /// 合法取值范围
    pub fn range(&self) -> RangeInclusive<f64> {
        match self {
            ParameterField::Temperature => 400.0..=500.0,
            ParameterField::Frequency => 1.0..=2.5,
            ParameterField::Time => 5.0..=30.0,
            ParameterField::Concentration => 0.05..=0.3,
            ParameterField::FlowRate => 1.0..=8.0,
        }
    }

    /// 校验单个取值
    pub fn check(&self, value: f64) -> Result<()> {
        let range = self.range();
        if !value.is_finite() || !range.contains(&value) {
            return Err(MataiError::invalid_parameter(
                self.name(),
                value,
                format!(
                    "must lie in [{}, {}] {}",
                    range.start(),
                    range.end(),
                    self.unit()
                ),
            ));
        }
        Ok(())
    }

    /// 在 `[from, to]` 内生成 `steps` 个等距取值；区间必须落在合法范围内
    pub fn linspace(&self, from: f64, to: f64, steps: usize) -> Result<Vec<f64>> {
        self.check(from)?;
        self.check(to)?;
        if to < from {
            return Err(MataiError::InvalidArgument(format!(
                "Sweep range for {} is reversed: {} > {}",
                self.name(),
                from,
                to
            )));
        }

        Ok(linspace(from, to, steps))
    }

    /// 读取参数中对应字段
    pub fn get(&self, params: &DepositionParameters) -> f64 {
        match self {
            ParameterField::Temperature => params.temperature_c,
            ParameterField::Frequency => params.frequency_mhz,
            ParameterField::Time => params.time_min,
            ParameterField::Concentration => params.concentration_mol_l,
            ParameterField::FlowRate => params.flow_rate_ml_min,
        }
    }

    /// 返回替换该字段后的参数副本
    pub fn with(&self, params: &DepositionParameters, value: f64) -> DepositionParameters {
        let mut p = *params;
        match self {
            ParameterField::Temperature => p.temperature_c = value,
            ParameterField::Frequency => p.frequency_mhz = value,
            ParameterField::Time => p.time_min = value,
            ParameterField::Concentration => p.concentration_mol_l = value,
            ParameterField::FlowRate => p.flow_rate_ml_min = value,
        }
        p
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 含端点的等距采样
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// USP 工艺参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositionParameters {
    /// 衬底温度 (°C)，[400, 500]
    pub temperature_c: f64,
    /// 超声频率 (MHz)，[1.0, 2.5]
    pub frequency_mhz: f64,
    /// 沉积时间 (min)，[5, 30]
    pub time_min: f64,
    /// 前驱体浓度 (mol/L)，[0.05, 0.3]
    pub concentration_mol_l: f64,
    /// 载气流量 (mL/min)，[1, 8]；不参与曲线计算
    pub flow_rate_ml_min: f64,
}

impl Default for DepositionParameters {
    fn default() -> Self {
        Self {
            temperature_c: 450.0,
            frequency_mhz: 1.7,
            time_min: 15.0,
            concentration_mol_l: 0.1,
            flow_rate_ml_min: 3.0,
        }
    }
}

impl DepositionParameters {
    /// 按字段顺序校验，返回第一个越界字段的错误
    pub fn validate(&self) -> Result<()> {
        for field in ParameterField::ALL {
            field.check(field.get(self))?;
        }
        Ok(())
    }
}

/// 质量评分分解
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityBreakdown {
    pub temperature: f64,
    pub frequency: f64,
    pub time: f64,
    pub concentration: f64,
    /// 四项平均，[0, 100]
    pub total: f64,
}

/// USP 模拟结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositionResult {
    /// 时间点 (min)，从 0 到 time_min 等距
    pub time_points: Vec<f64>,
    /// 膜厚 (nm)
    pub thickness: Vec<f64>,
    /// 结晶度 (%)
    pub crystallinity: Vec<f64>,
    /// 表面粗糙度 (nm)
    pub roughness: Vec<f64>,
    /// 质量评分 [0, 100]
    pub quality_score: f64,
}

impl DepositionResult {
    /// 采样点数
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// 终点膜厚
    pub fn final_thickness(&self) -> f64 {
        self.thickness.last().copied().unwrap_or(0.0)
    }

    /// 终点结晶度
    pub fn final_crystallinity(&self) -> f64 {
        self.crystallinity.last().copied().unwrap_or(0.0)
    }

    /// 终点粗糙度
    pub fn final_roughness(&self) -> f64 {
        self.roughness.last().copied().unwrap_or(0.0)
    }

    /// 按时间点遍历 (t, thickness, crystallinity, roughness)
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.time_points
            .iter()
            .zip(&self.thickness)
            .zip(&self.crystallinity)
            .zip(&self.roughness)
            .map(|(((t, th), c), r)| (*t, *th, *c, *r))
    }
}
