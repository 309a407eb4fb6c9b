//! # TOML 配置文件
//!
//! 命令行参数较多时，可在配置文件中给出默认值，命令行参数优先：
//!
//! ```toml
//! # matai.toml
//! [dataset]
//! path = "dataset/xrd_zno_zno-mg.csv"
//! allow_fallback = true
//!
//! [scherrer]
//! wavelength = "cu-ka1"   # 辐射源名称或数值 (Å)
//! shape_factor = 0.9
//! fwhm_deg = 0.2
//!
//! [deposition]
//! temperature_c = 450.0
//! frequency_mhz = 1.7
//! ```
//!
//! ## 依赖关系
//! - 被 `main.rs` 和 `commands/` 使用
//! - 使用 `serde` + `toml` 解析

use crate::error::{MataiError, Result};
use crate::models::DepositionParameters;
use crate::xrd::scherrer;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 配置根结构
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub scherrer: ScherrerConfig,

    #[serde(default)]
    pub deposition: DepositionConfig,
}

/// 数据源配置
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// XRD 峰表 CSV 路径
    pub path: Option<PathBuf>,
    /// 文件缺失时是否使用内置峰表
    pub allow_fallback: Option<bool>,
}

/// 波长：辐射源名称或数值 (Å)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WavelengthSetting {
    Value(f64),
    Name(String),
}

impl WavelengthSetting {
    /// 解析为 Å
    pub fn resolve(&self) -> Result<f64> {
        match self {
            WavelengthSetting::Value(v) => Ok(*v),
            WavelengthSetting::Name(name) => scherrer::parse_wavelength(name),
        }
    }
}

/// Scherrer 计算配置
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScherrerConfig {
    pub wavelength: Option<WavelengthSetting>,
    pub shape_factor: Option<f64>,
    /// FWHM（度，2θ）
    pub fwhm_deg: Option<f64>,
}

/// USP 参数默认值
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositionConfig {
    pub temperature_c: Option<f64>,
    pub frequency_mhz: Option<f64>,
    pub time_min: Option<f64>,
    pub concentration_mol_l: Option<f64>,
    pub flow_rate_ml_min: Option<f64>,
}

impl DepositionConfig {
    /// 以配置覆盖内置默认参数
    pub fn parameters(&self) -> DepositionParameters {
        let d = DepositionParameters::default();
        DepositionParameters {
            temperature_c: self.temperature_c.unwrap_or(d.temperature_c),
            frequency_mhz: self.frequency_mhz.unwrap_or(d.frequency_mhz),
            time_min: self.time_min.unwrap_or(d.time_min),
            concentration_mol_l: self.concentration_mol_l.unwrap_or(d.concentration_mol_l),
            flow_rate_ml_min: self.flow_rate_ml_min.unwrap_or(d.flow_rate_ml_min),
        }
    }
}

impl Config {
    /// 读取配置文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MataiError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// 解析 TOML 字符串
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MataiError::ConfigError(e.to_string()))
    }

    /// 可选路径：未给出时使用默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [dataset]
            path = "dataset/xrd_zno_zno-mg.csv"
            allow_fallback = false

            [scherrer]
            wavelength = "cu-ka1"
            shape_factor = 0.94
            fwhm_deg = 0.25

            [deposition]
            temperature_c = 470.0
            frequency_mhz = 2.0
            time_min = 20
            concentration_mol_l = 0.12
            flow_rate_ml_min = 5.0
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(
            config.dataset.path.as_deref(),
            Some(Path::new("dataset/xrd_zno_zno-mg.csv"))
        );
        assert_eq!(config.dataset.allow_fallback, Some(false));
        assert_eq!(
            config.scherrer.wavelength.as_ref().unwrap().resolve().unwrap(),
            1.5406
        );
        assert_eq!(config.scherrer.shape_factor, Some(0.94));
        assert_eq!(config.scherrer.fwhm_deg, Some(0.25));

        let params = config.deposition.parameters();
        assert_eq!(params.temperature_c, 470.0);
        assert_eq!(params.time_min, 20.0);
        assert_eq!(params.flow_rate_ml_min, 5.0);
    }

    #[test]
    fn test_numeric_wavelength() {
        let config = Config::parse("[scherrer]\nwavelength = 0.7093\n").unwrap();
        assert_eq!(
            config.scherrer.wavelength,
            Some(WavelengthSetting::Value(0.7093))
        );
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("[deposition]\ntemperature_c = 420.0\n").unwrap();
        let params = config.deposition.parameters();
        assert_eq!(params.temperature_c, 420.0);
        assert_eq!(params.frequency_mhz, 1.7);
        assert!(config.dataset.path.is_none());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.scherrer.wavelength.is_none());
        assert_eq!(config.deposition.parameters(), DepositionParameters::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::parse("[deposition]\npressure = 1.0\n").unwrap_err();
        assert!(matches!(err, MataiError::ConfigError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Some(Path::new("no/such/matai.toml"))).unwrap_err();
        assert!(matches!(err, MataiError::FileReadError { .. }));
    }
}
