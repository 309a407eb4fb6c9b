//! # 统一错误处理模块
//!
//! 定义 matai 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// matai 统一错误类型
#[derive(Error, Debug)]
pub enum MataiError {
    // ─────────────────────────────────────────────────────────────
    // 数据源错误
    // ─────────────────────────────────────────────────────────────
    #[error("XRD data unavailable: {0}")]
    DataUnavailable(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} data: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameter {
        field: String,
        value: f64,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Plot rendering failed: {0}")]
    Plot(String),

    #[error("{0}")]
    Other(String),
}

impl MataiError {
    /// 构造参数越界错误
    pub fn invalid_parameter(field: &str, value: f64, reason: impl Into<String>) -> Self {
        MataiError::InvalidParameter {
            field: field.to_string(),
            value,
            reason: reason.into(),
        }
    }

    /// 参数错误对应的字段名
    pub fn field(&self) -> Option<&str> {
        match self {
            MataiError::InvalidParameter { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MataiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_names_field() {
        let err = MataiError::invalid_parameter("temperature_c", 600.0, "must lie in [400, 500]");
        assert_eq!(err.field(), Some("temperature_c"));
        let msg = err.to_string();
        assert!(msg.contains("temperature_c"));
        assert!(msg.contains("600"));
    }

    #[test]
    fn test_field_absent_for_other_errors() {
        let err = MataiError::DataUnavailable("no source".to_string());
        assert_eq!(err.field(), None);
    }
}
