//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，并把命令行参数与配置文件合并。
//! 优先级：命令行参数 > 配置文件 > 内置默认值。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `xrd/`, `usp/`, `utils/`
//! - 子模块: xrd, usp

pub mod usp;
pub mod xrd;

use crate::cli::Commands;
use crate::config::Config;
use crate::error::Result;
use crate::xrd::{LoadOptions, PeakDataset};

use std::path::{Path, PathBuf};

/// 执行命令
pub fn run(cmd: Commands, config: &Config) -> Result<()> {
    match cmd {
        Commands::Xrd(args) => xrd::execute(args, config),
        Commands::Usp(args) => usp::execute(args, config),
    }
}

/// 合并后的数据源设置
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DatasetSetting {
    pub path: Option<PathBuf>,
    pub options: LoadOptions,
}

impl DatasetSetting {
    /// 合并 `--data` / `--no-fallback` 与 `[dataset]`
    pub fn resolve(data: Option<&Path>, no_fallback: bool, config: &Config) -> Self {
        let path = data
            .map(Path::to_path_buf)
            .or_else(|| config.dataset.path.clone());
        let allow_fallback = !no_fallback && config.dataset.allow_fallback.unwrap_or(true);

        Self {
            path,
            options: LoadOptions { allow_fallback },
        }
    }

    pub fn load(&self) -> Result<PeakDataset> {
        PeakDataset::load_with(self.path.as_deref(), self.options)
    }
}
