//! # matai 命令行入口
//!
//! ## 子命令
//! - `xrd` - XRD 峰表分析
//!   - `summary` / `peaks` / `size` / `plot`
//! - `usp` - USP 沉积模拟
//!   - `simulate` / `sweep`

use clap::Parser;
use matai::cli::Cli;
use matai::commands;
use matai::config::Config;
use matai::utils::output;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    let result = Config::load(cli.config.as_deref())
        .and_then(|config| commands::run(cli.command, &config));

    if let Err(e) = result {
        output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
