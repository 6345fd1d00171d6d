//! rslike 命令行工具：按 SQL LIKE 模式过滤文本行

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rslike::{global_pattern_cache, ConfigManager, LikeConfig};

/// 按 SQL LIKE 模式过滤文本行（`%` 任意长度，`_` 单个字符）
#[derive(Parser, Debug)]
#[command(name = "rslike", version, about)]
struct Cli {
    /// LIKE 模式
    pattern: String,

    /// 输入文件（缺省读取标准输入）
    file: Option<PathBuf>,

    /// 转义符（默认 `\`）
    #[arg(short, long, conflicts_with = "no_escape")]
    escape: Option<char>,

    /// 不使用转义符
    #[arg(long)]
    no_escape: bool,

    /// 输出不匹配的行
    #[arg(short = 'v', long)]
    invert_match: bool,

    /// 只输出匹配行数
    #[arg(short, long)]
    count: bool,

    /// 输出编译后的匹配计划（JSON）并退出
    #[arg(long)]
    explain: bool,

    /// 输出调试日志
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = ConfigManager::custom().verbose(cli.verbose).build();
    init_tracing(&config);

    match run(&cli, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("rslike: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// 初始化日志（RUST_LOG 优先）
fn init_tracing(config: &LikeConfig) {
    let default_directive = if config.verbose { "rslike=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// 执行过滤，返回是否选中了至少一行
fn run(cli: &Cli, config: &LikeConfig) -> Result<bool> {
    let escape = if cli.no_escape {
        None
    } else {
        cli.escape.or(config.default_escape)
    };

    let plan = global_pattern_cache()
        .get_or_compile_str(&cli.pattern, escape)
        .with_context(|| format!("failed to compile pattern '{}'", cli.pattern))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if cli.explain {
        let json = serde_json::to_string_pretty(&plan.explain())?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        return Ok(true);
    }

    let mut reader: Box<dyn BufRead> = match &cli.file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut line = Vec::new();
    let mut selected = 0usize;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).context("failed to read input")? == 0 {
            break;
        }
        let content = trim_line_ending(&line);
        if plan.matches_bytes(content, content.is_ascii()) != cli.invert_match {
            selected += 1;
            if !cli.count {
                out.write_all(content)?;
                out.write_all(b"\n")?;
            }
        }
    }

    if cli.count {
        writeln!(out, "{}", selected)?;
    }
    out.flush()?;

    tracing::debug!("Filtered input | Kind: {} | Selected lines: {}", plan.kind(), selected);
    Ok(selected > 0)
}

/// 去掉行尾 `\n` / `\r\n`
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
