//! # Folio CLI
//!
//! 无头转场驱动：按路线依次导航，以固定帧间隔推进舞台，输出阶段轨迹。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p folio-cli
//! cargo run -p folio-cli -- --route work,contact --json
//! cargo run -p folio-cli -- --config stage.json --dt 0.033 -vv
//! cargo run -p folio-cli -- --no-motion --route about
//! cargo run -p folio-cli -- --dump-config stage.json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use folio_core::{MotionCapability, NavigateOutcome, PhaseChange, Scene, Stage, StageConfig};
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "无头转场驱动 - 按路线依次导航并输出阶段轨迹")]
#[command(version)]
struct Cli {
    /// 配置文件（JSON），不存在或无法解析时使用默认配置
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 导航路线，逗号分隔（默认：work,about,contact,home）
    #[arg(short, long, value_delimiter = ',', default_value = "work,about,contact,home")]
    route: Vec<Scene>,

    /// 帧间隔（秒）
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// 单次过渡的超时（秒）
    #[arg(long, default_value_t = 10.0)]
    timeout: f32,

    /// 模拟动画引擎不可用
    #[arg(long)]
    no_motion: bool,

    /// 以 JSON Lines 输出阶段变更
    #[arg(long)]
    json: bool,

    /// 把生效的配置写到文件后退出
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// 日志详细程度（-v info，-vv debug，-vvv trace）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => StageConfig::load(path),
        None => StageConfig::default(),
    };
    config.validate().context("配置无效")?;

    if let Some(path) = &cli.dump_config {
        config
            .save(path)
            .with_context(|| format!("无法写入配置: {}", path.display()))?;
        info!(path = ?path, "配置已写出");
        return Ok(());
    }

    ensure!(cli.dt > 0.0, "帧间隔必须为正数: {}", cli.dt);
    ensure!(cli.timeout > 0.0, "超时必须为正数: {}", cli.timeout);

    let capability = if cli.no_motion {
        MotionCapability::unavailable()
    } else {
        MotionCapability::loaded()
    };

    let mut stage = Stage::new(config, capability);
    while stage.orchestrator().is_loading() {
        stage.update(cli.dt);
    }
    info!(scene = %stage.snapshot().scene, "加载完成，开始导航");

    let mut out = io::stdout().lock();
    for &target in &cli.route {
        let outcome = stage.navigate(target);
        if !cli.json {
            writeln!(out, "navigate {} -> {}", target, describe(outcome))?;
        }

        if !stage.settle(cli.dt, cli.timeout) {
            bail!(
                "过渡到 {} 未能在 {} 秒内回到 Idle（当前阶段 {:?}）",
                target,
                cli.timeout,
                stage.snapshot().phase
            );
        }

        for change in stage.take_phase_changes() {
            write_change(&mut out, &change, cli.json)?;
        }
    }

    if !cli.json {
        writeln!(
            out,
            "final scene: {}, commits: {}",
            stage.snapshot().scene,
            stage.orchestrator().commit_count()
        )?;
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn describe(outcome: NavigateOutcome) -> String {
    match outcome {
        NavigateOutcome::Started(route) => format!("started ({:?})", route),
        NavigateOutcome::CommittedImmediately => "committed immediately".to_string(),
        NavigateOutcome::Ignored(reason) => format!("ignored ({:?})", reason),
    }
}

fn write_change(out: &mut impl Write, change: &PhaseChange, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(change)?)?;
    } else {
        writeln!(
            out,
            "{:>8.3}s  {:?} -> {:?}  [{}]",
            change.at, change.from, change.to, change.scene
        )?;
    }
    Ok(())
}
