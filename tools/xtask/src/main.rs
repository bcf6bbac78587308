//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与无界面战斗模拟。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 battle-anim 覆盖率
//! - `battle-check`: 检查战斗描述文件（JSON 格式、数值范围）
//! - `simulate`: 加载战斗描述，用内置效果构建动画并按固定帧率播放

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use battle_anim::effects::{BasicSpell, BasicUnit};
use battle_anim::{
    BattleConfig, BattleScript, Choreographer, CombatantProfile, CombatantSide, SceneNode,
    TransportEvent, ViewportSize,
};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出 debug 级别日志（默认读取 RUST_LOG）
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,

    /// 运行 battle-anim 覆盖率报告
    CovCore,

    /// 检查战斗描述文件
    ///
    /// 不带参数时检查 demos/ 下所有 .json 文件
    BattleCheck {
        /// 文件或目录
        path: Option<PathBuf>,
    },

    /// 无界面模拟一场战斗
    Simulate {
        /// 战斗描述文件（JSON）
        file: PathBuf,

        /// 播放帧率
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// 进度输出间隔（毫秒）
        #[arg(long, default_value_t = 250)]
        report_every: u64,

        /// 将每次进度输出时的场景快照写入该目录
        #[arg(long)]
        snapshots: Option<PathBuf>,

        /// 打印时间轴结构
        #[arg(long)]
        outline: bool,

        /// 配置文件（缺失或无效时使用默认值）
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::CheckAll => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        Commands::CovCore => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "battle-anim", "--html"]);
            run("cargo llvm-cov -p battle-anim --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::BattleCheck { path } => battle_check(path.as_deref())?,
        Commands::Simulate {
            file,
            fps,
            report_every,
            snapshots,
            outline,
            config,
        } => simulate(&SimulateOptions {
            file,
            fps,
            report_every: Duration::from_millis(report_every),
            snapshots,
            outline,
            config,
        })?,
    }

    Ok(())
}

//=============================================================================
// battle-check 命令实现
//=============================================================================

/// 默认战斗描述目录（相对于 workspace root）
const DEMOS_DIR: &str = "demos";

fn battle_check(path: Option<&Path>) -> anyhow::Result<()> {
    let root = path.unwrap_or(Path::new(DEMOS_DIR));
    if !root.exists() {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定文件路径",
            root.display()
        );
    }

    let files = collect_battle_files(root)?;
    if files.is_empty() {
        eprintln!("未找到战斗描述文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个战斗描述文件...\n", files.len());

    let mut errors = 0;
    for file in &files {
        match BattleScript::load(file) {
            Ok(script) => {
                eprintln!(
                    "[OK] {}: {} vs {}，{} 次攻击",
                    file.display(),
                    script.left.display_name,
                    script.right.display_name,
                    script.strikes.len()
                );
            }
            Err(e) => {
                eprintln!("[ERROR] {}: {}", file.display(), e);
                errors += 1;
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    if errors > 0 {
        anyhow::bail!("{errors} 个文件检查失败");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 收集战斗描述文件（单个文件或目录下所有 .json）
fn collect_battle_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

//=============================================================================
// simulate 命令实现
//=============================================================================

struct SimulateOptions {
    file: PathBuf,
    fps: u32,
    report_every: Duration,
    snapshots: Option<PathBuf>,
    outline: bool,
    config: Option<PathBuf>,
}

/// 用内置效果装配一侧战斗者
fn basic_side(prefix: &str, profile: &CombatantProfile) -> CombatantSide {
    let color = profile.team_color;
    CombatantSide::new(
        BasicUnit::new(&format!("{prefix}.unit"), color),
        BasicSpell::new(&format!("{prefix}.spell"), color, (48.0, 48.0)),
        profile.clone(),
    )
}

fn simulate(options: &SimulateOptions) -> anyhow::Result<()> {
    if options.fps == 0 {
        anyhow::bail!("fps 必须大于 0");
    }

    let script = BattleScript::load(&options.file)
        .with_context(|| format!("加载战斗描述失败: {}", options.file.display()))?;
    let config = match &options.config {
        Some(path) => BattleConfig::load(path),
        None => BattleConfig::default(),
    };

    let viewport = script.viewport_or(ViewportSize::default());
    let left = basic_side("left", &script.left);
    let right = basic_side("right", &script.right);

    let battle = Choreographer::new(config).build_animation(
        |viewport| {
            SceneNode::rect(
                "backdrop",
                viewport.width,
                viewport.height,
                battle_anim::Color::BLACK,
            )
        },
        viewport,
        script.distance,
        &left,
        &right,
        &script.strikes,
    );

    if options.outline {
        println!("{}", battle.timeline);
    }

    info!(
        outcome = ?battle.outcome,
        duration_ms = battle.duration().as_millis() as u64,
        "开始模拟"
    );
    for (index, hp) in battle.trajectory.iter().enumerate().skip(1) {
        debug!(strike = index - 1, left_hp = hp.left, right_hp = hp.right, "HP 轨迹");
    }

    if let Some(dir) = &options.snapshots {
        fs::create_dir_all(dir)
            .with_context(|| format!("无法创建快照目录: {}", dir.display()))?;
    }

    let hud = battle.stage.hud.clone();
    let outcome = battle.outcome;
    let final_hp = battle.final_hp();

    let mut transport = battle.into_transport();
    let finished = Rc::new(Cell::new(0u32));
    let counter = finished.clone();
    transport.set_on_finished(move || counter.set(counter.get() + 1));

    let frame = Duration::from_secs(1) / options.fps;
    let mut next_report = Duration::ZERO;
    let mut reports = 0usize;

    transport.play();
    loop {
        let running = transport.advance(frame);
        for event in transport.drain_events() {
            if let TransportEvent::StatusChanged { from, to } = event {
                debug!(?from, ?to, "播放状态变化");
            }
        }

        if transport.position() >= next_report || !running {
            println!(
                "{:>8.3}s  {:>5.1}%  {} {:>4}/{:<4}  {} {:>4}/{:<4}",
                transport.position().as_secs_f64(),
                transport.progress() * 100.0,
                script.left.display_name,
                hud.left.health_bar.display_hp(),
                hud.left.health_bar.max_hp(),
                script.right.display_name,
                hud.right.health_bar.display_hp(),
                hud.right.health_bar.max_hp(),
            );
            if let (Some(dir), Some(scene)) = (&options.snapshots, transport.scene()) {
                let path = dir.join(format!("frame_{reports:04}.json"));
                let json = serde_json::to_string_pretty(&scene.snapshot())?;
                fs::write(&path, json)
                    .with_context(|| format!("无法写入快照: {}", path.display()))?;
            }
            reports += 1;
            next_report += options.report_every;
        }

        if !running {
            break;
        }
    }

    if finished.get() != 1 {
        warn!(fired = finished.get(), "结束回调触发次数异常");
    }

    println!(
        "结果: {outcome:?}，最终 HP {} / {}",
        final_hp.left, final_hp.right
    );
    Ok(())
}
