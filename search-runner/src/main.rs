use anyhow::Result;
use search_runner::{run_all, JobReport, ReportStore, RunReport, RunnerConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("search_runner=debug".parse()?))
        .init();

    // 第一个参数为任务文件，缺省时运行内置示例
    let config = match std::env::args().nth(1) {
        Some(path) => RunnerConfig::load(&path)?,
        None => {
            info!("No job file given, running built-in demo jobs");
            RunnerConfig::demo()
        }
    };
    config.validate()?;

    info!("Running {} jobs for '{}'", config.jobs.len(), config.name);
    let reports = run_all(config.jobs.clone()).await?;

    for report in &reports {
        match report {
            JobReport::Maze { name, results } => {
                for result in results {
                    info!(
                        "[{}] {}: {} actions={} cost={:?} expanded={}",
                        name,
                        result.strategy.name(),
                        result.status,
                        result.actions.len(),
                        result.cost,
                        result.stats.expanded
                    );
                }
            }
            JobReport::GameTree {
                name,
                value,
                best_move,
                stats,
                ..
            } => {
                info!(
                    "[{}] value={} best_move={:?} nodes={} cutoffs={}",
                    name, value, best_move, stats.nodes_visited, stats.cutoffs
                );
            }
            JobReport::Failed { name, error: reason } => {
                error!("[{}] failed: {}", name, reason);
            }
        }
    }

    let store = ReportStore::new(config.output_dir.clone())?;
    let run = RunReport::new(&config.name, reports);
    let report_id = store.save(&run)?;
    info!(
        "Report saved to {:?}",
        store.reports_directory().join(&report_id)
    );

    Ok(())
}
