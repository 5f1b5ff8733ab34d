//! 任务执行
//!
//! 每个任务在独立的阻塞线程上运行，互不共享搜索状态。

use anyhow::{Context, Result};
use problem::{GameTree, GridMaze, ManhattanHeuristic, SearchOutcome};
use search_engine::{verify_path, AdversarialSearch, GraphSearch, SearchConfig};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::{GameTreeJob, HeuristicKind, JobSpec, MazeJob, TreeSource};
use crate::report::{JobReport, StrategyResult};

/// 并发运行所有任务，结果按任务名排序
///
/// 单个任务出错或线程 panic 时记为 [`JobReport::Failed`]，不影响其他任务。
pub async fn run_all(jobs: Vec<JobSpec>) -> Result<Vec<JobReport>> {
    run_with(jobs, run_job).await
}

async fn run_with(
    jobs: Vec<JobSpec>,
    runner: fn(&JobSpec) -> Result<JobReport>,
) -> Result<Vec<JobReport>> {
    let mut set = JoinSet::new();
    // 尚未返回报告的任务名
    let mut pending: Vec<String> = Vec::with_capacity(jobs.len());

    for job in jobs {
        pending.push(job.name().to_string());
        set.spawn_blocking(move || {
            let name = job.name().to_string();
            match runner(&job) {
                Ok(report) => report,
                Err(e) => {
                    warn!("Job {} failed: {:#}", name, e);
                    JobReport::Failed {
                        name,
                        error: format!("{:#}", e),
                    }
                }
            }
        });
    }

    let mut reports = Vec::with_capacity(pending.len());
    let mut thread_errors = Vec::new();
    while let Some(result) = set.join_next().await {
        match result {
            Ok(report) => {
                if let Some(pos) = pending.iter().position(|name| name == report.name()) {
                    pending.swap_remove(pos);
                }
                reports.push(report);
            }
            Err(e) => {
                warn!("Job thread exited abnormally: {}", e);
                thread_errors.push(e.to_string());
            }
        }
    }

    // 异常退出的线程不带任务名，剩余未报告的任务即为失败任务
    let error = thread_errors.join("; ");
    for name in pending {
        reports.push(JobReport::Failed {
            name,
            error: format!("任务线程异常退出: {}", error),
        });
    }

    reports.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(reports)
}

/// 运行单个任务
pub fn run_job(job: &JobSpec) -> Result<JobReport> {
    debug!("Running job {}", job.name());
    match job {
        JobSpec::Maze(maze_job) => run_maze(maze_job),
        JobSpec::GameTree(tree_job) => run_game_tree(tree_job),
    }
}

fn run_maze(job: &MazeJob) -> Result<JobReport> {
    let maze = GridMaze::parse(&job.layout)
        .with_context(|| format!("迷宫 {} 布局无效", job.name))?;

    let mut results = Vec::with_capacity(job.strategies.len());
    for &strategy in &job.strategies {
        let config = SearchConfig::from_strategy(strategy).with_limits(job.limits);
        let mut engine = GraphSearch::new(config);
        let outcome = match job.heuristic {
            HeuristicKind::Null => engine.search(&maze),
            HeuristicKind::Manhattan => engine.search_with(&maze, &ManhattanHeuristic),
        };

        let verified_cost = match &outcome {
            SearchOutcome::Found { actions, .. } => Some(
                verify_path(&maze, actions)
                    .with_context(|| format!("{} 返回的路径无效", strategy.name()))?,
            ),
            _ => None,
        };

        results.push(StrategyResult {
            strategy,
            status: outcome.status().to_string(),
            actions: outcome.actions().iter().map(|a| format!("{:?}", a)).collect(),
            cost: outcome.cost(),
            verified_cost,
            stats: engine.stats().clone(),
        });
    }

    Ok(JobReport::Maze {
        name: job.name.clone(),
        results,
    })
}

fn run_game_tree(job: &GameTreeJob) -> Result<JobReport> {
    let tree = match &job.tree {
        TreeSource::Explicit(spec) => {
            GameTree::from_spec(spec).with_context(|| format!("博弈树 {} 无效", job.name))?
        }
        TreeSource::Random {
            seed,
            depth,
            branching,
        } => GameTree::random(*seed, *depth, *branching)
            .with_context(|| format!("博弈树 {} 无法生成", job.name))?,
    };

    let config = job.engine_config();
    config.validate()?;

    let mut engine = AdversarialSearch::new(config);
    let root = tree.root();
    let value = engine.evaluate(&tree, &root, job.maximizing);
    let stats = engine.stats().clone();
    let best = engine.iterative_deepening(&tree, &root, job.maximizing);

    Ok(JobReport::GameTree {
        name: job.name.clone(),
        value,
        best_move: best.as_ref().map(|b| b.index),
        best_value: best.map(|b| b.value),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use search_engine::{SearchLimits, Strategy};

    fn maze_job(layout: &[&str], strategies: Vec<Strategy>) -> JobSpec {
        JobSpec::Maze(MazeJob {
            name: "maze".to_string(),
            layout: layout.iter().map(|s| s.to_string()).collect(),
            strategies,
            heuristic: HeuristicKind::Manhattan,
            limits: SearchLimits::default(),
        })
    }

    #[test]
    fn test_demo_maze_job() {
        let demo = RunnerConfig::demo();
        let report = run_job(&demo.jobs[0]).unwrap();

        let JobReport::Maze { results, .. } = report else {
            panic!("应为迷宫报告");
        };
        assert_eq!(results.len(), 4);
        for result in &results {
            assert_eq!(result.status, "found");
            assert_eq!(result.cost, result.verified_cost);
        }

        let bfs = results
            .iter()
            .find(|r| r.strategy == Strategy::BreadthFirst)
            .unwrap();
        assert_eq!(bfs.actions.len(), 4);
    }

    #[test]
    fn test_demo_game_tree_job() {
        let demo = RunnerConfig::demo();
        let report = run_job(&demo.jobs[1]).unwrap();

        let JobReport::GameTree {
            value,
            best_move,
            best_value,
            stats,
            ..
        } = report
        else {
            panic!("应为博弈树报告");
        };
        assert_eq!(value, 6.0);
        assert_eq!(best_move, Some(1));
        assert_eq!(best_value, Some(6.0));
        assert_eq!(stats.completed_depth, 2);
    }

    #[test]
    fn test_unreachable_maze_job() {
        let job = maze_job(&["P%."], vec![Strategy::BreadthFirst]);
        let JobReport::Maze { results, .. } = run_job(&job).unwrap() else {
            panic!("应为迷宫报告");
        };
        assert_eq!(results[0].status, "not_found");
        assert!(results[0].actions.is_empty());
        assert_eq!(results[0].verified_cost, None);
    }

    #[test]
    fn test_invalid_layout_is_error() {
        let job = maze_job(&["P?."], vec![Strategy::BreadthFirst]);
        assert!(run_job(&job).is_err());
    }

    #[test]
    fn test_random_tree_job() {
        let job = JobSpec::GameTree(GameTreeJob {
            name: "random".to_string(),
            tree: TreeSource::Random {
                seed: 5,
                depth: 4,
                branching: 3,
            },
            depth: 4,
            maximizing: false,
            pruning: true,
            limits: Default::default(),
        });
        let JobReport::GameTree {
            value, best_value, ..
        } = run_job(&job).unwrap()
        else {
            panic!("应为博弈树报告");
        };
        assert_eq!(best_value, Some(value));
    }

    #[tokio::test]
    async fn test_run_all_isolates_failures() {
        let mut jobs = RunnerConfig::demo().jobs;
        if let JobSpec::Maze(job) = maze_job(&["bad"], vec![Strategy::DepthFirst]) {
            jobs.push(JobSpec::Maze(MazeJob {
                name: "broken".to_string(),
                ..job
            }));
        }

        let reports = run_all(jobs).await.unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["binary-tree", "broken", "walled-grid"]);
        assert!(reports[1].is_failed());
        assert!(!reports[0].is_failed());
        assert!(!reports[2].is_failed());
    }

    #[tokio::test]
    async fn test_panicking_job_is_reported_as_failed() {
        fn runner(job: &JobSpec) -> Result<JobReport> {
            if job.name() == "binary-tree" {
                panic!("evaluation crashed");
            }
            run_job(job)
        }

        let reports = run_with(RunnerConfig::demo().jobs, runner).await.unwrap();
        assert_eq!(reports.len(), 2);

        let JobReport::Failed { name, error } = &reports[0] else {
            panic!("应为失败报告");
        };
        assert_eq!(name, "binary-tree");
        assert!(error.contains("panic"), "{}", error);
        assert!(matches!(reports[1], JobReport::Maze { .. }));
    }
}
