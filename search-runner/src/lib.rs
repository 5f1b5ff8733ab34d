//! 搜索任务运行器
//!
//! 包含:
//! - 任务配置（JSON）
//! - 并发执行迷宫搜索和博弈树评估任务
//! - 运行报告
//! - 报告存储

pub mod config;
pub mod jobs;
pub mod report;
pub mod storage;

pub use config::{GameTreeJob, HeuristicKind, JobSpec, MazeJob, RunnerConfig, TreeSource};
pub use jobs::{run_all, run_job};
pub use report::{JobReport, RunReport, StrategyResult};
pub use storage::{ReportStore, SavedReportInfo};
