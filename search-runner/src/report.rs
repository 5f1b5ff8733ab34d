//! 运行报告
//!
//! 以 JSON 保存，每次运行一个文件。

use chrono::{DateTime, Utc};
use problem::{GameStats, SearchStats};
use search_engine::Strategy;
use serde::{Deserialize, Serialize};

/// 报告格式版本
pub const REPORT_VERSION: &str = "1.0";

/// 单个策略在迷宫上的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub strategy: Strategy,
    /// found / not_found / interrupted
    pub status: String,
    pub actions: Vec<String>,
    /// 搜索内部累计的代价
    pub cost: Option<f64>,
    /// 按后继边重放得到的代价
    pub verified_cost: Option<f64>,
    pub stats: SearchStats,
}

/// 单个任务的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobReport {
    Maze {
        name: String,
        results: Vec<StrategyResult>,
    },
    GameTree {
        name: String,
        /// 根节点评估值
        value: f64,
        /// 最佳子局面下标
        best_move: Option<usize>,
        best_value: Option<f64>,
        stats: GameStats,
    },
    Failed {
        name: String,
        error: String,
    },
}

impl JobReport {
    pub fn name(&self) -> &str {
        match self {
            JobReport::Maze { name, .. }
            | JobReport::GameTree { name, .. }
            | JobReport::Failed { name, .. } => name,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobReport::Failed { .. })
    }
}

/// 一次运行的完整报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub version: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    pub fn new(name: &str, jobs: Vec<JobReport>) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
            jobs,
        }
    }

    /// 失败的任务数
    pub fn failed_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_failed()).count()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
