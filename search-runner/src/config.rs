//! 任务配置
//!
//! 任务文件为 JSON：
//! ```json
//! {
//!   "name": "demo",
//!   "jobs": [
//!     { "kind": "maze", "name": "grid", "layout": ["P  ", " % ", "  ."],
//!       "strategies": ["breadth_first", "a_star"], "heuristic": "manhattan" },
//!     { "kind": "game_tree", "name": "tree", "tree": [[3, 5], [6, 9]], "depth": 2 }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use problem::{GameTree, TreeSpec};
use search_engine::{AdversarialConfig, GameLimits, SearchLimits, Strategy};
use serde::{Deserialize, Serialize};

/// 运行器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// 运行名称（用于报告文件名）
    #[serde(default = "default_name")]
    pub name: String,
    /// 报告目录；缺省为系统数据目录
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub jobs: Vec<JobSpec>,
}

fn default_name() -> String {
    "run".to_string()
}

/// 单个任务
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobSpec {
    Maze(MazeJob),
    GameTree(GameTreeJob),
}

impl JobSpec {
    pub fn name(&self) -> &str {
        match self {
            JobSpec::Maze(job) => &job.name,
            JobSpec::GameTree(job) => &job.name,
        }
    }
}

/// 启发函数选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// h ≡ 0
    #[default]
    Null,
    /// 曼哈顿距离
    Manhattan,
}

/// 迷宫搜索任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeJob {
    pub name: String,
    /// 迷宫布局，每行一个字符串
    pub layout: Vec<String>,
    /// 依次运行的策略；缺省为全部四种
    #[serde(default = "all_strategies")]
    pub strategies: Vec<Strategy>,
    #[serde(default)]
    pub heuristic: HeuristicKind,
    #[serde(default)]
    pub limits: SearchLimits,
}

fn all_strategies() -> Vec<Strategy> {
    Strategy::all().to_vec()
}

/// 博弈树来源
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeSource {
    /// 显式描述（须先于 Random 匹配）
    Explicit(TreeSpec),
    /// 固定种子的随机完全树
    Random {
        seed: u64,
        depth: u32,
        branching: usize,
    },
}

/// 博弈树评估任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTreeJob {
    pub name: String,
    pub tree: TreeSource,
    /// 搜索层数
    pub depth: u32,
    /// 根节点是否为极大方
    #[serde(default = "default_true")]
    pub maximizing: bool,
    #[serde(default = "default_true")]
    pub pruning: bool,
    #[serde(default)]
    pub limits: GameLimits,
}

fn default_true() -> bool {
    true
}

impl GameTreeJob {
    /// 对应的引擎配置
    pub fn engine_config(&self) -> AdversarialConfig {
        let config = AdversarialConfig::new(self.depth).with_limits(self.limits);
        if self.pruning {
            config
        } else {
            config.without_pruning()
        }
    }
}

impl RunnerConfig {
    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取任务文件: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("解析任务文件失败: {:?}", path))
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 内置示例：中心有墙的 3x3 网格，以及叶子为 [3, 5, 6, 9] 的博弈树
    pub fn demo() -> Self {
        Self {
            name: "demo".to_string(),
            output_dir: None,
            jobs: vec![
                JobSpec::Maze(MazeJob {
                    name: "walled-grid".to_string(),
                    layout: vec!["P  ".to_string(), " % ".to_string(), "  .".to_string()],
                    strategies: all_strategies(),
                    heuristic: HeuristicKind::Manhattan,
                    limits: SearchLimits::default(),
                }),
                JobSpec::GameTree(GameTreeJob {
                    name: "binary-tree".to_string(),
                    tree: TreeSource::Explicit(TreeSpec::Node(vec![
                        TreeSpec::Node(vec![TreeSpec::Leaf(3.0), TreeSpec::Leaf(5.0)]),
                        TreeSpec::Node(vec![TreeSpec::Leaf(6.0), TreeSpec::Leaf(9.0)]),
                    ])),
                    depth: 2,
                    maximizing: true,
                    pruning: true,
                    limits: GameLimits::default(),
                }),
            ],
        }
    }

    /// 检查任务名唯一、层数和随机树规模不超过上限
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for job in &self.jobs {
            if !names.insert(job.name()) {
                anyhow::bail!("任务名重复: {}", job.name());
            }
            if let JobSpec::GameTree(tree_job) = job {
                tree_job
                    .engine_config()
                    .validate()
                    .with_context(|| format!("任务 {} 配置无效", tree_job.name))?;
                if let TreeSource::Random {
                    depth, branching, ..
                } = &tree_job.tree
                {
                    GameTree::random_size(*depth, *branching)
                        .with_context(|| format!("任务 {} 随机树过大", tree_job.name))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_file() {
        let json = r#"{
            "name": "nightly",
            "jobs": [
                { "kind": "maze", "name": "m", "layout": ["P.", "  "],
                  "strategies": ["uniform_cost"], "limits": { "max_expansions": 50 } },
                { "kind": "game_tree", "name": "t1", "tree": [[3, 5], [6, 9]], "depth": 2 },
                { "kind": "game_tree", "name": "t2",
                  "tree": { "seed": 1, "depth": 3, "branching": 2 },
                  "depth": 3, "maximizing": false, "pruning": false }
            ]
        }"#;
        let config = RunnerConfig::from_json(json).unwrap();
        assert_eq!(config.name, "nightly");
        assert!(config.output_dir.is_none());
        assert_eq!(config.jobs.len(), 3);

        let JobSpec::Maze(maze) = &config.jobs[0] else {
            panic!("第一个任务应为迷宫");
        };
        assert_eq!(maze.strategies, vec![Strategy::UniformCost]);
        assert_eq!(maze.heuristic, HeuristicKind::Null);
        assert_eq!(maze.limits.max_expansions, Some(50));

        let JobSpec::GameTree(t1) = &config.jobs[1] else {
            panic!("第二个任务应为博弈树");
        };
        assert!(matches!(t1.tree, TreeSource::Explicit(_)));
        assert!(t1.maximizing);
        assert!(t1.pruning);

        let JobSpec::GameTree(t2) = &config.jobs[2] else {
            panic!("第三个任务应为博弈树");
        };
        assert!(matches!(
            t2.tree,
            TreeSource::Random {
                seed: 1,
                depth: 3,
                branching: 2
            }
        ));
        assert!(!t2.engine_config().pruning);
    }

    #[test]
    fn test_maze_defaults_to_all_strategies() {
        let json = r#"{ "jobs": [ { "kind": "maze", "name": "m", "layout": ["P."] } ] }"#;
        let config = RunnerConfig::from_json(json).unwrap();
        assert_eq!(config.name, "run");
        let JobSpec::Maze(maze) = &config.jobs[0] else {
            panic!("应为迷宫任务");
        };
        assert_eq!(maze.strategies.len(), 4);
    }

    #[test]
    fn test_validate_rejects_duplicates_and_deep_trees() {
        let mut config = RunnerConfig::demo();
        assert!(config.validate().is_ok());

        config.jobs.push(config.jobs[0].clone());
        assert!(config.validate().is_err());

        let mut config = RunnerConfig::demo();
        if let JobSpec::GameTree(job) = &mut config.jobs[1] {
            job.depth = 1000;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_random_trees() {
        let job_file = |tree: &str| {
            format!(
                r#"{{"jobs": [{{"kind": "game_tree", "name": "t", "tree": {}, "depth": 2}}]}}"#,
                tree
            )
        };

        let ok = RunnerConfig::from_json(&job_file(r#"{"seed": 1, "depth": 6, "branching": 3}"#))
            .unwrap();
        assert!(ok.validate().is_ok());

        for tree in [
            r#"{"seed": 1, "depth": 200000, "branching": 1}"#,
            r#"{"seed": 1, "depth": 30, "branching": 8}"#,
        ] {
            let config = RunnerConfig::from_json(&job_file(tree)).unwrap();
            assert!(config.validate().is_err(), "{} 应被拒绝", tree);
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(RunnerConfig::load("/nonexistent/jobs.json").is_err());
    }

    #[test]
    fn test_demo_round_trip() {
        let demo = RunnerConfig::demo();
        let json = serde_json::to_string(&demo).unwrap();
        let parsed = RunnerConfig::from_json(&json).unwrap();
        assert_eq!(parsed.jobs.len(), demo.jobs.len());
        assert_eq!(parsed.jobs[0].name(), "walled-grid");
    }
}
