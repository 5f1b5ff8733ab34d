//! 搜索配置

use std::time::{Duration, Instant};

use problem::{Interrupt, Result, SearchError};
use serde::{Deserialize, Serialize};

use crate::adversarial::MAX_PLY;
use crate::frontier::FrontierKind;

/// 图搜索策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 深度优先（栈）
    DepthFirst,
    /// 广度优先（队列）
    BreadthFirst,
    /// 一致代价（按累计代价排序）
    UniformCost,
    /// A*（按累计代价 + 启发值排序）
    AStar,
}

impl Strategy {
    /// 对应的边界策略
    pub fn frontier_kind(&self) -> FrontierKind {
        match self {
            Strategy::DepthFirst => FrontierKind::Stack,
            Strategy::BreadthFirst => FrontierKind::Queue,
            Strategy::UniformCost | Strategy::AStar => FrontierKind::Priority,
        }
    }

    /// 是否使用启发函数
    pub fn uses_heuristic(&self) -> bool {
        matches!(self, Strategy::AStar)
    }

    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::DepthFirst => "dfs",
            Strategy::BreadthFirst => "bfs",
            Strategy::UniformCost => "ucs",
            Strategy::AStar => "astar",
        }
    }

    /// 所有策略
    pub fn all() -> &'static [Strategy] {
        &[
            Strategy::DepthFirst,
            Strategy::BreadthFirst,
            Strategy::UniformCost,
            Strategy::AStar,
        ]
    }
}

/// 图搜索的预算，在每次弹出边界前检查
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// 最多扩展的状态数
    pub max_expansions: Option<u64>,
    /// 时间限制（毫秒）
    pub time_limit_ms: Option<u64>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// 图搜索配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub strategy: Strategy,
    #[serde(default)]
    pub limits: SearchLimits,
}

impl SearchConfig {
    pub fn from_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            limits: SearchLimits::unlimited(),
        }
    }

    /// 设置预算
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::from_strategy(Strategy::AStar)
    }
}

/// 对抗搜索的预算，在每次递归调用时检查
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameLimits {
    /// 最多访问的节点数
    pub max_nodes: Option<u64>,
    /// 时间限制（毫秒）
    pub time_limit_ms: Option<u64>,
}

/// 对抗搜索配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarialConfig {
    /// 最大搜索层数
    pub max_depth: u32,
    /// 是否启用 Alpha-Beta 剪枝
    #[serde(default = "default_pruning")]
    pub pruning: bool,
    #[serde(default)]
    pub limits: GameLimits,
}

fn default_pruning() -> bool {
    true
}

impl AdversarialConfig {
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            pruning: true,
            limits: GameLimits::default(),
        }
    }

    /// 浅层搜索：2 层，1 秒
    pub fn shallow() -> Self {
        Self {
            limits: GameLimits {
                max_nodes: None,
                time_limit_ms: Some(1000),
            },
            ..Self::new(2)
        }
    }

    /// 标准搜索：4 层，3 秒
    pub fn standard() -> Self {
        Self {
            limits: GameLimits {
                max_nodes: None,
                time_limit_ms: Some(3000),
            },
            ..Self::new(4)
        }
    }

    /// 深层搜索：8 层，5 秒
    pub fn deep() -> Self {
        Self {
            limits: GameLimits {
                max_nodes: None,
                time_limit_ms: Some(5000),
            },
            ..Self::new(8)
        }
    }

    /// 关闭剪枝（纯 Minimax）
    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }

    /// 设置预算
    pub fn with_limits(mut self, limits: GameLimits) -> Self {
        self.limits = limits;
        self
    }

    /// 检查层数上限
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_PLY {
            return Err(SearchError::DepthLimitExceeded {
                depth: self.max_depth,
                max: MAX_PLY,
            });
        }
        Ok(())
    }
}

impl Default for AdversarialConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// 运行中的预算
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    max_count: Option<u64>,
    deadline: Option<Instant>,
}

impl Budget {
    pub(crate) fn new(
        max_count: Option<u64>,
        time_limit_ms: Option<u64>,
        started: Instant,
    ) -> Self {
        Self {
            max_count,
            deadline: time_limit_ms.map(|ms| started + Duration::from_millis(ms)),
        }
    }

    pub(crate) fn unlimited() -> Self {
        Self {
            max_count: None,
            deadline: None,
        }
    }

    /// `count` 为已消耗的计数；预算耗尽时返回原因
    pub(crate) fn check(&self, count: u64) -> Option<Interrupt> {
        if let Some(max) = self.max_count {
            if count >= max {
                return Some(Interrupt::NodeBudget);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Some(Interrupt::Deadline);
            }
        }
        None
    }
}
