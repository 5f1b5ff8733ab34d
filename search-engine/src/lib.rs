//! 通用搜索引擎
//!
//! 包含:
//! - 边界容器（栈、队列、稳定优先队列）
//! - 图搜索：深度优先、广度优先、一致代价、A*
//! - 对抗搜索：Minimax + Alpha-Beta 剪枝 + 迭代加深
//! - 路径校验

mod adversarial;
mod config;
mod frontier;
mod graph;
mod verify;

pub use adversarial::{minimax, minimax_alpha_beta, AdversarialSearch, BestMove, MAX_PLY};
pub use config::{AdversarialConfig, GameLimits, SearchConfig, SearchLimits, Strategy};
pub use frontier::{Frontier, FrontierKind, PriorityFrontier, QueueFrontier, StackFrontier};
pub use graph::{
    a_star_search, breadth_first_search, depth_first_search, uniform_cost_search, GraphSearch,
};
pub use verify::verify_path;

// 简写
pub use graph::{
    a_star_search as astar, breadth_first_search as bfs, depth_first_search as dfs,
    uniform_cost_search as ucs,
};
