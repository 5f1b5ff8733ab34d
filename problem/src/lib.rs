//! 搜索问题共享接口库
//!
//! 包含:
//! - 能力接口 (Problem, Game, Heuristic traits)
//! - 搜索结果与统计 (SearchOutcome, SearchStats, GameStats)
//! - 错误类型定义
//! - 参考问题：网格迷宫、带权图、显式博弈树

mod error;
mod game;
mod graph;
mod grid;
mod heuristic;
mod outcome;
mod problem;
mod tree;

pub use error::{Result, SearchError};
pub use game::Game;
pub use graph::WeightedGraph;
pub use grid::{manhattan_distance, Cell, Direction, GridMaze, ManhattanHeuristic};
pub use heuristic::{Heuristic, NullHeuristic};
pub use outcome::{GameStats, Interrupt, SearchOutcome, SearchStats};
pub use problem::{Problem, Successor};
pub use tree::{GameTree, NodeId, TreeSpec, MAX_TREE_DEPTH, MAX_TREE_NODES};
