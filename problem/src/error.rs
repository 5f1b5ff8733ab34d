//! 错误类型定义

use thiserror::Error;

/// 搜索相关错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// 动作序列中出现非法动作
    #[error("Illegal action at index {index}")]
    IllegalAction { index: usize },

    /// 动作序列合法，但终点不是目标状态
    #[error("Action sequence does not end in a goal state")]
    GoalNotReached,

    /// 无效的迷宫布局
    #[error("Invalid maze layout: {reason}")]
    InvalidLayout { reason: String },

    /// 无效的博弈树描述
    #[error("Invalid game tree: {reason}")]
    InvalidTree { reason: String },

    /// 引用了不存在的状态
    #[error("Unknown state: {id}")]
    UnknownState { id: usize },

    /// 搜索深度超过上限
    #[error("Search depth {depth} exceeds the ply limit {max}")]
    DepthLimitExceeded { depth: u32, max: u32 },
}

/// 搜索操作结果类型
pub type Result<T> = std::result::Result<T, SearchError>;
