//! 搜索结果与统计信息

use serde::{Deserialize, Serialize};

/// 搜索被提前终止的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interrupt {
    /// 节点数达到上限
    NodeBudget,
    /// 超时
    Deadline,
}

/// 图搜索结果
///
/// 用带标签的结果区分“起点即目标”（空路径的 `Found`）和“无解”。
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<A> {
    /// 找到目标，附带动作序列和累计代价
    Found { actions: Vec<A>, cost: f64 },
    /// 边界耗尽仍未到达目标
    NotFound,
    /// 预算耗尽；`partial` 为最近一次扩展的节点的路径
    Interrupted { reason: Interrupt, partial: Vec<A> },
}

impl<A> SearchOutcome<A> {
    /// 是否找到目标
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// 解路径；未找到时为空
    pub fn actions(&self) -> &[A] {
        match self {
            SearchOutcome::Found { actions, .. } => actions,
            _ => &[],
        }
    }

    /// 取出解路径；未找到时为空
    pub fn into_actions(self) -> Vec<A> {
        match self {
            SearchOutcome::Found { actions, .. } => actions,
            _ => Vec::new(),
        }
    }

    /// 解路径的累计代价
    pub fn cost(&self) -> Option<f64> {
        match self {
            SearchOutcome::Found { cost, .. } => Some(*cost),
            _ => None,
        }
    }

    /// 简短的状态名称（用于日志和报告）
    pub fn status(&self) -> &'static str {
        match self {
            SearchOutcome::Found { .. } => "found",
            SearchOutcome::NotFound => "not_found",
            SearchOutcome::Interrupted { .. } => "interrupted",
        }
    }
}

/// 图搜索统计信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// 扩展的状态数
    pub expanded: u64,
    /// 压入边界的节点数（含起点）
    pub generated: u64,
    /// 弹出后因已扩展而丢弃的节点数
    pub duplicates_skipped: u64,
    /// 边界的最大长度
    pub max_frontier: usize,
    /// 耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 对抗搜索统计信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// 访问的节点数（每次递归调用计一次）
    pub nodes_visited: u64,
    /// Alpha-Beta 剪枝次数
    pub cutoffs: u64,
    /// 完整搜索过的最大深度
    pub completed_depth: u32,
    /// 预算耗尽时的原因
    pub interrupted: Option<Interrupt>,
    /// 耗时（毫秒）
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let found: SearchOutcome<char> = SearchOutcome::Found {
            actions: vec!['a', 'b'],
            cost: 2.0,
        };
        assert!(found.is_found());
        assert_eq!(found.actions(), &['a', 'b']);
        assert_eq!(found.cost(), Some(2.0));
        assert_eq!(found.status(), "found");

        let missing: SearchOutcome<char> = SearchOutcome::NotFound;
        assert!(!missing.is_found());
        assert!(missing.actions().is_empty());
        assert_eq!(missing.cost(), None);
    }

    #[test]
    fn test_empty_path_distinguishable_from_not_found() {
        let at_goal: SearchOutcome<char> = SearchOutcome::Found {
            actions: Vec::new(),
            cost: 0.0,
        };
        let missing: SearchOutcome<char> = SearchOutcome::NotFound;

        // 两者的动作序列都为空，但标签不同
        assert_eq!(at_goal.actions(), missing.actions());
        assert_ne!(at_goal, missing);
    }

    #[test]
    fn test_interrupted_yields_no_solution() {
        let outcome = SearchOutcome::Interrupted {
            reason: Interrupt::NodeBudget,
            partial: vec![1, 2, 3],
        };
        assert!(outcome.into_actions().is_empty());
    }

    #[test]
    fn test_stats_serialization() {
        let stats = SearchStats {
            expanded: 7,
            generated: 12,
            duplicates_skipped: 2,
            max_frontier: 5,
            elapsed_ms: 0,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: SearchStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);

        let reason = serde_json::to_string(&Interrupt::Deadline).unwrap();
        assert_eq!(reason, "\"deadline\"");
    }
}
