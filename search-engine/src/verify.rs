//! 路径校验
//!
//! 只依赖问题报告的后继边重放动作序列，与搜索过程无关。

use problem::{Problem, Result, SearchError};

/// 从起点重放 `actions`，返回累计代价
///
/// 每一步都必须是当前状态报告的后继边之一，且终点必须是目标状态。
pub fn verify_path<P>(problem: &P, actions: &[P::Action]) -> Result<f64>
where
    P: Problem,
    P::Action: PartialEq,
{
    let mut state = problem.start_state();
    let mut total = 0.0;

    for (index, action) in actions.iter().enumerate() {
        let successor = problem
            .successors(&state)
            .into_iter()
            .find(|s| &s.action == action)
            .ok_or(SearchError::IllegalAction { index })?;
        total += successor.cost;
        state = successor.state;
    }

    if problem.is_goal(&state) {
        Ok(total)
    } else {
        Err(SearchError::GoalNotReached)
    }
}
