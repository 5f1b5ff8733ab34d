//! 启发函数

use crate::problem::Problem;

/// 启发函数：估计从 `state` 到最近目标的剩余代价
///
/// 返回值必须非负。A* 的最优性要求启发函数可采纳（从不高估），
/// 这是调用方的前提条件，引擎无法检查。
pub trait Heuristic<P: Problem> {
    fn estimate(&self, state: &P::State, problem: &P) -> f64;
}

impl<P, F> Heuristic<P> for F
where
    P: Problem,
    F: Fn(&P::State, &P) -> f64,
{
    fn estimate(&self, state: &P::State, problem: &P) -> f64 {
        self(state, problem)
    }
}

/// 平凡启发函数 h ≡ 0，此时 A* 退化为一致代价搜索
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHeuristic;

impl<P: Problem> Heuristic<P> for NullHeuristic {
    fn estimate(&self, _state: &P::State, _problem: &P) -> f64 {
        0.0
    }
}
