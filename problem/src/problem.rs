//! 搜索问题接口

use std::hash::Hash;

use crate::error::Result;

/// 后继边：(下一状态, 动作, 步代价)
///
/// 步代价必须非负。
#[derive(Debug, Clone, PartialEq)]
pub struct Successor<S, A> {
    pub state: S,
    pub action: A,
    pub cost: f64,
}

impl<S, A> Successor<S, A> {
    /// 创建新的后继边
    pub fn new(state: S, action: A, cost: f64) -> Self {
        Self {
            state,
            action,
            cost,
        }
    }
}

/// 搜索问题
///
/// 由调用方实现，搜索引擎只读取，从不修改。
pub trait Problem {
    /// 状态：只要求可比较、可哈希
    type State: Clone + Eq + Hash;
    /// 动作：不透明的转移标记
    type Action: Clone;

    /// 起始状态
    fn start_state(&self) -> Self::State;

    /// 是否为目标状态
    fn is_goal(&self, state: &Self::State) -> bool;

    /// 生成后继边
    fn successors(&self, state: &Self::State) -> Vec<Successor<Self::State, Self::Action>>;

    /// 计算动作序列的总代价（仅用于独立校验，搜索本身不调用）
    ///
    /// 序列必须由合法动作组成，否则返回 [`SearchError::IllegalAction`]。
    ///
    /// [`SearchError::IllegalAction`]: crate::SearchError::IllegalAction
    fn cost_of_actions(&self, actions: &[Self::Action]) -> Result<f64>;
}
