//! 图搜索引擎
//!
//! 深度优先、广度优先、一致代价、A* 共用同一套遍历，
//! 区别只在边界策略和优先级函数：
//! - DFS / BFS：不使用优先级
//! - UCS：f = g
//! - A*：f = g + h(state)
//!
//! 目标检测在出队时进行；已扩展的状态不会再次扩展。

use std::collections::HashSet;
use std::time::Instant;

use problem::{Heuristic, NullHeuristic, Problem, SearchOutcome, SearchStats};
use tracing::{debug, warn};

use crate::config::{Budget, SearchConfig, Strategy};

/// 搜索节点，按父指针存放在节点表中
struct Node<S, A> {
    state: S,
    parent: Option<usize>,
    action: Option<A>,
    cost: f64,
}

/// 图搜索引擎
pub struct GraphSearch {
    config: SearchConfig,
    stats: SearchStats,
}

impl GraphSearch {
    /// 创建新的搜索引擎
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
        }
    }

    /// 从策略创建
    pub fn from_strategy(strategy: Strategy) -> Self {
        Self::new(SearchConfig::from_strategy(strategy))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 上一次搜索的统计信息
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// 搜索（A* 使用平凡启发函数）
    pub fn search<P: Problem>(&mut self, problem: &P) -> SearchOutcome<P::Action> {
        self.search_with(problem, &NullHeuristic)
    }

    /// 搜索；启发函数只在 A* 下使用
    pub fn search_with<P, H>(&mut self, problem: &P, heuristic: &H) -> SearchOutcome<P::Action>
    where
        P: Problem,
        H: Heuristic<P> + ?Sized,
    {
        let strategy = self.config.strategy;
        let started = Instant::now();
        let budget = Budget::new(
            self.config.limits.max_expansions,
            self.config.limits.time_limit_ms,
            started,
        );
        self.stats = SearchStats::default();

        let priority = |state: &P::State, cost: f64| match strategy {
            Strategy::DepthFirst | Strategy::BreadthFirst => 0.0,
            Strategy::UniformCost => cost,
            Strategy::AStar => cost + heuristic.estimate(state, problem),
        };

        let mut nodes: Vec<Node<P::State, P::Action>> = Vec::new();
        let mut expanded: HashSet<P::State> = HashSet::new();
        let mut frontier = strategy.frontier_kind().build::<usize>();
        // 最近一次扩展的节点，预算耗尽时作为部分结果
        let mut incumbent = None;

        let start = problem.start_state();
        frontier.push(0, priority(&start, 0.0));
        nodes.push(Node {
            state: start,
            parent: None,
            action: None,
            cost: 0.0,
        });
        self.stats.generated = 1;
        self.stats.max_frontier = 1;

        debug!("Starting {} search", strategy.name());

        let outcome = loop {
            let Some(index) = frontier.pop() else {
                break SearchOutcome::NotFound;
            };
            let node = &nodes[index];

            if problem.is_goal(&node.state) {
                break SearchOutcome::Found {
                    actions: path_to(&nodes, index),
                    cost: node.cost,
                };
            }

            if expanded.contains(&node.state) {
                self.stats.duplicates_skipped += 1;
                continue;
            }

            // 目标检测和去重不消耗预算，只有扩展才计数
            if let Some(reason) = budget.check(self.stats.expanded) {
                warn!(
                    "{} search interrupted ({:?}) after {} expansions",
                    strategy.name(),
                    reason,
                    self.stats.expanded
                );
                break SearchOutcome::Interrupted {
                    reason,
                    partial: incumbent.map(|i| path_to(&nodes, i)).unwrap_or_default(),
                };
            }

            let state = node.state.clone();
            let cost = node.cost;
            expanded.insert(state.clone());
            self.stats.expanded += 1;
            incumbent = Some(index);

            for successor in problem.successors(&state) {
                debug_assert!(successor.cost >= 0.0, "step cost must be non-negative");
                if expanded.contains(&successor.state) {
                    continue;
                }
                let child_cost = cost + successor.cost;
                frontier.push(nodes.len(), priority(&successor.state, child_cost));
                nodes.push(Node {
                    state: successor.state,
                    parent: Some(index),
                    action: Some(successor.action),
                    cost: child_cost,
                });
                self.stats.generated += 1;
            }
            self.stats.max_frontier = self.stats.max_frontier.max(frontier.len());
        };

        self.stats.elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(
            "{} search finished: {}, expanded={}, generated={}, max_frontier={}",
            strategy.name(),
            outcome.status(),
            self.stats.expanded,
            self.stats.generated,
            self.stats.max_frontier
        );

        outcome
    }
}

impl Default for GraphSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// 沿父指针回溯出动作序列
fn path_to<S, A: Clone>(nodes: &[Node<S, A>], mut index: usize) -> Vec<A> {
    let mut actions = Vec::new();
    while let Some(parent) = nodes[index].parent {
        if let Some(action) = &nodes[index].action {
            actions.push(action.clone());
        }
        index = parent;
    }
    actions.reverse();
    actions
}

/// 深度优先搜索
pub fn depth_first_search<P: Problem>(problem: &P) -> SearchOutcome<P::Action> {
    GraphSearch::from_strategy(Strategy::DepthFirst).search(problem)
}

/// 广度优先搜索
pub fn breadth_first_search<P: Problem>(problem: &P) -> SearchOutcome<P::Action> {
    GraphSearch::from_strategy(Strategy::BreadthFirst).search(problem)
}

/// 一致代价搜索
pub fn uniform_cost_search<P: Problem>(problem: &P) -> SearchOutcome<P::Action> {
    GraphSearch::from_strategy(Strategy::UniformCost).search(problem)
}

/// A* 搜索；启发函数可采纳时返回最小代价路径
pub fn a_star_search<P, H>(problem: &P, heuristic: &H) -> SearchOutcome<P::Action>
where
    P: Problem,
    H: Heuristic<P> + ?Sized,
{
    GraphSearch::from_strategy(Strategy::AStar).search_with(problem, heuristic)
}
