//! 对抗搜索
//!
//! 实现 Minimax + Alpha-Beta 剪枝 + 迭代加深

use std::time::Instant;

use problem::{Game, GameStats, Interrupt};
use tracing::{debug, warn};

use crate::config::{AdversarialConfig, Budget};

/// 递归层数上限
pub const MAX_PLY: u32 = 64;

/// 根节点的最佳走法
#[derive(Debug, Clone, PartialEq)]
pub struct BestMove<P> {
    /// 在 `children` 中的下标
    pub index: usize,
    /// 子局面
    pub position: P,
    /// 评估值
    pub value: f64,
}

/// 纯 Minimax
pub fn minimax<G: Game>(game: &G, position: &G::Position, depth: u32, maximizing: bool) -> f64 {
    Searcher::new(game, Budget::unlimited()).minimax(position, depth, maximizing)
}

/// Alpha-Beta 剪枝的 Minimax
///
/// 以 `(-∞, +∞)` 为窗口调用时，返回值与 [`minimax`] 完全相同。
pub fn minimax_alpha_beta<G: Game>(
    game: &G,
    position: &G::Position,
    depth: u32,
    alpha: f64,
    beta: f64,
    maximizing: bool,
) -> f64 {
    Searcher::new(game, Budget::unlimited()).alpha_beta(position, depth, alpha, beta, maximizing)
}

/// 单次搜索的递归状态
struct Searcher<'a, G: Game> {
    game: &'a G,
    budget: Budget,
    nodes: u64,
    cutoffs: u64,
    interrupted: Option<Interrupt>,
}

impl<'a, G: Game> Searcher<'a, G> {
    fn new(game: &'a G, budget: Budget) -> Self {
        Self {
            game,
            budget,
            nodes: 0,
            cutoffs: 0,
            interrupted: None,
        }
    }

    /// 预算耗尽后不再展开任何节点
    fn exhausted(&mut self) -> bool {
        if self.interrupted.is_none() {
            self.interrupted = self.budget.check(self.nodes);
        }
        self.interrupted.is_some()
    }

    /// 截断时返回 None，否则返回子局面
    fn expand(&mut self, position: &G::Position, depth: u32) -> Option<Vec<G::Position>> {
        self.nodes += 1;

        if self.exhausted() || depth == 0 || self.game.is_terminal(position) {
            return None;
        }

        // 没有子局面同样视为终局
        let children = self.game.children(position);
        if children.is_empty() {
            None
        } else {
            Some(children)
        }
    }

    fn minimax(&mut self, position: &G::Position, depth: u32, maximizing: bool) -> f64 {
        let Some(children) = self.expand(position, depth) else {
            return self.game.static_evaluation(position, maximizing);
        };

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for child in &children {
                best = best.max(self.minimax(child, depth - 1, false));
                if self.interrupted.is_some() {
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for child in &children {
                best = best.min(self.minimax(child, depth - 1, true));
                if self.interrupted.is_some() {
                    break;
                }
            }
            best
        }
    }

    fn alpha_beta(
        &mut self,
        position: &G::Position,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> f64 {
        let Some(children) = self.expand(position, depth) else {
            return self.game.static_evaluation(position, maximizing);
        };

        if maximizing {
            let mut value = f64::NEG_INFINITY;
            for child in &children {
                value = value.max(self.alpha_beta(child, depth - 1, alpha, beta, false));
                alpha = alpha.max(value);
                if self.interrupted.is_some() {
                    break;
                }
                if beta <= alpha {
                    self.cutoffs += 1;
                    break; // Beta 剪枝
                }
            }
            value
        } else {
            let mut value = f64::INFINITY;
            for child in &children {
                value = value.min(self.alpha_beta(child, depth - 1, alpha, beta, true));
                beta = beta.min(value);
                if self.interrupted.is_some() {
                    break;
                }
                if beta <= alpha {
                    self.cutoffs += 1;
                    break; // Alpha 剪枝
                }
            }
            value
        }
    }

    /// 搜索根节点的每个子局面
    ///
    /// 返回最佳走法以及本层是否完整搜索（未被预算打断）。
    fn root(
        &mut self,
        position: &G::Position,
        depth: u32,
        maximizing: bool,
        pruning: bool,
    ) -> (Option<BestMove<G::Position>>, bool) {
        let Some(children) = self.expand(position, depth) else {
            return (None, self.interrupted.is_none());
        };

        let mut alpha = f64::NEG_INFINITY;
        let mut beta = f64::INFINITY;
        let mut best: Option<BestMove<G::Position>> = None;

        for (index, child) in children.into_iter().enumerate() {
            let value = if pruning {
                self.alpha_beta(&child, depth - 1, alpha, beta, !maximizing)
            } else {
                self.minimax(&child, depth - 1, !maximizing)
            };
            if self.interrupted.is_some() {
                // 被打断的子树评估值不可信
                break;
            }

            let better = match &best {
                None => true,
                Some(b) if maximizing => value > b.value,
                Some(b) => value < b.value,
            };
            if better {
                best = Some(BestMove {
                    index,
                    position: child,
                    value,
                });
            }

            if maximizing {
                alpha = alpha.max(value);
            } else {
                beta = beta.min(value);
            }
        }

        (best, self.interrupted.is_none())
    }
}

/// 对抗搜索引擎
pub struct AdversarialSearch {
    config: AdversarialConfig,
    stats: GameStats,
}

impl AdversarialSearch {
    /// 创建新的搜索引擎
    pub fn new(config: AdversarialConfig) -> Self {
        Self {
            config,
            stats: GameStats::default(),
        }
    }

    pub fn config(&self) -> &AdversarialConfig {
        &self.config
    }

    /// 上一次搜索的统计信息
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.stats.nodes_visited
    }

    /// 以 `max_depth` 评估局面
    ///
    /// 预算耗尽时返回尽力而为的值，并在统计中记录原因。
    pub fn evaluate<G: Game>(&mut self, game: &G, position: &G::Position, maximizing: bool) -> f64 {
        let started = Instant::now();
        let mut searcher = Searcher::new(game, self.budget(started));
        let depth = self.config.max_depth;

        let value = if self.config.pruning {
            searcher.alpha_beta(position, depth, f64::NEG_INFINITY, f64::INFINITY, maximizing)
        } else {
            searcher.minimax(position, depth, maximizing)
        };

        let completed = if searcher.interrupted.is_none() { depth } else { 0 };
        self.finish(&searcher, completed, started);
        value
    }

    /// 以 `max_depth` 搜索根节点的最佳子局面；根为终局或无子局面时返回 None
    pub fn best_move<G: Game>(
        &mut self,
        game: &G,
        position: &G::Position,
        maximizing: bool,
    ) -> Option<BestMove<G::Position>> {
        let started = Instant::now();
        let mut searcher = Searcher::new(game, self.budget(started));
        let depth = self.config.max_depth.max(1);

        let (best, complete) = searcher.root(position, depth, maximizing, self.config.pruning);
        self.finish(&searcher, if complete { depth } else { 0 }, started);
        best
    }

    /// 迭代加深：依次搜索 1..=max_depth 层，保留最深一次完整搜索的结果
    ///
    /// 若第一层也未能完成，返回其中已评估部分的最佳走法。
    pub fn iterative_deepening<G: Game>(
        &mut self,
        game: &G,
        position: &G::Position,
        maximizing: bool,
    ) -> Option<BestMove<G::Position>> {
        let started = Instant::now();
        let mut searcher = Searcher::new(game, self.budget(started));
        let mut best = None;
        let mut completed_depth = 0;

        for depth in 1..=self.config.max_depth.max(1) {
            let (current, complete) =
                searcher.root(position, depth, maximizing, self.config.pruning);

            if complete {
                completed_depth = depth;
                best = current;
            } else {
                if best.is_none() {
                    best = current;
                }
                break;
            }

            // 根没有子局面时更深的搜索也不会有结果
            if best.is_none() {
                break;
            }
        }

        self.finish(&searcher, completed_depth, started);
        best
    }

    fn budget(&self, started: Instant) -> Budget {
        Budget::new(
            self.config.limits.max_nodes,
            self.config.limits.time_limit_ms,
            started,
        )
    }

    fn finish<G: Game>(
        &mut self,
        searcher: &Searcher<'_, G>,
        completed_depth: u32,
        started: Instant,
    ) {
        self.stats = GameStats {
            nodes_visited: searcher.nodes,
            cutoffs: searcher.cutoffs,
            completed_depth,
            interrupted: searcher.interrupted,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if let Some(reason) = searcher.interrupted {
            warn!(
                "Game search interrupted ({:?}) after {} nodes, completed depth {}",
                reason, searcher.nodes, completed_depth
            );
        } else {
            debug!(
                "Game search finished: nodes={}, cutoffs={}, depth={}",
                searcher.nodes, searcher.cutoffs, completed_depth
            );
        }
    }
}

impl Default for AdversarialSearch {
    fn default() -> Self {
        Self::new(AdversarialConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameLimits;
    use problem::GameTree;

    /// 深度 2 的二叉树，叶子为 [3, 5, 6, 9]
    fn literal_tree() -> GameTree {
        GameTree::complete(2, &[3.0, 5.0, 6.0, 9.0]).unwrap()
    }

    /// 非终局却没有子局面的博弈
    struct Stuck;

    impl Game for Stuck {
        type Position = ();

        fn is_terminal(&self, _position: &()) -> bool {
            false
        }

        fn static_evaluation(&self, _position: &(), maximizing: bool) -> f64 {
            if maximizing {
                7.0
            } else {
                -7.0
            }
        }

        fn children(&self, _position: &()) -> Vec<()> {
            Vec::new()
        }
    }

    fn count_nodes<G: Game>(game: &G, position: &G::Position, depth: u32, pruning: bool) -> u64 {
        let mut searcher = Searcher::new(game, Budget::unlimited());
        if pruning {
            searcher.alpha_beta(position, depth, f64::NEG_INFINITY, f64::INFINITY, true);
        } else {
            searcher.minimax(position, depth, true);
        }
        searcher.nodes
    }

    #[test]
    fn test_literal_tree_value() {
        let tree = literal_tree();
        let root = tree.root();

        // max(min(3, 5), min(6, 9)) = max(3, 6) = 6
        let expected = (3.0f64.min(5.0)).max(6.0f64.min(9.0));
        assert_eq!(expected, 6.0);
        assert_eq!(minimax(&tree, &root, 2, true), expected);
        assert_eq!(
            minimax_alpha_beta(&tree, &root, 2, f64::NEG_INFINITY, f64::INFINITY, true),
            expected
        );

        // 极小方为根：min(max(3, 5), max(6, 9)) = 5
        assert_eq!(minimax(&tree, &root, 2, false), 5.0);
    }

    #[test]
    fn test_depth_zero_returns_static_evaluation() {
        let tree = GameTree::from_json(r#"{"value": 42, "children": [1, 2]}"#).unwrap();
        assert_eq!(minimax(&tree, &tree.root(), 0, true), 42.0);
        assert_eq!(
            minimax_alpha_beta(&tree, &tree.root(), 0, f64::NEG_INFINITY, f64::INFINITY, true),
            42.0
        );
    }

    #[test]
    fn test_no_children_is_terminal() {
        // 不能对空集合取最大值
        assert_eq!(minimax(&Stuck, &(), 3, true), 7.0);
        assert_eq!(minimax(&Stuck, &(), 3, false), -7.0);
        assert_eq!(
            minimax_alpha_beta(&Stuck, &(), 3, f64::NEG_INFINITY, f64::INFINITY, true),
            7.0
        );
    }

    #[test]
    fn test_depth_cutoff_uses_internal_evaluation() {
        let tree = GameTree::from_json(
            r#"[{"value": 10, "children": [1, 2]}, {"value": -4, "children": [8, 9]}]"#,
        )
        .unwrap();
        // 深度 1 时只看内部节点评估值
        assert_eq!(minimax(&tree, &tree.root(), 1, true), 10.0);
        // 深度 2 时：max(min(1, 2), min(8, 9)) = 8
        assert_eq!(minimax(&tree, &tree.root(), 2, true), 8.0);
    }

    #[test]
    fn test_alpha_beta_matches_minimax_on_random_trees() {
        for seed in 0..25 {
            let tree = GameTree::random(seed, 5, 3).unwrap();
            for depth in 0..=5 {
                for maximizing in [true, false] {
                    let plain = minimax(&tree, &tree.root(), depth, maximizing);
                    let pruned = minimax_alpha_beta(
                        &tree,
                        &tree.root(),
                        depth,
                        f64::NEG_INFINITY,
                        f64::INFINITY,
                        maximizing,
                    );
                    assert_eq!(plain, pruned, "seed {} depth {}", seed, depth);
                }
            }
        }
    }

    #[test]
    fn test_alpha_beta_visits_fewer_nodes() {
        // 第二棵子树的第一个叶子 2 < 3，剩余叶子被剪掉
        let tree = GameTree::from_json("[[3, 5], [2, 9]]").unwrap();
        assert_eq!(count_nodes(&tree, &tree.root(), 2, false), 7);
        assert_eq!(count_nodes(&tree, &tree.root(), 2, true), 6);

        for seed in 0..10 {
            let tree = GameTree::random(seed, 4, 4).unwrap();
            let pruned = count_nodes(&tree, &tree.root(), 4, true);
            let full = count_nodes(&tree, &tree.root(), 4, false);
            assert!(pruned <= full, "剪枝访问了 {} 个节点，完整搜索 {}", pruned, full);
        }
    }

    #[test]
    fn test_best_move() {
        let tree = literal_tree();
        let mut engine = AdversarialSearch::new(AdversarialConfig::new(2));

        let best = engine.best_move(&tree, &tree.root(), true).unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.value, 6.0);
        assert_eq!(engine.stats().completed_depth, 2);
        assert_eq!(engine.stats().interrupted, None);

        let best = engine.best_move(&tree, &tree.root(), false).unwrap();
        assert_eq!(best.index, 0);
        assert_eq!(best.value, 5.0);
    }

    #[test]
    fn test_best_move_on_terminal_root() {
        let tree = GameTree::from_json("7").unwrap();
        let mut engine = AdversarialSearch::new(AdversarialConfig::new(3));
        assert!(engine.best_move(&tree, &tree.root(), true).is_none());
        assert!(engine.iterative_deepening(&tree, &tree.root(), true).is_none());
    }

    #[test]
    fn test_engine_pruning_toggle_agrees() {
        for seed in 0..10 {
            let tree = GameTree::random(seed, 4, 3).unwrap();
            let mut pruned = AdversarialSearch::new(AdversarialConfig::new(4));
            let mut plain = AdversarialSearch::new(AdversarialConfig::new(4).without_pruning());

            let a = pruned.evaluate(&tree, &tree.root(), true);
            let b = plain.evaluate(&tree, &tree.root(), true);
            assert_eq!(a, b);
            assert!(pruned.nodes_searched() <= plain.nodes_searched());

            let best_a = pruned.best_move(&tree, &tree.root(), true).unwrap();
            let best_b = plain.best_move(&tree, &tree.root(), true).unwrap();
            assert_eq!(best_a.value, best_b.value);
            assert_eq!(best_a.value, a);
        }
    }

    #[test]
    fn test_iterative_deepening_completes() {
        let tree = GameTree::random(3, 4, 3).unwrap();
        let mut engine = AdversarialSearch::new(AdversarialConfig::new(4));
        let best = engine.iterative_deepening(&tree, &tree.root(), true).unwrap();

        assert_eq!(engine.stats().completed_depth, 4);
        assert_eq!(best.value, minimax(&tree, &tree.root(), 4, true));
    }

    #[test]
    fn test_node_budget_returns_incumbent() {
        let tree = GameTree::random(11, 6, 3).unwrap();
        let config = AdversarialConfig::new(6).with_limits(GameLimits {
            max_nodes: Some(30),
            time_limit_ms: None,
        });
        let mut engine = AdversarialSearch::new(config);

        let best = engine.iterative_deepening(&tree, &tree.root(), true);
        assert!(best.is_some());
        assert!(engine.stats().completed_depth < 6);
        assert_eq!(engine.stats().interrupted, Some(Interrupt::NodeBudget));
        assert_eq!(engine.nodes_searched(), 30);
    }

    #[test]
    fn test_deadline_evaluate_returns_static_value() {
        let tree = GameTree::from_json(r#"{"value": 3, "children": [[1, 2], [4, 5]]}"#).unwrap();
        let config = AdversarialConfig::new(2).with_limits(GameLimits {
            max_nodes: None,
            time_limit_ms: Some(0),
        });
        let mut engine = AdversarialSearch::new(config);

        assert_eq!(engine.evaluate(&tree, &tree.root(), true), 3.0);
        assert_eq!(engine.stats().interrupted, Some(Interrupt::Deadline));
        assert_eq!(engine.stats().completed_depth, 0);
    }
}
