//! 显式带权有向图
//!
//! 状态为节点编号，动作为目标节点编号（两节点之间最多一条边）。

use std::collections::{HashSet, VecDeque};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SearchError};
use crate::problem::{Problem, Successor};

/// 带权有向图（搜索问题）
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph {
    /// 邻接表：edges[from] = [(to, cost)]，按插入顺序
    edges: Vec<Vec<(usize, f64)>>,
    start: usize,
    goals: Vec<usize>,
}

impl WeightedGraph {
    /// 创建含 `node_count` 个节点、无边的图，起点为 0
    pub fn new(node_count: usize) -> Self {
        Self {
            edges: vec![Vec::new(); node_count],
            start: 0,
            goals: Vec::new(),
        }
    }

    /// 使用固定种子生成随机图（起点 0，目标为最后一个节点）
    ///
    /// 每个节点有 `out_degree` 条出边，代价为 1..=max_cost 的整数。
    pub fn random(seed: u64, node_count: usize, out_degree: usize, max_cost: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut graph = Self::new(node_count);

        if node_count == 0 {
            return graph;
        }

        for from in 0..node_count {
            for _ in 0..out_degree {
                let to = rng.gen_range(0..node_count);
                let cost = rng.gen_range(1..=max_cost.max(1)) as f64;
                graph.edges[from].retain(|(t, _)| *t != to);
                graph.edges[from].push((to, cost));
            }
        }
        graph.goals.push(node_count - 1);
        graph
    }

    /// 节点数
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// 添加（或替换）一条有向边
    pub fn add_edge(&mut self, from: usize, to: usize, cost: f64) -> Result<()> {
        self.check(from)?;
        self.check(to)?;

        let out = &mut self.edges[from];
        match out.iter_mut().find(|(t, _)| *t == to) {
            Some(edge) => edge.1 = cost,
            None => out.push((to, cost)),
        }
        Ok(())
    }

    /// 添加一对方向相反、代价相同的边
    pub fn add_undirected_edge(&mut self, a: usize, b: usize, cost: f64) -> Result<()> {
        self.add_edge(a, b, cost)?;
        self.add_edge(b, a, cost)
    }

    /// 添加目标节点
    pub fn add_goal(&mut self, node: usize) -> Result<()> {
        self.check(node)?;
        if !self.goals.contains(&node) {
            self.goals.push(node);
        }
        Ok(())
    }

    /// 边代价
    pub fn edge_cost(&self, from: usize, to: usize) -> Option<f64> {
        self.edges
            .get(from)?
            .iter()
            .find(|(t, _)| *t == to)
            .map(|(_, cost)| *cost)
    }

    /// 从起点可达的节点数（含起点）
    pub fn reachable_count(&self) -> usize {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(self.start);
        queue.push_back(self.start);

        while let Some(node) = queue.pop_front() {
            for &(to, _) in &self.edges[node] {
                if seen.insert(to) {
                    queue.push_back(to);
                }
            }
        }
        seen.len()
    }

    fn check(&self, node: usize) -> Result<()> {
        if node < self.edges.len() {
            Ok(())
        } else {
            Err(SearchError::UnknownState { id: node })
        }
    }
}

impl Problem for WeightedGraph {
    type State = usize;
    type Action = usize;

    fn start_state(&self) -> usize {
        self.start
    }

    fn is_goal(&self, state: &usize) -> bool {
        self.goals.contains(state)
    }

    fn successors(&self, state: &usize) -> Vec<Successor<usize, usize>> {
        self.edges
            .get(*state)
            .map(|out| {
                out.iter()
                    .map(|&(to, cost)| Successor::new(to, to, cost))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn cost_of_actions(&self, actions: &[usize]) -> Result<f64> {
        let mut current = self.start;
        let mut total = 0.0;
        for (index, &to) in actions.iter().enumerate() {
            let cost = self
                .edge_cost(current, to)
                .ok_or(SearchError::IllegalAction { index })?;
            total += cost;
            current = to;
        }
        Ok(total)
    }
}
