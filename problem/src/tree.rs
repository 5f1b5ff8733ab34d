//! 显式博弈树
//!
//! 用 JSON 描述：数字为叶子，数组为内部节点，
//! `{"value": v, "children": [...]}` 为带静态评估值的内部节点。
//!
//! 示例：`[[3, 5], [6, 9]]`

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::game::Game;

/// 节点编号
pub type NodeId = usize;

/// 随机树的最大层数
pub const MAX_TREE_DEPTH: u32 = 64;

/// 随机树的最大节点数
pub const MAX_TREE_NODES: usize = 1 << 20;

/// 博弈树描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeSpec {
    /// 叶子（静态评估值）
    Leaf(f64),
    /// 内部节点（静态评估值为 0）
    Node(Vec<TreeSpec>),
    /// 带静态评估值的内部节点
    Scored { value: f64, children: Vec<TreeSpec> },
}

#[derive(Debug, Clone, PartialEq)]
struct TreeNode {
    value: f64,
    children: Vec<NodeId>,
}

/// 显式博弈树，节点按先序编号，根为 0
#[derive(Debug, Clone, PartialEq)]
pub struct GameTree {
    nodes: Vec<TreeNode>,
}

impl GameTree {
    /// 从描述构建
    pub fn from_spec(spec: &TreeSpec) -> Result<Self> {
        let mut tree = Self { nodes: Vec::new() };
        tree.insert(spec)?;
        Ok(tree)
    }

    /// 从 JSON 字符串构建
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: TreeSpec = serde_json::from_str(json).map_err(|e| SearchError::InvalidTree {
            reason: e.to_string(),
        })?;
        Self::from_spec(&spec)
    }

    /// 构建完全树：每个内部节点有 `branching` 个子节点，叶子值按从左到右给出
    ///
    /// 叶子数必须是 `branching` 的整数次幂。
    pub fn complete(branching: usize, leaves: &[f64]) -> Result<Self> {
        if branching < 2 || leaves.is_empty() {
            return Err(SearchError::InvalidTree {
                reason: "Complete tree needs branching >= 2 and at least one leaf".to_string(),
            });
        }

        let mut level: Vec<TreeSpec> = leaves.iter().map(|&v| TreeSpec::Leaf(v)).collect();
        while level.len() > 1 {
            if level.len() % branching != 0 {
                return Err(SearchError::InvalidTree {
                    reason: format!(
                        "{} leaves is not a power of branching factor {}",
                        leaves.len(),
                        branching
                    ),
                });
            }
            let mut parents = Vec::with_capacity(level.len() / branching);
            let mut iter = level.into_iter();
            loop {
                let group: Vec<TreeSpec> = iter.by_ref().take(branching).collect();
                if group.is_empty() {
                    break;
                }
                parents.push(TreeSpec::Node(group));
            }
            level = parents;
        }

        match level.pop() {
            Some(root) => Self::from_spec(&root),
            None => Err(SearchError::InvalidTree {
                reason: "Empty tree".to_string(),
            }),
        }
    }

    /// 使用固定种子生成随机完全树；所有节点的评估值为 -100..=100 的整数
    ///
    /// 层数超过 [`MAX_TREE_DEPTH`] 或节点数超过 [`MAX_TREE_NODES`] 时返回错误。
    pub fn random(seed: u64, depth: u32, branching: usize) -> Result<Self> {
        let size = Self::random_size(depth, branching)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut tree = Self {
            nodes: Vec::with_capacity(size),
        };
        tree.grow(&mut rng, depth, branching);
        Ok(tree)
    }

    /// 随机完全树的节点数：1 + b + b^2 + ... + b^depth
    pub fn random_size(depth: u32, branching: usize) -> Result<usize> {
        if depth > MAX_TREE_DEPTH {
            return Err(SearchError::DepthLimitExceeded {
                depth,
                max: MAX_TREE_DEPTH,
            });
        }

        let mut total: usize = 1;
        let mut level: usize = 1;
        for _ in 0..depth {
            level = level.saturating_mul(branching);
            total = total.saturating_add(level);
            if total > MAX_TREE_NODES {
                return Err(SearchError::InvalidTree {
                    reason: format!(
                        "Random tree with depth {} and branching {} exceeds {} nodes",
                        depth, branching, MAX_TREE_NODES
                    ),
                });
            }
        }
        Ok(total)
    }

    /// 根节点
    pub fn root(&self) -> NodeId {
        0
    }

    /// 节点总数
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 节点的静态评估值
    pub fn value(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(node).map(|n| n.value)
    }

    fn insert(&mut self, spec: &TreeSpec) -> Result<NodeId> {
        let (value, children) = match spec {
            TreeSpec::Leaf(value) => (*value, &[][..]),
            TreeSpec::Node(children) => (0.0, children.as_slice()),
            TreeSpec::Scored { value, children } => (*value, children.as_slice()),
        };
        if value.is_nan() {
            return Err(SearchError::InvalidTree {
                reason: "NaN evaluation".to_string(),
            });
        }

        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            value,
            children: Vec::with_capacity(children.len()),
        });
        for child in children {
            let child_id = self.insert(child)?;
            self.nodes[id].children.push(child_id);
        }
        Ok(id)
    }

    fn grow(&mut self, rng: &mut ChaCha8Rng, depth: u32, branching: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            value: rng.gen_range(-100..=100) as f64,
            children: Vec::new(),
        });
        if depth > 0 {
            for _ in 0..branching {
                let child = self.grow(rng, depth - 1, branching);
                self.nodes[id].children.push(child);
            }
        }
        id
    }
}

impl Game for GameTree {
    type Position = NodeId;

    fn is_terminal(&self, position: &NodeId) -> bool {
        self.nodes
            .get(*position)
            .map_or(true, |n| n.children.is_empty())
    }

    fn static_evaluation(&self, position: &NodeId, _maximizing: bool) -> f64 {
        self.value(*position).unwrap_or(0.0)
    }

    fn children(&self, position: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(*position)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }
}
