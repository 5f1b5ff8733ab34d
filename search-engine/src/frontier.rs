//! 边界容器
//!
//! 三种出队顺序：后进先出、先进先出、按优先级（小者先出）。

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};

/// 边界：尚未扩展的搜索节点
pub trait Frontier<T> {
    /// 入队；栈和队列忽略 `priority`
    fn push(&mut self, item: T, priority: f64);

    /// 出队
    fn pop(&mut self) -> Option<T>;

    /// 元素个数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 边界策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierKind {
    /// 后进先出
    Stack,
    /// 先进先出
    Queue,
    /// 优先级最小者先出，同优先级按入队顺序
    Priority,
}

impl FrontierKind {
    /// 创建对应的空边界
    pub fn build<T: 'static>(&self) -> Box<dyn Frontier<T>> {
        match self {
            FrontierKind::Stack => Box::new(StackFrontier::new()),
            FrontierKind::Queue => Box::new(QueueFrontier::new()),
            FrontierKind::Priority => Box::new(PriorityFrontier::new()),
        }
    }
}

/// 栈（深度优先）
#[derive(Debug, Clone)]
pub struct StackFrontier<T> {
    items: Vec<T>,
}

impl<T> StackFrontier<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Default for StackFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for StackFrontier<T> {
    fn push(&mut self, item: T, _priority: f64) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// 队列（广度优先）
#[derive(Debug, Clone)]
pub struct QueueFrontier<T> {
    items: VecDeque<T>,
}

impl<T> QueueFrontier<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Default for QueueFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for QueueFrontier<T> {
    fn push(&mut self, item: T, _priority: f64) {
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// 堆条目：按 (priority, seq) 升序出堆
#[derive(Debug)]
struct Entry<T> {
    priority: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap 是大顶堆，反转后得到小顶堆
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// 稳定优先队列（一致代价、A*）
#[derive(Debug)]
pub struct PriorityFrontier<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> PriorityFrontier<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// 队首的优先级
    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.priority)
    }
}

impl<T> Default for PriorityFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Frontier<T> for PriorityFrontier<T> {
    fn push(&mut self, item: T, priority: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority,
            seq,
            item,
        });
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|e| e.item)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
