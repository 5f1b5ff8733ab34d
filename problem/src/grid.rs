//! 网格迷宫
//!
//! 布局格式（每行一个字符串，第 0 行在最上方）：
//! - `%` 墙
//! - `P` 起点
//! - `.` 目标
//! - 空格 空地（进入代价 1）
//! - `1`-`9` 空地，进入代价为该数字
//!
//! 示例：
//! ```text
//! %%%%%
//! %P 2%
//! %% .%
//! %%%%%
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::heuristic::Heuristic;
use crate::problem::{Problem, Successor};

/// 网格坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// 列
    pub x: usize,
    /// 行
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// 移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// 后继生成顺序
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// 坐标偏移 (dx, dy)，North 使 y 减小
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// 反方向
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// 曼哈顿距离
pub fn manhattan_distance(a: Cell, b: Cell) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// 网格迷宫（搜索问题）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMaze {
    width: usize,
    height: usize,
    /// 索引为 y * width + x；None 表示墙，Some(c) 表示进入代价为 c 的空地
    cells: Vec<Option<u32>>,
    start: Cell,
    goals: Vec<Cell>,
}

impl GridMaze {
    /// 创建无墙、单位代价的迷宫；起点和目标必须在网格内
    pub fn new(width: usize, height: usize, start: Cell, goal: Cell) -> Result<Self> {
        let maze = Self {
            width,
            height,
            cells: vec![Some(1); width * height],
            start,
            goals: vec![goal],
        };
        for (name, cell) in [("Start", start), ("Goal", goal)] {
            if maze.index(cell).is_none() {
                return Err(SearchError::InvalidLayout {
                    reason: format!(
                        "{} ({}, {}) is outside the {}x{} grid",
                        name, cell.x, cell.y, width, height
                    ),
                });
            }
        }
        Ok(maze)
    }

    /// 解析布局
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(SearchError::InvalidLayout {
                reason: "Empty layout".to_string(),
            });
        }

        let width = rows[0].as_ref().chars().count();
        let mut cells = Vec::with_capacity(width * height);
        let mut start = None;
        let mut goals = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(SearchError::InvalidLayout {
                    reason: format!(
                        "Row {} has {} columns, expected {}",
                        y,
                        row.chars().count(),
                        width
                    ),
                });
            }

            for (x, c) in row.chars().enumerate() {
                let cell = match c {
                    '%' => None,
                    ' ' => Some(1),
                    'P' => {
                        if start.replace(Cell::new(x, y)).is_some() {
                            return Err(SearchError::InvalidLayout {
                                reason: "Multiple start cells".to_string(),
                            });
                        }
                        Some(1)
                    }
                    '.' => {
                        goals.push(Cell::new(x, y));
                        Some(1)
                    }
                    '1'..='9' => c.to_digit(10),
                    _ => {
                        return Err(SearchError::InvalidLayout {
                            reason: format!("Invalid layout character: {:?}", c),
                        })
                    }
                };
                cells.push(cell);
            }
        }

        let start = start.ok_or_else(|| SearchError::InvalidLayout {
            reason: "Missing start cell 'P'".to_string(),
        })?;
        if goals.is_empty() {
            return Err(SearchError::InvalidLayout {
                reason: "Missing goal cell '.'".to_string(),
            });
        }

        debug!(
            "Parsed maze {}x{}, start={:?}, goals={}",
            width,
            height,
            start,
            goals.len()
        );

        Ok(Self {
            width,
            height,
            cells,
            start,
            goals,
        })
    }

    /// 从多行字符串解析
    pub fn from_layout(layout: &str) -> Result<Self> {
        let rows: Vec<&str> = layout.lines().collect();
        Self::parse(&rows)
    }

    /// 放置一堵墙（越界时忽略）
    pub fn add_wall(&mut self, cell: Cell) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = None;
        }
    }

    /// 设置空地的进入代价，代价至少为 1
    pub fn set_cost(&mut self, cell: Cell, cost: u32) -> Result<()> {
        let index = self.index(cell).ok_or_else(|| SearchError::InvalidLayout {
            reason: format!("Cell ({}, {}) is outside the grid", cell.x, cell.y),
        })?;
        if cost == 0 {
            return Err(SearchError::InvalidLayout {
                reason: format!("Cell ({}, {}) must cost at least 1", cell.x, cell.y),
            });
        }
        self.cells[index] = Some(cost);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goals(&self) -> &[Cell] {
        &self.goals
    }

    /// 是否为墙（越界视为墙）
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.entry_cost(cell).is_none()
    }

    /// 空地数量
    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// 进入某格的代价；墙或越界时为 None
    pub fn entry_cost(&self, cell: Cell) -> Option<u32> {
        self.index(cell).and_then(|index| self.cells[index])
    }

    /// 沿方向移动一步；撞墙或越界时为 None
    pub fn step(&self, from: Cell, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.offset();
        let x = from.x.checked_add_signed(dx)?;
        let y = from.y.checked_add_signed(dy)?;
        let to = Cell::new(x, y);
        self.entry_cost(to).map(|_| to)
    }

    /// 从 `from` 出发依次执行动作，返回终点
    pub fn walk(&self, from: Cell, actions: &[Direction]) -> Result<Cell> {
        let mut current = from;
        for (index, direction) in actions.iter().enumerate() {
            current = self
                .step(current, *direction)
                .ok_or(SearchError::IllegalAction { index })?;
        }
        Ok(current)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.x < self.width && cell.y < self.height {
            Some(cell.y * self.width + cell.x)
        } else {
            None
        }
    }
}

impl Problem for GridMaze {
    type State = Cell;
    type Action = Direction;

    fn start_state(&self) -> Cell {
        self.start
    }

    fn is_goal(&self, state: &Cell) -> bool {
        self.goals.contains(state)
    }

    fn successors(&self, state: &Cell) -> Vec<Successor<Cell, Direction>> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| {
                let next = self.step(*state, direction)?;
                let cost = self.entry_cost(next)?;
                Some(Successor::new(next, direction, cost as f64))
            })
            .collect()
    }

    fn cost_of_actions(&self, actions: &[Direction]) -> Result<f64> {
        let mut current = self.start;
        let mut total = 0.0;
        for (index, direction) in actions.iter().enumerate() {
            let next = self
                .step(current, *direction)
                .ok_or(SearchError::IllegalAction { index })?;
            total += self.entry_cost(next).unwrap_or(0) as f64;
            current = next;
        }
        Ok(total)
    }
}

/// 到最近目标的曼哈顿距离
///
/// 每步代价至少为 1，因此可采纳。
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanHeuristic;

impl Heuristic<GridMaze> for ManhattanHeuristic {
    fn estimate(&self, state: &Cell, problem: &GridMaze) -> f64 {
        problem
            .goals()
            .iter()
            .map(|goal| manhattan_distance(*state, *goal))
            .min()
            .unwrap_or(0) as f64
    }
}
