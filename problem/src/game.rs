//! 双人博弈局面接口

/// 博弈规则
///
/// 局面由实现方持有，对抗搜索只通过这三个方法访问局面。
pub trait Game {
    /// 局面
    type Position: Clone;

    /// 是否为终局
    fn is_terminal(&self, position: &Self::Position) -> bool;

    /// 静态评估（正值对极大方有利）
    ///
    /// `maximizing` 为当前轮到的角色。
    fn static_evaluation(&self, position: &Self::Position, maximizing: bool) -> f64;

    /// 生成所有子局面
    fn children(&self, position: &Self::Position) -> Vec<Self::Position>;
}
