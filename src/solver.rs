//! # 求解器
//!
//! 给定 4 个操作数（牌面数值 1~13），找出所有恰好用到每个操作数一次、
//! 结果等于 24 的四则运算表达式。
//!
//! ## 算法完整性与正确性
//! - **完整性**：对 4 个操作数进行全排列，共 4! = 24 种顺序（数值相同的操作数
//!   也按不同位置处理）；每一顺序都会尝试 3 个运算符位的所有 4^3 = 64 种组合；
//!   同时覆盖五种合法的二叉树括号形态（见 [`Shape`]）。
//!   每次调用共求值 24 × 64 × 5 = 7680 个候选表达式。
//! - **正确性**：所有运算在 `f64` 中完成，除法不做整数截断；
//!   除数恰好为 0 时只跳过当前候选，不影响其他候选；
//!   与 24 的比较使用绝对误差 `TOLERANCE`。
//! - **去重**：候选表达式按字符串去重，保留首次出现的顺序。

use std::collections::HashSet;
use std::fmt;

/// 目标值。
pub const TARGET: f64 = 24.0;

/// 判断结果是否等于 `TARGET` 时使用的绝对误差。
///
/// 诸如 `8 / (3 - (8 / 3))` 这样的链式除法只能近似得到 24，
/// 因此这个值决定了哪些手牌被判为有解。
pub const TOLERANCE: f64 = 1e-4;

/// `|value - 24| < 1e-4`
#[must_use]
pub fn is_target(value: f64) -> bool {
    (value - TARGET).abs() < TOLERANCE
}

/// 四种二元运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// 枚举顺序：`+ - * /`
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    #[must_use]
    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == c)
    }

    /// 尝试对两个操作数应用运算符。
    ///
    /// - 加、减、乘总是有效；
    /// - 除法在除数恰好为 0 时返回 `None`，由上层跳过该候选。
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            Operator::Add => Some(a + b),
            Operator::Subtract => Some(a - b),
            Operator::Multiply => Some(a * b),
            Operator::Divide if b == 0.0 => None,
            Operator::Divide => Some(a / b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 4 个叶子、3 个运算符的五种二叉树形态。
///
/// 叶子从左到右的顺序固定为 `a b c d`，运算符依次记作 `op1 op2 op3`：
/// 1. `((a op1 b) op2 c) op3 d`
/// 2. `(a op1 (b op2 c)) op3 d`
/// 3. `a op1 ((b op2 c) op3 d)`
/// 4. `a op1 (b op2 (c op3 d))`
/// 5. `(a op1 b) op2 (c op3 d)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    LeftChain,
    LeftNested,
    RightNested,
    RightChain,
    Balanced,
}

impl Shape {
    /// 求值顺序与上面的编号一致。
    pub const ALL: [Shape; 5] = [
        Shape::LeftChain,
        Shape::LeftNested,
        Shape::RightNested,
        Shape::RightChain,
        Shape::Balanced,
    ];

    /// 严格按照括号结构逐步调用 [`Operator::apply`]，任一步除以 0 即返回 `None`。
    #[must_use]
    pub fn evaluate(self, [a, b, c, d]: [f64; 4], [op1, op2, op3]: [Operator; 3]) -> Option<f64> {
        match self {
            Shape::LeftChain => op3.apply(op2.apply(op1.apply(a, b)?, c)?, d),
            Shape::LeftNested => op3.apply(op1.apply(a, op2.apply(b, c)?)?, d),
            Shape::RightNested => op1.apply(a, op3.apply(op2.apply(b, c)?, d)?),
            Shape::RightChain => op1.apply(a, op2.apply(b, op3.apply(c, d)?)?),
            Shape::Balanced => op2.apply(op1.apply(a, b)?, op3.apply(c, d)?),
        }
    }

    /// 生成该形态的规范括号字符串，操作数按数值输出。
    #[must_use]
    pub fn render(self, [a, b, c, d]: [i32; 4], [op1, op2, op3]: [Operator; 3]) -> String {
        match self {
            Shape::LeftChain => format!("(({a} {op1} {b}) {op2} {c}) {op3} {d}"),
            Shape::LeftNested => format!("({a} {op1} ({b} {op2} {c})) {op3} {d}"),
            Shape::RightNested => format!("{a} {op1} (({b} {op2} {c}) {op3} {d})"),
            Shape::RightChain => format!("{a} {op1} ({b} {op2} ({c} {op3} {d}))"),
            Shape::Balanced => format!("({a} {op1} {b}) {op2} ({c} {op3} {d})"),
        }
    }
}

/// 对给定的 4 个操作数，返回所有可得到 24 的表达式。
///
/// 操作数个数不是 4 时返回空列表而不是错误。
/// 输出顺序是枚举顺序（排列 → 运算符组合 → 形态）的副产物，
/// 调用方只能依赖“第一个元素是某个合法解”。
#[must_use]
pub fn find_solutions(operands: &[i32]) -> Vec<String> {
    let Ok(hand) = <[i32; 4]>::try_from(operands) else {
        log::debug!("expected 4 operands, got {}", operands.len());
        return Vec::new();
    };

    let mut candidates = Vec::new();
    let mut used = [false; 4];
    let mut p = Vec::with_capacity(hand.len());
    generate_permutations(&hand, &mut used, &mut p, &mut |perm: &[i32]| {
        if let Ok(perm) = <[i32; 4]>::try_from(perm) {
            find_solutions_for_permutation(perm, &mut candidates);
        }
    });

    let solutions = dedup_preserving_order(candidates);
    log::debug!("hand {:?}: {} distinct solutions", hand, solutions.len());
    solutions
}

/// 回溯生成 `nums` 的所有排列，取得完整排列后调用回调函数。
///
/// 按位置而不是按数值区分元素，因此重复的数值会产生重复的排列。
fn generate_permutations(
    nums: &[i32],
    used: &mut [bool],
    p: &mut Vec<i32>,
    callback: &mut dyn FnMut(&[i32]),
) {
    if p.len() == nums.len() {
        callback(p);
        return;
    }
    for i in 0..nums.len() {
        if !used[i] {
            used[i] = true;
            p.push(nums[i]);
            generate_permutations(nums, used, p, callback);
            p.pop();
            used[i] = false;
        }
    }
}

/// 对固定顺序的 4 个数字，尝试全部 64 种运算符组合与 5 种括号结构。
fn find_solutions_for_permutation(perm: [i32; 4], candidates: &mut Vec<String>) {
    let values = perm.map(f64::from);
    for op1 in Operator::ALL {
        for op2 in Operator::ALL {
            for op3 in Operator::ALL {
                let ops = [op1, op2, op3];
                for shape in Shape::ALL {
                    if let Some(res) = shape.evaluate(values, ops) {
                        if is_target(res) {
                            candidates.push(shape.render(perm, ops));
                        }
                    }
                }
            }
        }
    }
}

fn dedup_preserving_order(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
