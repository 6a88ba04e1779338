//! # 24 点游戏
//!
//! 四张牌（A=1 .. K=13）用 `+ - * /` 和任意括号组合，
//! 只要存在一个每张牌恰好用一次、结果为 24 的表达式，这手牌就有解。
//!
//! [`solver`] 是纯粹的搜索。牌面、随机抽牌、答案校验、游戏会话、
//! 交互循环和结果展示都围绕它，只交给它四个整数。

pub mod card;
pub mod draw;
pub mod errors;
pub mod log;
pub mod play;
pub mod report;
pub mod session;
pub mod solver;
pub mod validator;

pub use solver::{find_solutions, is_target, TARGET, TOLERANCE};
