//! 展示层辅助：解法预览和日志记录。

use std::fmt;
use std::io::{self, Write};

use chrono::{DateTime, TimeZone};

/// 计算模式下预览的解法条数
pub const CALCULATION_PREVIEW: usize = 10;

/// 挑战模式下“查看答案”预览的解法条数
pub const CHALLENGE_PREVIEW: usize = 5;

/// 前 `limit` 条解法，以及未展示的条数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionPreview<'a> {
    pub shown: &'a [String],
    pub remaining: usize,
}

impl<'a> SolutionPreview<'a> {
    #[must_use]
    pub fn new(solutions: &'a [String], limit: usize) -> Self {
        let shown = &solutions[..solutions.len().min(limit)];
        SolutionPreview {
            shown,
            remaining: solutions.len() - shown.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// 总解法数
    #[must_use]
    pub fn total(&self) -> usize {
        self.shown.len() + self.remaining
    }
}

impl fmt::Display for SolutionPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No solution: these cards cannot make 24.");
        }
        for s in self.shown {
            writeln!(f, "{s} = 24")?;
        }
        if self.remaining > 0 {
            writeln!(f, "... {} more solution(s) not shown", self.remaining)?;
        }
        Ok(())
    }
}

/// 按时间戳记录一手牌和它的所有解，若无解则写入提示。
pub fn write_hand_report<W, Tz>(
    out: &mut W,
    timestamp: &DateTime<Tz>,
    hand: &[i32],
    solutions: &[String],
) -> io::Result<()>
where
    W: Write + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    writeln!(out, "[{}] Cards: {:?}", timestamp.format("%Y-%m-%d %H:%M:%S"), hand)?;
    if solutions.is_empty() {
        writeln!(out, "No solution found.")?;
    } else {
        writeln!(out, "Solutions:")?;
        for s in solutions {
            writeln!(out, "{s}")?;
        }
    }
    writeln!(out, "--------------------")
}
