//! 错误类型。
//!
//! 每个变体都有唯一的错误码（`code()`）和可选的提示（`help()`）：
//!
//! - C001: `CardError::RankOutOfRange`
//! - C002: `CardError::UnknownLabel`
//! - V001: `ValidationError::Empty`
//! - V002: `ValidationError::IncompleteCardUsage`
//! - V003: `ValidationError::UnbalancedParentheses`
//! - V004: `ValidationError::MissingOperator`
//! - V005: `ValidationError::Unparseable`
//! - V006: `ValidationError::DivisionByZero`
//! - V007: `ValidationError::WrongResult`
//! - V008: `ValidationError::ExpressionTooLong`
//! - V009: `ValidationError::NestingTooDeep`
//! - S001: `SessionError::WrongMode`
//! - S002: `SessionError::SelectionFull`
//! - S003: `SessionError::IncompleteSelection`
//! - S004: `SessionError::NoChallenge`
//!
//! 求解器本身从不报错，这里的错误只属于牌面解析、答案校验和游戏会话。

use nom::error::{ErrorKind, ParseError as NomParseError};

/// 牌面解析错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("card value {value} is out of range (1-13)")]
    RankOutOfRange { value: i64 },

    #[error("unknown card label \"{label}\"")]
    UnknownLabel { label: String },
}

impl CardError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            CardError::RankOutOfRange { .. } => "C001",
            CardError::UnknownLabel { .. } => "C002",
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        Some("Use A, 2-10, J, Q, K or the numbers 1-13")
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// 用户答案校验错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty expression")]
    Empty,

    #[error("All 4 cards must be used exactly once (expected {expected:?}, found {found:?})")]
    IncompleteCardUsage { expected: Vec<i32>, found: Vec<i32> },

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("Expression contains no operator")]
    MissingOperator,

    #[error("Cannot parse expression near \"{input}\"")]
    Unparseable { input: String },

    #[error("Division by zero in expression")]
    DivisionByZero,

    #[error("Expression evaluates to {value:.2}, not 24")]
    WrongResult { value: f64 },

    #[error("Expression is longer than {max} characters")]
    ExpressionTooLong { max: usize },

    #[error("Parentheses are nested deeper than {max} levels")]
    NestingTooDeep { max: usize },
}

impl ValidationError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Empty => "V001",
            ValidationError::IncompleteCardUsage { .. } => "V002",
            ValidationError::UnbalancedParentheses => "V003",
            ValidationError::MissingOperator => "V004",
            ValidationError::Unparseable { .. } => "V005",
            ValidationError::DivisionByZero => "V006",
            ValidationError::WrongResult { .. } => "V007",
            ValidationError::ExpressionTooLong { .. } => "V008",
            ValidationError::NestingTooDeep { .. } => "V009",
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            ValidationError::IncompleteCardUsage { .. } => {
                Some("Each card value must appear once as a whole number or face label")
            }
            ValidationError::UnbalancedParentheses => {
                Some("Every '(' needs a matching ')' after it")
            }
            ValidationError::MissingOperator => Some("Combine the cards with + - * /"),
            ValidationError::Unparseable { .. } => {
                Some("Only numbers, A J Q K, + - * / and parentheses are allowed")
            }
            ValidationError::ExpressionTooLong { .. } | ValidationError::NestingTooDeep { .. } => {
                Some("Four cards never need an expression this large")
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

impl<'a> NomParseError<&'a str> for Box<ValidationError> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        Box::new(ValidationError::Unparseable {
            input: input.to_string(),
        })
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

/// 游戏会话操作错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("operation not available in the current mode")]
    WrongMode,

    #[error("4 cards are already selected")]
    SelectionFull,

    #[error("exactly 4 cards must be selected (have {selected})")]
    IncompleteSelection { selected: usize },

    #[error("no challenge in progress")]
    NoChallenge,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SessionError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::WrongMode => "S001",
            SessionError::SelectionFull => "S002",
            SessionError::IncompleteSelection { .. } => "S003",
            SessionError::NoChallenge => "S004",
            SessionError::Validation(e) => e.code(),
        }
    }

    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SessionError::SelectionFull => Some("Deselect a card before choosing another"),
            SessionError::NoChallenge => Some("Start a new challenge first"),
            SessionError::Validation(e) => e.help(),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
