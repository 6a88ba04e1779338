//! # 答案校验
//!
//! 检查玩家输入的表达式是否是这手牌的正确答案。表达式由一个专用的
//! 递归下降解析器处理，只认识 `+ - * /`、括号、整数和牌面标签 `A J Q K`，
//! 不做任何通用代码求值。
//!
//! 文法（`*` `/` 优先于 `+` `-`，均为左结合，没有一元运算符）：
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := operand | '(' expr ')'
//! operand := 整数 | A | J | Q | K
//! ```
//!
//! 校验顺序：空输入 → 长度与嵌套上限 → 词法 → 用牌 → 括号 → 运算符 → 语法 → 求值 → 与 24 比较。
//! 解析和求值都是递归的，长度与嵌套上限保证递归深度有界。
//! 与 24 的比较和求解器使用同一个 [`is_target`]。

use std::fmt;

use nom::{
    branch::alt,
    character::complete::{alphanumeric1, char, multispace0, one_of},
    combinator::{all_consuming, map, map_opt, value},
    multi::{fold_many0, many0},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

use crate::card::Rank;
use crate::errors::ValidationError;
use crate::solver::{is_target, Operator};

/// 表达式的最大字符数
pub const MAX_EXPRESSION_LEN: usize = 256;

/// 括号的最大嵌套层数
pub const MAX_NESTING: usize = 16;

/// 解析结果类型：输入、输出，以及自定义的 `ValidationError`
pub type PResult<'a, O> = IResult<&'a str, O, Box<ValidationError>>;

/// 解析后的表达式树
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(i32),
    Binary {
        op: Operator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// 按实数语义求值；任一子表达式除以 0 都会报 `DivisionByZero`。
    pub fn evaluate(&self) -> Result<f64, ValidationError> {
        match self {
            Expr::Literal(n) => Ok(f64::from(*n)),
            Expr::Binary { op, lhs, rhs } => op
                .apply(lhs.evaluate()?, rhs.evaluate()?)
                .ok_or(ValidationError::DivisionByZero),
        }
    }

    fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(n) => write!(f, "{n}"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

/// 词法单元
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Operand(i32),
    Operator(Operator),
    Open,
    Close,
}

/// 完整校验玩家的答案，成功时返回表达式的值。
///
/// `cards` 是这手牌的数值；表达式中的操作数（按数值）必须与它们一一对应，
/// 牌面标签和对应数字可以互换（`A` 与 `1` 等价）。
pub fn validate(cards: &[i32], input: &str) -> Result<f64, ValidationError> {
    let expr = check_structure(cards, input)?;
    let result = expr.evaluate()?;
    if is_target(result) {
        log::debug!("accepted \"{}\" = {result}", input.trim());
        Ok(result)
    } else {
        Err(ValidationError::WrongResult { value: result })
    }
}

/// 自动提交的启发式判断：用牌、括号、运算符和语法都已通过。
///
/// 只是提示“可以提交了”，不代表表达式一定完整或正确，
/// 最终结论以 [`validate`] 为准。
#[must_use]
pub fn looks_complete(cards: &[i32], input: &str) -> bool {
    check_structure(cards, input).is_ok()
}

/// 解析并求值任意表达式，不检查用牌。
pub fn evaluate(input: &str) -> Result<f64, ValidationError> {
    parse(input)?.evaluate()
}

/// 把表达式解析成 [`Expr`]。
pub fn parse(input: &str) -> Result<Expr, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    check_limits(input)?;
    match all_consuming(terminated(expr, multispace0))(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(*e),
        Err(nom::Err::Incomplete(_)) => Err(ValidationError::Unparseable {
            input: input.to_string(),
        }),
    }
}

fn check_structure(cards: &[i32], input: &str) -> Result<Expr, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    check_limits(input)?;
    let tokens = tokenize(input)?;

    let mut expected = cards.to_vec();
    let mut found: Vec<i32> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Operand(n) => Some(*n),
            _ => None,
        })
        .collect();
    expected.sort_unstable();
    found.sort_unstable();
    if expected != found {
        return Err(ValidationError::IncompleteCardUsage { expected, found });
    }

    if !parentheses_balanced(&tokens) {
        return Err(ValidationError::UnbalancedParentheses);
    }
    if !tokens.iter().any(|t| matches!(t, Token::Operator(_))) {
        return Err(ValidationError::MissingOperator);
    }
    parse(input)
}

fn check_limits(input: &str) -> Result<(), ValidationError> {
    if input.len() > MAX_EXPRESSION_LEN {
        return Err(ValidationError::ExpressionTooLong {
            max: MAX_EXPRESSION_LEN,
        });
    }
    let mut depth = 0usize;
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ValidationError::NestingTooDeep { max: MAX_NESTING });
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn parentheses_balanced(tokens: &[Token]) -> bool {
    let mut depth = 0usize;
    for t in tokens {
        match t {
            Token::Open => depth += 1,
            Token::Close => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn tokenize(input: &str) -> Result<Vec<Token>, ValidationError> {
    match all_consuming(terminated(many0(token), multispace0))(input) {
        Ok((_, tokens)) => Ok(tokens),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(*e),
        Err(nom::Err::Incomplete(_)) => Err(ValidationError::Unparseable {
            input: input.to_string(),
        }),
    }
}

// === Token parsers ===

fn token(input: &str) -> PResult<'_, Token> {
    preceded(
        multispace0,
        alt((
            map(operand, Token::Operand),
            map(operator("+-*/"), Token::Operator),
            value(Token::Open, char('(')),
            value(Token::Close, char(')')),
        )),
    )(input)
}

/// 整个单词作为一个操作数：纯数字，或单个牌面标签
fn operand(input: &str) -> PResult<'_, i32> {
    map_opt(alphanumeric1, word_value)(input)
}

fn word_value(word: &str) -> Option<i32> {
    if word.bytes().all(|b| b.is_ascii_digit()) {
        // 不接受前导零，`004` 不是牌 4
        if word.len() > 1 && word.starts_with('0') {
            return None;
        }
        word.parse().ok()
    } else if word.len() == 1 {
        word.parse::<Rank>().ok().map(Rank::value)
    } else {
        None
    }
}

fn operator<'a>(symbols: &'static str) -> impl FnMut(&'a str) -> PResult<'a, Operator> {
    map_opt(one_of(symbols), Operator::from_symbol)
}

// === Expression parsers ===

fn expr(input: &str) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(preceded(multispace0, operator("+-")), term),
        move || first.clone(),
        |acc, (op, rhs)| Expr::binary(op, acc, rhs),
    )(input)
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (input, first) = factor(input)?;
    fold_many0(
        pair(preceded(multispace0, operator("*/")), factor),
        move || first.clone(),
        |acc, (op, rhs)| Expr::binary(op, acc, rhs),
    )(input)
}

fn factor(input: &str) -> PResult<'_, Expr> {
    preceded(
        multispace0,
        alt((
            map(operand, Expr::Literal),
            delimited(char('('), expr, preceded(multispace0, char(')'))),
        )),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate("1 + 2 * 3"), Ok(7.0));
        assert_eq!(evaluate("(1 + 2) * 3"), Ok(9.0));
        assert_eq!(evaluate("8 - 4 - 2"), Ok(2.0));
        assert_eq!(evaluate("8 / 4 / 2"), Ok(1.0));
        assert_eq!(evaluate("6/(1-3/4)"), Ok(24.0));
    }

    #[test]
    fn test_parse_tree_shape() {
        let parsed = parse("1 + 2 * 3 - 4").unwrap();
        assert_eq!(parsed.to_string(), "((1 + (2 * 3)) - 4)");
        let parsed = parse("  ( (5) )  ").unwrap();
        assert_eq!(parsed, Expr::Literal(5));
    }

    #[test]
    fn test_face_labels() {
        assert_eq!(evaluate("K + J"), Ok(24.0));
        assert_eq!(evaluate("Q * 2"), Ok(24.0));
        assert_eq!(evaluate("a * 3"), Ok(3.0));
        assert!(matches!(evaluate("AB + 1"), Err(ValidationError::Unparseable { .. })));
        assert!(matches!(evaluate("4A"), Err(ValidationError::Unparseable { .. })));
    }

    #[test]
    fn test_no_unary_minus() {
        assert!(matches!(evaluate("-4 + 28"), Err(ValidationError::Unparseable { .. })));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("3 / (2 - 2)"), Err(ValidationError::DivisionByZero));
    }

    #[test]
    fn test_validate_accepts_correct_answer() {
        assert_eq!(validate(&[1, 3, 4, 6], "6 / (1 - 3 / 4)"), Ok(24.0));
        assert_eq!(
            validate(&[1, 11, 12, 13], "(K - J + A) * Q / 3 * 3"),
            Err(ValidationError::IncompleteCardUsage {
                expected: vec![1, 11, 12, 13],
                found: vec![1, 3, 3, 11, 12, 13],
            })
        );
        // labels and numbers are interchangeable
        assert!(validate(&[1, 2, 3, 4], "(A + 2 + 3) * 4").is_ok());
        assert!(validate(&[1, 2, 3, 4], "(1 + 2 + 3) * 4").is_ok());
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(validate(&[1, 2, 3, 4], "   "), Err(ValidationError::Empty));
    }

    #[test]
    fn test_validate_card_usage() {
        // missing a card
        assert!(matches!(
            validate(&[1, 2, 3, 4], "(2 + 3) * 4"),
            Err(ValidationError::IncompleteCardUsage { .. })
        ));
        // card used twice
        assert!(matches!(
            validate(&[2, 3, 4, 6], "6 * 4 * (3 - 2) * 4"),
            Err(ValidationError::IncompleteCardUsage { .. })
        ));
        // 12 is one token, not 1 and 2
        assert!(matches!(
            validate(&[1, 2, 3, 4], "12 * (3 + 4)"),
            Err(ValidationError::IncompleteCardUsage { .. })
        ));
    }

    #[test]
    fn test_validate_parentheses() {
        assert_eq!(
            validate(&[1, 2, 3, 4], "(1 + 2 + 3 * 4"),
            Err(ValidationError::UnbalancedParentheses)
        );
        assert_eq!(
            validate(&[1, 2, 3, 4], ")1 + 2 + 3( * 4"),
            Err(ValidationError::UnbalancedParentheses)
        );
    }

    #[test]
    fn test_validate_missing_operator() {
        assert_eq!(
            validate(&[1, 2, 3, 4], "1 2 3 4"),
            Err(ValidationError::MissingOperator)
        );
    }

    #[test]
    fn test_validate_unparseable() {
        assert!(matches!(
            validate(&[1, 2, 3, 4], "1 + 2 + 3 + 4 ^"),
            Err(ValidationError::Unparseable { .. })
        ));
        assert!(matches!(
            validate(&[1, 2, 3, 4], "1 + 2 + 3 4 *"),
            Err(ValidationError::Unparseable { .. })
        ));
        assert!(matches!(
            validate(&[1, 2, 3, 4], "1 + 2 + 3 + 4; exit"),
            Err(ValidationError::Unparseable { .. })
        ));
    }

    #[test]
    fn test_validate_wrong_result() {
        assert_eq!(
            validate(&[1, 2, 3, 4], "1 + 2 + 3 + 4"),
            Err(ValidationError::WrongResult { value: 10.0 })
        );
    }

    #[test]
    fn test_validate_division_by_zero() {
        assert_eq!(
            validate(&[5, 5, 5, 1], "5 / (5 - 5) + 1"),
            Err(ValidationError::DivisionByZero)
        );
    }

    #[test]
    fn test_validate_chained_division_tolerance() {
        assert!(validate(&[3, 3, 8, 8], "8 / (3 - 8 / 3)").is_ok());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let deep = format!("{}1{} + 2 + 3 + 4", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(
            validate(&[1, 2, 3, 4], &deep),
            Err(ValidationError::ExpressionTooLong { max: MAX_EXPRESSION_LEN })
        );

        let nested = format!("{}1{} * 2 * 3 * 4", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert!(nested.len() <= MAX_EXPRESSION_LEN);
        assert_eq!(
            validate(&[1, 2, 3, 4], &nested),
            Err(ValidationError::NestingTooDeep { max: MAX_NESTING })
        );
        assert_eq!(evaluate(&nested), Err(ValidationError::NestingTooDeep { max: MAX_NESTING }));
        assert!(!looks_complete(&[1, 2, 3, 4], &nested));

        let at_limit = format!("{}1{} * 2 * 3 * 4", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(validate(&[1, 2, 3, 4], &at_limit), Ok(24.0));
    }

    #[test]
    fn test_long_chain_is_rejected() {
        let chain = vec!["1"; 200].join(" + ");
        assert_eq!(
            evaluate(&chain),
            Err(ValidationError::ExpressionTooLong { max: MAX_EXPRESSION_LEN })
        );
    }

    #[test]
    fn test_leading_zero_is_not_a_card() {
        assert!(matches!(
            validate(&[4, 6, 1, 1], "004 * 6 * 1 * 1"),
            Err(ValidationError::Unparseable { .. })
        ));
        assert!(matches!(evaluate("07 + 1"), Err(ValidationError::Unparseable { .. })));
        // a lone zero is still a number
        assert_eq!(evaluate("0 + 24"), Ok(24.0));
    }

    #[test]
    fn test_looks_complete() {
        assert!(!looks_complete(&[1, 2, 3, 4], "(1 + 2"));
        assert!(!looks_complete(&[1, 2, 3, 4], "(1 + 2 + 3"));
        assert!(!looks_complete(&[1, 2, 3, 4], "(1 + 2 + 3 * 4"));
        assert!(looks_complete(&[1, 2, 3, 4], "(1 + 2 + 3) * 4"));
        // complete but wrong is still ready to submit
        assert!(looks_complete(&[1, 2, 3, 4], "1 + 2 + 3 + 4"));
    }
}
