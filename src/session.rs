//! # 游戏会话
//!
//! 一局游戏的全部状态：模式、已选的牌、挑战中的牌、当前解法、分数和计时起点。
//! 状态都放在显式的 `GameSession` 里，由展示层持有并传递；
//! 求解器本身保持无状态。
//!
//! 两种模式：
//! - **计算模式**：玩家从 52 张牌中选 4 张，直接查看所有解法；
//! - **挑战模式**：随机抽一手（尽量有解的）牌，玩家输入表达式作答，答对加分。

use chrono::{DateTime, Local};
use rand::Rng;

use crate::card::{self, Card};
use crate::draw::{self, DEFAULT_MAX_ATTEMPTS, HAND_SIZE};
use crate::errors::SessionError;
use crate::report::{SolutionPreview, CALCULATION_PREVIEW, CHALLENGE_PREVIEW};
use crate::solver::find_solutions;
use crate::validator;

/// 每答对一题增加的分数
pub const SCORE_PER_SOLVE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Calculation,
    Challenge,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    mode: Option<Mode>,
    selected: Vec<Card>,
    challenge: Vec<Card>,
    solutions: Vec<String>,
    score: u32,
    started_at: Option<DateTime<Local>>,
    max_attempts: usize,
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession {
            mode: None,
            selected: Vec::new(),
            challenge: Vec::new(),
            solutions: Vec::new(),
            score: 0,
            started_at: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 挑战模式下寻找有解手牌的最大抽牌次数
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn selected(&self) -> &[Card] {
        &self.selected
    }

    pub fn challenge_cards(&self) -> &[Card] {
        &self.challenge
    }

    pub fn solutions(&self) -> &[String] {
        &self.solutions
    }

    /// 进入某个模式。进入挑战模式时立即开始一局新挑战。
    pub fn set_mode<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R) {
        self.mode = Some(mode);
        match mode {
            Mode::Calculation => {
                self.selected.clear();
                self.challenge.clear();
                self.solutions.clear();
                self.started_at = None;
            }
            Mode::Challenge => {
                self.start_challenge(rng);
            }
        }
    }

    /// 回到模式选择：停止计时，清空牌和解法，分数保留。
    pub fn back_to_mode_selection(&mut self) {
        self.mode = None;
        self.selected.clear();
        self.challenge.clear();
        self.solutions.clear();
        self.started_at = None;
    }

    /// 选中或取消选中一张牌，返回操作后该牌是否处于选中状态。
    ///
    /// 已选满 4 张时再选新牌会被拒绝。
    pub fn toggle_card(&mut self, card: Card) -> Result<bool, SessionError> {
        self.require_mode(Mode::Calculation)?;
        if let Some(pos) = self.selected.iter().position(|c| *c == card) {
            self.selected.remove(pos);
            return Ok(false);
        }
        if self.selected.len() >= HAND_SIZE {
            return Err(SessionError::SelectionFull);
        }
        self.selected.push(card);
        Ok(true)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.solutions.clear();
    }

    #[must_use]
    pub fn can_calculate(&self) -> bool {
        self.mode == Some(Mode::Calculation) && self.selected.len() == HAND_SIZE
    }

    /// 计算已选 4 张牌的所有解法。
    pub fn calculate(&mut self) -> Result<&[String], SessionError> {
        self.require_mode(Mode::Calculation)?;
        if self.selected.len() != HAND_SIZE {
            return Err(SessionError::IncompleteSelection {
                selected: self.selected.len(),
            });
        }
        self.solutions = find_solutions(&card::values(&self.selected));
        Ok(&self.solutions)
    }

    /// 开始一局新挑战并重置计时器。
    pub fn new_challenge<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&[Card], SessionError> {
        self.require_mode(Mode::Challenge)?;
        self.start_challenge(rng);
        Ok(&self.challenge)
    }

    fn start_challenge<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let outcome = draw::draw_solvable(rng, self.max_attempts);
        log::info!(
            "new challenge {} ({} solution(s), {} draw(s))",
            outcome.cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" "),
            outcome.solutions.len(),
            outcome.attempts
        );
        self.challenge = outcome.cards;
        self.solutions = outcome.solutions;
        self.started_at = Some(Local::now());
    }

    /// 校验玩家的答案，答对加 [`SCORE_PER_SOLVE`] 分。
    ///
    /// 答对后这局挑战结束：牌、解法和计时都被清空，
    /// 再次提交会得到 `NoChallenge`，直到调用 [`GameSession::new_challenge`]。
    pub fn submit_answer(&mut self, input: &str) -> Result<f64, SessionError> {
        self.require_mode(Mode::Challenge)?;
        if self.challenge.is_empty() {
            return Err(SessionError::NoChallenge);
        }
        let value = validator::validate(&card::values(&self.challenge), input)?;
        self.score += SCORE_PER_SOLVE;
        self.challenge.clear();
        self.solutions.clear();
        self.started_at = None;
        Ok(value)
    }

    /// 表达式看起来已经可以自动提交（仅挑战模式）。
    #[must_use]
    pub fn ready_to_submit(&self, input: &str) -> bool {
        self.mode == Some(Mode::Challenge)
            && !self.challenge.is_empty()
            && validator::looks_complete(&card::values(&self.challenge), input)
    }

    /// 当前解法的预览，条数取决于模式。
    #[must_use]
    pub fn preview(&self) -> SolutionPreview<'_> {
        let limit = match self.mode {
            Some(Mode::Challenge) => CHALLENGE_PREVIEW,
            _ => CALCULATION_PREVIEW,
        };
        SolutionPreview::new(&self.solutions, limit)
    }

    /// 当前挑战已经用去的秒数；没有进行中的挑战时为 `None`。
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Local>) -> Option<i64> {
        self.started_at
            .map(|start| now.signed_duration_since(start).num_seconds().max(0))
    }

    /// `MM:SS` 格式的计时器文本
    #[must_use]
    pub fn timer_label(&self, now: DateTime<Local>) -> String {
        let elapsed = self.elapsed_secs(now).unwrap_or(0);
        format!("{:02}:{:02}", elapsed / 60, elapsed % 60)
    }

    fn require_mode(&self, mode: Mode) -> Result<(), SessionError> {
        if self.mode == Some(mode) {
            Ok(())
        } else {
            Err(SessionError::WrongMode)
        }
    }
}
