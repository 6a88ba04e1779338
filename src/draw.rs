//! 随机抽牌。
//!
//! 挑战模式需要一手有解的牌：反复抽 4 张牌并调用求解器，直到有解
//! 或达到最大尝试次数为止。达到上限时仍返回最后一次抽到的牌，
//! 调用方需要自行处理“这手牌可能无解”的情况。

use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::{self, Card, Rank, Suit};
use crate::solver::find_solutions;

/// 一手牌的张数
pub const HAND_SIZE: usize = 4;

/// 寻找有解手牌时的默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// `draw_solvable` 的结果
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub cards: Vec<Card>,
    pub solutions: Vec<String>,
    /// 实际抽牌次数（至少为 1）
    pub attempts: usize,
}

impl DrawOutcome {
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// 有放回地随机抽 `count` 张牌，点数与花色各自均匀分布。
pub fn draw_cards<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Card> {
    let ranks: Vec<Rank> = Rank::all().collect();
    (0..count)
        .filter_map(|_| {
            let suit = *Suit::ALL.choose(rng)?;
            let rank = *ranks.choose(rng)?;
            Some(Card::new(rank, suit))
        })
        .collect()
}

/// 把 1~13 洗牌后取前 4 个，得到 4 个互不相同的点数。
pub fn draw_distinct_ranks<R: Rng + ?Sized>(rng: &mut R) -> Vec<i32> {
    let mut ranks = (Rank::MIN..=Rank::MAX).collect::<Vec<i32>>();
    ranks.shuffle(rng);
    ranks.into_iter().take(HAND_SIZE).collect()
}

/// 反复抽牌直到有解，最多 `max_attempts` 次（0 按 1 处理）。
pub fn draw_solvable<R: Rng + ?Sized>(rng: &mut R, max_attempts: usize) -> DrawOutcome {
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;
    loop {
        let cards = draw_cards(rng, HAND_SIZE);
        let solutions = find_solutions(&card::values(&cards));
        attempts += 1;

        if !solutions.is_empty() || attempts >= max_attempts {
            if solutions.is_empty() {
                log::warn!("no solvable hand after {attempts} attempts, keeping the last draw");
            } else {
                log::debug!("solvable hand found after {attempts} attempt(s)");
            }
            return DrawOutcome {
                cards,
                solutions,
                attempts,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_draw_cards_count_and_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let cards = draw_cards(&mut rng, 200);
        assert_eq!(cards.len(), 200);
        assert!(cards.iter().all(|c| (1..=13).contains(&c.value())));
    }

    #[test]
    fn test_draw_cards_covers_every_suit() {
        let mut rng = StdRng::seed_from_u64(11);
        let suits: HashSet<Suit> = draw_cards(&mut rng, 400).into_iter().map(|c| c.suit).collect();
        assert_eq!(suits.len(), 4);
    }

    #[test]
    fn test_distinct_ranks() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let ranks = draw_distinct_ranks(&mut rng);
            assert_eq!(ranks.len(), HAND_SIZE);
            let unique: HashSet<_> = ranks.iter().collect();
            assert_eq!(unique.len(), HAND_SIZE);
            assert!(ranks.iter().all(|r| (1..=13).contains(r)));
        }
    }

    #[test]
    fn test_draw_solvable_returns_solutions_for_the_hand() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = draw_solvable(&mut rng, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(outcome.cards.len(), HAND_SIZE);
        assert!(outcome.attempts >= 1 && outcome.attempts <= DEFAULT_MAX_ATTEMPTS);
        assert!(outcome.is_solvable());
        assert_eq!(outcome.solutions, find_solutions(&card::values(&outcome.cards)));
    }

    #[test]
    fn test_single_attempt_keeps_draw() {
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = draw_solvable(&mut rng, 0);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.cards.len(), HAND_SIZE);
    }
}
