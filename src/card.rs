//! 扑克牌：点数、花色与牌面标签。
//!
//! 求解器只处理数值，`A J Q K` 等标签属于展示层，在这里和数值互相转换。

use std::fmt;
use std::str::FromStr;

use crate::errors::CardError;

/// 牌的点数，取值 1~13（A=1，J=11，Q=12，K=13）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 13;

    pub fn new(value: i32) -> Result<Self, CardError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            // 范围已检查，转换不会截断
            Ok(Rank(value as u8))
        } else {
            Err(CardError::RankOutOfRange {
                value: i64::from(value),
            })
        }
    }

    #[must_use]
    pub fn value(self) -> i32 {
        i32::from(self.0)
    }

    /// 牌面标签：`A 2 .. 10 J Q K`
    #[must_use]
    pub fn label(self) -> String {
        match self.0 {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        }
    }

    /// 全部 13 个点数，从 A 到 K。
    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=13u8).map(Rank)
    }
}

impl TryFrom<i32> for Rank {
    type Error = CardError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Rank::new(value)
    }
}

impl FromStr for Rank {
    type Err = CardError;

    /// 接受牌面标签（大小写不敏感）或 1~13 的数字。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_uppercase().as_str() {
            "A" => return Ok(Rank(1)),
            "J" => return Ok(Rank(11)),
            "Q" => return Ok(Rank(12)),
            "K" => return Ok(Rank(13)),
            _ => {}
        }
        match s.parse::<i64>() {
            Ok(n) => i32::try_from(n)
                .map_err(|_| CardError::RankOutOfRange { value: n })
                .and_then(Rank::new),
            Err(_) => Err(CardError::UnknownLabel {
                label: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Diamonds,
    Clubs,
    Hearts,
    Spades,
}

impl Suit {
    /// 选牌网格中的排列顺序：♦ ♣ ♥ ♠
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Clubs, Suit::Hearts, Suit::Spades];

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    #[must_use]
    pub fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 一张牌。两张牌只有点数和花色都相同时才是同一张。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    #[must_use]
    pub fn value(&self) -> i32 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

/// 52 张牌，按花色 ♦ ♣ ♥ ♠ 分组，每组从 A 到 K。
pub fn all_cards() -> impl Iterator<Item = Card> {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| Rank::all().map(move |rank| Card::new(rank, suit)))
}

/// 取出一手牌的数值，交给求解器。
#[must_use]
pub fn values(cards: &[Card]) -> Vec<i32> {
    cards.iter().map(Card::value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_range() {
        assert!(Rank::new(0).is_err());
        assert_eq!(Rank::new(1).map(Rank::value), Ok(1));
        assert_eq!(Rank::new(13).map(Rank::value), Ok(13));
        assert_eq!(Rank::new(14), Err(CardError::RankOutOfRange { value: 14 }));
        assert!(Rank::try_from(-3).is_err());
    }

    #[test]
    fn test_rank_labels() {
        let labels: Vec<String> = Rank::all().map(Rank::label).collect();
        assert_eq!(
            labels,
            vec!["A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K"]
        );
    }

    #[test]
    fn test_rank_from_str() {
        assert_eq!("A".parse::<Rank>().map(Rank::value), Ok(1));
        assert_eq!("q".parse::<Rank>().map(Rank::value), Ok(12));
        assert_eq!(" 10 ".parse::<Rank>().map(Rank::value), Ok(10));
        assert_eq!("13".parse::<Rank>().map(Rank::value), Ok(13));
        assert_eq!(
            "Z".parse::<Rank>(),
            Err(CardError::UnknownLabel { label: "Z".to_string() })
        );
        assert_eq!(
            "99999999999".parse::<Rank>(),
            Err(CardError::RankOutOfRange { value: 99_999_999_999 })
        );
    }

    #[test]
    fn test_card_display_and_colour() {
        let card = Card::new(Rank::new(12).unwrap(), Suit::Hearts);
        assert_eq!(card.to_string(), "♥Q");
        assert!(card.suit.is_red());
        assert!(!Suit::Spades.is_red());
    }

    #[test]
    fn test_all_cards_grid() {
        let cards: Vec<Card> = all_cards().collect();
        assert_eq!(cards.len(), 52);
        assert_eq!(cards[0].to_string(), "♦A");
        assert_eq!(cards[13].to_string(), "♣A");
        assert_eq!(cards[51].to_string(), "♠K");
    }
}
