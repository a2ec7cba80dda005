use crate::cards::{parse_cards, Card};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("community already holds {held} cards, cannot add {adding}")]
    CommunityFull { held: usize, adding: usize },
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A participant's two private cards.
///
/// ```
/// use poker_rounds::cards::{Card, Rank, Suit};
/// use poker_rounds::hand::HoleCards;
///
/// let hole = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::King, Suit::Spades),
/// ).unwrap();
/// assert_eq!(hole.to_string(), "AS KS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(slice.len())),
        }
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Shared cards revealed between betting rounds (flop, turn, river).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Community {
    cards: Vec<Card>,
}

impl Community {
    pub const MAX: usize = 5;

    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(Self::MAX) }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn reveal(&mut self, cards: Vec<Card>) -> Result<(), HandError> {
        if self.cards.len() + cards.len() > Self::MAX {
            return Err(HandError::CommunityFull { held: self.cards.len(), adding: cards.len() });
        }
        self.cards.extend(cards);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn hole_cards_reject_duplicates_and_bad_counts() {
        assert_eq!(HoleCards::from_str("AS AS"), Err(HandError::DuplicateHoleCards));
        assert_eq!(HoleCards::from_str("AS KS QS"), Err(HandError::HoleCount(3)));
        assert!(HoleCards::from_str("AS 10H").is_ok());
    }

    #[test]
    fn community_caps_at_five() {
        let mut c = Community::new();
        c.reveal(parse_cards("2H 3H 4H").unwrap()).unwrap();
        c.reveal(parse_cards("5H").unwrap()).unwrap();
        c.reveal(parse_cards("6H").unwrap()).unwrap();
        assert_eq!(c.len(), 5);
        assert_eq!(
            c.reveal(parse_cards("7H").unwrap()),
            Err(HandError::CommunityFull { held: 5, adding: 1 })
        );
    }
}
