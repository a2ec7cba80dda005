use std::fmt;
use std::str::FromStr;

/// Card ranks from Two (low) to Ace (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Label used on card faces; Ten is written out as `10`.
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rank {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let label = if upper == "T" { "10" } else { upper.as_str() };
        Rank::ALL
            .into_iter()
            .find(|r| r.label() == label)
            .ok_or_else(|| CardParseError::Rank(s.to_string()))
    }
}

/// The four suits. Suits carry no strength in this game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn letter(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }

    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl TryFrom<char> for Suit {
    type Error = CardParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Suit::ALL
            .into_iter()
            .find(|s| s.letter() == c.to_ascii_uppercase())
            .ok_or_else(|| CardParseError::Suit(c.to_string()))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error("invalid rank: '{0}'")]
    Rank(String),
    #[error("invalid suit: '{0}'")]
    Suit(String),
}

/// An immutable playing card.
///
/// ```
/// use poker_rounds::cards::{Card, Rank, Suit};
///
/// let card = Card::new(Rank::Ten, Suit::Diamonds);
/// assert_eq!(card.to_string(), "10D");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Accepts the display label (`10D`, `AS`) as well as `TD`/`as`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        let suit_ch = chars.next_back().ok_or_else(|| CardParseError::Invalid(s.to_string()))?;
        let rank_str = chars.as_str();
        if rank_str.is_empty() {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        Ok(Card::new(rank_str.parse()?, Suit::try_from(suit_ch)?))
    }
}

/// Parse cards separated by whitespace or commas.
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_card_faces() {
        assert_eq!(Card::new(Rank::Two, Suit::Hearts).to_string(), "2H");
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).to_string(), "10C");
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).to_string(), "AS");
    }

    #[test]
    fn parse_accepts_ten_spellings() {
        assert_eq!(Card::from_str("10d").unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!(Card::from_str("TD").unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert!(Card::from_str("1d").is_err());
        assert!(Card::from_str("Ax").is_err());
        assert!(Card::from_str("S").is_err());
    }

    #[test]
    fn parse_many() {
        let xs = parse_cards("AS, KD 10c").unwrap();
        assert_eq!(
            xs,
            vec![
                Card::new(Rank::Ace, Suit::Spades),
                Card::new(Rank::King, Suit::Diamonds),
                Card::new(Rank::Ten, Suit::Clubs),
            ]
        );
    }
}
