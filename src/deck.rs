use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck is empty: wanted {wanted} card(s), {remaining} left")]
    Empty { wanted: usize, remaining: usize },
}

/// A 52-card deck; drawing removes cards from the top.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// An unshuffled deck, suits grouped, ranks ascending.
    ///
    /// ```
    /// use poker_rounds::deck::Deck;
    ///
    /// assert_eq!(Deck::ordered().len(), 52);
    /// ```
    pub fn ordered() -> Self {
        let cards = Suit::ALL
            .into_iter()
            .flat_map(|s| Rank::ALL.into_iter().map(move |r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// A fresh deck shuffled by `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    /// A fresh deck shuffled from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::shuffled(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Empty { wanted: 1, remaining: 0 })
    }

    /// Draw `n` cards, or none at all if fewer than `n` remain.
    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::Empty { wanted: n, remaining: self.cards.len() });
        }
        let at = self.cards.len() - n;
        let mut drawn = self.cards.split_off(at);
        drawn.reverse();
        Ok(drawn)
    }
}
