// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use ahash::AHashSet;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A Poker card.
///
/// A card is encoded in a single byte as `rank * 4 + suit` so that cards
/// sort by rank first and every card of a deck has a unique id in `0..52`.
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card(u8);

impl Card {
    /// Create a card given a rank and a suit.
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Self(rank as u8 * 4 + suit as u8)
    }

    /// This card unique id.
    pub fn id(&self) -> u8 {
        self.0
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        match self.0 % 4 {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            _ => Suit::Spades,
        }
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        Rank::ranks()
            .nth((self.0 / 4) as usize)
            .unwrap_or_else(|| panic!("Invalid card id {}", self.0))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank(), self.suit())
    }
}

/// Error returned when parsing an invalid card token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardError(String);

impl fmt::Display for ParseCardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid card '{}'", self.0)
    }
}

impl std::error::Error for ParseCardError {}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses a two characters token like `Ah`, `Tc` or `2d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r), Some(c), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCardError(s.to_string()));
        };

        let rank = match r.to_ascii_uppercase() {
            '2' => Rank::Deuce,
            '3' => Rank::Trey,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return Err(ParseCardError(s.to_string())),
        };

        let suit = match c.to_ascii_lowercase() {
            'c' => Suit::Clubs,
            'd' => Suit::Diamonds,
            'h' => Suit::Hearts,
            's' => Suit::Spades,
            _ => return Err(ParseCardError(s.to_string())),
        };

        Ok(Card::new(rank, suit))
    }
}

impl TryFrom<String> for Card {
    type Error = ParseCardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// Deuce
    Deuce = 0,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks from deuce to ace.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    /// Clubs suit.
    Clubs = 0,
    /// Diamonds suit.
    Diamonds,
    /// Hearts suit.
    Hearts,
    /// Spades suit.
    Spades,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        };

        write!(f, "{suit}")
    }
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }
}

/// Error returned by [Deck::from_cards] for a deck that is not a full deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDeck {
    /// Number of cards in the rejected deck.
    pub count: usize,
    /// Number of unique cards in the rejected deck.
    pub unique: usize,
}

impl fmt::Display for InvalidDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A deck must have {} unique cards, got {} cards with {} unique",
            Deck::SIZE,
            self.count,
            self.unique
        )
    }
}

impl std::error::Error for InvalidDeck {}

/// A cards deck, cards are dealt from the back.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    /// Creates a deck from an already shuffled sequence of cards.
    ///
    /// The last card of the sequence is the first one dealt.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, InvalidDeck> {
        let unique = cards.iter().collect::<AHashSet<_>>().len();
        if cards.len() != Self::SIZE || unique != Self::SIZE {
            return Err(InvalidDeck {
                count: cards.len(),
                unique,
            });
        }

        Ok(Self { cards })
    }

    /// Deals a card from the back of the deck.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Removes a card from the deck.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| c != &card);
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn card_encoding() {
        let mut ids = AHashSet::default();
        let mut deck = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(7));

        while let Some(card) = deck.deal() {
            assert_eq!(Card::new(card.rank(), card.suit()), card);
            ids.insert(card.id());
        }

        assert_eq!(ids.len(), Deck::SIZE);
        assert!(ids.iter().all(|id| (*id as usize) < Deck::SIZE));
        assert!(deck.deal().is_none());
    }

    #[test]
    fn card_to_string() {
        let c = Card::new(Rank::King, Suit::Diamonds);
        assert_eq!(c.to_string(), "Kd");

        let c = Card::new(Rank::Five, Suit::Spades);
        assert_eq!(c.to_string(), "5s");

        let c = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(c.to_string(), "Th");

        let c = Card::new(Rank::Ace, Suit::Clubs);
        assert_eq!(c.to_string(), "Ac");
    }

    #[test]
    fn card_from_str() {
        assert_eq!("Ah".parse(), Ok(Card::new(Rank::Ace, Suit::Hearts)));
        assert_eq!("tc".parse(), Ok(Card::new(Rank::Ten, Suit::Clubs)));
        assert_eq!("2D".parse(), Ok(Card::new(Rank::Deuce, Suit::Diamonds)));
        assert!("1h".parse::<Card>().is_err());
        assert!("Ax".parse::<Card>().is_err());
        assert!("Ahh".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());

        for card in Deck::default() {
            assert_eq!(card.to_string().parse(), Ok(card));
        }
    }

    #[test]
    fn card_serde() {
        let card = Card::new(Rank::Queen, Suit::Spades);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"Qs\"");
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), card);
        assert!(serde_json::from_str::<Card>("\"Zz\"").is_err());
    }

    #[test]
    fn deck_from_cards() {
        let cards = Deck::default().into_iter().collect::<Vec<_>>();
        let last = *cards.last().unwrap();
        let mut deck = Deck::from_cards(cards.clone()).unwrap();
        assert_eq!(deck.deal(), Some(last));
        assert_eq!(deck.count(), Deck::SIZE - 1);

        let err = Deck::from_cards(cards[1..].to_vec()).unwrap_err();
        assert_eq!(err.count, 51);

        let mut dup = cards.clone();
        dup[0] = dup[1];
        let err = Deck::from_cards(dup).unwrap_err();
        assert_eq!(err.count, 52);
        assert_eq!(err.unique, 51);
    }

    #[test]
    fn deck_remove() {
        let mut deck = Deck::default();
        deck.remove(Card::new(Rank::Ace, Suit::Diamonds));
        deck.remove(Card::new(Rank::King, Suit::Diamonds));
        assert_eq!(deck.count(), 50);
    }
}
