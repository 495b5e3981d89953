use crate::location::Location;
use crate::rules::{RuleConfig, StackingRule, VacancyRule};

use std::fmt;
use std::ops::{Index, IndexMut};

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const DECK_SIZE: usize = (MAX_SUIT * MAX_RANK) as usize;
pub const ACE: u8 = 1;
pub const KING: u8 = 13;

const SUITS: [char; 4] = ['♣', '♦', '♥', '♠'];
const RANKS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; MAX_SUIT as usize] =
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn color(self) -> SuitColor {
        match self {
            Suit::Clubs | Suit::Spades => SuitColor::Black,
            Suit::Diamonds | Suit::Hearts => SuitColor::Red,
        }
    }

    pub fn symbol(self) -> char {
        SUITS[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuitColor {
    Black,
    Red,
}

/// Stable handle of a card in the [`Deck`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u8);

impl CardId {
    pub fn new(suit: Suit, rank: u8) -> Self {
        assert!(
            (ACE..=KING).contains(&rank),
            "Invalid rank {rank}, expected 1..=13"
        );
        Self(suit as u8 * MAX_RANK + rank - 1)
    }

    pub fn from_index(index: usize) -> Self {
        assert!(index < DECK_SIZE, "Card index {index} out of range");
        Self(index as u8)
    }

    pub fn all() -> impl Iterator<Item = CardId> {
        (0..DECK_SIZE as u8).map(CardId)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn suit(self) -> Suit {
        Suit::ALL[(self.0 / MAX_RANK) as usize]
    }

    pub fn rank(self) -> u8 {
        self.0 % MAX_RANK + 1
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", rank_symbol(self.rank()), self.suit().symbol())
    }
}

fn rank_symbol(rank: u8) -> char {
    RANKS[(rank - 1) as usize]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    suit: Suit,
    rank: u8,
    face_up: bool,
    revealed_naturally: bool,
    location: Location,
    behind: Option<CardId>,
    in_front: Option<CardId>,
}

impl Card {
    pub fn new(suit: Suit, rank: u8) -> Self {
        Self {
            suit,
            rank,
            face_up: false,
            revealed_naturally: false,
            location: Location::Stock,
            behind: None,
            in_front: None,
        }
    }

    /// Resets to the face-down, unlinked state in the stock.
    pub fn initialize(&mut self, suit: Suit, rank: u8) {
        self.suit = suit;
        self.rank = rank;
        self.face_up = false;
        self.revealed_naturally = false;
        self.location = Location::Stock;
        self.behind = None;
        self.in_front = None;
    }

    pub fn id(&self) -> CardId {
        CardId::new(self.suit, self.rank)
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn color(&self) -> SuitColor {
        self.suit.color()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == ACE
    }

    pub fn is_king(&self) -> bool {
        self.rank == KING
    }

    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub fn revealed_naturally(&self) -> bool {
        self.revealed_naturally
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn behind(&self) -> Option<CardId> {
        self.behind
    }

    pub fn in_front(&self) -> Option<CardId> {
        self.in_front
    }

    /// `natural` is true when ordinary play turns the card, false when a rule forces it.
    pub fn set_face_up(&mut self, face_up: bool, natural: bool) {
        if self.face_up == face_up {
            return;
        }
        self.face_up = face_up;
        if natural {
            self.revealed_naturally = face_up;
        }
    }

    /// Records that play has exposed a card already shown face-up by a rule.
    pub fn mark_revealed_naturally(&mut self) {
        debug_assert!(self.face_up, "{} is face-down", self.id());
        self.revealed_naturally = true;
    }

    /// Whether this card may sit directly in front of `below` in a depot.
    pub fn stacks_on(&self, below: &Card, stacking: StackingRule) -> bool {
        let color_ok = match stacking {
            StackingRule::AlternatingColors => self.color() != below.color(),
            StackingRule::AnyColor => true,
        };
        color_ok && self.rank + 1 == below.rank
    }

    /// Rank and suit glyphs, e.g. `('T', '♠')`.
    pub fn symbols(&self) -> (char, char) {
        (rank_symbol(self.rank), self.suit.symbol())
    }

    pub fn to_pretty_string(&self) -> String {
        let (rank, suit) = self.symbols();
        format!("{rank}{suit}")
    }
}

/// Arena owning all 52 cards for the whole lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    pub fn new() -> Self {
        Self {
            cards: std::array::from_fn(|i| {
                let id = CardId(i as u8);
                Card::new(id.suit(), id.rank())
            }),
        }
    }

    pub fn reset(&mut self) {
        for card in self.cards.iter_mut() {
            card.initialize(card.suit, card.rank);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardId, &Card)> {
        CardId::all().zip(self.cards.iter())
    }

    /// Moves `id` (and every card in front of it) onto `behind`, or to the
    /// bottom of `location` when `behind` is `None`.
    pub fn set_location(&mut self, id: CardId, location: Location, behind: Option<CardId>) {
        debug_assert_ne!(behind, Some(id), "{id} cannot be placed on itself");

        if let Some(old_behind) = self[id].behind.take() {
            self[old_behind].in_front = None;
        }

        if let Some(new_behind) = behind {
            debug_assert!(
                self[new_behind].in_front.is_none(),
                "{new_behind} already has a card in front of it"
            );
            self[new_behind].in_front = Some(id);
        }
        self[id].behind = behind;

        let mut next = Some(id);
        while let Some(current) = next {
            self[current].location = location;
            next = self[current].in_front;
        }
    }

    /// Cards from `id` toward the viewer, `id` included.
    pub fn chain_from(&self, id: CardId) -> impl Iterator<Item = CardId> + '_ {
        std::iter::successors(Some(id), |&c| self[c].in_front)
    }

    /// Cards from `id` toward the table, `id` included.
    pub fn chain_behind(&self, id: CardId) -> impl Iterator<Item = CardId> + '_ {
        std::iter::successors(Some(id), |&c| self[c].behind)
    }

    pub fn topmost(&self, id: CardId) -> CardId {
        let mut current = id;
        while let Some(next) = self[current].in_front {
            current = next;
        }
        current
    }

    pub fn bottommost(&self, id: CardId) -> CardId {
        let mut current = id;
        while let Some(prev) = self[current].behind {
            current = prev;
        }
        current
    }

    /// Face-up card heading a run that descends by one toward the viewer.
    pub fn is_movable_run(&self, id: CardId, stacking: StackingRule) -> bool {
        let card = &self[id];
        if !card.face_up {
            return false;
        }
        let mut current = card;
        while let Some(next) = current.in_front {
            let next = &self[next];
            if !next.stacks_on(current, stacking) {
                return false;
            }
            current = next;
        }
        true
    }

    pub fn bottommost_movable(&self, id: CardId, stacking: StackingRule) -> CardId {
        if !self[id].location.is_depot() {
            return id;
        }
        let mut current = id;
        while let Some(behind) = self[current].behind
            && self.is_movable_run(behind, stacking)
        {
            current = behind;
        }
        current
    }

    /// Destination check only; callers confirm the card can be picked up first.
    /// `target` is the topmost card at `destination`, if any.
    pub fn can_be_moved_to(
        &self,
        id: CardId,
        destination: Location,
        target: Option<CardId>,
        rules: &RuleConfig,
    ) -> bool {
        let card = &self[id];
        match destination {
            Location::Depot(_) => match target {
                Some(target) => card.stacks_on(&self[target], rules.stacking),
                None => card.is_king() || rules.vacancy == VacancyRule::AnyCard,
            },
            Location::Foundation(_) => {
                if card.in_front.is_some() {
                    return false;
                }
                match target {
                    Some(target) => {
                        let target = &self[target];
                        target.suit == card.suit && target.rank + 1 == card.rank
                    }
                    None => card.is_ace(),
                }
            }
            Location::Stock | Location::Waste(_) => false,
        }
    }
}

impl Index<CardId> for Deck {
    type Output = Card;

    fn index(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }
}

impl IndexMut<CardId> for Deck {
    fn index_mut(&mut self, id: CardId) -> &mut Card {
        &mut self.cards[id.index()]
    }
}
