use crate::card::{Card, CardId, DECK_SIZE, Deck};
use crate::cursor::Cursor;
use crate::location::{Location, TOTAL_DEPOTS, TOTAL_FOUNDATIONS, TOTAL_WASTES};
use crate::rules::{RuleConfig, StackingRule, VacancyRule};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use tracing::{debug, info};

pub const TALON_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Won,
}

#[derive(Debug, Clone, Default)]
pub struct WastePile {
    pub cards: SmallVec<[CardId; TALON_SIZE]>,
    pub visible_count: usize,
}

impl WastePile {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// The exposed set, bottom to top.
    pub fn visible(&self) -> &[CardId] {
        let len = self.cards.len();
        &self.cards[len - self.visible_count.min(len)..]
    }

    fn clear(&mut self) {
        self.cards.clear();
        self.visible_count = 0;
    }
}

/// Owns the whole table: deck arena, stock, waste, topmost caches, cursor.
#[derive(Debug, Clone)]
pub struct Solitaire {
    deck: Deck,
    order: [CardId; DECK_SIZE],
    stock: SmallVec<[CardId; TALON_SIZE]>,
    waste: WastePile,
    depot_topmost: [Option<CardId>; TOTAL_DEPOTS],
    foundation_topmost: [Option<CardId>; TOTAL_FOUNDATIONS],
    rules: RuleConfig,
    pub(crate) cursor: Cursor,
    won: bool,
    rng: StdRng,
}

impl Solitaire {
    pub fn new(rules: RuleConfig) -> Self {
        Self::with_seed(rand::random(), rules)
    }

    pub fn with_seed(seed: u64, rules: RuleConfig) -> Self {
        debug!(seed, "Creating table");
        let mut game = Self {
            deck: Deck::new(),
            order: std::array::from_fn(CardId::from_index),
            stock: SmallVec::new(),
            waste: WastePile::default(),
            depot_topmost: [None; TOTAL_DEPOTS],
            foundation_topmost: [None; TOTAL_FOUNDATIONS],
            rules,
            cursor: Cursor::default(),
            won: false,
            rng: StdRng::seed_from_u64(seed),
        };
        game.deal();
        game
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn card(&self, id: CardId) -> &Card {
        &self.deck[id]
    }

    pub fn stock(&self) -> &[CardId] {
        &self.stock
    }

    pub fn waste(&self) -> &WastePile {
        &self.waste
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn deal(&mut self) {
        self.deck.reset();
        self.stock.clear();
        self.waste.clear();
        self.depot_topmost = [None; TOTAL_DEPOTS];
        self.foundation_topmost = [None; TOTAL_FOUNDATIONS];
        self.cursor = Cursor::default();
        self.won = false;

        // Fisher-Yates
        for i in 0..DECK_SIZE - 1 {
            let j = self.rng.random_range(i..DECK_SIZE);
            self.order.swap(i, j);
        }

        let order = self.order;
        let mut next = 0;
        for row in 0..TOTAL_DEPOTS {
            for depot in row..TOTAL_DEPOTS {
                let id = order[next];
                next += 1;
                self.set_card_location(id, Location::depot(depot));
                let natural = depot == row;
                if natural || self.rules.tableau_visible {
                    self.deck[id].set_face_up(true, natural);
                }
            }
        }

        for &id in &order[next..] {
            self.set_card_location(id, Location::Stock);
            self.deck[id].set_face_up(false, true);
            self.stock.push(id);
        }

        self.point_to_location(crate::cursor::DEFAULT_LOCATION);
        debug!(stock = self.stock.len(), "Dealt a new game");
        self.debug_check();
    }

    pub fn draw_from_stock(&mut self) {
        if self.stock.is_empty() {
            if self.waste.is_empty() {
                return;
            }
            self.recycle_waste();
        } else {
            let count = self.rules.draw_count().min(self.stock.len());
            for i in 0..count {
                let id = self.stock.remove(0);
                self.waste.cards.push(id);
                self.deck[id].set_face_up(true, true);
                self.set_card_location(id, Location::Waste(i));
            }
            self.waste.visible_count = count;
            debug!(count, stock = self.stock.len(), "Drew from stock");
        }
        self.refresh_cursor();
        self.debug_check();
    }

    fn recycle_waste(&mut self) {
        let cards = std::mem::take(&mut self.waste.cards);
        self.waste.visible_count = 0;
        for &id in &cards {
            self.deck[id].set_face_up(false, true);
            self.set_card_location(id, Location::Stock);
            self.stock.push(id);
        }
        debug!(count = cards.len(), "Recycled waste into stock");
    }

    pub fn topmost_card(&self, location: Location) -> Option<CardId> {
        assert!(location.is_in_range(), "{location} is out of range");
        match location {
            Location::Stock => self.stock.first().copied(),
            Location::Waste(_) => self.waste.peek_top(),
            Location::Foundation(index) => self.foundation_topmost[index],
            Location::Depot(index) => self.depot_topmost[index],
        }
    }

    pub fn can_be_moved(&self, id: CardId) -> bool {
        let location = self.deck[id].location();
        match location {
            Location::Depot(_) => self.deck.is_movable_run(id, self.rules.stacking),
            Location::Foundation(_) => {
                self.rules.foundation_take_back && self.topmost_card(location) == Some(id)
            }
            Location::Waste(_) => self.topmost_card(location) == Some(id),
            Location::Stock => false,
        }
    }

    pub fn can_be_moved_to(&self, id: CardId, destination: Location) -> bool {
        destination.is_in_range()
            && self.deck.can_be_moved_to(
                id,
                destination,
                self.topmost_card(destination),
                &self.rules,
            )
    }

    /// Validates and performs a move; false leaves the table untouched.
    pub fn attempt_move(&mut self, id: CardId, destination: Location) -> bool {
        if !self.can_be_moved(id) || !self.can_be_moved_to(id, destination) {
            debug!(card = %id, %destination, "Rejected move");
            return false;
        }
        self.execute_move(id, destination);
        true
    }

    /// Both `can_be_moved` and `can_be_moved_to` must already hold.
    pub fn execute_move(&mut self, id: CardId, destination: Location) -> MoveOutcome {
        debug_assert!(
            self.can_be_moved(id) && self.can_be_moved_to(id, destination),
            "Illegal move of {id} to {destination}"
        );
        let source = self.deck[id].location();
        match source {
            Location::Depot(index) => {
                let behind = self.deck[id].behind();
                if let Some(behind) = behind {
                    self.reveal(behind);
                }
                self.depot_topmost[index] = behind;
            }
            Location::Foundation(index) => {
                self.foundation_topmost[index] = self.deck[id].behind();
            }
            Location::Waste(_) => self.pop_waste(),
            Location::Stock => unreachable!("Stock cards are drawn, not moved"),
        }

        // Played cards stay visible when the tableau is hidden again
        let moved: SmallVec<[CardId; 13]> = self.deck.chain_from(id).collect();
        for card in moved {
            self.reveal(card);
        }

        self.set_card_location(id, destination);
        self.won = self.check_win();
        debug!(card = %id, %source, %destination, "Moved");
        self.refresh_cursor();
        self.debug_check();

        if self.won {
            info!("All foundations complete");
            MoveOutcome::Won
        } else {
            MoveOutcome::Moved
        }
    }

    fn reveal(&mut self, id: CardId) {
        let card = &mut self.deck[id];
        card.set_face_up(true, true);
        card.mark_revealed_naturally();
    }

    fn pop_waste(&mut self) {
        self.waste.cards.pop();
        self.waste.visible_count = self.waste.visible_count.saturating_sub(1);
        if self.waste.visible_count > 0 || self.waste.is_empty() {
            return;
        }
        // The whole exposed set is gone, so expose the previous one
        let len = self.waste.len();
        let count = self.rules.draw_count().min(len);
        for i in 0..count {
            let id = self.waste.cards[len - 1 - i];
            self.set_card_location(id, Location::Waste(count - 1 - i));
        }
        self.waste.visible_count = count;
    }

    fn check_win(&self) -> bool {
        self.foundation_topmost
            .iter()
            .all(|top| top.is_some_and(|id| self.deck[id].is_king()))
    }

    fn set_card_location(&mut self, id: CardId, location: Location) {
        let behind = match location {
            Location::Depot(index) => self.depot_topmost[index],
            Location::Foundation(index) => self.foundation_topmost[index],
            Location::Stock | Location::Waste(_) => None,
        };
        self.deck.set_location(id, location, behind);
        match location {
            Location::Depot(index) => self.depot_topmost[index] = Some(self.deck.topmost(id)),
            Location::Foundation(index) => self.foundation_topmost[index] = Some(id),
            Location::Stock | Location::Waste(_) => {}
        }
    }

    pub fn select_card(&mut self, id: CardId) -> bool {
        if !self.can_be_moved(id) {
            return false;
        }
        self.cursor.selection = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.cursor.selection = None;
    }

    pub fn set_draw_count(&mut self, value: isize) {
        self.rules.set_draw_count(value);
    }

    pub fn set_vacancy_rule(&mut self, vacancy: VacancyRule) {
        self.rules.vacancy = vacancy;
    }

    pub fn set_foundation_take_back(&mut self, allowed: bool) {
        self.rules.foundation_take_back = allowed;
    }

    pub fn set_stacking_rule(&mut self, stacking: StackingRule) {
        self.rules.stacking = stacking;
    }

    pub fn set_tableau_visible(&mut self, visible: bool) {
        self.rules.tableau_visible = visible;
        for index in 0..TOTAL_DEPOTS {
            let mut next = self.depot_topmost[index];
            while let Some(id) = next {
                let card = &mut self.deck[id];
                if visible {
                    card.set_face_up(true, false);
                } else if !card.revealed_naturally() {
                    card.set_face_up(false, false);
                }
                next = card.behind();
            }
        }
        self.debug_check();
    }

    /// Number of cards on the foundations.
    pub fn foundation_score(&self) -> u8 {
        self.foundation_topmost
            .iter()
            .map(|top| top.map_or(0, |id| self.deck[id].rank()))
            .sum()
    }

    /// Cards of a depot or foundation from the table up.
    pub fn pile(&self, location: Location) -> Vec<CardId> {
        match self.topmost_card(location) {
            Some(top) if location.is_depot() || location.is_foundation() => {
                let mut cards: Vec<_> = self.deck.chain_behind(top).collect();
                cards.reverse();
                cards
            }
            _ => Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        let mut seen = [false; DECK_SIZE];
        let mut count = 0;
        let mut mark = |id: CardId| -> bool {
            if seen[id.index()] {
                return false;
            }
            seen[id.index()] = true;
            count += 1;
            true
        };

        for &id in &self.stock {
            let card = &self.deck[id];
            if !mark(id) || card.location() != Location::Stock || card.is_face_up() {
                return false;
            }
            if card.behind().is_some() || card.in_front().is_some() {
                return false;
            }
        }

        if self.waste.visible_count > TOTAL_WASTES.min(self.waste.len()) {
            return false;
        }
        for &id in &self.waste.cards {
            let card = &self.deck[id];
            if !mark(id) || !card.location().is_waste() || !card.is_face_up() {
                return false;
            }
            if card.behind().is_some() || card.in_front().is_some() {
                return false;
            }
        }

        let piles = (0..TOTAL_FOUNDATIONS)
            .map(|i| (Location::Foundation(i), self.foundation_topmost[i]))
            .chain((0..TOTAL_DEPOTS).map(|i| (Location::Depot(i), self.depot_topmost[i])));
        for (location, top) in piles {
            let Some(top) = top else {
                continue;
            };
            if self.deck[top].in_front().is_some() {
                return false;
            }
            let mut length = 0;
            for id in self.deck.chain_behind(top) {
                length += 1;
                if length > DECK_SIZE || !mark(id) {
                    return false;
                }
                let card = &self.deck[id];
                if card.location() != location {
                    return false;
                }
                if let Some(behind) = card.behind()
                    && self.deck[behind].in_front() != Some(id)
                {
                    return false;
                }
            }
        }

        if count != DECK_SIZE {
            return false;
        }

        match self.cursor.card {
            Some(id) => self.deck[id].location() == self.cursor.location,
            None => self.topmost_card(self.cursor.location).is_none(),
        }
    }

    fn debug_check(&self) {
        debug_assert!(self.is_valid(), "Table invariants broken:\n{}", self.to_pretty_string());
    }

    pub fn to_pretty_string(&self) -> String {
        let mut output = String::new();
        let join = |cards: &[CardId]| -> String {
            cards
                .iter()
                .map(|&id| self.deck[id].to_pretty_string())
                .collect()
        };

        if !self.stock.is_empty() {
            output.push_str(&format!("Stock: {}\n", join(&self.stock)));
        }

        if !self.waste.is_empty() {
            let sep = self.waste.len() - self.waste.visible().len();
            let (hidden, visible) = self.waste.cards.split_at(sep);
            output.push_str(&format!("Waste: {}|{}\n", join(hidden), join(visible)));
        }

        for i in 0..TOTAL_FOUNDATIONS {
            let cards = self.pile(Location::Foundation(i));
            if !cards.is_empty() {
                output.push_str(&format!("Foundation{}: {}\n", i + 1, join(&cards)));
            }
        }

        for i in 0..TOTAL_DEPOTS {
            let cards = self.pile(Location::Depot(i));
            if cards.is_empty() {
                continue;
            }
            let sep = cards
                .iter()
                .position(|&id| self.deck[id].is_face_up())
                .unwrap_or(cards.len());
            let (face_down, face_up) = cards.split_at(sep);
            output.push_str(&format!(
                "Depot{}: {}|{}\n",
                i + 1,
                join(face_down),
                join(face_up)
            ));
        }

        output.push_str(&format!("DrawCount: {}", self.rules.draw_count()));
        output
    }
}

#[cfg(test)]
impl Solitaire {
    /// A table with every card in the stock, ready for `place`.
    pub(crate) fn empty(rules: RuleConfig) -> Self {
        let mut game = Self::with_seed(0, rules);
        game.deck.reset();
        game.stock.clear();
        game.waste.clear();
        game.depot_topmost = [None; TOTAL_DEPOTS];
        game.foundation_topmost = [None; TOTAL_FOUNDATIONS];
        game.won = false;
        game.stock.extend(CardId::all());
        game.cursor = Cursor::default();
        game.point_to_location(Location::Stock);
        game
    }

    /// Puts a card straight onto `location`, skipping the move rules.
    pub(crate) fn place(
        &mut self,
        suit: crate::card::Suit,
        rank: u8,
        location: Location,
        face_up: bool,
    ) -> CardId {
        let id = CardId::new(suit, rank);
        self.stock.retain(|c| *c != id);
        self.waste.cards.retain(|c| *c != id);
        self.waste.visible_count = self.waste.visible_count.min(self.waste.len());
        if location.is_waste() {
            self.waste.cards.push(id);
            self.waste.visible_count = (self.waste.visible_count + 1).min(TOTAL_WASTES);
        }
        if location.is_stock() {
            self.stock.push(id);
        }
        self.set_card_location(id, location);
        self.deck[id].set_face_up(face_up, true);
        self.refresh_cursor();
        id
    }
}
