//! Directional cursor navigation over the table.

use crate::card::CardId;
use crate::location::{Location, TOTAL_DEPOTS, TOTAL_FOUNDATIONS};
use crate::solitaire::Solitaire;

use std::time::Duration;

pub const DEFAULT_LOCATION: Location = Location::Depot(3);
pub const POINTER_PERIOD: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) location: Location,
    pub(crate) card: Option<CardId>,
    pub(crate) selection: Option<CardId>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION,
            card: None,
            selection: None,
        }
    }
}

impl Cursor {
    pub fn location(&self) -> Location {
        self.location
    }

    /// `None` when pointing at the anchor of a vacant location.
    pub fn card(&self) -> Option<CardId> {
        self.card
    }

    pub fn selection(&self) -> Option<CardId> {
        self.selection
    }
}

/// Top-row slot above a depot, or the depot below a top-row slot.
pub fn vertical_destination(location: Location) -> Location {
    match location {
        Location::Stock => Location::depot(0),
        Location::Waste(0 | 1) => Location::depot(1),
        Location::Waste(_) => Location::depot(2),
        Location::Foundation(index) => Location::depot(index + 3),
        Location::Depot(0) => Location::Stock,
        Location::Depot(1 | 2) => Location::waste(0),
        Location::Depot(index) => Location::foundation(index - 3),
    }
}

/// The top row cycles Stock, Waste, Foundation1..4; the depots cycle among themselves.
pub fn horizontal_destination(location: Location, direction: Direction) -> Location {
    let right = match direction {
        Direction::Right => true,
        Direction::Left => false,
        Direction::Up | Direction::Down => return location,
    };
    match (location, right) {
        (Location::Stock, true) => Location::waste(0),
        (Location::Stock, false) => Location::foundation(TOTAL_FOUNDATIONS - 1),
        (Location::Waste(_), true) => Location::foundation(0),
        (Location::Waste(_), false) => Location::Stock,
        (Location::Foundation(index), true) if index + 1 == TOTAL_FOUNDATIONS => Location::Stock,
        (Location::Foundation(index), true) => Location::foundation(index + 1),
        (Location::Foundation(0), false) => Location::waste(0),
        (Location::Foundation(index), false) => Location::foundation(index - 1),
        (Location::Depot(index), true) => Location::depot((index + 1) % TOTAL_DEPOTS),
        (Location::Depot(index), false) => Location::depot((index + TOTAL_DEPOTS - 1) % TOTAL_DEPOTS),
    }
}

impl Solitaire {
    pub fn navigate(&mut self, direction: Direction) {
        let location = self.cursor.location;
        match direction {
            Direction::Left | Direction::Right => {
                let destination = horizontal_destination(location, direction);
                if destination.is_depot() {
                    self.navigate_to_depot(destination);
                } else {
                    self.point_to_location(destination);
                }
            }
            Direction::Up => {
                if location.is_depot()
                    && let Some(card) = self.cursor.card
                    && let Some(behind) = self.card(card).behind()
                    && self.can_be_moved(behind)
                {
                    self.point_to_card(behind);
                } else {
                    self.point_to_location(vertical_destination(location));
                }
            }
            Direction::Down => {
                if !location.is_depot() {
                    self.navigate_to_depot(vertical_destination(location));
                } else if let Some(card) = self.cursor.card
                    && let Some(in_front) = self.card(card).in_front()
                {
                    self.point_to_card(in_front);
                } else {
                    self.point_to_location(vertical_destination(location));
                }
            }
        }
    }

    /// Points at the topmost card of `location`, or its anchor when vacant.
    pub fn point_to_location(&mut self, location: Location) {
        match self.topmost_card(location) {
            Some(card) => self.point_to_card(card),
            None => {
                self.cursor.location = match location {
                    Location::Waste(_) => Location::Waste(0),
                    other => other,
                };
                self.cursor.card = None;
            }
        }
    }

    pub fn point_to_card(&mut self, card: CardId) {
        self.cursor.location = self.card(card).location();
        self.cursor.card = Some(card);
    }

    fn navigate_to_depot(&mut self, location: Location) {
        debug_assert!(location.is_depot());
        let Some(topmost) = self.topmost_card(location) else {
            self.point_to_location(location);
            return;
        };
        // Aim at the drop target while holding a card
        if self.cursor.selection.is_some() {
            self.point_to_card(topmost);
            return;
        }
        let bottommost = self
            .deck()
            .bottommost_movable(topmost, self.rules().stacking);
        let card = self.card(bottommost);
        // King-rooted runs offer their top card
        if card.is_king() && card.behind().is_none() {
            self.point_to_card(topmost);
        } else {
            self.point_to_card(bottommost);
        }
    }

    /// Re-points the cursor when its card has left the cursor location or is
    /// no longer the card on show there.
    pub(crate) fn refresh_cursor(&mut self) {
        let location = self.cursor.location;
        let stale = match self.cursor.card {
            Some(card) => {
                let actual = self.card(card).location();
                actual != location || (!actual.is_depot() && self.topmost_card(actual) != Some(card))
            }
            None => self.topmost_card(location).is_some(),
        };
        if stale {
            self.point_to_location(location);
        }
    }
}

/// Pointing animation phase, advanced only by explicit clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerClock {
    last_toggle: Option<Duration>,
    retracted: bool,
}

impl PointerClock {
    /// `now` is the elapsed time since any fixed origin. Returns whether the
    /// pointer is retracted.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.last_toggle {
            // The first tick only starts the clock
            None => self.last_toggle = Some(now),
            Some(last) if now.saturating_sub(last) >= POINTER_PERIOD => {
                let elapsed = now - last;
                let overflow = Duration::from_nanos(
                    (elapsed.as_nanos() % POINTER_PERIOD.as_nanos()) as u64,
                );
                let toggles = elapsed.as_nanos() / POINTER_PERIOD.as_nanos();
                if toggles % 2 == 1 {
                    self.retracted = !self.retracted;
                }
                self.last_toggle = Some(now - overflow);
            }
            Some(_) => {}
        }
        self.retracted
    }

    pub fn is_retracted(&self) -> bool {
        self.retracted
    }
}
