//! Rules and state engine for Klondike Solitaire.

pub mod action;
pub mod card;
pub mod cursor;
pub mod location;
pub mod rules;
pub mod solitaire;

pub use location::Location;
pub use rules::RuleConfig;
pub use solitaire::Solitaire;
