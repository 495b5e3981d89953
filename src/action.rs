use crate::cursor::Direction;
use crate::solitaire::Solitaire;

use std::fmt;
use tracing::debug;

/// Presentation-level input, one per button press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    Navigate(Direction),
    Select,
    Back,
    Draw,
    Deal,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Feedback {
    None,
    Navigated,
    Drew,
    Dealt,
    Selected,
    Released,
    Moved,
    Won,
    Rejected,
    MenuRequested,
}

impl Intent {
    pub fn parse(token: &str) -> Option<Self> {
        let intent = match token.to_ascii_lowercase().as_str() {
            "l" | "left" => Intent::Navigate(Direction::Left),
            "r" | "right" => Intent::Navigate(Direction::Right),
            "u" | "up" => Intent::Navigate(Direction::Up),
            "d" | "down" => Intent::Navigate(Direction::Down),
            "s" | "select" => Intent::Select,
            "b" | "back" => Intent::Back,
            "w" | "draw" => Intent::Draw,
            "n" | "deal" => Intent::Deal,
            _ => return None,
        };
        Some(intent)
    }

    fn alias(&self) -> char {
        match self {
            Intent::Navigate(Direction::Left) => 'l',
            Intent::Navigate(Direction::Right) => 'r',
            Intent::Navigate(Direction::Up) => 'u',
            Intent::Navigate(Direction::Down) => 'd',
            Intent::Select => 's',
            Intent::Back => 'b',
            Intent::Draw => 'w',
            Intent::Deal => 'n',
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::Navigate(Direction::Left) => "left",
            Intent::Navigate(Direction::Right) => "right",
            Intent::Navigate(Direction::Up) => "up",
            Intent::Navigate(Direction::Down) => "down",
            Intent::Select => "select",
            Intent::Back => "back",
            Intent::Draw => "draw",
            Intent::Deal => "deal",
        };
        write!(f, "{name}")
    }
}

/// Splits a whitespace or comma separated script. A token may carry a repeat
/// prefix such as `3r`. Returns the intents and the tokens that were skipped.
pub fn parse_intents(script: &str) -> (Vec<Intent>, Vec<String>) {
    let mut intents = vec![];
    let mut unknown = vec![];
    for token in script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
        let (count, name) = token.split_at(digits);
        let count = if count.is_empty() {
            Some(1)
        } else {
            count.parse::<usize>().ok()
        };
        match (count, Intent::parse(name)) {
            (Some(count), Some(intent)) => {
                intents.extend(std::iter::repeat_n(intent, count));
            }
            _ => unknown.push(token.to_string()),
        }
    }
    (intents, unknown)
}

pub fn format_intents(intents: &[Intent]) -> String {
    let mut list = vec![];
    let mut i = 0;
    while i < intents.len() {
        let intent = intents[i];
        let mut count = 1;
        while i + count < intents.len() && intents[i + count] == intent {
            count += 1;
        }
        let str = if count == 1 {
            intent.alias().to_string()
        } else {
            format!("{count}{}", intent.alias())
        };
        list.push(str);
        i += count;
    }

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.push('\n');
    }

    output
}

pub fn apply_intent(game: &mut Solitaire, intent: Intent) -> Feedback {
    debug!(%intent, cursor = %game.cursor().location(), "Applying intent");
    match intent {
        Intent::Navigate(direction) => {
            game.navigate(direction);
            Feedback::Navigated
        }
        Intent::Select => select(game),
        Intent::Back => {
            if game.cursor().selection().is_some() {
                game.clear_selection();
                Feedback::Released
            } else {
                Feedback::MenuRequested
            }
        }
        Intent::Draw => {
            game.draw_from_stock();
            Feedback::Drew
        }
        Intent::Deal => {
            game.deal();
            Feedback::Dealt
        }
    }
}

fn select(game: &mut Solitaire) -> Feedback {
    let cursor = *game.cursor();
    if let Some(held) = cursor.selection() {
        game.clear_selection();
        let destination = cursor.location();
        if !game.attempt_move(held, destination) {
            return Feedback::Rejected;
        }
        if destination.is_foundation() {
            game.point_to_card(held);
        }
        return if game.is_won() {
            Feedback::Won
        } else {
            Feedback::Moved
        };
    }

    if cursor.location().is_stock() {
        game.draw_from_stock();
        return Feedback::Drew;
    }
    match cursor.card() {
        Some(card) if game.select_card(card) => Feedback::Selected,
        _ => Feedback::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use crate::location::Location;
    use crate::rules::RuleConfig;

    fn run(game: &mut Solitaire, script: &str) -> Vec<Feedback> {
        let (intents, unknown) = parse_intents(script);
        assert!(unknown.is_empty(), "Unknown tokens {unknown:?}");
        intents
            .into_iter()
            .map(|intent| apply_intent(game, intent))
            .collect()
    }

    #[test]
    fn test_parse_intents() {
        let (intents, unknown) = parse_intents("l right 2u, Down s\nfoo b w n 0x");
        assert_eq!(
            intents,
            vec![
                Intent::Navigate(Direction::Left),
                Intent::Navigate(Direction::Right),
                Intent::Navigate(Direction::Up),
                Intent::Navigate(Direction::Up),
                Intent::Navigate(Direction::Down),
                Intent::Select,
                Intent::Back,
                Intent::Draw,
                Intent::Deal,
            ]
        );
        assert_eq!(unknown, vec!["foo".to_string(), "0x".to_string()]);
    }

    #[test]
    fn test_format_intents() {
        let (intents, _) = parse_intents("r r r d s w w n");
        assert_eq!(format_intents(&intents), "3r d  s  2w n  \n");
        let (reparsed, unknown) = parse_intents(&format_intents(&intents));
        assert!(unknown.is_empty());
        assert_eq!(reparsed, intents);
        assert_eq!(Intent::Navigate(Direction::Up).to_string(), "up");
    }

    #[test]
    fn test_select_on_stock_draws() {
        let mut game = Solitaire::with_seed(9, RuleConfig::default());
        game.point_to_location(Location::Stock);
        assert_eq!(run(&mut game, "s"), vec![Feedback::Drew]);
        assert_eq!(game.waste().len(), 3);
        assert_eq!(game.cursor().selection(), None);
    }

    #[test]
    fn test_pick_up_and_move() {
        let mut game = Solitaire::empty(RuleConfig::default());
        let hidden = game.place(Suit::Clubs, 2, Location::Depot(0), false);
        let seven = game.place(Suit::Hearts, 7, Location::Depot(0), true);
        let eight = game.place(Suit::Spades, 8, Location::Depot(1), true);

        game.point_to_location(Location::Depot(0));
        assert_eq!(run(&mut game, "s"), vec![Feedback::Selected]);
        assert_eq!(game.cursor().selection(), Some(seven));
        assert_eq!(run(&mut game, "r s"), vec![Feedback::Navigated, Feedback::Moved]);
        assert_eq!(game.cursor().selection(), None);
        assert_eq!(game.card(seven).behind(), Some(eight));
        assert!(game.card(hidden).is_face_up());
    }

    #[test]
    fn test_rejected_move_releases_selection() {
        let mut game = Solitaire::empty(RuleConfig::default());
        game.place(Suit::Hearts, 7, Location::Depot(0), true);
        game.place(Suit::Diamonds, 8, Location::Depot(1), true);
        game.point_to_location(Location::Depot(0));
        let before = game.to_pretty_string();
        assert_eq!(
            run(&mut game, "s r s"),
            vec![Feedback::Selected, Feedback::Navigated, Feedback::Rejected]
        );
        assert_eq!(game.cursor().selection(), None);
        assert_eq!(game.to_pretty_string(), before);
    }

    #[test]
    fn test_move_to_foundation_points_at_card() {
        let mut game = Solitaire::empty(RuleConfig::default());
        game.place(Suit::Clubs, 9, Location::Depot(3), true);
        let ace = game.place(Suit::Diamonds, 1, Location::Depot(3), true);
        game.point_to_location(Location::Depot(3));
        assert_eq!(
            run(&mut game, "s u s"),
            vec![Feedback::Selected, Feedback::Navigated, Feedback::Moved]
        );
        assert_eq!(game.card(ace).location(), Location::Foundation(0));
        assert_eq!(game.cursor().card(), Some(ace));
        assert_eq!(game.cursor().location(), Location::Foundation(0));
    }

    #[test]
    fn test_back() {
        let mut game = Solitaire::with_seed(4, RuleConfig::default());
        assert_eq!(run(&mut game, "b"), vec![Feedback::MenuRequested]);
        assert_eq!(run(&mut game, "s b"), vec![Feedback::Selected, Feedback::Released]);
        assert_eq!(game.cursor().selection(), None);
    }

    #[test]
    fn test_select_on_anchor() {
        let mut game = Solitaire::empty(RuleConfig::default());
        game.point_to_location(Location::Foundation(2));
        assert_eq!(run(&mut game, "s"), vec![Feedback::None]);
        assert_eq!(game.cursor().selection(), None);
    }

    #[test]
    fn test_foundation_pick_up_requires_take_back() {
        let mut game = Solitaire::empty(RuleConfig::default().with_foundation_take_back(false));
        game.place(Suit::Hearts, 1, Location::Foundation(1), true);
        game.point_to_location(Location::Foundation(1));
        assert_eq!(run(&mut game, "s"), vec![Feedback::None]);
        game.set_foundation_take_back(true);
        assert_eq!(run(&mut game, "s"), vec![Feedback::Selected]);
    }

    #[test]
    fn test_winning_move() {
        let mut game = Solitaire::empty(RuleConfig::default());
        for (i, suit) in Suit::ALL.into_iter().enumerate() {
            let top = if suit == Suit::Spades { 12 } else { 13 };
            for rank in 1..=top {
                game.place(suit, rank, Location::Foundation(i), true);
            }
        }
        game.place(Suit::Spades, 13, Location::Depot(6), true);
        game.point_to_location(Location::Depot(6));
        assert_eq!(
            run(&mut game, "s u s"),
            vec![Feedback::Selected, Feedback::Navigated, Feedback::Won]
        );
        assert!(game.is_won());
    }

    #[test]
    fn test_draw_and_deal() {
        let mut game = Solitaire::with_seed(8, RuleConfig::default());
        assert_eq!(run(&mut game, "w"), vec![Feedback::Drew]);
        assert_eq!(game.waste().len(), 3);
        assert_eq!(run(&mut game, "n"), vec![Feedback::Dealt]);
        assert!(game.waste().is_empty());
        assert_eq!(game.cursor().location(), Location::Depot(3));
    }
}
