use std::fmt;

pub const TOTAL_WASTES: usize = 3;
pub const TOTAL_FOUNDATIONS: usize = 4;
pub const TOTAL_DEPOTS: usize = 7;
pub const TOTAL_LOCATIONS: usize = 1 + TOTAL_WASTES + TOTAL_FOUNDATIONS + TOTAL_DEPOTS;

/// One of the 15 fixed slots on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    #[default]
    Stock,
    Waste(usize),
    Foundation(usize),
    Depot(usize),
}

impl Location {
    pub const ALL: [Location; TOTAL_LOCATIONS] = [
        Location::Stock,
        Location::Waste(0),
        Location::Waste(1),
        Location::Waste(2),
        Location::Foundation(0),
        Location::Foundation(1),
        Location::Foundation(2),
        Location::Foundation(3),
        Location::Depot(0),
        Location::Depot(1),
        Location::Depot(2),
        Location::Depot(3),
        Location::Depot(4),
        Location::Depot(5),
        Location::Depot(6),
    ];

    pub fn waste(index: usize) -> Self {
        assert!(index < TOTAL_WASTES, "Waste index {index} out of range");
        Location::Waste(index)
    }

    pub fn foundation(index: usize) -> Self {
        assert!(
            index < TOTAL_FOUNDATIONS,
            "Foundation index {index} out of range"
        );
        Location::Foundation(index)
    }

    pub fn depot(index: usize) -> Self {
        assert!(index < TOTAL_DEPOTS, "Depot index {index} out of range");
        Location::Depot(index)
    }

    pub fn is_stock(self) -> bool {
        matches!(self, Location::Stock)
    }

    pub fn is_waste(self) -> bool {
        matches!(self, Location::Waste(_))
    }

    pub fn is_foundation(self) -> bool {
        matches!(self, Location::Foundation(_))
    }

    pub fn is_depot(self) -> bool {
        matches!(self, Location::Depot(_))
    }

    pub fn waste_index(self) -> usize {
        match self {
            Location::Waste(index) => index,
            other => panic!("{other} is not a waste slot"),
        }
    }

    pub fn foundation_index(self) -> usize {
        match self {
            Location::Foundation(index) => index,
            other => panic!("{other} is not a foundation"),
        }
    }

    pub fn depot_index(self) -> usize {
        match self {
            Location::Depot(index) => index,
            other => panic!("{other} is not a depot"),
        }
    }

    /// Whether the index carried by the location is within its group.
    pub fn is_in_range(self) -> bool {
        match self {
            Location::Stock => true,
            Location::Waste(index) => index < TOTAL_WASTES,
            Location::Foundation(index) => index < TOTAL_FOUNDATIONS,
            Location::Depot(index) => index < TOTAL_DEPOTS,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Stock => write!(f, "Stock"),
            Location::Waste(index) => write!(f, "Waste{}", index + 1),
            Location::Foundation(index) => write!(f, "Foundation{}", index + 1),
            Location::Depot(index) => write!(f, "Depot{}", index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let stocks = Location::ALL.iter().filter(|l| l.is_stock()).count();
        let wastes = Location::ALL.iter().filter(|l| l.is_waste()).count();
        let foundations = Location::ALL.iter().filter(|l| l.is_foundation()).count();
        let depots = Location::ALL.iter().filter(|l| l.is_depot()).count();
        assert_eq!(
            (stocks, wastes, foundations, depots),
            (1, TOTAL_WASTES, TOTAL_FOUNDATIONS, TOTAL_DEPOTS)
        );
        for location in Location::ALL {
            let categories = [
                location.is_stock(),
                location.is_waste(),
                location.is_foundation(),
                location.is_depot(),
            ];
            assert_eq!(categories.iter().filter(|&&c| c).count(), 1);
            assert!(location.is_in_range());
        }
    }

    #[test]
    fn test_indices() {
        assert_eq!(Location::Waste(2).waste_index(), 2);
        assert_eq!(Location::Foundation(3).foundation_index(), 3);
        assert_eq!(Location::depot(6).depot_index(), 6);
        assert!(!Location::Depot(7).is_in_range());
    }

    #[test]
    fn test_display() {
        let names: Vec<_> = Location::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(names[0], "Stock");
        assert_eq!(names[1], "Waste1");
        assert_eq!(names[7], "Foundation4");
        assert_eq!(names[14], "Depot7");
    }

    #[test]
    #[should_panic(expected = "is not a depot")]
    fn test_depot_index_on_foundation() {
        Location::Foundation(0).depot_index();
    }

    #[test]
    #[should_panic(expected = "is not a waste slot")]
    fn test_waste_index_on_stock() {
        Location::Stock.waste_index();
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_checked_constructor() {
        Location::foundation(4);
    }
}
