use crate::location::TOTAL_WASTES;

pub const DEFAULT_DRAW_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackingRule {
    #[default]
    AlternatingColors,
    AnyColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VacancyRule {
    #[default]
    KingsOnly,
    AnyCard,
}

/// Rule variants shared by the move predicates and the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConfig {
    draw_count: usize,
    pub vacancy: VacancyRule,
    pub foundation_take_back: bool,
    pub tableau_visible: bool,
    pub stacking: StackingRule,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            draw_count: DEFAULT_DRAW_COUNT,
            vacancy: VacancyRule::default(),
            foundation_take_back: true,
            tableau_visible: false,
            stacking: StackingRule::default(),
        }
    }
}

impl RuleConfig {
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Values below 1 wrap to 3 and values above 3 wrap to 1, so a menu can step through them.
    pub fn set_draw_count(&mut self, value: isize) {
        self.draw_count = if value < 1 {
            TOTAL_WASTES
        } else if value > TOTAL_WASTES as isize {
            1
        } else {
            value as usize
        };
    }

    pub fn with_draw_count(mut self, value: isize) -> Self {
        self.set_draw_count(value);
        self
    }

    pub fn with_vacancy(mut self, vacancy: VacancyRule) -> Self {
        self.vacancy = vacancy;
        self
    }

    pub fn with_stacking(mut self, stacking: StackingRule) -> Self {
        self.stacking = stacking;
        self
    }

    pub fn with_foundation_take_back(mut self, allowed: bool) -> Self {
        self.foundation_take_back = allowed;
        self
    }

    pub fn with_tableau_visible(mut self, visible: bool) -> Self {
        self.tableau_visible = visible;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = RuleConfig::default();
        assert_eq!(rules.draw_count(), 3);
        assert_eq!(rules.vacancy, VacancyRule::KingsOnly);
        assert!(rules.foundation_take_back);
        assert!(!rules.tableau_visible);
        assert_eq!(rules.stacking, StackingRule::AlternatingColors);
    }

    #[test]
    fn test_draw_count_cycles() {
        let mut rules = RuleConfig::default();
        rules.set_draw_count(4);
        assert_eq!(rules.draw_count(), 1);
        rules.set_draw_count(0);
        assert_eq!(rules.draw_count(), 3);
        rules.set_draw_count(2);
        assert_eq!(rules.draw_count(), 2);
        let next = rules.draw_count() as isize + 1;
        rules.set_draw_count(next);
        assert_eq!(rules.draw_count(), 3);
        rules.set_draw_count(-7);
        assert_eq!(rules.draw_count(), 3);
    }

    #[test]
    fn test_builders() {
        let rules = RuleConfig::default()
            .with_draw_count(1)
            .with_vacancy(VacancyRule::AnyCard)
            .with_stacking(StackingRule::AnyColor)
            .with_foundation_take_back(false)
            .with_tableau_visible(true);
        assert_eq!(rules.draw_count(), 1);
        assert_eq!(rules.vacancy, VacancyRule::AnyCard);
        assert_eq!(rules.stacking, StackingRule::AnyColor);
        assert!(!rules.foundation_take_back);
        assert!(rules.tableau_visible);
    }
}
