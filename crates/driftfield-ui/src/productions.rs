/// Expand/collapse state of the production cards.
#[derive(Debug, Clone, Default)]
pub struct ProductionList {
    expanded: Vec<bool>,
}

impl ProductionList {
    pub fn new(cards: usize) -> Self {
        Self {
            expanded: vec![false; cards],
        }
    }

    /// Toggle a card's header; returns the new state, or `None` for unknown cards.
    pub fn toggle(&mut self, card: usize) -> Option<bool> {
        let state = self.expanded.get_mut(card)?;
        *state = !*state;
        Some(*state)
    }

    pub fn is_expanded(&self, card: usize) -> bool {
        self.expanded.get(card).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
