use tracing::debug;

/// Filter value that shows every card.
pub const SHOW_ALL: &str = "all";

/// Category filter over a fixed list of cards.
#[derive(Debug, Clone)]
pub struct CardFilter {
    categories: Vec<String>,
    visible: Vec<bool>,
    active: String,
}

impl CardFilter {
    pub fn new<I, T>(categories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        let visible = vec![true; categories.len()];
        Self {
            categories,
            visible,
            active: SHOW_ALL.to_string(),
        }
    }

    /// Apply a filter and return how many cards remain visible.
    pub fn select(&mut self, filter: &str) -> usize {
        self.active = filter.to_string();
        for (category, visible) in self.categories.iter().zip(self.visible.iter_mut()) {
            *visible = filter == SHOW_ALL || category == filter;
        }
        let shown = self.visible.iter().filter(|v| **v).count();
        debug!("filter {filter:?}: {shown}/{} cards visible", self.categories.len());
        shown
    }

    pub fn active_filter(&self) -> &str {
        &self.active
    }

    pub fn is_visible(&self, card: usize) -> bool {
        self.visible.get(card).copied().unwrap_or(false)
    }

    pub fn visible_cards(&self) -> Vec<usize> {
        (0..self.visible.len()).filter(|&i| self.visible[i]).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CardFilter {
    fn default() -> Self {
        CardFilter::new(Vec::<String>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_category() {
        let mut filter = CardFilter::new(["web", "game", "web", "tool"]);
        assert_eq!(filter.visible_cards(), vec![0, 1, 2, 3]);

        assert_eq!(filter.select("web"), 2);
        assert_eq!(filter.visible_cards(), vec![0, 2]);
        assert_eq!(filter.active_filter(), "web");

        assert_eq!(filter.select("nothing"), 0);
        assert_eq!(filter.select(SHOW_ALL), 4);
        assert!(!filter.is_visible(10));
    }
}
