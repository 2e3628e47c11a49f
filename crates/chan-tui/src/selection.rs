//! Selection: which card of the list is expanded.
//!
//! The list owns exactly one `Selection`. Cards only read it (through
//! `is_open`) and ask for changes by emitting `Action::ToggleCard`, so two
//! cards can never both believe they are open.

/// Single-open-index state for a card list. `None` means nothing is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    open: Option<usize>,
}

/// What a toggle did: the card that collapsed and the card that expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionChange {
    pub collapsed: Option<usize>,
    pub expanded: Option<usize>,
}

impl Selection {
    pub const NONE: Self = Self { open: None };

    pub fn opened(index: usize) -> Self {
        Self { open: Some(index) }
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    pub fn is_none(&self) -> bool {
        self.open.is_none()
    }

    /// The toggle rule: selecting the open card closes it, anything else
    /// opens the clicked card.
    pub fn select(self, index: usize) -> Self {
        if self.is_open(index) {
            Self::NONE
        } else {
            Self::opened(index)
        }
    }

    /// Apply `select` in place and report both sides of the transition.
    pub fn toggle(&mut self, index: usize) -> SelectionChange {
        let before = self.open;
        *self = self.select(index);
        SelectionChange {
            collapsed: before,
            expanded: self.open,
        }
    }

    /// Replace the open index directly (used when the snapshot is reloaded).
    pub fn set(&mut self, open: Option<usize>) -> SelectionChange {
        let before = self.open;
        self.open = open;
        SelectionChange {
            collapsed: before.filter(|b| Some(*b) != open),
            expanded: open.filter(|o| Some(*o) != before),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_same_index_closes() {
        assert_eq!(Selection::opened(3).select(3), Selection::NONE);
    }

    #[test]
    fn test_select_other_index_moves() {
        let next = Selection::opened(3).select(5);
        assert!(next.is_open(5));
        assert!(!next.is_open(3));
    }

    #[test]
    fn test_repeated_clicks_alternate() {
        let mut sel = Selection::opened(1);
        sel.toggle(1);
        assert!(sel.is_none());
        sel.toggle(1);
        assert!(sel.is_open(1));
    }

    #[test]
    fn test_index_zero_is_a_real_card() {
        let sel = Selection::NONE.select(0);
        assert!(sel.is_open(0));
        assert_eq!(sel.select(0), Selection::NONE);
    }

    #[test]
    fn test_toggle_reports_transition() {
        let mut sel = Selection::NONE;
        assert_eq!(
            sel.toggle(1),
            SelectionChange {
                collapsed: None,
                expanded: Some(1)
            }
        );
        assert_eq!(
            sel.toggle(2),
            SelectionChange {
                collapsed: Some(1),
                expanded: Some(2)
            }
        );
        assert_eq!(
            sel.toggle(2),
            SelectionChange {
                collapsed: Some(2),
                expanded: None
            }
        );
    }

    #[test]
    fn test_set_same_index_reports_nothing() {
        let mut sel = Selection::opened(4);
        assert_eq!(sel.set(Some(4)), SelectionChange::default());
        assert_eq!(
            sel.set(Some(1)),
            SelectionChange {
                collapsed: Some(4),
                expanded: Some(1)
            }
        );
    }

    #[test]
    fn test_at_most_one_open_for_any_click_sequence() {
        let clicks = [0usize, 2, 2, 1, 0, 0, 3, 1, 1, 2];
        for n in 1..=4usize {
            let mut sel = Selection::NONE;
            for &c in clicks.iter().filter(|&&c| c < n) {
                sel.toggle(c);
                let open = (0..n).filter(|&i| sel.is_open(i)).count();
                assert!(open <= 1, "{open} cards open in list of {n}");
            }
        }
    }
}
