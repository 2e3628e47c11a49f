//! Generic filterable + sortable list model.
//!
//! Items keep their original index; filtering and sorting only reorder
//! `filtered_indices`. Scrolling is left to the owner because card rows
//! have variable height.

use std::cmp::Ordering;

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub filtered_indices: Vec<usize>,
    pub selected: usize,
    pub filter: String,
    filter_fn: Box<dyn Fn(&T, &str) -> bool + Send + Sync>,
}

impl<T> ScrollableList<T> {
    pub fn new(filter_fn: impl Fn(&T, &str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            items: Vec::new(),
            filtered_indices: Vec::new(),
            selected: 0,
            filter: String::new(),
            filter_fn: Box::new(filter_fn),
        }
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.rebuild_filter();
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        let old_idx = self.selected_original_index();
        self.rebuild_filter();
        // Keep the same item under the cursor when it survives the filter.
        self.selected = old_idx
            .and_then(|prev| self.filtered_indices.iter().position(|&i| i == prev))
            .unwrap_or(0);
    }

    pub fn rebuild_filter(&mut self) {
        if self.filter.is_empty() {
            self.filtered_indices = (0..self.items.len()).collect();
        } else {
            self.filtered_indices = self
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| (self.filter_fn)(item, &self.filter))
                .map(|(i, _)| i)
                .collect();
        }
        if self.selected >= self.filtered_indices.len() {
            self.selected = self.filtered_indices.len().saturating_sub(1);
        }
    }

    pub fn select_up(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.filtered_indices.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered_indices.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        let idx = self.filtered_indices.get(self.selected)?;
        self.items.get(*idx)
    }

    pub fn selected_original_index(&self) -> Option<usize> {
        self.filtered_indices.get(self.selected).copied()
    }

    pub fn len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_indices.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    /// Set selection by original item index (not filtered index).
    pub fn set_selected_by_original(&mut self, orig_idx: usize) -> bool {
        match self.filtered_indices.iter().position(|&i| i == orig_idx) {
            Some(pos) => {
                self.selected = pos;
                true
            }
            None => false,
        }
    }

    /// Sort the visible order without moving `items`. The cursor follows the
    /// item it was on.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let current = self.selected_original_index();
        let items = &self.items;
        self.filtered_indices
            .sort_by(|&a, &b| cmp(&items[a], &items[b]));
        if let Some(orig) = current {
            self.set_selected_by_original(orig);
        }
    }
}
