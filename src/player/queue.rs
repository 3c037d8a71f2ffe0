//! Play-order navigation
//!
//! Single source of truth for next/prev index calculations across
//! repeat modes and the shuffle permutation. The controller and any
//! preloading layer must both go through this module so they agree on
//! which track comes next.

use serde::{Deserialize, Serialize};

/// Repeat behavior at track end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Play in order, stop at the end
    #[default]
    None,
    /// Loop the whole play order
    All,
    /// Repeat the current track
    One,
}

impl RepeatMode {
    /// Next mode in cycle order: none -> all -> one -> none
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::None,
        }
    }
}

/// Fisher-Yates permutation of `0..len`, rotated so `anchor` sits at
/// position 0 — shuffle playback always starts where the caller intended.
pub fn shuffled_order(len: usize, anchor: usize) -> Vec<usize> {
    use rand::Rng;

    let mut order: Vec<usize> = (0..len).collect();
    if len < 2 {
        return order;
    }

    let mut rng = rand::rng();
    for i in (1..len).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }

    if anchor < len {
        if let Some(pos) = order.iter().position(|&idx| idx == anchor) {
            order.rotate_left(pos);
        }
    }
    order
}

/// Index calculator over one playlist state
///
/// Borrows the shuffle permutation; `shuffle` is `None` in linear mode.
pub struct Navigator<'a> {
    len: usize,
    current: usize,
    repeat: RepeatMode,
    shuffle: Option<&'a [usize]>,
}

impl<'a> Navigator<'a> {
    pub fn new(
        len: usize,
        current: usize,
        repeat: RepeatMode,
        shuffle: Option<&'a [usize]>,
    ) -> Self {
        Self {
            len,
            current,
            repeat,
            shuffle,
        }
    }

    /// Position of the current track within the active play order
    fn order_position(&self) -> Option<usize> {
        match self.shuffle {
            Some(order) => order.iter().position(|&idx| idx == self.current),
            None => (self.current < self.len).then_some(self.current),
        }
    }

    fn index_at(&self, order_pos: usize) -> Option<usize> {
        match self.shuffle {
            Some(order) => order.get(order_pos).copied(),
            None => (order_pos < self.len).then_some(order_pos),
        }
    }

    /// Successor for a user-initiated next: wraps only under repeat-all
    pub fn next_index(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let pos = self.order_position()?;
        if pos + 1 < self.len {
            self.index_at(pos + 1)
        } else if self.repeat == RepeatMode::All {
            self.index_at(0)
        } else {
            None
        }
    }

    /// Predecessor: never wraps at the start of the play order
    pub fn prev_index(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let pos = self.order_position()?;
        pos.checked_sub(1).and_then(|p| self.index_at(p))
    }

    /// Successor when the track ends naturally: repeat-one stays put,
    /// otherwise identical to `next_index`
    pub fn after_ended(&self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        if self.repeat == RepeatMode::One {
            return Some(self.current);
        }
        self.next_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_mode_cycle() {
        assert_eq!(RepeatMode::None.cycled(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycled(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycled(), RepeatMode::None);
    }

    #[test]
    fn test_shuffled_order_is_anchored_permutation() {
        for anchor in 0..8 {
            let order = shuffled_order(8, anchor);
            assert_eq!(order[0], anchor);
            let mut sorted = order.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_shuffled_order_degenerate_sizes() {
        assert!(shuffled_order(0, 0).is_empty());
        assert_eq!(shuffled_order(1, 0), vec![0]);
    }

    #[test]
    fn test_linear_next() {
        let nav = Navigator::new(3, 1, RepeatMode::None, None);
        assert_eq!(nav.next_index(), Some(2));

        let nav = Navigator::new(3, 2, RepeatMode::None, None);
        assert_eq!(nav.next_index(), None);

        let nav = Navigator::new(3, 2, RepeatMode::All, None);
        assert_eq!(nav.next_index(), Some(0));
    }

    #[test]
    fn test_linear_prev_never_wraps() {
        let nav = Navigator::new(3, 0, RepeatMode::All, None);
        assert_eq!(nav.prev_index(), None);

        let nav = Navigator::new(3, 2, RepeatMode::None, None);
        assert_eq!(nav.prev_index(), Some(1));
    }

    #[test]
    fn test_shuffle_navigation_follows_permutation() {
        let order = [2usize, 0, 1];
        let nav = Navigator::new(3, 0, RepeatMode::None, Some(&order));
        assert_eq!(nav.next_index(), Some(1));

        let nav = Navigator::new(3, 1, RepeatMode::None, Some(&order));
        assert_eq!(nav.next_index(), None);
        assert_eq!(nav.prev_index(), Some(0));

        let nav = Navigator::new(3, 1, RepeatMode::All, Some(&order));
        assert_eq!(nav.next_index(), Some(2));
    }

    #[test]
    fn test_after_ended_repeat_one_stays() {
        let nav = Navigator::new(3, 1, RepeatMode::One, None);
        assert_eq!(nav.after_ended(), Some(1));
        // User-initiated next still advances under repeat-one
        assert_eq!(nav.next_index(), Some(2));
    }

    #[test]
    fn test_after_ended_last_track() {
        let nav = Navigator::new(2, 1, RepeatMode::None, None);
        assert_eq!(nav.after_ended(), None);

        let nav = Navigator::new(2, 1, RepeatMode::All, None);
        assert_eq!(nav.after_ended(), Some(0));
    }

    #[test]
    fn test_empty_queue() {
        let nav = Navigator::new(0, 0, RepeatMode::All, None);
        assert_eq!(nav.next_index(), None);
        assert_eq!(nav.prev_index(), None);
        assert_eq!(nav.after_ended(), None);
    }
}
