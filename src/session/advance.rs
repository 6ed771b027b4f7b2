//! Track-advance policy.
//!
//! Precedence is fixed: repeat, then shuffle, then sequential. The random
//! draw is passed in so the policy itself stays deterministic.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Pick the index to play after `current`.
///
/// `roll(len)` must return a value in `0..len`. Returns `None` only for an
/// empty catalog.
pub fn next_index(
    current: Option<usize>,
    len: usize,
    repeat: bool,
    shuffle: bool,
    direction: Direction,
    roll: impl FnOnce(usize) -> usize,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.filter(|&i| i < len);

    if repeat {
        return Some(current.unwrap_or(0));
    }

    if shuffle {
        let pick = roll(len) % len;
        // One bump away from the current track; with a single track there is
        // nowhere else to go.
        return Some(match current {
            Some(c) if pick == c && len > 1 => (pick + 1) % len,
            _ => pick,
        });
    }

    Some(match (direction, current) {
        (Direction::Forward, Some(c)) => (c + 1) % len,
        (Direction::Forward, None) => 0,
        (Direction::Backward, Some(0)) | (Direction::Backward, None) => len - 1,
        (Direction::Backward, Some(c)) => c - 1,
    })
}
