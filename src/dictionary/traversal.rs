//! Iterative graph walks shared by the automaton backends.
//!
//! Every walk visits each state reachable from `root` exactly once, so they
//! are safe on DAGs where a state has several parents. Callers guarantee that
//! every successor is below `states`.

use super::StateId;

const WHITE: u8 = 0;
const GREY: u8 = 1;
const BLACK: u8 = 2;

/// Reachable states, parents before children.
pub(crate) fn pre_order<F, I>(states: usize, root: StateId, mut successors: F) -> Vec<StateId>
where
    F: FnMut(StateId) -> I,
    I: IntoIterator<Item = StateId>,
{
    let mut visited = vec![false; states];
    let mut order = Vec::with_capacity(states);
    let mut stack = vec![root];
    visited[root as usize] = true;

    while let Some(state) = stack.pop() {
        order.push(state);
        let children: Vec<StateId> = successors(state).into_iter().collect();
        // Reversed so the first child is visited first.
        for &child in children.iter().rev() {
            if !visited[child as usize] {
                visited[child as usize] = true;
                stack.push(child);
            }
        }
    }
    order
}

/// Reachable states, children before parents.
pub(crate) fn post_order<F, I>(states: usize, root: StateId, mut successors: F) -> Vec<StateId>
where
    F: FnMut(StateId) -> I,
    I: IntoIterator<Item = StateId>,
{
    let mut visited = vec![false; states];
    let mut order = Vec::with_capacity(states);
    let mut stack = vec![(root, successors(root).into_iter())];
    visited[root as usize] = true;

    while let Some(top) = stack.last_mut() {
        let state = top.0;
        match top.1.next() {
            Some(child) => {
                if !visited[child as usize] {
                    visited[child as usize] = true;
                    stack.push((child, successors(child).into_iter()));
                }
            }
            None => {
                stack.pop();
                order.push(state);
            }
        }
    }
    order
}

/// A state on a cycle reachable from `root`, if any.
pub(crate) fn find_cycle<F, I>(states: usize, root: StateId, mut successors: F) -> Option<StateId>
where
    F: FnMut(StateId) -> I,
    I: IntoIterator<Item = StateId>,
{
    let mut color = vec![WHITE; states];
    let mut stack = vec![(root, successors(root).into_iter())];
    color[root as usize] = GREY;

    while let Some(top) = stack.last_mut() {
        let state = top.0;
        match top.1.next() {
            Some(child) => match color[child as usize] {
                WHITE => {
                    color[child as usize] = GREY;
                    stack.push((child, successors(child).into_iter()));
                }
                GREY => return Some(child),
                _ => {}
            },
            None => {
                color[state as usize] = BLACK;
                stack.pop();
            }
        }
    }
    None
}

/// Number of accepted paths from `root` in an acyclic graph.
pub(crate) fn count_words<F, I, T>(
    states: usize,
    root: StateId,
    mut is_final: T,
    mut successors: F,
) -> u64
where
    F: FnMut(StateId) -> I,
    I: IntoIterator<Item = StateId>,
    T: FnMut(StateId) -> bool,
{
    let mut words = vec![0u64; states];
    for state in post_order(states, root, &mut successors) {
        let below: u64 = successors(state)
            .into_iter()
            .fold(0u64, |acc, child| acc.saturating_add(words[child as usize]));
        words[state as usize] = below.saturating_add(u64::from(is_final(state)));
    }
    words[root as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
    fn diamond(s: StateId) -> Vec<StateId> {
        match s {
            0 => vec![1, 2],
            1 | 2 => vec![3],
            _ => vec![],
        }
    }

    #[test]
    fn test_orders_visit_shared_state_once() {
        assert_eq!(pre_order(4, 0, diamond), vec![0, 1, 3, 2]);
        assert_eq!(post_order(4, 0, diamond), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_unreachable_states_are_skipped() {
        assert_eq!(post_order(6, 0, diamond).len(), 4);
    }

    #[test]
    fn test_find_cycle() {
        assert_eq!(find_cycle(4, 0, diamond), None);
        let looped = |s: StateId| match s {
            0 => vec![1],
            1 => vec![2],
            2 => vec![1],
            _ => vec![],
        };
        assert!(matches!(find_cycle(3, 0, looped), Some(1 | 2)));
    }

    #[test]
    fn test_count_words_counts_paths() {
        // Finals at 1 and 3: paths 0-1, 0-1-3, 0-2-3.
        let words = count_words(4, 0, |s| s == 1 || s == 3, diamond);
        assert_eq!(words, 3);
    }
}
