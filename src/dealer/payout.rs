//! Showdown side-pot division.

use std::collections::HashMap;

/// One seat's showdown standing: `(seat, strength, pot_commit)`. Lower
/// strength is better, matching [`crate::evaluate::Evaluator::evaluate`].
pub type Standing = (usize, i32, i64);

/// Splits the pot among the seats in `hands`, peeling off the smallest
/// remaining commitment level at each step and dividing it among the seats
/// still eligible at that strength. Returns gross per-seat winnings (not yet
/// netted against what each seat put in) and any leftover remainder chips
/// still to be assigned.
pub fn divide_pots(hands: &[Standing], max_rank: i32) -> (HashMap<usize, i64>, i64) {
    let mut hands: Vec<Standing> = hands.to_vec();
    hands.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)));

    let mut payouts: HashMap<usize, i64> = HashMap::new();
    let mut remainder_total: i64 = 0;
    let mut running_pot: i64 = hands.iter().map(|h| h.2).sum();

    for i in 0..hands.len() {
        if running_pot <= 0 {
            break;
        }
        let c = hands[i].2;
        if c <= 0 {
            continue;
        }
        let strength_i = hands[i].1;
        let eligible: Vec<usize> =
            hands.iter().enumerate().filter(|(_, h)| h.1 == strength_i).map(|(j, _)| j).collect();

        let cuts: Vec<i64> = hands.iter().map(|h| h.2.min(c)).collect();
        let split_pot: i64 = cuts.iter().sum();
        if split_pot == 0 {
            continue;
        }

        let share = split_pot / eligible.len() as i64;
        let remainder = split_pot % eligible.len() as i64;
        for &j in &eligible {
            *payouts.entry(hands[j].0).or_insert(0) += share;
        }
        remainder_total += remainder;

        for (j, cut) in cuts.iter().enumerate() {
            hands[j].2 -= cut;
        }
        running_pot -= split_pot;
        hands[i].1 = max_rank + 1;
    }

    (payouts, remainder_total)
}

/// Hands the accumulated remainder chip(s) to the first seat clockwise from
/// the button that won at least one chip from `payouts`.
pub fn assign_remainder(
    payouts: &mut HashMap<usize, i64>,
    remainder: i64,
    button: usize,
    num_players: usize,
) {
    if remainder == 0 {
        return;
    }
    for offset in 1..=num_players {
        let seat = (button + offset) % num_players;
        if payouts.get(&seat).copied().unwrap_or(0) > 0 {
            *payouts.entry(seat).or_insert(0) += remainder;
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pot_splits_evenly_among_ties() {
        // Two seats commit 10 each and tie.
        let hands = vec![(0usize, 5i32, 10i64), (1, 5, 10)];
        let (payouts, remainder) = divide_pots(&hands, 7462);
        assert_eq!(payouts.get(&0), Some(&10));
        assert_eq!(payouts.get(&1), Some(&10));
        assert_eq!(remainder, 0);
    }

    #[test]
    fn odd_chip_remainder_is_reported() {
        let hands = vec![(0usize, 5i32, 11i64), (1, 5, 11)];
        let (payouts, remainder) = divide_pots(&hands, 7462);
        assert_eq!(payouts.get(&0), Some(&21));
        assert_eq!(remainder, 1);
        let mut payouts = payouts;
        assign_remainder(&mut payouts, remainder, 0, 3);
        assert_eq!(payouts.get(&1), Some(&22));
    }

    #[test]
    fn side_pot_isolates_all_in_short_stack() {
        // Seat 0 all-in for 5, seats 1 and 2 commit 20 each; seat 0 has the
        // best hand and wins only the main pot, seat 1 wins the side pot.
        let hands = vec![(0usize, 1i32, 5i64), (1, 2, 20), (2, 3, 20)];
        let (payouts, remainder) = divide_pots(&hands, 7462);
        assert_eq!(payouts.get(&0), Some(&15));
        assert_eq!(payouts.get(&1), Some(&30));
        assert_eq!(payouts.get(&2), None);
        assert_eq!(remainder, 0);
    }
}
