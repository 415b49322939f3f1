//! Property tests for the universal invariants: pot conservation, lookup
//! table bijectivity, hand-rank dominance, shuffle permutation + trick
//! pinning, and side-pot zero-sum settlement.

use proptest::prelude::*;
use rand::SeedableRng;

use poker_kernel::card::Card;
use poker_kernel::config::{
    DealerConfig, RawConfig, RaiseCountWire, RaiseSizeWire, ScalarOrListCount, ScalarOrListRaise,
    ScalarOrListValue,
};
use poker_kernel::deck::Deck;
use poker_kernel::evaluate::Evaluator;
use poker_kernel::{Category, Dealer};

fn blinds_for(n: usize) -> Vec<u64> {
    if n == 2 {
        vec![1, 2]
    } else {
        let mut b = vec![0u64; n];
        b[1] = 1;
        b[2] = 2;
        b
    }
}

fn single_street_config(n: usize, start_stack: u64) -> DealerConfig {
    let raw = RawConfig {
        num_players: n,
        num_streets: 1,
        blinds: ScalarOrListValue::List(blinds_for(n)),
        antes: ScalarOrListValue::Scalar(0),
        raise_sizes: ScalarOrListRaise::Scalar(RaiseSizeWire::Tag("inf".into())),
        num_raises: ScalarOrListCount::Scalar(RaiseCountWire::Finite(3)),
        num_suits: 4,
        num_ranks: 13,
        num_hole_cards: 5,
        num_community_cards: ScalarOrListValue::List(vec![0]),
        num_cards_for_hand: 5,
        mandatory_num_hole_cards: 0,
        start_stack,
        low_end_straight: true,
        order: None,
    };
    DealerConfig::from_raw(raw).unwrap()
}

proptest! {
    /// Invariant 1 + 5 + 6: `Σ stacks + pot` never drifts from
    /// `N · start_stack` before settlement, settlement nets to zero, and no
    /// further action is accepted once the hand is done.
    #[test]
    fn pot_is_conserved_and_settlement_is_zero_sum(
        n in 2usize..=5,
        start_stack in 20u64..=200,
        seed in any::<u64>(),
        bets in prop::collection::vec(-5.0f64..300.0, 1..40),
    ) {
        let config = single_street_config(n, start_stack);
        let total = n as i64 * start_stack as i64;
        let mut dealer = Dealer::seeded(config, seed).unwrap();
        let obs = dealer.reset(true, true).unwrap();
        prop_assert_eq!(obs.stacks.iter().sum::<i64>() + obs.pot, total);

        let mut settled = false;
        for bet in bets {
            if settled {
                break;
            }
            let (obs, payouts, done) = dealer.step(bet).unwrap();
            prop_assert_eq!(obs.stacks.iter().sum::<i64>() + obs.pot, total);
            if done.iter().all(|&d| d) {
                prop_assert_eq!(payouts.iter().sum::<i64>(), 0);
                prop_assert_eq!(obs.pot, 0);
                prop_assert_eq!(obs.stacks.iter().sum::<i64>(), total);
                // Idempotent: stepping again post-settlement replays the
                // same cached result rather than erroring or reopening play.
                let (obs2, payouts2, done2) = dealer.step(0.0).unwrap();
                prop_assert_eq!(payouts2, payouts);
                prop_assert_eq!(done2, vec![true; n]);
                prop_assert_eq!(obs2.pot, 0);
                prop_assert_eq!(obs2.stacks.iter().sum::<i64>(), total);
                settled = true;
            }
        }
    }

    /// Invariant 2: every lookup table assigns each integer in
    /// `[0, max_rank]` to exactly one key across both lookup maps.
    #[test]
    fn lookup_table_covers_every_rank_exactly_once(
        suits in 1usize..=4,
        ranks in 2usize..=13,
        k in 1usize..=5,
    ) {
        prop_assume!(suits * ranks >= k);
        let evaluator = match Evaluator::new(suits, ranks, k, 0, true, None) {
            Ok(e) => e,
            Err(_) => return Ok(()),
        };
        let max_rank = evaluator.max_rank();
        prop_assert!(max_rank >= 0);
        prop_assert!(evaluator.get_rank_class(0).is_ok());
        prop_assert!(evaluator.get_rank_class(max_rank).is_ok());
        prop_assert!(evaluator.get_rank_class(max_rank + 1).is_err());
    }

    /// Invariant 3 (narrowed): a made pair always outranks (lower integer,
    /// stronger hand) a five-distinct-rank hand built from the same ranks.
    #[test]
    fn a_pair_always_beats_high_card_over_the_same_ranks(
        pair_rank in 0u8..13,
        k1 in 0u8..13,
        k2 in 0u8..13,
        k3 in 0u8..13,
        other_rank in 0u8..13,
    ) {
        let mut kickers: Vec<u8> = vec![k1, k2, k3];
        kickers.retain(|&r| r != pair_rank);
        kickers.sort_unstable();
        kickers.dedup();
        prop_assume!(kickers.len() == 3);
        prop_assume!(other_rank != pair_rank && !kickers.contains(&other_rank));

        let evaluator = Evaluator::new(4, 13, 5, 0, true, None).unwrap();

        let pair_hand = [
            Card::new(pair_rank, 1),
            Card::new(pair_rank, 2),
            Card::new(kickers[0], 1),
            Card::new(kickers[1], 1),
            Card::new(kickers[2], 1),
        ];
        let high_card_hand = [
            Card::new(other_rank, 1),
            Card::new(kickers[0], 1),
            Card::new(kickers[1], 1),
            Card::new(kickers[2], 1),
            Card::new(pair_rank, 2),
        ];

        let pair_rank_number = evaluator.evaluate(&[], &pair_hand).unwrap();
        let high_rank_number = evaluator.evaluate(&[], &high_card_hand).unwrap();
        let high_class = evaluator.get_rank_class(high_rank_number).unwrap();
        // Five distinct, non-consecutive-by-construction-uncontrolled ranks
        // can coincidentally form a straight; discard those draws rather
        // than assert a property that doesn't hold for straights.
        prop_assume!(high_class == Category::HighCard);

        prop_assert_eq!(evaluator.get_rank_class(pair_rank_number).unwrap(), Category::Pair);
        prop_assert!(pair_rank_number < high_rank_number);
    }

    /// Invariant 4: `shuffle` always permutes the full deck, and once
    /// `trick`ed, the prefix lands at the front of every subsequent shuffle.
    #[test]
    fn shuffle_permutes_and_trick_pins_the_prefix(
        num_suits in 1usize..=4,
        num_ranks in 1usize..=13,
        seed in any::<u64>(),
        prefix_len in 0usize..=4,
    ) {
        let mut deck = Deck::new(num_suits, num_ranks).unwrap();
        let full_size = deck.full_size();
        prop_assume!(prefix_len <= full_size);

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        deck.shuffle(&mut rng);
        let before: std::collections::HashSet<Card> =
            deck.remaining_cards().iter().copied().collect();
        prop_assert_eq!(before.len(), full_size);

        if prefix_len > 0 {
            let prefix: Vec<Card> = deck.remaining_cards()[..prefix_len].to_vec();
            deck.trick(prefix.clone());
            let mut rng2 = rand::rngs::StdRng::seed_from_u64(seed.wrapping_add(1));
            deck.shuffle(&mut rng2);
            prop_assert_eq!(&deck.remaining_cards()[..prefix_len], prefix.as_slice());
            let after: std::collections::HashSet<Card> =
                deck.remaining_cards().iter().copied().collect();
            prop_assert_eq!(after, before);
        }
    }
}
