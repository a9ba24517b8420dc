//! Property-based tests for alphabets and permutations.
//!
//! Random cycle notations are built by shuffling the default alphabet and
//! cutting a prefix of it into cycles; the remaining symbols stay unmentioned.

use std::sync::Arc;

use proptest::prelude::*;

use enigma_core::alphabet::DEFAULT_SYMBOLS;
use enigma_core::{Alphabet, Permutation};

/// Cut `symbols` into cycles of the given lengths, in order, until either
/// runs out. Returns the cycle notation and the symbols used.
fn cycle_notation(symbols: &[char], lengths: &[usize]) -> (String, Vec<char>) {
    let mut notation = String::new();
    let mut used = Vec::new();
    let mut rest = symbols;
    for &len in lengths {
        if rest.len() < len {
            break;
        }
        let (cycle, tail) = rest.split_at(len);
        notation.push('(');
        notation.extend(cycle.iter());
        notation.push_str(") ");
        used.extend_from_slice(cycle);
        rest = tail;
    }
    (notation, used)
}

fn shuffled_symbols() -> impl Strategy<Value = Vec<char>> {
    Just(DEFAULT_SYMBOLS.chars().collect::<Vec<_>>()).prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn permute_then_invert_is_identity(
        symbols in shuffled_symbols(),
        lengths in prop::collection::vec(1usize..8, 0..12),
    ) {
        let (notation, _) = cycle_notation(&symbols, &lengths);
        let perm = Permutation::new(&notation, Arc::new(Alphabet::default())).unwrap();

        for c in DEFAULT_SYMBOLS.chars() {
            prop_assert_eq!(perm.invert_char(perm.permute_char(c).unwrap()).unwrap(), c);
            prop_assert_eq!(perm.permute_char(perm.invert_char(c).unwrap()).unwrap(), c);
        }
        for i in 0..perm.size() as i64 {
            prop_assert_eq!(perm.invert(perm.permute(i) as i64) as i64, i);
            prop_assert_eq!(perm.permute(perm.invert(i) as i64) as i64, i);
        }
    }

    #[test]
    fn cycle_members_move_and_others_stay(
        symbols in shuffled_symbols(),
        lengths in prop::collection::vec(2usize..8, 0..12),
    ) {
        let (notation, used) = cycle_notation(&symbols, &lengths);
        let perm = Permutation::new(&notation, Arc::new(Alphabet::default())).unwrap();

        for c in DEFAULT_SYMBOLS.chars() {
            let image = perm.permute_char(c).unwrap();
            if used.contains(&c) {
                prop_assert_ne!(image, c, "{} is in a cycle of {}", c, notation);
            } else {
                prop_assert_eq!(image, c);
            }
        }
        prop_assert!(perm.derangement());
    }

    #[test]
    fn index_and_symbol_lookups_agree(
        symbols in shuffled_symbols(),
        len in 1usize..=26,
    ) {
        let chars: String = symbols[..len].iter().collect();
        let alphabet = Alphabet::new(&chars).unwrap();

        for i in 0..alphabet.size() {
            prop_assert_eq!(alphabet.to_index(alphabet.to_char(i).unwrap()).unwrap(), i);
        }
        for s in chars.chars() {
            prop_assert_eq!(alphabet.to_char(alphabet.to_index(s).unwrap()).unwrap(), s);
        }
    }

    #[test]
    fn wrap_lands_in_range(p in any::<i32>()) {
        let perm = Permutation::identity(Arc::new(Alphabet::default()));
        let wrapped = perm.wrap(p as i64);
        prop_assert!(wrapped < 26);
        prop_assert_eq!((wrapped as i64 - p as i64).rem_euclid(26), 0);
    }
}
