//! Weighted random selection over live deck items.

use crate::types::DeckItem;
use rand::Rng;

/// Pick one item with probability proportional to its weight
///
/// Draws `r` uniformly in `[0, total)` and walks the items in order,
/// returning the first whose weight exceeds what is left of `r`. If rounding
/// leaves `r` unconsumed after the last item, the last item is returned.
/// Returns `None` only for an empty slice.
pub fn select<'a, R: Rng>(items: &[&'a DeckItem], rng: &mut R) -> Option<&'a DeckItem> {
    let last = *items.last()?;
    let total: f64 = items.iter().map(|item| item.weight).sum();
    let mut threshold = rng.gen::<f64>() * total;

    for item in items {
        if threshold < item.weight {
            return Some(*item);
        }
        threshold -= item.weight;
    }

    tracing::debug!("Weighted draw fell through, using last item {}", last.key);
    Some(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Deck, MasterySet};
    use crate::types::{Catalog, Category, ItemKey, Word};
    use crate::build_default_catalog;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_empty_returns_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select(&[], &mut rng).is_none());
    }

    #[test]
    fn test_never_selects_outside_candidates() {
        let deck = Deck::build(&build_default_catalog());
        let mut mastered = MasterySet::new();
        mastered.retire(ItemKey::new("col-1", "w-2"));
        mastered.retire(ItemKey::new("col-2", "w-4"));
        let live = deck.live(&mastered);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let picked = select(&live, &mut rng).unwrap();
            assert!(!mastered.contains(&picked.key));
        }
    }

    #[test]
    fn test_distribution_follows_weights() {
        // Category A has 1 word (weight 1.0), category B has 4 (0.25 each).
        let catalog = Catalog::new(vec![
            Category::new("a", "A", vec![Word::new("a1", "solo", true)]),
            Category::new(
                "b",
                "B",
                (1..=4)
                    .map(|i| Word::new(format!("b{i}"), format!("word {i}"), i == 1))
                    .collect(),
            ),
        ]);
        let deck = Deck::build(&catalog);
        let live = deck.live(&MasterySet::new());

        let mut rng = StdRng::seed_from_u64(42);
        let trials = 20_000;
        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..trials {
            let picked = select(&live, &mut rng).unwrap();
            *counts.entry(picked.key.category_id.clone()).or_default() += 1;
        }

        // Both categories carry a total mass of 1, so roughly half each.
        let share_a = f64::from(counts["a"]) / f64::from(trials);
        assert!((share_a - 0.5).abs() < 0.03, "share of A was {share_a}");
    }

    #[test]
    fn test_max_draw_falls_back_to_last() {
        // StepRng at u64::MAX yields the largest f64 below 1.0.
        let mut rng = StepRng::new(u64::MAX, 0);
        let deck = Deck::build(&build_default_catalog());
        let live = deck.live(&MasterySet::new());

        let picked = select(&live, &mut rng).unwrap();
        assert_eq!(picked.key, live.last().unwrap().key);
    }

    #[test]
    fn test_zero_draw_picks_first() {
        let mut rng = StepRng::new(0, 0);
        let deck = Deck::build(&build_default_catalog());
        let live = deck.live(&MasterySet::new());

        let picked = select(&live, &mut rng).unwrap();
        assert_eq!(picked.key, live[0].key);
    }
}
