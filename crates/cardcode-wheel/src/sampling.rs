//! Bounded projection and cumulative sampling shared by both wheels.

use cardcode_types::Category;
use std::collections::BTreeMap;

/// Category → probability (or raw weight before projection).
pub type Probabilities = BTreeMap<Category, f64>;

const EPSILON: f64 = 1e-12;

/// The same weight for every category.
pub fn uniform() -> Probabilities {
    let share = 1.0 / Category::ALL.len() as f64;
    Category::ALL.iter().map(|&c| (c, share)).collect()
}

fn weight_of(weights: &Probabilities, category: Category) -> f64 {
    weights.get(&category).copied().unwrap_or(0.0).max(0.0)
}

/// Turn raw weights into a distribution that sums to 1 with every entry in
/// `[min, max]`.
///
/// Entries that violate a bound are pinned to it and the remaining mass is
/// shared proportionally among the free entries, repeated until nothing
/// violates. With `skip_zero` set, zero-weight categories stay at 0 and take
/// no part in the clamp. Bounds that cannot be met by the active entries are
/// widened to `1 / active`.
pub fn project(weights: &Probabilities, min: f64, max: f64, skip_zero: bool) -> Probabilities {
    let active: Vec<Category> = Category::ALL
        .iter()
        .copied()
        .filter(|&c| !skip_zero || weight_of(weights, c) > 0.0)
        .collect();
    if active.is_empty() {
        return uniform();
    }

    let even = 1.0 / active.len() as f64;
    let lo = min.min(even);
    let hi = max.max(even);
    let mut pinned: Probabilities = BTreeMap::new();

    loop {
        let free: Vec<Category> = active
            .iter()
            .copied()
            .filter(|c| !pinned.contains_key(c))
            .collect();
        if free.is_empty() {
            break;
        }
        let remaining = 1.0 - pinned.values().sum::<f64>();
        let total: f64 = free.iter().map(|&c| weight_of(weights, c)).sum();
        let proposed: Vec<(Category, f64)> = free
            .iter()
            .map(|&c| {
                let p = if total > 0.0 {
                    remaining * weight_of(weights, c) / total
                } else {
                    remaining / free.len() as f64
                };
                (c, p)
            })
            .collect();

        let below: f64 = proposed
            .iter()
            .filter(|(_, p)| *p < lo - EPSILON)
            .map(|(_, p)| lo - p)
            .sum();
        let above: f64 = proposed
            .iter()
            .filter(|(_, p)| *p > hi + EPSILON)
            .map(|(_, p)| p - hi)
            .sum();

        if below == 0.0 && above == 0.0 {
            pinned.extend(proposed);
            break;
        }
        // Pin the side with the larger violation first.
        if below >= above {
            for (c, p) in &proposed {
                if *p < lo - EPSILON {
                    pinned.insert(*c, lo);
                }
            }
        } else {
            for (c, p) in &proposed {
                if *p > hi + EPSILON {
                    pinned.insert(*c, hi);
                }
            }
        }
    }

    let sum: f64 = pinned.values().sum();
    Category::ALL
        .iter()
        .map(|&c| {
            let p = pinned.get(&c).copied().unwrap_or(0.0);
            (c, if sum > 0.0 { p / sum } else { 0.0 })
        })
        .collect()
}

/// Walk categories in declared order and pick the first whose cumulative
/// probability reaches `r`. Zero-probability categories are never picked.
pub fn sample(probabilities: &Probabilities, r: f64) -> Category {
    let mut cumulative = 0.0;
    let mut last = None;
    for category in Category::ALL {
        let p = weight_of(probabilities, category);
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last = Some(category);
        if cumulative >= r {
            return category;
        }
    }
    // Rounding left the sum just under `r`.
    last.unwrap_or(Category::ALL[0])
}
