use prizedraw_core::{Inventory, PrizeEntry};
use rand::seq::IteratorRandom;
use rand::Rng;

/// Weighted pick over the entries that still have stock. Each entry wins
/// with probability `quantity / total`; `None` when nothing is left.
pub fn weighted_pick<'a, R>(inventory: &'a Inventory, rng: &mut R) -> Option<&'a PrizeEntry>
where
    R: Rng + ?Sized,
{
    let total = inventory.total_remaining();
    if total == 0 {
        return None;
    }

    entry_at(inventory, rng.gen_range(0..total))
}

/// Uniform pick among entries with stock, regardless of quantity.
pub fn uniform_pick<'a, R>(inventory: &'a Inventory, rng: &mut R) -> Option<&'a PrizeEntry>
where
    R: Rng + ?Sized,
{
    inventory.eligible().choose(rng)
}

/// Entry covering position `r` of the half-open range `[0, total)`.
fn entry_at(inventory: &Inventory, r: u64) -> Option<&PrizeEntry> {
    let mut acc = 0u64;
    for entry in inventory.eligible() {
        acc += u64::from(entry.quantity);
        if acc > r {
            return Some(entry);
        }
    }
    None
}
