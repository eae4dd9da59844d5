use rand::{seq::SliceRandom, Rng};

/// Returns every entry in order when `take_all` is set or the list already fits
/// within `max_count`; otherwise exactly `max_count` distinct entries drawn
/// uniformly without replacement, in shuffled order.
pub fn sample<R>(entries: Vec<String>, max_count: usize, take_all: bool, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    if take_all || entries.len() <= max_count {
        return entries;
    }

    entries
        .choose_multiple(rng, max_count)
        .cloned()
        .collect()
}
