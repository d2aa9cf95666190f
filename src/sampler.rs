use std::cmp::Ordering;

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::{SliceRandom, index};

use crate::constants::seniority::ALL_SENIORITIES;
use crate::dataset::DatasetRow;
use crate::flatten::FlatRecord;
use crate::seniority::SeniorityLabel;

/// Accepted rows buffered per seniority class, in canonical class order.
pub type ClassGroups = IndexMap<SeniorityLabel, Vec<FlatRecord>>;

/// Empty groups for every class, in canonical order.
pub fn empty_groups() -> ClassGroups {
    ALL_SENIORITIES
        .iter()
        .map(|label| (*label, Vec::new()))
        .collect()
}

#[derive(Debug, Clone)]
/// Small deterministic RNG used for reproducible sampling.
///
/// SplitMix64 keeps the output sequence fixed for a given seed regardless of
/// `rand` release, so sampled datasets stay byte-identical across builds.
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Ordering used before sampling: `(job_title, summary)` ascending, ties
/// broken by the full row so the result does not depend on input order.
pub fn sampling_order(left: &FlatRecord, right: &FlatRecord) -> Ordering {
    left.job_title
        .cmp(&right.job_title)
        .then_with(|| left.summary.cmp(&right.summary))
        .then_with(|| left.cmp(right))
}

/// Per-class capped sampling followed by one whole-dataset shuffle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StratifiedSampler {
    sample_size: usize,
}

impl StratifiedSampler {
    /// Sampler keeping at most `sample_size` rows per class.
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// Per-class cap.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Sort one class and keep all of it, or exactly `sample_size` rows drawn
    /// without replacement when the class is larger than the cap.
    pub fn sample_class<R>(&self, mut rows: Vec<FlatRecord>, rng: &mut R) -> Vec<FlatRecord>
    where
        R: Rng + ?Sized,
    {
        rows.sort_by(sampling_order);
        if rows.len() < self.sample_size {
            return rows;
        }
        let picks = index::sample(rng, rows.len(), self.sample_size);
        let mut slots: Vec<Option<FlatRecord>> = rows.into_iter().map(Some).collect();
        picks
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect()
    }

    /// Sample every class in canonical order with `sample_rng`, concatenate,
    /// then shuffle the result with `shuffle_rng`.
    ///
    /// All rows must be grouped before this is called; it is the barrier
    /// between per-record work and dataset assembly.
    pub fn sample_groups<S, T>(
        &self,
        mut groups: ClassGroups,
        sample_rng: &mut S,
        shuffle_rng: &mut T,
    ) -> Vec<DatasetRow>
    where
        S: Rng + ?Sized,
        T: Rng + ?Sized,
    {
        let mut sampled = Vec::new();
        for seniority in ALL_SENIORITIES {
            let rows = groups.swap_remove(&seniority).unwrap_or_default();
            sampled.extend(
                self.sample_class(rows, sample_rng)
                    .into_iter()
                    .map(|record| DatasetRow { record, seniority }),
            );
        }
        sampled.shuffle(shuffle_rng);
        sampled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::collections::HashSet;

    fn row(title: &str, summary: &str) -> FlatRecord {
        FlatRecord {
            job_title: title.to_string(),
            summary: summary.to_string(),
            ..FlatRecord::default()
        }
    }

    fn rows(count: usize) -> Vec<FlatRecord> {
        (0..count)
            .map(|idx| row(&format!("title-{idx:04}"), "summary"))
            .collect()
    }

    #[test]
    fn deterministic_rng_repeats_for_same_seed() {
        let mut a = DeterministicRng::new(42);
        let mut b = DeterministicRng::new(42);
        let seq_a: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let seq_b: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert_eq!(seq_a, seq_b);

        let mut c = DeterministicRng::new(43);
        assert_ne!(seq_a[0], c.next_u64());
    }

    #[test]
    fn fill_bytes_covers_partial_words() {
        let mut rng = DeterministicRng::new(7);
        let mut buf = [0_u8; 11];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|byte| *byte != 0));
    }

    #[test]
    fn small_class_is_kept_whole_and_sorted() {
        let sampler = StratifiedSampler::new(5);
        let mut rng = DeterministicRng::new(1);
        let input = vec![row("b", "x"), row("a", "z"), row("a", "y")];
        let out = sampler.sample_class(input, &mut rng);
        let keys: Vec<_> = out
            .iter()
            .map(|r| (r.job_title.as_str(), r.summary.as_str()))
            .collect();
        assert_eq!(keys, vec![("a", "y"), ("a", "z"), ("b", "x")]);
    }

    #[test]
    fn large_class_is_capped_without_duplicates() {
        let sampler = StratifiedSampler::new(10);
        let mut rng = DeterministicRng::new(42);
        let out = sampler.sample_class(rows(50), &mut rng);
        assert_eq!(out.len(), 10);
        let unique: HashSet<_> = out.iter().map(|r| r.job_title.clone()).collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn class_exactly_at_cap_is_sampled_in_full() {
        let sampler = StratifiedSampler::new(4);
        let mut rng = DeterministicRng::new(42);
        let out = sampler.sample_class(rows(4), &mut rng);
        let mut titles: Vec<_> = out.into_iter().map(|r| r.job_title).collect();
        titles.sort();
        assert_eq!(titles, rows(4).into_iter().map(|r| r.job_title).collect::<Vec<_>>());
    }

    #[test]
    fn sampling_ignores_input_order() {
        let sampler = StratifiedSampler::new(7);
        let forward = rows(30);
        let mut backward = forward.clone();
        backward.reverse();

        let a = sampler.sample_class(forward, &mut DeterministicRng::new(9));
        let b = sampler.sample_class(backward, &mut DeterministicRng::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn groups_are_sampled_per_class_then_shuffled() {
        let sampler = StratifiedSampler::new(3);
        let mut groups = empty_groups();
        groups.insert(SeniorityLabel::Junior, rows(2));
        groups.insert(SeniorityLabel::Senior, rows(9));

        let out = sampler.sample_groups(
            groups.clone(),
            &mut DeterministicRng::new(42),
            &mut DeterministicRng::new(42),
        );
        assert_eq!(out.len(), 5);
        let juniors = out
            .iter()
            .filter(|r| r.seniority == SeniorityLabel::Junior)
            .count();
        let seniors = out
            .iter()
            .filter(|r| r.seniority == SeniorityLabel::Senior)
            .count();
        assert_eq!((juniors, seniors), (2, 3));

        let again = sampler.sample_groups(
            groups,
            &mut DeterministicRng::new(42),
            &mut DeterministicRng::new(42),
        );
        assert_eq!(out, again);
    }

    #[test]
    fn empty_groups_follow_canonical_order() {
        let groups = empty_groups();
        let order: Vec<_> = groups.keys().copied().collect();
        assert_eq!(order, ALL_SENIORITIES.to_vec());
    }
}
