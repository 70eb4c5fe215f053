use cityforge_common::WorldSeed;

/// Number of distinct lattice hashes.
const TABLE_SIZE: usize = 256;

/// Seeded permutation of `0..=255`, stored twice back to back so lattice
/// lookups of the form `perm[i + perm[j]]` never need to wrap.
#[derive(Clone)]
pub struct PermutationTable {
    perm: [u8; TABLE_SIZE * 2],
}

impl PermutationTable {
    /// Shuffle `0..=255` with a Fisher-Yates pass driven by a linear
    /// congruential generator seeded from `seed`.
    pub fn from_seed(seed: WorldSeed) -> Self {
        let mut base = [0u8; TABLE_SIZE];
        for (i, slot) in base.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut lcg = Lcg::new(seed);
        for i in (1..TABLE_SIZE).rev() {
            let j = (lcg.next_u32() as usize) % (i + 1);
            base.swap(i, j);
        }

        let mut perm = [0u8; TABLE_SIZE * 2];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & (TABLE_SIZE - 1)];
        }
        Self { perm }
    }

    /// Lattice hash at `index` (valid for `0..512`).
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.perm[index] as usize
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.perm
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.perm[..8])
            .finish()
    }
}

/// 64-bit LCG (Knuth's MMIX constants). Only the high bits are handed out;
/// the low bits of an LCG cycle with short periods.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: WorldSeed) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.state >> 33) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_a_permutation() {
        let table = PermutationTable::from_seed(42);
        let mut seen = [false; TABLE_SIZE];
        for &v in &table.as_slice()[..TABLE_SIZE] {
            assert!(!seen[v as usize], "value {v} appears twice");
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn second_half_duplicates_first() {
        let table = PermutationTable::from_seed(7);
        let slice = table.as_slice();
        assert_eq!(&slice[..TABLE_SIZE], &slice[TABLE_SIZE..]);
    }

    #[test]
    fn same_seed_same_table() {
        let a = PermutationTable::from_seed(1234);
        let b = PermutationTable::from_seed(1234);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        let a = PermutationTable::from_seed(1);
        let b = PermutationTable::from_seed(2);
        assert_ne!(a.as_slice(), b.as_slice());
    }
}
