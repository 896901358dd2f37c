//! Inherited movement genomes.
//!
//! A genome is a fixed-length sequence of genes in `0..8`. Each day the
//! next gene is consulted (cyclically) and rotates the animal clockwise by
//! that many eighth turns before it steps forward. Genomes double as the
//! lineage key for population statistics.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<u8>,
}

impl Genome {
    /// Build a genome from raw genes. Genes are reduced mod 8.
    pub fn new(genes: Vec<u8>) -> Self {
        assert!(!genes.is_empty(), "a genome must have at least one gene");
        Self {
            genes: genes.into_iter().map(|g| g % 8).collect(),
        }
    }

    /// Uniformly random genome of the given length
    pub fn random(length: usize, rng: &mut ChaCha8Rng) -> Self {
        assert!(length > 0, "a genome must have at least one gene");
        Self {
            genes: (0..length).map(|_| rng.gen_range(0..8u8)).collect(),
        }
    }

    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene at a cyclic cursor position
    pub fn gene(&self, cursor: usize) -> u8 {
        self.genes[cursor % self.genes.len()]
    }

    /// Combine two parent genomes into a child genome.
    ///
    /// Total and deterministic: the stronger parent contributes a left
    /// segment proportional to its share of the parents' combined energy,
    /// the weaker parent fills in the rest. Equal energies split the
    /// genome down the middle.
    pub fn combine(
        stronger: &Genome,
        stronger_energy: i32,
        weaker: &Genome,
        weaker_energy: i32,
    ) -> Genome {
        assert_eq!(
            stronger.len(),
            weaker.len(),
            "parents must carry genomes of equal length"
        );
        let strong = i64::from(stronger_energy.max(0));
        let weak = i64::from(weaker_energy.max(0));
        let total = (strong + weak).max(1);
        let split = (stronger.len() as i64 * strong / total) as usize;

        let mut genes = Vec::with_capacity(stronger.len());
        genes.extend_from_slice(&stronger.genes[..split]);
        genes.extend_from_slice(&weaker.genes[split..]);
        Genome { genes }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{gene}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_random_genes_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let genome = Genome::random(32, &mut rng);
        assert_eq!(genome.len(), 32);
        assert!(genome.genes().iter().all(|&g| g < 8));
    }

    #[test]
    fn test_cyclic_gene_access() {
        let genome = Genome::new(vec![1, 2, 3]);
        assert_eq!(genome.gene(0), 1);
        assert_eq!(genome.gene(2), 3);
        assert_eq!(genome.gene(3), 1);
        assert_eq!(genome.gene(7), 2);
    }

    #[test]
    fn test_combine_is_proportional() {
        let stronger = Genome::new(vec![1; 8]);
        let weaker = Genome::new(vec![2; 8]);

        // 60 vs 20 energy: stronger contributes 6 of 8 genes
        let child = Genome::combine(&stronger, 60, &weaker, 20);
        assert_eq!(child.genes(), &[1, 1, 1, 1, 1, 1, 2, 2]);

        // Equal energies split down the middle
        let child = Genome::combine(&stronger, 40, &weaker, 40);
        assert_eq!(child.genes(), &[1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_combine_is_deterministic() {
        let a = Genome::new(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let b = Genome::new(vec![7, 6, 5, 4, 3, 2, 1, 0]);
        let first = Genome::combine(&a, 33, &b, 19);
        let second = Genome::combine(&a, 33, &b, 19);
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_combine_clamps_negative_energy() {
        let a = Genome::new(vec![1; 4]);
        let b = Genome::new(vec![2; 4]);
        let child = Genome::combine(&a, 10, &b, -5);
        assert_eq!(child.genes(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_display_is_digit_string() {
        let genome = Genome::new(vec![3, 0, 7, 1]);
        assert_eq!(genome.to_string(), "3071");
    }
}
