//! Contribution vectors and the weighted section-tree recursion.
//!
//! A [`Contribution`] maps occupant names to real-valued shares. The
//! recursion in [`contributions`] turns a simplified section tree into such
//! a vector: within every section, responsibility is split evenly between
//! the section's occupant and the occupants of its subsections, each
//! subsection weighted by its share of the section's days. Days no
//! subsection covers fall entirely on the section's occupant.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::section::SectionNode;

/// A mapping from occupant name to a real-valued share.
///
/// Behaves like a sparse vector: missing keys read as zero and addition
/// merges keys. Iteration order is insertion order, so identical inputs
/// produce identical output ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    shares: IndexMap<String, f64>,
}

impl Contribution {
    /// Create an empty contribution vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The share of `name`; zero when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> f64 {
        self.shares.get(name).copied().unwrap_or(0.0)
    }

    /// Number of occupants with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the vector has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Add `amount` to the share of `name`.
    pub fn add(&mut self, name: impl Into<String>, amount: f64) {
        *self.shares.entry(name.into()).or_insert(0.0) += amount;
    }

    /// Add `weight · other` entry-wise.
    pub fn add_scaled(&mut self, other: &Self, weight: f64) {
        for (name, share) in &other.shares {
            self.add(name.clone(), weight * share);
        }
    }

    /// Multiply every share by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for share in self.shares.values_mut() {
            *share *= factor;
        }
    }

    /// Total mass of the vector.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.shares.values().sum()
    }

    /// Divide by the total mass so the shares sum to one.
    ///
    /// A zero-mass vector stays zero rather than dividing by zero.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum != 0.0 {
            self.scale(1.0 / sum);
        }
    }

    /// Iterate over `(name, share)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.shares.iter().map(|(name, share)| (name.as_str(), *share))
    }
}

/// Evaluate the contribution recursion over a simplified section tree.
///
/// For a section `N` with occupant `P` and subsections `C_i` weighted by
/// their day share `w_i`:
///
/// ```text
/// X[N] = 0.5 · ( e_P · (1 + (1 − Σ w_i)) + Σ w_i · X[C_i] )
/// ```
///
/// The occupant's unit share is augmented by the uncovered fraction of the
/// section, so time nobody else claims stays with the responsible occupant.
/// Every node's vector carries total mass one; the orchestrator's
/// normalization only smooths float drift.
///
/// The tree must be in the simplified normal form (see
/// [`SectionNode::validate`]); on an unvalidated tree the result is
/// meaningless.
#[must_use]
pub fn contributions(node: &SectionNode) -> Contribution {
    let section_days = node.range().days() as f64;

    let mut contrib = Contribution::new();
    let mut coverage = 0.0;

    for child in node.children() {
        let weight = child.range().days() as f64 / section_days;
        coverage += weight;
        contrib.add_scaled(&contributions(child), weight);
    }

    if let Some(person) = node.occupant() {
        contrib.add(person.name.clone(), 1.0 + (1.0 - coverage));
    }

    contrib.scale(0.5);
    contrib
}
