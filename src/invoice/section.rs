//! Responsibility section trees.
//!
//! An invoice date range is subdivided into *sections*, each the
//! responsibility of one occupant. [`SectionNode::build`] places occupants
//! into a raw tree (longest occupancy first, so long-term tenants dominate
//! the outer sections), and [`SectionNode::simplify`] collapses it into the
//! normal form the contribution solver consumes: every node carries an
//! occupant, every node spans at least one day, and every child lies within
//! its parent.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MeterError, Result};
use crate::interval::{DateSpan, Intersection};
use crate::model::Person;

/// An occupant with the resolved interval they inhabited.
///
/// Built by the invoice orchestrator, which substitutes "today" for an open
/// move-out date before the tree is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupancy {
    /// The occupant.
    pub person: Person,
    /// The inhabited interval.
    pub span: DateSpan,
}

/// One node of a responsibility section tree.
///
/// The tree exclusively owns its nodes; occupants are carried by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionNode {
    range: DateSpan,
    occupant: Option<Person>,
    children: Vec<SectionNode>,
}

impl SectionNode {
    fn new(range: DateSpan, occupant: Option<Person>) -> Self {
        Self {
            range,
            occupant,
            children: Vec::new(),
        }
    }

    /// The date range this section covers.
    #[must_use]
    pub const fn range(&self) -> DateSpan {
        self.range
    }

    /// The occupant responsible for this section, if placed.
    #[must_use]
    pub fn occupant(&self) -> Option<&Person> {
        self.occupant.as_ref()
    }

    /// Subsections, chronological.
    #[must_use]
    pub fn children(&self) -> &[SectionNode] {
        &self.children
    }

    /// Number of nodes in this subtree, including self.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SectionNode::node_count).sum::<usize>()
    }

    /// Build the raw section tree for `range` from the given occupancies.
    ///
    /// Occupancies are ordered by interval length descending with a name
    /// tie-break, so the construction is deterministic. The returned tree
    /// still contains placeholder and degenerate sections; run
    /// [`SectionNode::simplify`] before evaluating it.
    #[must_use]
    pub fn build(range: DateSpan, occupancies: &[Occupancy]) -> Self {
        let mut ordered = occupancies.to_vec();
        ordered.sort_by(|a, b| {
            b.span
                .days()
                .cmp(&a.span.days())
                .then_with(|| a.person.name.cmp(&b.person.name))
        });

        Self::new(range, None).solve(&ordered)
    }

    /// Recursively place the first occupancy overlapping this section and
    /// subdivide accordingly; earlier entries of `remaining` were already
    /// placed above this subtree.
    fn solve(mut self, remaining: &[Occupancy]) -> Self {
        if self.range.days() <= 0 {
            return self;
        }

        let hit = remaining.iter().enumerate().find_map(|(index, occupancy)| {
            match self.range.intersect(&occupancy.span) {
                Intersection::Disjoint => None,
                class => Some((index, occupancy, class)),
            }
        });
        let Some((index, occupancy, class)) = hit else {
            // Nobody left overlaps this section.
            return self;
        };

        debug!(
            section = %self.range,
            person = %occupancy.person.name,
            ?class,
            "placing occupant"
        );

        let span = occupancy.span;
        let person = occupancy.person.clone();

        match class {
            Intersection::Equal | Intersection::SubSet => {
                // The occupant covers the whole section.
                if self.occupant.is_none() {
                    self.occupant = Some(person);
                    // Placeholder for further subdivision by later occupants.
                    self.children.push(Self::new(self.range, None));
                } else {
                    // The section is taken; the occupant shares within it.
                    self.children.push(Self::new(self.range, Some(person)));
                }
            }
            Intersection::SuperSet => {
                // The occupancy lies strictly inside the section.
                self.children.push(Self::new(
                    DateSpan::new(self.range.low(), day_before(span.low())),
                    None,
                ));
                self.children.push(Self::new(span, Some(person)));
                self.children.push(Self::new(
                    DateSpan::new(day_after(span.high()), self.range.high()),
                    None,
                ));
            }
            Intersection::PartialLeft => {
                // The occupancy extends past the section's low end.
                self.children.push(Self::new(
                    DateSpan::new(self.range.low(), span.high()),
                    Some(person),
                ));
                self.children.push(Self::new(
                    DateSpan::new(day_after(span.high()), self.range.high()),
                    None,
                ));
            }
            Intersection::PartialRight => {
                // The occupancy extends past the section's high end.
                self.children.push(Self::new(
                    DateSpan::new(self.range.low(), day_before(span.low())),
                    None,
                ));
                self.children.push(Self::new(
                    DateSpan::new(span.low(), self.range.high()),
                    Some(person),
                ));
            }
            Intersection::Disjoint => unreachable!("disjoint spans are filtered above"),
        }

        let rest = &remaining[index + 1..];
        let children = std::mem::take(&mut self.children);
        self.children = children.into_iter().map(|child| child.solve(rest)).collect();
        self
    }

    /// Collapse the raw tree into its normal form.
    ///
    /// Degenerate sections (zero or negative days) and unplaced childless
    /// sections are dropped; unplaced intermediate sections are replaced by
    /// their subsections. An unplaced root adopts the occupant of its
    /// earliest subsection. Returns `None` when nothing remains.
    #[must_use]
    pub fn simplify(self) -> Option<Self> {
        let mut node = self.simplify_node()?;
        if node.occupant.is_none() {
            // Only reachable for a root whose top-level occupant claimed a
            // proper subrange; the earliest section's occupant takes over.
            node.occupant = node.children.first().and_then(|c| c.occupant.clone());
        }
        Some(node)
    }

    fn simplify_node(mut self) -> Option<Self> {
        if self.range.days() <= 0 {
            return None;
        }

        let children = std::mem::take(&mut self.children);
        let simplified: Vec<SectionNode> = children
            .into_iter()
            .filter_map(Self::simplify_node)
            .collect();

        let mut rebuilt = Vec::with_capacity(simplified.len());
        for child in simplified {
            hoist_into(&mut rebuilt, child);
        }
        self.children = rebuilt;

        if self.occupant.is_none() {
            match self.children.len() {
                0 => return None,
                1 => return self.children.pop(),
                // Left for the parent (or the root wrapper) to resolve.
                _ => {}
            }
        }
        Some(self)
    }

    /// Check the normal-form invariants of a simplified tree.
    ///
    /// A violation indicates a bug in `build`/`simplify`, not a user error.
    pub fn validate(&self) -> Result<()> {
        if self.range.days() <= 0 {
            return Err(MeterError::tree(format!(
                "section {} spans {} days",
                self.range,
                self.range.days()
            )));
        }
        if self.occupant.is_none() {
            return Err(MeterError::tree(format!(
                "section {} has no responsible occupant",
                self.range
            )));
        }
        for child in &self.children {
            match self.range.intersect(&child.range) {
                Intersection::Equal | Intersection::SuperSet => {}
                class => {
                    return Err(MeterError::tree(format!(
                        "child {} is {:?} of parent {}",
                        child.range, class, self.range
                    )));
                }
            }
            child.validate()?;
        }
        Ok(())
    }
}

/// Append `node` to `out`, replacing unplaced nodes by their children.
fn hoist_into(out: &mut Vec<SectionNode>, node: SectionNode) {
    if node.occupant.is_some() {
        out.push(node);
    } else {
        for child in node.children {
            hoist_into(out, child);
        }
    }
}

fn day_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

fn day_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}
