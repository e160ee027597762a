//! [`FamilyGraph`] – the household population and its relationship queries.
//!
//! Members are keyed by [`MemberId`] and kept in insertion order.  The graph
//! trusts its caller: [`FamilyGraph::add_member`] stores whatever spouse,
//! parent and child identifiers the member carries without checking them
//! against the rest of the population.  Queries resolve identifiers lazily
//! and silently skip any that are unknown.
//!
//! [`FamilyGraph::check_integrity`] is an opt-in, read-only audit that
//! reports (but never repairs) relationships that disagree across the
//! population.
//!
//! # Example
//!
//! ```rust
//! use hearth_family::FamilyGraph;
//! use hearth_types::{FamilyMember, Gender, MemberId};
//!
//! let dad = MemberId::new();
//! let mum = MemberId::new();
//! let kid = MemberId::new();
//!
//! let mut graph = FamilyGraph::new();
//! graph.add_member(FamilyMember::with_id(dad, "爸爸", Gender::Male, 0).with_spouse(mum).with_children([kid]));
//! graph.add_member(FamilyMember::with_id(mum, "妈妈", Gender::Female, 0).with_spouse(dad).with_children([kid]));
//! graph.add_member(FamilyMember::with_id(kid, "我", Gender::Female, 1).with_parents([dad, mum]));
//!
//! assert_eq!(graph.get_spouse(dad).unwrap().name, "妈妈");
//! assert_eq!(graph.get_children(mum)[0].name, "我");
//! assert!(graph.check_integrity().is_empty());
//! ```

use std::fmt;

use hearth_types::{FamilyMember, MemberId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ─────────────────────────────────────────────────────────────────────────────
// IntegrityIssue
// ─────────────────────────────────────────────────────────────────────────────

/// A relationship that does not agree across the population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// `member` names `spouse` as its spouse, but `spouse` does not name it back.
    AsymmetricSpouse { member: MemberId, spouse: MemberId },
    /// `parent` lists `child`, but `child` does not list `parent` as a parent.
    MissingParentLink { parent: MemberId, child: MemberId },
    /// `child` lists `parent`, but `parent` does not list `child` as a child.
    MissingChildLink { child: MemberId, parent: MemberId },
    /// `member` references an identifier that is not in the graph.
    Dangling { member: MemberId, missing: MemberId },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::AsymmetricSpouse { member, spouse } => {
                write!(f, "{member} names {spouse} as spouse but not vice versa")
            }
            IntegrityIssue::MissingParentLink { parent, child } => {
                write!(f, "{parent} lists child {child} which does not list it as parent")
            }
            IntegrityIssue::MissingChildLink { child, parent } => {
                write!(f, "{child} lists parent {parent} which does not list it as child")
            }
            IntegrityIssue::Dangling { member, missing } => {
                write!(f, "{member} references unknown member {missing}")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FamilyGraph
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory household graph.
///
/// The graph only grows: there is no removal and no relationship mutation
/// after insertion.  It derives serde so a caller can persist it without any
/// change to the query surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyGraph {
    members: IndexMap<MemberId, FamilyMember>,
}

impl FamilyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `member`, replacing any member already stored under the same
    /// identifier.  A replaced member keeps its original insertion slot.
    ///
    /// Returns the replaced member, if any.
    pub fn add_member(&mut self, member: FamilyMember) -> Option<FamilyMember> {
        debug!(id = %member.id, name = %member.name, generation = member.generation, "adding family member");
        self.members.insert(member.id, member)
    }

    /// Look up a member by identifier.
    pub fn member(&self, id: MemberId) -> Option<&FamilyMember> {
        self.members.get(&id)
    }

    /// Return the recorded spouse of `id`, or `None` when the member is
    /// unknown, has no spouse, or the spouse identifier does not resolve.
    pub fn get_spouse(&self, id: MemberId) -> Option<&FamilyMember> {
        self.member(id)
            .and_then(|m| m.spouse_id)
            .and_then(|spouse| self.member(spouse))
    }

    /// Return the children of `id` in the order their identifiers were
    /// attached.  Identifiers that do not resolve are dropped.
    pub fn get_children(&self, id: MemberId) -> Vec<&FamilyMember> {
        match self.member(id) {
            Some(m) => self.resolve(m.children_ids.iter()),
            None => Vec::new(),
        }
    }

    /// Return the parents of `id` in stored order, dropping unknown
    /// identifiers.
    pub fn get_parents(&self, id: MemberId) -> Vec<&FamilyMember> {
        match self.member(id) {
            Some(m) => self.resolve(m.parent_ids.iter()),
            None => Vec::new(),
        }
    }

    /// Return the first member (in insertion order) whose display name is
    /// exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&FamilyMember> {
        self.members.values().find(|m| m.name == name)
    }

    /// Iterate every member in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &FamilyMember> {
        self.members.values()
    }

    /// Members of one generation, sorted by their position within it.
    pub fn generation(&self, generation: u32) -> Vec<&FamilyMember> {
        let mut row: Vec<&FamilyMember> = self
            .members
            .values()
            .filter(|m| m.generation == generation)
            .collect();
        row.sort_by_key(|m| m.position);
        row
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Audit the population for relationships that do not agree.
    ///
    /// Issues are reported in member insertion order.  The graph is not
    /// modified.
    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for member in self.members.values() {
            if let Some(spouse_id) = member.spouse_id {
                match self.member(spouse_id) {
                    None => issues.push(IntegrityIssue::Dangling {
                        member: member.id,
                        missing: spouse_id,
                    }),
                    Some(spouse) if spouse.spouse_id != Some(member.id) => {
                        issues.push(IntegrityIssue::AsymmetricSpouse {
                            member: member.id,
                            spouse: spouse_id,
                        })
                    }
                    Some(_) => {}
                }
            }

            for &child_id in &member.children_ids {
                match self.member(child_id) {
                    None => issues.push(IntegrityIssue::Dangling {
                        member: member.id,
                        missing: child_id,
                    }),
                    Some(child) if !child.parent_ids.contains(&member.id) => {
                        issues.push(IntegrityIssue::MissingParentLink {
                            parent: member.id,
                            child: child_id,
                        })
                    }
                    Some(_) => {}
                }
            }

            for &parent_id in &member.parent_ids {
                match self.member(parent_id) {
                    None => issues.push(IntegrityIssue::Dangling {
                        member: member.id,
                        missing: parent_id,
                    }),
                    Some(parent) if !parent.children_ids.contains(&member.id) => {
                        issues.push(IntegrityIssue::MissingChildLink {
                            child: member.id,
                            parent: parent_id,
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        if !issues.is_empty() {
            warn!(count = issues.len(), "family graph has inconsistent relationships");
        }
        issues
    }

    fn resolve<'a>(&'a self, ids: impl Iterator<Item = &'a MemberId>) -> Vec<&'a FamilyMember> {
        ids.filter_map(|id| self.members.get(id)).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
