use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Process-unique identifier of a [`FamilyMember`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Process-unique identifier of a [`MemoryEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "男" => Ok(Gender::Male),
            "female" | "f" | "女" => Ok(Gender::Female),
            other => Err(HearthError::UnknownGender(other.to_string())),
        }
    }
}

/// How close the household feels to a member, from 0 (distant) to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Closeness(u8);

impl Closeness {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, HearthError> {
        if value > Self::MAX {
            return Err(HearthError::InvalidCloseness(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Closeness {
    type Error = HearthError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Closeness> for u8 {
    fn from(c: Closeness) -> Self {
        c.0
    }
}

/// A single person in the household graph.
///
/// Relationship sets are insertion-ordered, so `children_ids` iterates in the
/// order children were attached. Nothing here checks that the relationships
/// agree with the rest of the population; see
/// `FamilyGraph::check_integrity` for an opt-in audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    /// Unique identifier of this member.
    pub id: MemberId,
    /// Display name. Memory events reference members by this string.
    pub name: String,
    /// Biological gender, used for kinship labels.
    pub gender: Gender,
    /// 0 is the oldest observed generation; larger values are younger.
    pub generation: u32,
    /// Ordinal position within the generation.
    #[serde(default)]
    pub position: u32,
    /// Emoji or icon names shown next to the member.
    #[serde(default)]
    pub icons: Vec<String>,
    /// Hint for how many memories exist for this member. Not kept in sync
    /// with the event store.
    #[serde(default)]
    pub memory_count: u32,
    /// Year of birth, when known.
    #[serde(default)]
    pub birth_year: Option<i32>,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// How close the household feels to this member.
    #[serde(default)]
    pub closeness: Closeness,
    /// Short personality label, e.g. "爱钓鱼".
    #[serde(default)]
    pub trait_label: String,
    /// Display color as a `#RRGGBB` string.
    #[serde(default)]
    pub color: String,
    /// Spouse, if any.  Expected to point back at this member.
    #[serde(default)]
    pub spouse_id: Option<MemberId>,
    /// Parents, in the order they were attached.
    #[serde(default)]
    pub parent_ids: IndexSet<MemberId>,
    /// Children, in the order they were attached.
    #[serde(default)]
    pub children_ids: IndexSet<MemberId>,
}

impl FamilyMember {
    /// Construct a member with a freshly generated identifier.
    pub fn new(name: impl Into<String>, gender: Gender, generation: u32) -> Self {
        Self::with_id(MemberId::new(), name, gender, generation)
    }

    /// Construct a member under an identifier allocated up front, so that a
    /// population can cross-reference itself before insertion.
    pub fn with_id(id: MemberId, name: impl Into<String>, gender: Gender, generation: u32) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            generation,
            position: 0,
            icons: Vec::new(),
            memory_count: 0,
            birth_year: None,
            description: String::new(),
            closeness: Closeness::default(),
            trait_label: String::new(),
            color: String::new(),
            spouse_id: None,
            parent_ids: IndexSet::new(),
            children_ids: IndexSet::new(),
        }
    }

    pub fn with_spouse(mut self, spouse: MemberId) -> Self {
        self.spouse_id = Some(spouse);
        self
    }

    pub fn with_parents(mut self, parents: impl IntoIterator<Item = MemberId>) -> Self {
        self.parent_ids.extend(parents);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = MemberId>) -> Self {
        self.children_ids.extend(children);
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_closeness(mut self, closeness: Closeness) -> Self {
        self.closeness = closeness;
        self
    }

    pub fn with_trait(mut self, label: impl Into<String>) -> Self {
        self.trait_label = label.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_icons<I, S>(mut self, icons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.icons.extend(icons.into_iter().map(Into::into));
        self
    }

    pub fn with_memory_count(mut self, count: u32) -> Self {
        self.memory_count = count;
        self
    }
}

/// A dated personal memory about one household member.
///
/// `id` and `created_at` are fixed at construction; everything else may be
/// edited before handing the event back to the store's update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEvent {
    id: EventId,
    /// Display name of the member this memory belongs to. Matched exactly.
    pub subject: String,
    /// The date the memory is about. Drives recency ordering.
    pub date: NaiveDate,
    /// Short headline.
    pub title: String,
    /// Body text of the memory.
    pub content: String,
    created_at: DateTime<Utc>,
}

impl MemoryEvent {
    /// Construct a new event with a fresh identifier, stamped with the
    /// current UTC time.
    pub fn new(
        subject: impl Into<String>,
        date: NaiveDate,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::stamped_at(subject, date, title, content, Utc::now())
    }

    /// Construct a new event with a fresh identifier and an explicit
    /// creation time.
    pub fn stamped_at(
        subject: impl Into<String>,
        date: NaiveDate,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EventId::new(),
            subject: subject.into(),
            date,
            title: title.into(),
            content: content.into(),
            created_at,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, HearthError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| HearthError::InvalidDate(raw.to_string()))
}

/// Errors raised while building domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HearthError {
    #[error("Closeness must be between 0 and 5, got {0}")]
    InvalidCloseness(u8),

    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
