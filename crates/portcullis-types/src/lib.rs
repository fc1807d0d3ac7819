//! # portcullis-types: Core types for `portcullis`
//!
//! This crate contains the shared data model consumed by the evaluation
//! engine and produced by the dataset loader:
//! - Policy records ([`Policy`], [`PolicyStatus`], [`GrantControls`], [`AccessControl`])
//! - Condition predicates ([`ConditionSet`], [`TimeWindowSpec`], [`TimeWindow`])
//! - Subject records ([`Subject`], [`SubjectDirectory`])
//! - Context snapshots ([`ContextSnapshot`], [`ContextDocument`])
//! - The loader-to-engine handoff bundle ([`Datasets`], [`Dataset`])
//!
//! All types are plain immutable data. Evaluation semantics live in
//! `portcullis-engine`; file I/O lives in `portcullis-loader`.

use std::fmt::{self, Display};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Policy status and grant controls
// ============================================================================

/// Whether a policy participates in evaluation.
///
/// Anything other than the literal string `"enabled"` on the wire (including
/// `"disabled"`, `"report-only"`, or future values) deserializes to
/// [`PolicyStatus::Disabled`]: an unrecognized status must never cause a
/// policy to be enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    /// The policy is evaluated.
    Enabled,
    /// The policy is inert.
    #[serde(other)]
    Disabled,
}

impl Default for PolicyStatus {
    /// Defaults to `Disabled` (safe default: a policy must opt in to enforcement).
    fn default() -> Self {
        Self::Disabled
    }
}

/// The access effect a matching policy contributes.
///
/// Only the literal `"grant"` has a positive effect. Any other wire value
/// deserializes to [`AccessControl::Block`]: the policy can still match, but
/// it contributes no access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessControl {
    /// Grant access when the policy matches.
    Grant,
    /// Match without granting.
    #[serde(other)]
    Block,
}

impl Default for AccessControl {
    /// Defaults to `Block` (safe default: deny unless explicitly granted).
    fn default() -> Self {
        Self::Block
    }
}

/// The controls applied when a policy's conditions are satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantControls {
    /// The access effect of this policy.
    #[serde(default)]
    pub access: AccessControl,
}

// ============================================================================
// Time windows
// ============================================================================

/// Time-of-day window as written in policy documents: `"HH:MM"` strings.
///
/// Absent members default to the full day (`00:00` / `23:59`). The strings
/// are kept unparsed here so a malformed window surfaces at evaluation time
/// as an explicit policy-authoring error rather than being silently
/// defaulted at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindowSpec {
    /// Inclusive window start, `"HH:MM"`. Absent means `00:00`.
    pub start_time: Option<String>,
    /// Inclusive window end, `"HH:MM"`. Absent means `23:59`.
    pub end_time: Option<String>,
}

impl TimeWindowSpec {
    /// Parses the window into comparable [`NaiveTime`] bounds.
    ///
    /// # Errors
    ///
    /// Returns [`TimeWindowError::InvalidTime`] if either member is not a
    /// valid `HH:MM` time of day.
    pub fn parse(&self) -> Result<TimeWindow, TimeWindowError> {
        let start = match &self.start_time {
            Some(raw) => parse_time_of_day("start_time", raw)?,
            None => TimeWindow::DAY_START,
        };
        let end = match &self.end_time {
            Some(raw) => parse_time_of_day("end_time", raw)?,
            None => TimeWindow::DAY_END,
        };
        Ok(TimeWindow { start, end })
    }
}

fn parse_time_of_day(field: &'static str, raw: &str) -> Result<NaiveTime, TimeWindowError> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|source| TimeWindowError::InvalidTime {
        field,
        value: raw.to_string(),
        source,
    })
}

/// A parsed, inclusive time-of-day window.
///
/// Membership is a literal comparison: `start <= t && t <= end`. A window
/// whose end precedes its start is therefore never satisfied; cross-midnight
/// windows are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start of the window.
    pub start: NaiveTime,
    /// Inclusive end of the window.
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Midnight, the default window start.
    pub const DAY_START: NaiveTime = match NaiveTime::from_hms_opt(0, 0, 0) {
        Some(t) => t,
        None => unreachable!(),
    };

    /// One minute before midnight, the default window end.
    pub const DAY_END: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 0) {
        Some(t) => t,
        None => unreachable!(),
    };

    /// Returns true when `at` falls inside the window, bounds included.
    pub fn contains(&self, at: NaiveTime) -> bool {
        self.start <= at && at <= self.end
    }
}

impl Default for TimeWindow {
    /// The full-day window: every time of day is a member.
    fn default() -> Self {
        Self {
            start: Self::DAY_START,
            end: Self::DAY_END,
        }
    }
}

/// Error produced when a policy's time window cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    /// A window member is not a valid `HH:MM` time of day.
    #[error("invalid {field} {value:?}: expected HH:MM")]
    InvalidTime {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

// ============================================================================
// Conditions
// ============================================================================

/// The condition predicate of one policy.
///
/// Every component is optional and the components are implicitly ANDed.
/// An absent component is vacuously satisfied: this is a deliberate
/// open-access default, not an inference. An empty `location` list and an
/// empty `device_health` string count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSet {
    /// Time-of-day window the access attempt must fall in.
    pub time: Option<TimeWindowSpec>,
    /// Location labels the context location must be a member of.
    pub location: Option<Vec<String>>,
    /// Device health label the context must match exactly (case-sensitive).
    pub device_health: Option<String>,
}

impl ConditionSet {
    /// The allowed locations, or `None` when the component is absent/empty.
    pub fn required_locations(&self) -> Option<&[String]> {
        match self.location.as_deref() {
            Some([]) | None => None,
            Some(labels) => Some(labels),
        }
    }

    /// The required device health label, or `None` when absent/empty.
    pub fn required_device_health(&self) -> Option<&str> {
        match self.device_health.as_deref() {
            Some("") | None => None,
            Some(label) => Some(label),
        }
    }
}

// ============================================================================
// Policies
// ============================================================================

/// One declarative conditional access policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Name used in decisions, traces, and logs. Not required to be unique,
    /// but duplicates make traces harder to read.
    pub name: String,
    /// Whether the policy is evaluated at all.
    #[serde(default)]
    pub status: PolicyStatus,
    /// Subject ids this policy applies to. Membership test only; no
    /// wildcard semantics.
    #[serde(rename = "users", default)]
    pub subjects: Vec<String>,
    /// The condition predicate. Absent components are vacuously satisfied.
    #[serde(default)]
    pub conditions: ConditionSet,
    /// Controls applied when the conditions are satisfied.
    #[serde(default)]
    pub grant_controls: GrantControls,
}

impl Policy {
    /// True when the policy participates in evaluation.
    pub fn is_enabled(&self) -> bool {
        self.status == PolicyStatus::Enabled
    }

    /// True when the policy applies to `subject_id`.
    pub fn targets(&self, subject_id: &str) -> bool {
        self.subjects.iter().any(|s| s == subject_id)
    }
}

/// The ordered policy list of one evaluation call.
///
/// Order is significant: it is the precedence tie-break, and the first
/// qualifying grant in this order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySet {
    /// Policies in evaluation order.
    pub policies: Vec<Policy>,
}

// ============================================================================
// Subjects
// ============================================================================

/// One identity record.
///
/// Only `id` participates in evaluation; every other attribute is opaque
/// profile data carried through for collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Opaque profile attributes (name, department, ...).
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Subject {
    /// Creates a subject with no profile attributes.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            attributes: serde_json::Map::new(),
        }
    }
}

/// The directory of known subjects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDirectory {
    /// All known subjects.
    pub users: Vec<Subject>,
}

impl SubjectDirectory {
    /// Looks a subject up by id.
    pub fn find(&self, subject_id: &str) -> Option<&Subject> {
        self.users.iter().find(|s| s.id == subject_id)
    }
}

// ============================================================================
// Context
// ============================================================================

/// Environmental facts about one access attempt.
///
/// Valid for exactly one evaluation call. The evaluation instant is not
/// stored here; it is threaded into the engine as an explicit argument so
/// evaluation stays deterministic and testable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Location label of the access attempt, when known.
    pub location: Option<String>,
    /// Device health label of the access attempt, when known.
    pub device_health: Option<String>,
}

impl ContextSnapshot {
    /// Creates an empty snapshot (no location, no device posture).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the location label.
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    /// Sets the device health label.
    pub fn with_device_health(mut self, device_health: &str) -> Self {
        self.device_health = Some(device_health.to_string());
        self
    }
}

/// The on-disk envelope of a context snapshot: `{ "context": { ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// The snapshot itself.
    pub context: ContextSnapshot,
}

// ============================================================================
// Datasets
// ============================================================================

/// Names one of the three datasets an evaluation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// The policy set.
    Policies,
    /// The subject directory.
    Subjects,
    /// The context snapshot.
    Context,
}

impl Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Policies => write!(f, "policy"),
            Self::Subjects => write!(f, "subject directory"),
            Self::Context => write!(f, "context"),
        }
    }
}

/// The loader-to-engine handoff bundle.
///
/// `None` for a source records an upstream loading failure. That is a
/// distinct state from "present but empty": the engine refuses to evaluate
/// an incomplete bundle instead of treating it as an empty policy set that
/// coincidentally also denies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Datasets {
    /// The policy set, when it loaded.
    pub policies: Option<PolicySet>,
    /// The subject directory, when it loaded.
    pub subjects: Option<SubjectDirectory>,
    /// The context snapshot, when it loaded.
    pub context: Option<ContextSnapshot>,
}

impl Datasets {
    /// Bundles three successfully loaded datasets.
    pub fn complete(
        policies: PolicySet,
        subjects: SubjectDirectory,
        context: ContextSnapshot,
    ) -> Self {
        Self {
            policies: Some(policies),
            subjects: Some(subjects),
            context: Some(context),
        }
    }

    /// The first missing dataset, if any.
    pub fn missing(&self) -> Option<Dataset> {
        if self.policies.is_none() {
            Some(Dataset::Policies)
        } else if self.subjects.is_none() {
            Some(Dataset::Subjects)
        } else if self.context.is_none() {
            Some(Dataset::Context)
        } else {
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
