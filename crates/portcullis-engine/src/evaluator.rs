//! Policy evaluation.
//!
//! Scans the ordered policy list, filters to policies that are enabled and
//! target the subject, delegates condition checking to the matcher, and
//! resolves precedence: the first qualifying grant wins and ends the scan.

use chrono::NaiveTime;
use portcullis_types::{
    AccessControl, ContextSnapshot, Dataset, Datasets, PolicySet, SubjectDirectory,
};
use tracing::{info, warn};

use crate::error::{EvalError, Result};
use crate::matcher;

// ============================================================================
// Decision
// ============================================================================

/// The outcome of one evaluation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Access is granted.
    Grant,
    /// Access is denied.
    Deny,
}

/// What the evaluator did with one policy it considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Skipped: the policy is not enabled.
    Disabled,
    /// Skipped: the policy does not list the subject.
    NotTargeted,
    /// Considered, but its conditions did not hold.
    ConditionsUnmet,
    /// Conditions held, but the policy's control does not grant access.
    MatchedNotGranting,
    /// Conditions held and the policy granted access.
    Granted,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::NotTargeted => write!(f, "not targeted"),
            Self::ConditionsUnmet => write!(f, "conditions unmet"),
            Self::MatchedNotGranting => write!(f, "matched without granting"),
            Self::Granted => write!(f, "granted"),
        }
    }
}

/// One audit trace line: a policy the evaluator considered and what became
/// of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// The policy's name.
    pub policy: String,
    /// What the evaluator did with it.
    pub disposition: Disposition,
}

/// The result of evaluating a subject against a policy set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether access is granted or denied.
    pub effect: Effect,
    /// The name of the policy that authorized the grant, or `None` when
    /// denied.
    pub authorized_by: Option<String>,
    /// Human-readable explanation of the outcome.
    pub reason: String,
    /// One entry per policy considered, in evaluation order. Policies after
    /// an authorizing grant are never examined and never appear here.
    pub trace: Vec<TraceEntry>,
}

impl Decision {
    /// True when the decision grants access.
    pub fn is_granted(&self) -> bool {
        self.effect == Effect::Grant
    }

    fn deny(reason: String, trace: Vec<TraceEntry>) -> Self {
        Self {
            effect: Effect::Deny,
            authorized_by: None,
            reason,
            trace,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates a subject's access against a loaded dataset bundle.
///
/// Refuses to evaluate an incomplete bundle: a dataset that failed to load
/// upstream is a [`EvalError::DataUnavailable`] error, never a deny.
///
/// # Errors
///
/// * [`EvalError::DataUnavailable`] - a required dataset is missing
/// * [`EvalError::MalformedCondition`] - a policy's time window is unparseable
pub fn evaluate(datasets: &Datasets, subject_id: &str, at: NaiveTime) -> Result<Decision> {
    let policies = require(datasets.policies.as_ref(), Dataset::Policies)?;
    let subjects = require(datasets.subjects.as_ref(), Dataset::Subjects)?;
    let context = require(datasets.context.as_ref(), Dataset::Context)?;
    evaluate_policies(policies, subjects, context, subject_id, at)
}

fn require<T>(dataset: Option<&T>, name: Dataset) -> Result<&T> {
    dataset.ok_or(EvalError::DataUnavailable { dataset: name })
}

/// Evaluates a subject's access against already-resolved datasets.
///
/// The evaluation time is captured once by the caller and applies to every
/// policy in the call. Policies are scanned in the order supplied; the
/// first enabled, targeting policy whose conditions hold and whose control
/// is `grant` decides the outcome and ends the scan. Grant takes precedence
/// over deny: later policies cannot override a prior grant. A matching
/// policy with a non-granting control is recorded and the scan continues.
///
/// # Errors
///
/// Returns [`EvalError::MalformedCondition`] when a considered policy's
/// time window cannot be parsed. The evaluation aborts instead of skipping
/// the policy, since a malformed condition could mask an intended
/// restriction.
pub fn evaluate_policies(
    policies: &PolicySet,
    subjects: &SubjectDirectory,
    context: &ContextSnapshot,
    subject_id: &str,
    at: NaiveTime,
) -> Result<Decision> {
    if subjects.find(subject_id).is_none() {
        warn!(subject = %subject_id, "unknown subject; denying");
        return Ok(Decision::deny(
            format!("unknown subject '{subject_id}'"),
            Vec::new(),
        ));
    }

    let mut trace = Vec::with_capacity(policies.policies.len());

    for policy in &policies.policies {
        if !policy.is_enabled() {
            trace.push(TraceEntry {
                policy: policy.name.clone(),
                disposition: Disposition::Disabled,
            });
            continue;
        }
        if !policy.targets(subject_id) {
            trace.push(TraceEntry {
                policy: policy.name.clone(),
                disposition: Disposition::NotTargeted,
            });
            continue;
        }

        let met = matcher::conditions_met(&policy.conditions, context, at).map_err(|source| {
            EvalError::MalformedCondition {
                policy: policy.name.clone(),
                source,
            }
        })?;

        if !met {
            trace.push(TraceEntry {
                policy: policy.name.clone(),
                disposition: Disposition::ConditionsUnmet,
            });
            continue;
        }

        if policy.grant_controls.access == AccessControl::Grant {
            info!(policy = %policy.name, subject = %subject_id, "access granted");
            trace.push(TraceEntry {
                policy: policy.name.clone(),
                disposition: Disposition::Granted,
            });
            return Ok(Decision {
                effect: Effect::Grant,
                authorized_by: Some(policy.name.clone()),
                reason: format!("granted by policy '{}'", policy.name),
                trace,
            });
        }

        info!(policy = %policy.name, subject = %subject_id, "policy matched without granting");
        trace.push(TraceEntry {
            policy: policy.name.clone(),
            disposition: Disposition::MatchedNotGranting,
        });
    }

    info!(subject = %subject_id, "access denied; no qualifying grant");
    Ok(Decision::deny("no qualifying grant".to_string(), trace))
}

// ============================================================================
// Tests
// ============================================================================
