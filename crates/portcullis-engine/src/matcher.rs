//! Condition matching.
//!
//! Decides whether one policy's condition predicate holds against a context
//! snapshot at a given time of day. Stateless and pure: the evaluation time
//! is an explicit argument, never read from a clock.

use chrono::NaiveTime;
use portcullis_types::{ConditionSet, ContextSnapshot, TimeWindowError};

/// Returns true iff every declared condition is satisfied.
///
/// Components are implicitly ANDed. An absent component (or an empty
/// location list / empty device health label) is vacuously satisfied; this
/// open-access default is part of the configuration contract, not an
/// accident of the implementation.
///
/// # Errors
///
/// Returns [`TimeWindowError`] when the time window cannot be parsed.
/// A malformed window is a policy authoring defect that could mask an
/// intended restriction, so it must surface instead of defaulting.
pub fn conditions_met(
    conditions: &ConditionSet,
    context: &ContextSnapshot,
    at: NaiveTime,
) -> Result<bool, TimeWindowError> {
    Ok(time_met(conditions, at)?
        && location_met(conditions, context)
        && device_health_met(conditions, context))
}

/// Time window check: inclusive on both ends, full day when unset.
fn time_met(conditions: &ConditionSet, at: NaiveTime) -> Result<bool, TimeWindowError> {
    let window = match &conditions.time {
        Some(spec) => spec.parse()?,
        None => return Ok(true),
    };
    Ok(window.contains(at))
}

/// Location check: the context location must be a member of the allowed set.
///
/// A context with no location can never satisfy a location condition.
fn location_met(conditions: &ConditionSet, context: &ContextSnapshot) -> bool {
    match conditions.required_locations() {
        None => true,
        Some(allowed) => context
            .location
            .as_deref()
            .is_some_and(|location| allowed.iter().any(|l| l == location)),
    }
}

/// Device health check: case-sensitive string equality.
fn device_health_met(conditions: &ConditionSet, context: &ContextSnapshot) -> bool {
    match conditions.required_device_health() {
        None => true,
        Some(required) => context
            .device_health
            .as_deref()
            .is_some_and(|health| health == required),
    }
}

// ============================================================================
// Tests
// ============================================================================
