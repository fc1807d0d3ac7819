//! Kani proofs for policy evaluation
//!
//! These proofs verify correctness properties of the conditional access
//! evaluator using bounded model checking.
//!
//! Run with: `cargo kani --tests --harness verify_*`

#[cfg(kani)]
use crate::evaluator::{self, Effect};
#[cfg(kani)]
use chrono::NaiveTime;
#[cfg(kani)]
use portcullis_types::{
    AccessControl, ConditionSet, ContextSnapshot, GrantControls, Policy, PolicySet, PolicyStatus,
    Subject, SubjectDirectory,
};

#[cfg(kani)]
fn fixture(status: PolicyStatus, access: AccessControl) -> (PolicySet, SubjectDirectory) {
    let policies = PolicySet {
        policies: vec![Policy {
            name: "p".to_string(),
            status,
            subjects: vec!["u1".to_string()],
            conditions: ConditionSet::default(),
            grant_controls: GrantControls { access },
        }],
    };
    let subjects = SubjectDirectory {
        users: vec![Subject::new("u1")],
    };
    (policies, subjects)
}

/// **Property**: Same inputs always produce the same decision.
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(5)]
fn verify_evaluation_determinism() {
    let (policies, subjects) = fixture(PolicyStatus::Enabled, AccessControl::Grant);
    let context = ContextSnapshot::new();
    let at = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

    let first = evaluator::evaluate_policies(&policies, &subjects, &context, "u1", at).unwrap();
    let second = evaluator::evaluate_policies(&policies, &subjects, &context, "u1", at).unwrap();

    assert_eq!(first.effect, second.effect);
    assert_eq!(first.authorized_by, second.authorized_by);
}

/// **Property**: A disabled policy can never authorize a grant.
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(5)]
fn verify_disabled_policy_never_grants() {
    let (policies, subjects) = fixture(PolicyStatus::Disabled, AccessControl::Grant);
    let context = ContextSnapshot::new();
    let at = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

    let decision =
        evaluator::evaluate_policies(&policies, &subjects, &context, "u1", at).unwrap();

    assert_eq!(decision.effect, Effect::Deny);
    assert!(decision.authorized_by.is_none());
}

/// **Property**: The first qualifying grant wins regardless of what follows.
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(5)]
fn verify_first_grant_precedence() {
    let (mut policies, subjects) = fixture(PolicyStatus::Enabled, AccessControl::Grant);
    policies.policies.push(Policy {
        name: "later-block".to_string(),
        status: PolicyStatus::Enabled,
        subjects: vec!["u1".to_string()],
        conditions: ConditionSet::default(),
        grant_controls: GrantControls {
            access: AccessControl::Block,
        },
    });
    let context = ContextSnapshot::new();
    let at = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

    let decision =
        evaluator::evaluate_policies(&policies, &subjects, &context, "u1", at).unwrap();

    assert_eq!(decision.effect, Effect::Grant);
    assert_eq!(decision.authorized_by.as_deref(), Some("p"));
}
