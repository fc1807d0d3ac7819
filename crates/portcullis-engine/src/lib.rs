//! # portcullis-engine: Conditional access policy evaluation
//!
//! Decides whether a named subject is granted access, given an ordered
//! policy set, a subject directory, and a context snapshot. Pure decision
//! logic: the engine performs no I/O and holds no state across calls.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Evaluation Request                          │
//! │  (Datasets + subject id + evaluation time)   │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Policy Evaluator                            │
//! │  ├─ Refuse incomplete datasets               │
//! │  ├─ Resolve subject against the directory    │
//! │  ├─ Scan policies in supplied order          │
//! │  └─ First qualifying grant wins              │
//! └─────────────────┬───────────────────────────┘
//!                   │ per applicable policy
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Condition Matcher                           │
//! │  ├─ Time window (inclusive bounds)           │
//! │  ├─ Location membership                      │
//! │  └─ Device health equality                   │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - Effect (Grant/Deny)                       │
//! │  - Authorizing policy name                   │
//! │  - Per-policy audit trace                    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Precedence
//!
//! Policies are scanned in the order supplied, and the first enabled,
//! targeting, condition-satisfying policy whose control is `grant` decides
//! the outcome. Grant takes precedence over deny: once a policy grants,
//! later policies cannot override it. This is a documented contract of the
//! ordered policy list, not an incidental short-circuit.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveTime;
//! use portcullis_engine::{Effect, evaluate};
//! use portcullis_types::{
//!     AccessControl, ConditionSet, ContextSnapshot, Datasets, GrantControls, Policy, PolicySet,
//!     PolicyStatus, Subject, SubjectDirectory,
//! };
//!
//! let policy = Policy {
//!     name: "allow-usa".to_string(),
//!     status: PolicyStatus::Enabled,
//!     subjects: vec!["u1".to_string()],
//!     conditions: ConditionSet {
//!         location: Some(vec!["USA".to_string()]),
//!         ..ConditionSet::default()
//!     },
//!     grant_controls: GrantControls { access: AccessControl::Grant },
//! };
//! let datasets = Datasets::complete(
//!     PolicySet { policies: vec![policy] },
//!     SubjectDirectory { users: vec![Subject::new("u1")] },
//!     ContextSnapshot::new().with_location("USA"),
//! );
//!
//! let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
//! let decision = evaluate(&datasets, "u1", noon).unwrap();
//! assert_eq!(decision.effect, Effect::Grant);
//! assert_eq!(decision.authorized_by.as_deref(), Some("allow-usa"));
//! ```

pub mod error;
pub mod evaluator;
pub mod matcher;

// Kani proofs for bounded model checking
#[cfg(any(test, kani))]
mod kani_proofs;

pub use error::EvalError;
pub use evaluator::{Decision, Disposition, Effect, TraceEntry, evaluate, evaluate_policies};
pub use matcher::conditions_met;
