//! Simulate command - evaluate a subject's access.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveTime};
use portcullis_engine::{Effect, evaluate};
use portcullis_loader::DatasetLoader;

pub fn run(
    subject_id: &str,
    policy_file: &Path,
    subject_file: &Path,
    context_file: &Path,
    at: Option<&str>,
    show_trace: bool,
) -> Result<()> {
    for path in [policy_file, subject_file, context_file] {
        if !path.exists() {
            bail!("dataset file not found: {}", path.display());
        }
    }

    // The evaluation time is captured once, here at the outermost caller
    // boundary; the engine itself never reads a clock.
    let at = match at {
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
            .with_context(|| format!("invalid --at time {raw:?}: expected HH:MM"))?,
        None => Local::now().time(),
    };

    let datasets = DatasetLoader::new()
        .with_policy_path(policy_file)
        .with_subject_path(subject_file)
        .with_context_path(context_file)
        .load();

    let decision = evaluate(&datasets, subject_id, at)
        .with_context(|| format!("could not evaluate access for subject '{subject_id}'"))?;

    if show_trace && !decision.trace.is_empty() {
        println!("Policies considered:");
        for entry in &decision.trace {
            println!("  {:<32} {}", entry.policy, entry.disposition);
        }
        println!();
    }

    match decision.effect {
        Effect::Grant => println!("Access granted to subject '{subject_id}'."),
        Effect::Deny => println!("Access denied to subject '{subject_id}' ({}).", decision.reason),
    }

    Ok(())
}
