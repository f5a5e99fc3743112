//! Goal classification and exclusive-target enforcement.

use thiserror::Error;

/// Administrative targets that refuse to share an invocation with anything
/// else.
const EXCLUSIVE: &[&str] = &["deps", "print-vars"];

/// What the invocation asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPlan {
    /// The ordinary build (compile, link, package).
    Build,
    /// Print dependency-facing facts and exit.
    Deps,
    /// Print selected variables and exit.
    PrintVars,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// An exclusive target was combined with other goals. `extras` keeps
    /// invocation order.
    #[error("{target} cannot be invoked along with other targets (extra targets: {})", .extras.join(", "))]
    Conflict {
        target: String,
        extras: Vec<String>,
    },

    #[error("unknown target: {name}")]
    Unknown { name: String },
}

/// Classify a goal list. An empty list means the default build.
pub fn classify(goals: &[String]) -> Result<DispatchPlan, TargetError> {
    for (index, goal) in goals.iter().enumerate() {
        if !EXCLUSIVE.contains(&goal.as_str()) {
            continue;
        }

        let extras: Vec<String> = goals
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, g)| g.clone())
            .collect();
        if !extras.is_empty() {
            return Err(TargetError::Conflict {
                target: goal.clone(),
                extras,
            });
        }

        return Ok(match goal.as_str() {
            "deps" => DispatchPlan::Deps,
            _ => DispatchPlan::PrintVars,
        });
    }

    for goal in goals {
        if goal != "default" {
            return Err(TargetError::Unknown { name: goal.clone() });
        }
    }

    Ok(DispatchPlan::Build)
}
