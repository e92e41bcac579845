//! Bring a feature branch up to date with main, then merge it back
//!
//! The sync is a fixed sequence of git commands run one at a time:
//!
//! 1. checkout main
//! 2. pull --rebase main's upstream (skipped when main has none)
//! 3. checkout feature
//! 4. pull --rebase feature's upstream (skipped when feature has none)
//! 5. rebase feature onto main, with any extra rebase arguments
//! 6. checkout main
//! 7. merge feature
//!
//! The first failing step stops the run. Nothing is rolled back: the
//! repository is left exactly where git stopped so the user can resolve
//! conflicts and finish by hand.

use tracing::{debug, info, warn};

use crate::command::join_args;
use crate::error::{Error, Result};
use crate::git::{Client, Executor, RunOptions, Upstream};

/// One git invocation in the sync plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Human-readable description
    pub label: String,
    /// Arguments passed to git
    pub args: Vec<String>,
}

impl Step {
    fn new(label: String, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            label,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn checkout(branch: &str) -> Self {
        Self::new(format!("Checkout {branch}"), ["checkout", branch])
    }

    fn pull(branch: &str, upstream: &Upstream) -> Self {
        Self::new(
            format!("Pull {upstream} into {branch}"),
            [
                "pull",
                "--rebase",
                upstream.remote.as_str(),
                upstream.branch.as_str(),
            ],
        )
    }

    fn rebase(feature: &str, main: &str, extra: &[String]) -> Self {
        let mut args = vec!["rebase".to_string()];
        args.extend_from_slice(extra);
        args.push(main.to_string());
        Self {
            label: format!("Rebase {feature} onto {main}"),
            args,
        }
    }

    fn merge(feature: &str, main: &str) -> Self {
        Self::new(format!("Merge {feature} into {main}"), ["merge", feature])
    }

    /// The command as it would be typed in a shell
    #[must_use]
    pub fn command_line(&self) -> String {
        join_args("git", &self.args)
    }
}

/// A completed sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Branch that was rebased and merged
    pub feature: String,
    /// Branch it was merged into
    pub main: String,
    /// Number of steps that ran
    pub steps: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Merged {} into {} ({} steps)",
            self.feature, self.main, self.steps
        )
    }
}

/// Progress reported while the plan runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A step is about to run
    StepStarted {
        /// 1-based position in the plan
        step: usize,
        /// Total steps in the plan
        total: usize,
        /// The step's label
        label: String,
    },
    /// A step finished successfully
    StepFinished {
        /// 1-based position in the plan
        step: usize,
        /// Total steps in the plan
        total: usize,
        /// The step's label
        label: String,
    },
}

/// Validate the branches and build the step list without running anything
///
/// Only read-only probes are issued. An empty branch name fails before any
/// git call at all.
///
/// # Errors
///
/// Returns [`Error::Validation`] if a name is empty or not a local branch
pub fn plan<E: Executor>(
    git: &Client<E>,
    main: &str,
    feature: &str,
    rebase_args: &[String],
) -> Result<Vec<Step>> {
    if main.trim().is_empty() {
        return Err(Error::Validation("Main branch name is empty".to_string()));
    }
    if feature.trim().is_empty() {
        return Err(Error::Validation("Feature branch name is empty".to_string()));
    }
    if main == feature {
        return Err(Error::Validation(format!(
            "Cannot sync {feature} with itself"
        )));
    }

    for branch in [main, feature] {
        if !git.branch_exists(branch) {
            return Err(Error::Validation(format!(
                "Branch '{branch}' does not exist"
            )));
        }
    }

    let main_upstream = git.upstream(main);
    let feature_upstream = git.upstream(feature);
    debug!(
        main,
        feature,
        main_upstream = ?main_upstream.as_ref().map(ToString::to_string),
        feature_upstream = ?feature_upstream.as_ref().map(ToString::to_string),
        "Planning sync"
    );

    let mut steps = vec![Step::checkout(main)];
    steps.extend(main_upstream.map(|upstream| Step::pull(main, &upstream)));
    steps.push(Step::checkout(feature));
    steps.extend(feature_upstream.map(|upstream| Step::pull(feature, &upstream)));
    steps.push(Step::rebase(feature, main, rebase_args));
    steps.push(Step::checkout(main));
    steps.push(Step::merge(feature, main));
    Ok(steps)
}

/// Run the sync with no progress reporting
///
/// # Errors
///
/// See [`run_with_progress`]
pub fn run<E: Executor>(
    git: &Client<E>,
    main: &str,
    feature: &str,
    rebase_args: &[String],
) -> Result<Summary> {
    run_with_progress(git, main, feature, rebase_args, |_| {})
}

/// Run the sync, reporting each step as it starts and finishes
///
/// # Errors
///
/// Returns [`Error::Validation`] when the branches are unusable (nothing
/// runs), or [`Error::Workflow`] naming the first step that failed along
/// with git's output
pub fn run_with_progress<E, F>(
    git: &Client<E>,
    main: &str,
    feature: &str,
    rebase_args: &[String],
    mut on_progress: F,
) -> Result<Summary>
where
    E: Executor,
    F: FnMut(Progress),
{
    let steps = plan(git, main, feature, rebase_args)?;
    let total = steps.len();
    info!(main, feature, total, "Starting sync");

    for (index, step) in steps.iter().enumerate() {
        let number = index + 1;
        on_progress(Progress::StepStarted {
            step: number,
            total,
            label: step.label.clone(),
        });

        let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
        match git.execute(&step.label, &args, &RunOptions::default()) {
            Ok(_) => {}
            Err(Error::Process { label, lines }) => {
                warn!(step = number, %label, "Sync step failed");
                return Err(Error::Workflow {
                    step: number,
                    label,
                    lines,
                });
            }
            Err(e) => {
                warn!(step = number, label = %step.label, error = %e, "Sync step could not run");
                return Err(Error::Workflow {
                    step: number,
                    label: step.label.clone(),
                    lines: vec![e.to_string()],
                });
            }
        }

        on_progress(Progress::StepFinished {
            step: number,
            total,
            label: step.label.clone(),
        });
    }

    info!(main, feature, "Sync finished");
    Ok(Summary {
        feature: feature.to_string(),
        main: main.to_string(),
        steps: total,
    })
}
