//! Git operations used to measure the base branch

use crate::error::{Error, Result};
use git2::{build::CheckoutBuilder, BranchType, Repository};
use std::path::Path;
use tracing::debug;

/// Fetch a single branch from `origin` with a shallow depth.
///
/// Goes through the `git` binary so credentials configured by the CI checkout apply.
pub fn fetch_branch(repo_path: &Path, branch: &str) -> Result<()> {
    debug!("Fetching origin/{}", branch);

    let output = std::process::Command::new("git")
        .args(["fetch", "origin", branch, "--depth=1"])
        .current_dir(repo_path)
        .output()
        .map_err(|e| Error::Io(format!("Failed to run git fetch: {}", e)))?;

    if !output.status.success() {
        return Err(Error::Command {
            command: format!("git fetch origin {} --depth=1", branch),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Force checkout of a branch, discarding local changes.
///
/// A missing local branch is created from `origin/<branch>`.
pub fn checkout_branch(repo_path: &Path, branch_name: &str) -> Result<()> {
    let repo = Repository::discover(repo_path)?;

    let branch = repo
        .find_branch(branch_name, BranchType::Local)
        .or_else(|_| {
            let remote_branch =
                repo.find_branch(&format!("origin/{}", branch_name), BranchType::Remote)?;
            let commit = remote_branch.get().peel_to_commit()?;
            repo.branch(branch_name, &commit, false)
        })?;

    let ref_name = branch
        .get()
        .name()
        .ok_or_else(|| Error::Git(git2::Error::from_str("Invalid branch reference")))?
        .to_string();

    let obj = repo.revparse_single(&ref_name)?;
    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_tree(&obj, Some(&mut checkout))?;
    repo.set_head(&ref_name)?;

    debug!("Checked out {}", ref_name);

    Ok(())
}

/// Short name of the branch HEAD points to, if any
pub fn current_branch(repo_path: &Path) -> Result<Option<String>> {
    let repo = Repository::discover(repo_path)?;
    let head = repo.head()?;

    if head.is_branch() {
        Ok(head.shorthand().map(str::to_string))
    } else {
        Ok(None)
    }
}
