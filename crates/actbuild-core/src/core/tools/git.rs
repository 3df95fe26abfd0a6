use super::process::Invocation;
use std::path::Path;

const GIT: &str = "git";

pub const CLONE_LOG: &str = "git-clone.log";
pub const CHECKOUT_LOG: &str = "git-checkout.log";
pub const PULL_LOG: &str = "git-pull.log";

// Logs go to `log_dir` rather than into the repository so they never show up as
// untracked files.

/// `git clone <url>` run inside `parent`, output captured in `<log_dir>/git-clone.log`.
pub fn clone(url: &str, parent: &Path, log_dir: &Path) -> Invocation {
    Invocation::new(GIT, parent)
        .args(["clone", url])
        .log_to(log_dir.join(CLONE_LOG))
}

/// Creates a local branch tracking `origin/<branch>` and switches to it.
pub fn checkout_tracking(branch: &str, repo: &Path, log_dir: &Path) -> Invocation {
    Invocation::new(GIT, repo)
        .args([
            "checkout".to_string(),
            "--track".to_string(),
            format!("origin/{}", branch),
            "-b".to_string(),
            branch.to_string(),
        ])
        .log_to(log_dir.join(CHECKOUT_LOG))
}

pub fn pull(repo: &Path, log_dir: &Path) -> Invocation {
    Invocation::new(GIT, repo)
        .arg("pull")
        .log_to(log_dir.join(PULL_LOG))
}
