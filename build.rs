// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    // Re-run build script if git HEAD changes
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=BOOTH_VERSION");

    // Packagers can pin the version string
    let version = match std::env::var("BOOTH_VERSION") {
        Ok(v) if !v.is_empty() => v,
        _ => git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// `git describe` turned into `0.1.0-abcdef1` (on a tag) or
/// `0.1.0-dirty-abcdef1` (commits after a tag)
fn git_version() -> Option<String> {
    let described = run_git(&["describe", "--tags", "--always", "--match", "v*"])?;
    let described = described.strip_prefix('v').unwrap_or(&described).to_string();
    let hash = run_git(&["rev-parse", "--short", "HEAD"])?;

    if !described.contains('.') {
        // No tag yet, describe fell back to the hash
        return Some(format!("{}-{}", env!("CARGO_PKG_VERSION"), hash));
    }

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() >= 3 {
        Some(format!("{}-dirty-{}", parts[2], hash))
    } else {
        Some(format!("{}-{}", described, hash))
    }
}

fn run_git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
