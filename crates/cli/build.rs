use std::process::Command;

/// Packagers building from a tarball set this instead of relying on git.
const BUILD_ID_VAR: &str = "JOBWALLET_BUILD_ID";

fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/heads");
    println!("cargo:rerun-if-env-changed={BUILD_ID_VAR}");

    let commit = std::env::var(BUILD_ID_VAR)
        .ok()
        .filter(|id| !id.trim().is_empty())
        .or_else(|| {
            let hash = git(&["rev-parse", "--short=7", "HEAD"])?;
            let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
                .is_some_and(|s| !s.is_empty());
            Some(if dirty { format!("{hash}-dirty") } else { hash })
        })
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=JOBWALLET_COMMIT={commit}");

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=JOBWALLET_TARGET={target}");
}
