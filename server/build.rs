use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-env-changed=GIT_COMMIT_HASH");

    let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    else {
        return;
    };
    if !output.status.success() {
        return;
    }
    let Ok(hash) = String::from_utf8(output.stdout) else {
        return;
    };
    let hash = hash.trim();
    if !hash.is_empty() {
        println!("cargo:rustc-env=GIT_COMMIT_HASH={hash}");
    }
}
