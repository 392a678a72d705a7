//! Embeds the commit hash and build time shown by `weatherbuddy --version`.
//!
//! Missing git or date tooling degrades to "unknown" rather than failing the build.

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=WEATHERBUDDY_BUILD_GIT_HASH");
    println!("cargo:rerun-if-env-changed=WEATHERBUDDY_BUILD_TIMESTAMP");

    let git_hash = env::var("WEATHERBUDDY_BUILD_GIT_HASH").unwrap_or_else(|_| {
        command_stdout("git", &["rev-parse", "--short=12", "HEAD"])
            .unwrap_or_else(|| "unknown".to_string())
    });
    let built_at = env::var("WEATHERBUDDY_BUILD_TIMESTAMP").unwrap_or_else(|_| {
        command_stdout("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(|| {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            format!("unix:{secs}")
        })
    });

    println!("cargo:rustc-env=WEATHERBUDDY_BUILD_GIT_HASH={git_hash}");
    println!("cargo:rustc-env=WEATHERBUDDY_BUILD_TIMESTAMP={built_at}");
}

fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
