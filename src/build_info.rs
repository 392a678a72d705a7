//! Compile-time build metadata for `--version` and the interactive banner.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short commit hash captured by `build.rs`.
pub const GIT_COMMIT: &str = env!("WEATHERBUDDY_BUILD_GIT_HASH");

/// UTC build timestamp captured by `build.rs`.
pub const BUILD_TIMESTAMP: &str = env!("WEATHERBUDDY_BUILD_TIMESTAMP");

/// Banner suffix printed when the interactive shell starts.
pub fn banner_metadata() -> String {
    format!("v{VERSION} ({GIT_COMMIT})")
}

/// Multi-line text used for `weatherbuddy --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("WEATHERBUDDY_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("WEATHERBUDDY_BUILD_TIMESTAMP"),
);
