//! Build metadata embedded by `vergen-gitcl`.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Git branch at build time.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => UNKNOWN,
};

/// Git commit SHA at build time.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => UNKNOWN,
};

/// Build timestamp (RFC 3339).
pub const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(ts) => ts,
    None => UNKNOWN,
};

/// `{version}+{branch}.{short sha}`, with `.dirty` appended for dirty trees.
pub fn version_string() -> String {
    let short_sha = &GIT_SHA[..7.min(GIT_SHA.len())];
    let dirty = option_env!("VERGEN_GIT_DIRTY") == Some("true");
    format!(
        "{PKG_VERSION}+{GIT_BRANCH}.{short_sha}{}",
        if dirty { ".dirty" } else { "" }
    )
}

/// Multi-line version text for `tokenz --version`.
pub fn long_version() -> String {
    format!("{}\nbuilt {BUILD_TIMESTAMP}", version_string())
}
