//! Ref namespaces and name validation.
//!
//! A valid short name:
//! - is non-empty
//! - contains no whitespace, control characters, `~`, `^`, `:`, `?`, `*`, `[` or `\`
//! - contains no `..` and no `@{`
//! - does not start or end with `/`, and does not end with `.` or `.lock`
//! - has no empty `/`-separated component and no component starting with `.`

use crate::error::{RefError, Result};

/// Namespace for branches.
pub const HEADS_PREFIX: &str = "refs/heads/";
/// Namespace for tags.
pub const TAGS_PREFIX: &str = "refs/tags/";
/// Namespace for remote tracking refs.
pub const REMOTES_PREFIX: &str = "refs/remotes/";

const FORBIDDEN_CHARS: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a branch name (without the `refs/heads/` prefix).
///
/// # Examples
///
/// ```
/// use grove_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("feature/auth").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "name must not be empty"));
    }
    if let Some(ch) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(c))
    {
        return Err(invalid(name, format!("contains forbidden character {ch:?}")));
    }
    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }
    if name.contains("@{") {
        return Err(invalid(name, "must not contain '@{'"));
    }
    if name.ends_with('.') || name.ends_with(".lock") {
        return Err(invalid(name, "must not end with '.' or '.lock'"));
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid(name, "empty path component"));
        }
        if component.starts_with('.') {
            return Err(invalid(name, format!("component {component:?} starts with '.'")));
        }
    }
    Ok(())
}

/// Validate a tag name. Same rules as branch names.
pub fn validate_tag_name(name: &str) -> Result<()> {
    validate_branch_name(name)
}

/// Validate a remote name: a single component with branch-name rules.
pub fn validate_remote_name(name: &str) -> Result<()> {
    if name.contains('/') {
        return Err(invalid(name, "remote name must not contain '/'"));
    }
    validate_branch_name(name)
}

/// Full ref name for a branch.
pub fn branch_ref_name(branch: &str) -> String {
    format!("{HEADS_PREFIX}{branch}")
}
