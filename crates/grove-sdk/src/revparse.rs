//! Revision parsing.
//!
//! A revision is a base followed by any number of navigation suffixes:
//!
//! - `HEAD`, a full hex object id, `refs/...`, a short branch, tag or
//!   remote-tracking name (tried in that order), or a unique hex prefix of
//!   at least [`MIN_PREFIX_LEN`] characters
//! - `^` / `^N` -- the N-th parent (`^0` is the commit itself)
//! - `~` / `~N` -- the N-th first-parent ancestor

use grove_refs::names::{branch_ref_name, HEADS_PREFIX, REMOTES_PREFIX, TAGS_PREFIX};
use grove_refs::{Head, RefStore};
use grove_store::{Commit, ObjectKind, ObjectStore};
use grove_types::{ObjectId, OBJECT_ID_LEN};
use tracing::debug;

use crate::error::{RepoError, RepoResult};

/// Shortest hex prefix accepted as an abbreviated object id.
pub const MIN_PREFIX_LEN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Parent(usize),
    Ancestor(usize),
}

/// Resolve a revision to an object id.
pub fn rev_parse(store: &dyn ObjectStore, refs: &dyn RefStore, spec: &str) -> RepoResult<ObjectId> {
    let split = spec.find(['^', '~']).unwrap_or(spec.len());
    let (base, suffix) = spec.split_at(split);
    if base.is_empty() {
        return Err(RepoError::unresolved(spec, "missing base revision"));
    }
    let steps = parse_steps(spec, suffix)?;

    let mut id = resolve_base(store, refs, spec, base)?;
    for step in steps {
        id = match step {
            Step::Parent(0) => {
                commit_at(store, spec, &id)?;
                id
            }
            Step::Parent(n) => {
                let commit = commit_at(store, spec, &id)?;
                *commit
                    .parents
                    .get(n - 1)
                    .ok_or_else(|| RepoError::unresolved(spec, format!("{} has no parent {n}", id.short_hex())))?
            }
            Step::Ancestor(n) => {
                for _ in 0..n {
                    let commit = commit_at(store, spec, &id)?;
                    id = *commit
                        .parents
                        .first()
                        .ok_or_else(|| RepoError::unresolved(spec, format!("{} has no parent", id.short_hex())))?;
                }
                id
            }
        };
    }

    debug!(spec, resolved = %id.short_hex(), "revision resolved");
    Ok(id)
}

/// Target of HEAD, or `None` when HEAD is unset or names an unborn branch.
pub(crate) fn head_target(refs: &dyn RefStore) -> RepoResult<Option<ObjectId>> {
    Ok(match refs.head()? {
        Some(Head::Symbolic(branch)) => refs.read_ref(&branch_ref_name(&branch))?.map(|r| r.target()),
        Some(Head::Detached(id)) => Some(id),
        None => None,
    })
}

fn parse_steps(spec: &str, mut rest: &str) -> RepoResult<Vec<Step>> {
    let mut steps = Vec::new();
    while let Some(op) = rest.chars().next() {
        rest = &rest[op.len_utf8()..];
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let count = if digits == 0 {
            1
        } else {
            rest[..digits]
                .parse()
                .map_err(|_| RepoError::unresolved(spec, "generation count out of range"))?
        };
        rest = &rest[digits..];
        steps.push(match op {
            '^' => Step::Parent(count),
            '~' => Step::Ancestor(count),
            other => return Err(RepoError::unresolved(spec, format!("unexpected `{other}`"))),
        });
    }
    Ok(steps)
}

fn resolve_base(store: &dyn ObjectStore, refs: &dyn RefStore, spec: &str, base: &str) -> RepoResult<ObjectId> {
    if base == "HEAD" {
        return head_target(refs)?.ok_or_else(|| RepoError::unresolved(spec, "HEAD does not point at a commit"));
    }

    if base.len() == OBJECT_ID_LEN * 2 {
        if let Ok(id) = ObjectId::from_hex(base) {
            return Ok(id);
        }
    }

    if base.starts_with("refs/") {
        return refs
            .read_ref(base)?
            .map(|r| r.target())
            .ok_or_else(|| RepoError::unresolved(spec, format!("no reference {base}")));
    }

    for prefix in [HEADS_PREFIX, TAGS_PREFIX, REMOTES_PREFIX] {
        if let Some(reference) = refs.read_ref(&format!("{prefix}{base}"))? {
            return Ok(reference.target());
        }
    }

    if base.len() >= MIN_PREFIX_LEN && base.chars().all(|c| c.is_ascii_hexdigit()) {
        return match store.find_by_prefix(base)?.as_slice() {
            [id] => Ok(*id),
            [] => Err(RepoError::unresolved(spec, format!("no object with prefix {base}"))),
            candidates => Err(RepoError::unresolved(
                spec,
                format!("prefix {base} is ambiguous ({} candidates)", candidates.len()),
            )),
        };
    }

    Err(RepoError::unresolved(spec, "unknown revision"))
}

fn commit_at(store: &dyn ObjectStore, spec: &str, id: &ObjectId) -> RepoResult<Commit> {
    let object = store
        .read(id)?
        .ok_or_else(|| RepoError::unresolved(spec, format!("object {} not found", id.short_hex())))?;
    if object.kind != ObjectKind::Commit {
        return Err(RepoError::unresolved(
            spec,
            format!("{} is a {}, not a commit", id.short_hex(), object.kind),
        ));
    }
    Ok(Commit::from_stored_object(&object)?)
}
