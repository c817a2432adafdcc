//! The commit walker.
//!
//! A [`RevWalk`] reads commits as it yields them. [`SortPolicy::None`] and
//! [`SortPolicy::Time`] stream straight from the frontier; topological and
//! reversed walks need the whole reachable set and collect it on the first
//! call to `next`. Start points or sorting changed after iteration has begun
//! have no effect; build a new walker instead.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;

use grove_store::{Commit, ObjectKind, ObjectStore};
use grove_types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{WalkError, WalkResult};

/// Order in which a walk yields commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortPolicy {
    /// Breadth-first discovery order from the start points, parents in
    /// parent order.
    #[default]
    None,
    /// Newest committer time first among the commits discovered so far.
    /// Ties keep discovery order.
    Time,
    /// No commit is yielded before all of its reachable children.
    Topological,
}

/// A sort policy plus a reverse flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    pub policy: SortPolicy,
    pub reverse: bool,
}

impl Sorting {
    pub fn new(policy: SortPolicy) -> Self {
        Self {
            policy,
            reverse: false,
        }
    }

    /// The same policy, yielded back to front.
    pub fn reversed(mut self) -> Self {
        self.reverse = !self.reverse;
        self
    }

    fn streams(&self) -> bool {
        !self.reverse && self.policy != SortPolicy::Topological
    }
}

impl From<SortPolicy> for Sorting {
    fn from(policy: SortPolicy) -> Self {
        Self::new(policy)
    }
}

/// A commit waiting in the time-ordered frontier.
struct Queued {
    time: i64,
    seq: u64,
    id: ObjectId,
    commit: Commit,
}

impl Queued {
    fn new(id: ObjectId, commit: Commit, seq: u64) -> Self {
        Self {
            time: commit.time(),
            seq,
            id,
            commit,
        }
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: newest first, then earliest discovered.
        self.time.cmp(&other.time).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

enum Frontier {
    Queue(VecDeque<ObjectId>),
    Heap(BinaryHeap<Queued>),
    Prepared(std::vec::IntoIter<(ObjectId, Commit)>),
}

/// Walks commits reachable from a set of start points.
///
/// Yields `(id, commit)` pairs, each commit once. A store failure or a
/// parent link that does not name a commit is yielded once as an error,
/// after the commits already reached, and then the walk ends.
pub struct RevWalk<'s> {
    store: &'s dyn ObjectStore,
    starts: Vec<ObjectId>,
    sorting: Sorting,
    seen: HashSet<ObjectId>,
    frontier: Option<Frontier>,
    deferred: Option<WalkError>,
    seq: u64,
    exhausted: bool,
}

impl<'s> RevWalk<'s> {
    /// Create a walker with no start points and [`SortPolicy::None`].
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self {
            store,
            starts: Vec::new(),
            sorting: Sorting::default(),
            seen: HashSet::new(),
            frontier: None,
            deferred: None,
            seq: 0,
            exhausted: false,
        }
    }

    /// Add a start point. The object must be a commit.
    pub fn push(&mut self, id: ObjectId) -> WalkResult<()> {
        read_commit(self.store, &id)?;
        if !self.starts.contains(&id) {
            self.starts.push(id);
        }
        Ok(())
    }

    /// Select the yield order.
    pub fn set_sorting(&mut self, sorting: impl Into<Sorting>) {
        self.sorting = sorting.into();
    }

    /// Current sorting.
    pub fn sorting(&self) -> Sorting {
        self.sorting
    }

    fn start(&mut self) -> WalkResult<Frontier> {
        self.seen = self.starts.iter().copied().collect();
        let frontier = match self.sorting.policy {
            SortPolicy::Time => {
                let mut heap = BinaryHeap::new();
                for id in &self.starts {
                    let commit = read_commit(self.store, id)?;
                    self.seq += 1;
                    heap.push(Queued::new(*id, commit, self.seq));
                }
                Frontier::Heap(heap)
            }
            SortPolicy::None | SortPolicy::Topological => {
                Frontier::Queue(self.starts.iter().copied().collect())
            }
        };
        if self.sorting.streams() {
            debug!(starts = self.starts.len(), sorting = ?self.sorting, "walk streaming");
            return Ok(frontier);
        }

        self.frontier = Some(frontier);
        let mut commits = Vec::new();
        while self.deferred.is_none() {
            match self.step() {
                Some(item) => commits.push(item?),
                None => break,
            }
        }
        if let Some(e) = self.deferred.take() {
            return Err(e);
        }
        if self.sorting.policy == SortPolicy::Topological {
            commits = topological(commits);
        }
        if self.sorting.reverse {
            commits.reverse();
        }
        debug!(
            starts = self.starts.len(),
            commits = commits.len(),
            sorting = ?self.sorting,
            "walk prepared"
        );
        Ok(Frontier::Prepared(commits.into_iter()))
    }

    /// Take one commit off the frontier and enqueue its unseen parents.
    fn step(&mut self) -> Option<WalkResult<(ObjectId, Commit)>> {
        let store = self.store;
        match self.frontier.as_mut()? {
            Frontier::Queue(queue) => {
                let id = queue.pop_front()?;
                let commit = match read_commit(store, &id) {
                    Ok(commit) => commit,
                    Err(e) => return Some(Err(e)),
                };
                for parent in &commit.parents {
                    if self.seen.insert(*parent) {
                        queue.push_back(*parent);
                    }
                }
                Some(Ok((id, commit)))
            }
            Frontier::Heap(heap) => {
                let Queued { id, commit, .. } = heap.pop()?;
                for parent in &commit.parents {
                    if !self.seen.insert(*parent) {
                        continue;
                    }
                    match read_commit(store, parent) {
                        Ok(parent_commit) => {
                            self.seq += 1;
                            heap.push(Queued::new(*parent, parent_commit, self.seq));
                        }
                        Err(e) => {
                            self.deferred = Some(e);
                            break;
                        }
                    }
                }
                Some(Ok((id, commit)))
            }
            Frontier::Prepared(commits) => commits.next().map(Ok),
        }
    }
}

impl Iterator for RevWalk<'_> {
    type Item = WalkResult<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if let Some(e) = self.deferred.take() {
            self.exhausted = true;
            return Some(Err(e));
        }
        if self.frontier.is_none() {
            match self.start() {
                Ok(frontier) => self.frontier = Some(frontier),
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
        let item = self.step();
        if matches!(item, Some(Err(_))) {
            self.exhausted = true;
        }
        item
    }
}

impl fmt::Debug for RevWalk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevWalk")
            .field("starts", &self.starts)
            .field("sorting", &self.sorting)
            .field("started", &self.frontier.is_some())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

fn read_commit(store: &dyn ObjectStore, id: &ObjectId) -> WalkResult<Commit> {
    let obj = store.read_existing(id)?;
    if obj.kind != ObjectKind::Commit {
        return Err(WalkError::NotACommit {
            id: *id,
            kind: obj.kind,
        });
    }
    Ok(Commit::from_stored_object(&obj)?)
}

/// Kahn's algorithm over child edges: a commit becomes ready once every
/// reachable child has been emitted.
fn topological(discovered: Vec<(ObjectId, Commit)>) -> Vec<(ObjectId, Commit)> {
    let mut pending_children: HashMap<ObjectId, usize> =
        discovered.iter().map(|(id, _)| (*id, 0)).collect();
    for (_, commit) in &discovered {
        for parent in &commit.parents {
            if let Some(count) = pending_children.get_mut(parent) {
                *count += 1;
            }
        }
    }

    let mut tips: Vec<&(ObjectId, Commit)> = discovered
        .iter()
        .filter(|(id, _)| pending_children.get(id) == Some(&0))
        .collect();
    tips.sort_by(|(_, a), (_, b)| b.time().cmp(&a.time()));
    let mut queue: VecDeque<ObjectId> = tips.into_iter().map(|(id, _)| *id).collect();

    let mut by_id: HashMap<ObjectId, Commit> = discovered.into_iter().collect();
    let mut out = Vec::with_capacity(by_id.len());

    while let Some(id) = queue.pop_front() {
        let Some(commit) = by_id.remove(&id) else {
            continue;
        };
        for parent in &commit.parents {
            if let Some(count) = pending_children.get_mut(parent) {
                *count -= 1;
                if *count == 0 {
                    queue.push_back(*parent);
                }
            }
        }
        out.push((id, commit));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_store::{InMemoryObjectStore, Signature, StoreError, Tree};

    fn commit(store: &InMemoryObjectStore, parents: &[ObjectId], time: i64, msg: &str) -> ObjectId {
        let tree = store.write(&Tree::empty().to_stored_object().unwrap()).unwrap();
        let c = Commit::new(
            tree,
            parents.to_vec(),
            Signature::new("Test", "test@example.com", time),
            msg,
        );
        store.write(&c.to_stored_object().unwrap()).unwrap()
    }

    fn messages(walk: RevWalk<'_>) -> Vec<String> {
        walk.map(|r| r.unwrap().1.message).collect()
    }

    /// root(1) <- a(2), b(3) <- merge(4, [a, b])
    fn diamond(store: &InMemoryObjectStore) -> ObjectId {
        let root = commit(store, &[], 1, "root");
        let a = commit(store, &[root], 2, "a");
        let b = commit(store, &[root], 3, "b");
        commit(store, &[a, b], 4, "merge")
    }

    fn walk_from<'s>(store: &'s InMemoryObjectStore, start: ObjectId, sorting: impl Into<Sorting>) -> RevWalk<'s> {
        let mut walk = RevWalk::new(store);
        walk.push(start).unwrap();
        walk.set_sorting(sorting);
        walk
    }

    // ---------------------------------------------------------------
    // Ordering
    // ---------------------------------------------------------------

    #[test]
    fn unsorted_walk_is_breadth_first() {
        let store = InMemoryObjectStore::new();
        let tip = diamond(&store);
        assert_eq!(messages(walk_from(&store, tip, SortPolicy::None)), ["merge", "a", "b", "root"]);
    }

    #[test]
    fn time_walk_is_newest_first() {
        let store = InMemoryObjectStore::new();
        let tip = diamond(&store);
        assert_eq!(messages(walk_from(&store, tip, SortPolicy::Time)), ["merge", "b", "a", "root"]);
    }

    #[test]
    fn skewed_parent_never_precedes_child() {
        let store = InMemoryObjectStore::new();
        let old_parent = commit(&store, &[], 100, "parent");
        let skewed = commit(&store, &[old_parent], 5, "child");

        assert_eq!(messages(walk_from(&store, skewed, SortPolicy::Time)), ["child", "parent"]);
        assert_eq!(messages(walk_from(&store, skewed, SortPolicy::Topological)), ["child", "parent"]);
    }

    #[test]
    fn topological_never_yields_parent_before_child() {
        let store = InMemoryObjectStore::new();
        let root = commit(&store, &[], 50, "root");
        let a = commit(&store, &[root], 10, "a");
        let b = commit(&store, &[a], 40, "b");
        let c = commit(&store, &[root], 30, "c");
        let tip = commit(&store, &[b, c], 20, "tip");

        let order: Vec<(ObjectId, Commit)> = walk_from(&store, tip, SortPolicy::Topological)
            .map(Result::unwrap)
            .collect();
        let position: HashMap<ObjectId, usize> =
            order.iter().enumerate().map(|(i, (id, _))| (*id, i)).collect();
        for (id, commit) in &order {
            for parent in &commit.parents {
                assert!(position[id] < position[parent]);
            }
        }
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn reverse_flips_order() {
        let store = InMemoryObjectStore::new();
        let tip = diamond(&store);
        let sorting = Sorting::new(SortPolicy::Topological).reversed();
        assert_eq!(messages(walk_from(&store, tip, sorting)), ["root", "b", "a", "merge"]);
    }

    // ---------------------------------------------------------------
    // Start points
    // ---------------------------------------------------------------

    #[test]
    fn shared_history_is_yielded_once() {
        let store = InMemoryObjectStore::new();
        let root = commit(&store, &[], 1, "root");
        let left = commit(&store, &[root], 2, "left");
        let right = commit(&store, &[root], 3, "right");

        let mut walk = RevWalk::new(&store);
        walk.push(left).unwrap();
        walk.push(right).unwrap();
        walk.push(left).unwrap();
        assert_eq!(messages(walk), ["left", "right", "root"]);
    }

    #[test]
    fn walk_without_start_is_empty() {
        let store = InMemoryObjectStore::new();
        assert_eq!(RevWalk::new(&store).count(), 0);
    }

    #[test]
    fn push_rejects_non_commit() {
        let store = InMemoryObjectStore::new();
        let blob = store.write_blob(b"data", None).unwrap();
        let err = RevWalk::new(&store).push(blob).unwrap_err();
        assert!(matches!(err, WalkError::NotACommit { kind: ObjectKind::Blob, .. }));
    }

    #[test]
    fn missing_parent_is_reported_once() {
        let store = InMemoryObjectStore::new();
        let ghost = ObjectId::from_bytes(b"ghost");
        let tip = commit(&store, &[ghost], 1, "orphan");

        for policy in [SortPolicy::None, SortPolicy::Time] {
            let mut walk = walk_from(&store, tip, policy);
            assert_eq!(walk.next().unwrap().unwrap().0, tip);
            let err = walk.next().unwrap();
            assert!(matches!(err, Err(WalkError::Store(StoreError::NotFound(id))) if id == ghost));
            assert!(walk.next().is_none());
        }
    }

    #[test]
    fn prepared_walk_reports_missing_parent_first() {
        let store = InMemoryObjectStore::new();
        let ghost = ObjectId::from_bytes(b"ghost");
        let tip = commit(&store, &[ghost], 1, "orphan");

        let mut walk = walk_from(&store, tip, SortPolicy::Topological);
        assert!(matches!(walk.next(), Some(Err(WalkError::Store(StoreError::NotFound(_))))));
        assert!(walk.next().is_none());
    }

    // ---------------------------------------------------------------
    // Streaming
    // ---------------------------------------------------------------

    /// A linear chain of `len` commits whose root names a missing parent.
    fn broken_chain(store: &InMemoryObjectStore, len: i64) -> ObjectId {
        let mut id = commit(store, &[ObjectId::from_bytes(b"gone")], 1, "c1");
        for n in 2..=len {
            id = commit(store, &[id], n, &format!("c{n}"));
        }
        id
    }

    #[test]
    fn streaming_walk_yields_before_reaching_damage() {
        let store = InMemoryObjectStore::new();
        let tip = broken_chain(&store, 50);

        for policy in [SortPolicy::None, SortPolicy::Time] {
            let mut walk = walk_from(&store, tip, policy);
            let (first, commit) = walk.next().unwrap().unwrap();
            assert_eq!(first, tip);
            assert_eq!(commit.message, "c50");

            let rest: Vec<_> = walk.collect();
            assert_eq!(rest.len(), 50);
            assert!(rest[..49].iter().all(Result::is_ok));
            assert!(rest[49].is_err());
        }
    }

    #[test]
    fn time_walk_interleaves_branches() {
        let store = InMemoryObjectStore::new();
        let root = commit(&store, &[], 1, "root");
        let a1 = commit(&store, &[root], 2, "a1");
        let b1 = commit(&store, &[root], 3, "b1");
        let a2 = commit(&store, &[a1], 4, "a2");
        let b2 = commit(&store, &[b1], 5, "b2");

        let mut walk = RevWalk::new(&store);
        walk.push(a2).unwrap();
        walk.push(b2).unwrap();
        walk.set_sorting(SortPolicy::Time);
        assert_eq!(messages(walk), ["b2", "a2", "b1", "a1", "root"]);
    }

    #[test]
    fn debug_shows_starts_and_sorting() {
        let store = InMemoryObjectStore::new();
        let tip = diamond(&store);
        let walk = walk_from(&store, tip, Sorting::new(SortPolicy::Time).reversed());
        let shown = format!("{walk:?}");
        assert!(shown.contains("RevWalk"));
        assert!(shown.contains("Time"));
        assert!(shown.contains("reverse: true"));
        assert!(shown.contains("started: false"));
    }
}
