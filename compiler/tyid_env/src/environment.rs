//! The identity environment: canonical instances by hash, ids by reference.
//!
//! Check-then-insert under one mutex: the hash map, the id map, and the id
//! counter always move together.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tyid_types::{Named, Type, INSTANCE_MARKER};

use crate::error::EnvError;
use crate::hasher::{CanonicalHasher, TypeHasher};

/// Map key comparing a named type by reference.
///
/// The key owns a clone of the `Arc`, so the allocation cannot be freed and
/// its address reused while the environment remembers it.
struct InstanceKey(Arc<Named>);

impl PartialEq for InstanceKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for InstanceKey {}

impl Hash for InstanceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

/// Everything the lock guards.
struct EnvState {
    /// Type hash -> canonical instance. Entries are never replaced or removed.
    canonical: FxHashMap<Box<str>, Arc<Named>>,
    /// Reference -> assigned id.
    ids: FxHashMap<InstanceKey, u32>,
    /// Next id to hand out.
    next_id: u32,
}

/// Type identity environment.
///
/// Deduplicates identical type instances and assigns stable ids to named
/// types. Multiple environments are fully isolated from each other.
///
/// # Thread Safety
/// All operations take one `Mutex` for a short, bounded critical section.
/// [`Environment::type_hash`] does not hold it while traversing a type.
pub struct Environment {
    state: Mutex<EnvState>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty environment with room for `capacity` canonical
    /// instances and ids before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        tracing::debug!(capacity, "creating type identity environment");
        Self {
            state: Mutex::new(EnvState {
                canonical: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                next_id: 0,
            }),
        }
    }

    /// Compute the exact type hash of `ty` with the default hasher.
    ///
    /// Identical types produce identical strings and different types produce
    /// different strings. If `ty` is a named type and `targs` is not empty,
    /// the hash is that of `ty`'s origin instantiated with `targs`, whatever
    /// arguments `ty` itself carries. This lets callers look up an instance
    /// before building it.
    ///
    /// # Panics
    /// Panics if `targs` is non-empty and `ty` is not a named type, or (in
    /// verification builds) if the hash contains
    /// [`INSTANCE_MARKER`](tyid_types::INSTANCE_MARKER).
    pub fn type_hash(&self, ty: &Type, targs: &[Type]) -> String {
        self.type_hash_with::<CanonicalHasher<'_>>(ty, targs)
    }

    /// Compute a type hash with a caller-chosen hasher.
    ///
    /// Same contract as [`Environment::type_hash`].
    #[tracing::instrument(level = "trace", skip_all, fields(targs = targs.len()))]
    pub fn type_hash_with<'env, H: TypeHasher<'env>>(
        &'env self,
        ty: &Type,
        targs: &[Type],
    ) -> String {
        let mut h = H::new(String::new(), self);
        match ty {
            Type::Named(named) if !targs.is_empty() => {
                // The provided targs replace any the named type already has.
                h.write_prefix(named);
                h.write_type_name(named);
                h.write_type_list(targs);
            }
            _ => {
                assert!(
                    targs.is_empty(),
                    "type arguments supplied for a type that is not named: {ty:?}"
                );
                h.write_type(ty);
            }
        }
        let hash = h.finish();

        if cfg!(any(debug_assertions, feature = "verify-hashes")) {
            verify_hash(&hash);
        }

        hash
    }

    /// Return the canonical instance recorded for `hash`.
    ///
    /// If nothing is recorded and `candidate` is given, `candidate` becomes
    /// canonical for `hash` and is returned. If something is recorded,
    /// `candidate` is dropped unpublished. With neither, returns `None`
    /// without creating an entry.
    pub fn type_for_hash(
        &self,
        hash: &str,
        candidate: Option<Arc<Named>>,
    ) -> Option<Arc<Named>> {
        match candidate {
            Some(candidate) => Some(self.publish(hash, candidate)),
            None => self.state.lock().canonical.get(hash).cloned(),
        }
    }

    /// Check-and-set: the first candidate published for a hash wins.
    fn publish(&self, hash: &str, candidate: Arc<Named>) -> Arc<Named> {
        let mut state = self.state.lock();
        if let Some(existing) = state.canonical.get(hash) {
            if !Arc::ptr_eq(existing, &candidate) {
                tracing::trace!(hash, "candidate discarded for existing canonical instance");
            }
            return Arc::clone(existing);
        }
        state.canonical.insert(hash.into(), Arc::clone(&candidate));
        tracing::trace!(hash, "published canonical instance");
        candidate
    }

    /// Try to get the id of the reference `named`, assigning the next one if
    /// it has not been seen.
    ///
    /// Ids start at 0 and follow first-seen order without gaps. Ids follow
    /// reference identity: two structurally identical but distinct `Arc`s get
    /// different ids.
    pub fn try_id_for(&self, named: &Arc<Named>) -> Result<u32, EnvError> {
        let mut state = self.state.lock();
        let key = InstanceKey(Arc::clone(named));
        if let Some(&id) = state.ids.get(&key) {
            return Ok(id);
        }

        let id = state.next_id;
        state.next_id = id.checked_add(1).ok_or(EnvError::IdOverflow {
            assigned: u64::from(id),
        })?;
        state.ids.insert(key, id);
        tracing::trace!(id, name = ?named.obj(), "assigned instance id");
        Ok(id)
    }

    /// Get the id of the reference `named`, assigning the next one if it has
    /// not been seen.
    ///
    /// # Panics
    /// Panics once the `u32` id space is exhausted. Use `try_id_for` to
    /// handle that case.
    pub fn id_for(&self, named: &Arc<Named>) -> u32 {
        self.try_id_for(named).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Get the canonical instance of `origin` applied to `targs`.
    ///
    /// Only builds a new `Named` when no canonical instance exists yet; when
    /// two threads race, both receive the one that was published first.
    ///
    /// # Panics
    /// Panics if `targs` is empty or its length differs from the number of
    /// type parameters of `origin`'s declaration.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(name = ?origin.obj(), targs = targs.len())
    )]
    pub fn instance(&self, origin: &Arc<Named>, targs: Vec<Type>) -> Arc<Named> {
        let origin = origin.origin();
        assert!(
            !targs.is_empty(),
            "instance of `{:?}` requires type arguments",
            origin.obj()
        );
        assert_eq!(
            targs.len(),
            origin.type_params().len(),
            "wrong number of type arguments for `{:?}`",
            origin.obj()
        );

        let hash = self.type_hash(&Type::named(origin), &targs);
        if let Some(existing) = self.type_for_hash(&hash, None) {
            return existing;
        }
        self.publish(&hash, Named::instance(origin, targs))
    }

    /// Number of hashes with a canonical instance.
    pub fn canonical_count(&self) -> usize {
        self.state.lock().canonical.len()
    }

    /// Number of ids handed out so far.
    pub fn id_count(&self) -> usize {
        self.state.lock().ids.len()
    }
}

/// Panics if `hash` contains the printer's reserved instance marker.
#[track_caller]
fn verify_hash(hash: &str) {
    if let Some(pos) = hash.bytes().position(|b| b == INSTANCE_MARKER) {
        panic!("type hash {hash:?} contains the reserved instance marker at byte {pos}");
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Environment")
            .field("canonical", &state.canonical.len())
            .field("ids", &state.ids.len())
            .finish()
    }
}

/// Shared environment for use across threads and checker phases.
///
/// A clonable handle: every clone sees the same deduplication and id space.
#[derive(Clone, Default)]
pub struct SharedEnvironment(Arc<Environment>);

impl SharedEnvironment {
    /// Create a new shared environment.
    pub fn new() -> Self {
        SharedEnvironment(Arc::new(Environment::new()))
    }
}

impl fmt::Debug for SharedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedEnvironment").field(&*self.0).finish()
    }
}

impl std::ops::Deref for SharedEnvironment {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
