use serde_json::Value;
use thiserror::Error;

use super::BlogEntry;

/// Default cap on the merged collection size.
pub const DEFAULT_MAX_ENTRIES: usize = 10;

/// Anything carrying a numeric collection identifier.
///
/// Implemented for typed [`BlogEntry`] values and for untyped JSON records
/// loaded from disk, so freshly parsed entries and stored posts can share
/// one numbering scheme.
pub trait Identified {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

impl Identified for BlogEntry {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// A stored record without a non-negative integer `id` counts as `0`.
impl Identified for Value {
    fn id(&self) -> u64 {
        self.get("id").and_then(Value::as_u64).unwrap_or(0)
    }

    fn set_id(&mut self, id: u64) {
        if let Value::Object(map) = self {
            map.insert("id".to_string(), Value::from(id));
        }
    }
}

/// The stored ids leave no room to number the new entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot number {count} new entries after existing id {max_id}: ids would exceed {}", u64::MAX)]
pub struct IdOverflow {
    pub max_id: u64,
    pub count: usize,
}

/// Numbers `new` sequentially after the highest id in `existing`.
///
/// With an empty `existing` collection the new ids are left untouched. On
/// [`IdOverflow`] no id is changed.
pub fn assign_ids<E, N>(existing: &[E], new: &mut [N]) -> Result<(), IdOverflow>
where
    E: Identified,
    N: Identified,
{
    let Some(max_id) = existing.iter().map(Identified::id).max() else {
        return Ok(());
    };
    u64::try_from(new.len())
        .ok()
        .and_then(|count| max_id.checked_add(count))
        .ok_or(IdOverflow {
            max_id,
            count: new.len(),
        })?;

    let mut next_id = max_id;
    for entry in new.iter_mut() {
        next_id += 1;
        entry.set_id(next_id);
    }
    Ok(())
}

/// Puts `new` ahead of `existing` and keeps the first `max_entries` records.
///
/// The cut is a plain prefix of `new ++ existing`: the oldest stored records
/// go first, and if `new` alone exceeds the cap its tail is dropped too.
pub fn combine<T>(new: Vec<T>, existing: Vec<T>, max_entries: usize) -> Vec<T> {
    let mut all = new;
    all.extend(existing);
    all.truncate(max_entries);
    all
}

/// [`assign_ids`] followed by [`combine`]. No deduplication is attempted:
/// merging the same feed twice yields two copies with distinct ids.
pub fn merge<T: Identified>(
    existing: Vec<T>,
    mut new: Vec<T>,
    max_entries: usize,
) -> Result<Vec<T>, IdOverflow> {
    assign_ids(&existing, &mut new)?;
    Ok(combine(new, existing, max_entries))
}
