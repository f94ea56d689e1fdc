//! `HashTable` — open-chained, djb2-hashed string→string(optional) table.
//!
//! | Rust                      | C (`mods/hashtable/hashtable.c`) |
//! |----------------------------|-------------------------------------|
//! | `HashTable::new`           | `init_hashtable`                     |
//! | `HashTable::upsert`        | `upsert_entry`                        |
//! | `HashTable::lookup`/`get_def`| `lookup_entry`/`get_def`            |
//! | `HashTable::delete`        | `delete_entry`                        |
//! | `HashTable::htdist`        | `htdist`                              |
//! | `HashTable::persist`       | `write_hashtable`/`write_hashtable_details` |
//! | `HashTable::load_file`     | `load_file_into_ht`                   |
//!
//! The original hand-rolls a bucket array of singly linked chains rather
//! than reaching for a library hash table; this module keeps that shape
//! (`Vec<Vec<Entry>>`, newest entry pushed to the front of its chain) since
//! the hashing/chaining behavior itself is part of what spec.md's testable
//! properties (§8) pin down, not an implementation detail to hide behind
//! `std::collections::HashMap`.

use crate::error::HtError;
use crate::fs_util;
use std::path::Path;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    def: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HashTable {
    buckets: Vec<Vec<Entry>>,
}

impl HashTable {
    pub fn new(num_buckets: usize) -> Self {
        HashTable {
            buckets: vec![Vec::new(); num_buckets.max(1)],
        }
    }

    /// djb2: `h = h*33 ^ byte`, seeded at 5381.
    fn hash(&self, name: &str) -> usize {
        let mut h: usize = 5381;
        for &b in name.as_bytes() {
            h = h.wrapping_mul(33) ^ (b as usize);
        }
        h % self.buckets.len()
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        let h = self.hash(name);
        self.buckets[h]
            .iter()
            .find(|e| e.name == name)
            .map(|_| name)
    }

    pub fn get_def(&self, name: &str) -> Option<Option<&str>> {
        let h = self.hash(name);
        self.buckets[h]
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.def.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Inserts `name` with `def`, or replaces an existing entry's `def`
    /// in place (`upsert_entry`). New entries are linked at the head of
    /// their chain.
    pub fn upsert(&mut self, name: &str, def: Option<&str>) {
        let h = self.hash(name);
        let chain = &mut self.buckets[h];
        if let Some(e) = chain.iter_mut().find(|e| e.name == name) {
            e.def = def.map(str::to_owned);
        } else {
            chain.insert(
                0,
                Entry {
                    name: name.to_owned(),
                    def: def.map(str::to_owned),
                },
            );
        }
    }

    /// Removes `name`. Returns `Err` if it was not present (`delete_entry`
    /// returning 1).
    pub fn delete(&mut self, name: &str) -> Result<(), HtError> {
        let h = self.hash(name);
        let chain = &mut self.buckets[h];
        if let Some(pos) = chain.iter().position(|e| e.name == name) {
            chain.remove(pos);
            Ok(())
        } else {
            Err(HtError::NotFound)
        }
    }

    /// Chain-length histogram, written to stderr (`htdist`).
    pub fn htdist(&self) {
        let mut freq = [0u64; 101];
        for chain in &self.buckets {
            let count = chain.len();
            if count < 100 {
                freq[count] += 1;
            } else {
                freq[100] += 1;
            }
        }
        crate::displaylevel!(3, "entries_per_bucket number_of_buckets\n");
        for (k, &f) in freq.iter().enumerate().take(100) {
            if f != 0 {
                crate::displaylevel!(3, "{k} {f}\n");
            }
        }
        if freq[100] != 0 {
            crate::displaylevel!(3, ">=100 {}\n", freq[100]);
        }
    }

    /// Serializes every entry as `name\0def\0` pairs (empty string for a
    /// `None` def) and atomically writes them to `path` (`write_hashtable`).
    pub fn persist(&self, path: &Path) -> Result<(), HtError> {
        let mut out = Vec::new();
        for chain in &self.buckets {
            for e in chain {
                out.extend_from_slice(e.name.as_bytes());
                out.push(0);
                if let Some(d) = &e.def {
                    out.extend_from_slice(d.as_bytes());
                }
                out.push(0);
            }
        }
        fs_util::atomic_write(path, &out).map_err(|e| match e {
            crate::error::FsError::Io(io) => HtError::Io(io),
        })
    }

    /// Iterates every `(name, def)` pair currently stored, in unspecified
    /// bucket/chain order (used by `dumpdef` when called with no names).
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter())
            .map(|e| (e.name.as_str(), e.def.as_deref()))
    }

    /// Loads `name\0def\0` pairs from `path`, upserting each into `self`
    /// (`load_file_into_ht`). A missing file is treated as empty.
    pub fn load_file(&mut self, path: &Path) -> Result<(), HtError> {
        let mut pairs = Vec::new();
        fs_util::read_pair_file(path, |name, def| {
            pairs.push((
                String::from_utf8_lossy(name).into_owned(),
                String::from_utf8_lossy(def).into_owned(),
            ));
        })
        .map_err(|e| match e {
            crate::error::FsError::Io(io) => HtError::Io(io),
        })?;
        for (name, def) in pairs {
            self.upsert(&name, Some(&def));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_lookup() {
        let mut ht = HashTable::new(16);
        ht.upsert("foo", Some("bar"));
        assert_eq!(ht.get_def("foo"), Some(Some("bar")));
    }

    #[test]
    fn upsert_is_idempotent_on_value() {
        let mut ht = HashTable::new(16);
        ht.upsert("foo", Some("bar"));
        ht.upsert("foo", Some("bar"));
        assert_eq!(ht.get_def("foo"), Some(Some("bar")));
    }

    #[test]
    fn upsert_replaces_existing_def() {
        let mut ht = HashTable::new(16);
        ht.upsert("foo", Some("bar"));
        ht.upsert("foo", Some("baz"));
        assert_eq!(ht.get_def("foo"), Some(Some("baz")));
    }

    #[test]
    fn delete_is_inverse_of_upsert() {
        let mut ht = HashTable::new(16);
        ht.upsert("foo", Some("bar"));
        ht.delete("foo").unwrap();
        assert_eq!(ht.get_def("foo"), None);
    }

    #[test]
    fn delete_missing_is_error() {
        let mut ht = HashTable::new(16);
        assert!(ht.delete("nope").is_err());
    }

    #[test]
    fn persist_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ht");
        let mut ht = HashTable::new(16);
        ht.upsert("a", Some("1"));
        ht.upsert("b", None);
        ht.persist(&path).unwrap();

        let mut loaded = HashTable::new(16);
        loaded.load_file(&path).unwrap();
        assert_eq!(loaded.get_def("a"), Some(Some("1")));
        assert_eq!(loaded.get_def("b"), Some(Some("")));
    }

    #[test]
    fn none_def_round_trips_as_ismacro_but_empty_string() {
        // mirrors seeding built-in macro names with a NULL definition
        let mut ht = HashTable::new(16);
        ht.upsert("define", None);
        assert!(ht.contains("define"));
        assert_eq!(ht.get_def("define"), Some(None));
    }
}
