//! Per-compilation string interner.
//!
//! Every identifier, type name and string literal seen while compiling one
//! shader lives here. Interning the same text twice yields the same [`Name`]
//! backed by the same `Rc<str>` allocation, so identity checks are pointer
//! comparisons. Two interners never share storage.
//!
//! Each entry carries a DJB hash, computed on first request and cached. The
//! validator derives stable uniform and varying aliases from it, so the hash
//! must agree between the vertex and fragment compilations of one program.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::Name;

struct Entry {
    text: Rc<str>,
    hash: OnceCell<u32>,
}

impl Entry {
    fn new(text: Rc<str>) -> Self {
        Entry {
            text,
            hash: OnceCell::new(),
        }
    }
}

/// String interner owned by a single compilation context.
pub struct StringInterner {
    map: FxHashMap<Rc<str>, Name>,
    entries: Vec<Entry>,
}

impl StringInterner {
    /// Create an interner holding only the empty string.
    pub fn new() -> Self {
        let empty: Rc<str> = Rc::from("");
        let mut map = FxHashMap::default();
        map.insert(Rc::clone(&empty), Name::EMPTY);
        StringInterner {
            map,
            entries: vec![Entry::new(empty)],
        }
    }

    /// Look up `text`, copying it into the interner on first sight.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned; the
    /// source size limit makes that unreachable.
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&name) = self.map.get(text) {
            return name;
        }
        self.insert(Rc::from(text))
    }

    /// Intern an owned string without copying it a second time.
    pub fn intern_owned(&mut self, text: String) -> Name {
        if let Some(&name) = self.map.get(text.as_str()) {
            return name;
        }
        self.insert(Rc::from(text))
    }

    fn insert(&mut self, text: Rc<str>) -> Name {
        let raw = u32::try_from(self.entries.len())
            .unwrap_or_else(|_| panic!("string interner exceeded u32::MAX entries"));
        let name = Name::from_raw(raw);
        self.map.insert(Rc::clone(&text), name);
        self.entries.push(Entry::new(text));
        name
    }

    /// Concatenate two interned strings into a new entry.
    pub fn append(&mut self, a: Name, b: Name) -> Name {
        let mut text = String::with_capacity(self.lookup(a).len() + self.lookup(b).len());
        text.push_str(self.lookup(a));
        text.push_str(self.lookup(b));
        self.intern_owned(text)
    }

    /// Text of an interned name.
    ///
    /// A name from another interner is an invariant violation; release builds
    /// answer with the empty string.
    #[inline]
    pub fn lookup(&self, name: Name) -> &str {
        &self.storage(name)[..]
    }

    /// Shared storage of an interned name.
    pub fn storage(&self, name: Name) -> &Rc<str> {
        debug_assert!(name.index() < self.entries.len(), "foreign name {name:?}");
        match self.entries.get(name.index()) {
            Some(entry) => &entry.text,
            None => &self.entries[0].text,
        }
    }

    /// Find an already interned string without adding it.
    pub fn get(&self, text: &str) -> Option<Name> {
        self.map.get(text).copied()
    }

    /// DJB hash of the name's text, cached after the first call.
    pub fn hash(&self, name: Name) -> u32 {
        match self.entries.get(name.index()) {
            Some(entry) => *entry.hash.get_or_init(|| djb_hash(&entry.text)),
            None => djb_hash(""),
        }
    }

    /// Compare an interned name with plain text.
    #[inline]
    pub fn equals(&self, name: Name, text: &str) -> bool {
        self.lookup(name) == text
    }

    /// Compare two names by storage identity.
    #[inline]
    pub fn equals_name(&self, a: Name, b: Name) -> bool {
        Rc::ptr_eq(self.storage(a), self.storage(b))
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Bernstein hash (`h * 33 + c`, seeded with 5381) over the UTF-8 bytes.
pub fn djb_hash(text: &str) -> u32 {
    text.bytes().fold(5381u32, |hash, byte| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u32::from(byte))
    })
}

#[cfg(test)]
mod tests;
