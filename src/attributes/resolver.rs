use serde::Serialize;
use tracing::{debug, warn};

/// How a region name was matched against a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Name equals a table entry (before or after suffix stripping)
    Exact,
    /// Name equals one of an entry's declared aliases
    Alias,
    /// An entry name is contained in the stripped region name
    Substring,
    /// Nothing matched; the supplied default was used
    Default,
}

/// A resolved value and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<V> {
    pub value: V,
    pub kind: MatchKind,
    pub matched: Option<String>, // Entry name that matched
}

#[derive(Debug, Clone)]
struct Entry<V> {
    name: String,
    aliases: Vec<String>,
    value: V,
}

/// Ordered name -> value lookup with suffix stripping and fallbacks.
///
/// Entries keep their insertion order, which makes the substring fallback
/// deterministic: the first declared entry wins.
#[derive(Debug, Clone)]
pub struct ReferenceTable<V> {
    entries: Vec<Entry<V>>,
    suffixes: Vec<String>,
}

impl<V: Clone> ReferenceTable<V> {
    pub fn new(suffixes: Vec<String>) -> Self {
        Self {
            entries: Vec::new(),
            suffixes,
        }
    }

    pub fn insert(&mut self, name: &str, aliases: &[String], value: V) {
        self.entries.push(Entry {
            name: name.to_string(),
            aliases: aliases.to_vec(),
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `region_name`, falling back to `default`.
    ///
    /// Order: exact entry name, declared alias, first entry name contained
    /// in the stripped region name, then the default. Names are compared
    /// after suffix stripping, so "Fürth, Landkreis" and "Fürth, Stadt" both
    /// resolve to a "Fürth" entry; give the district a distinct canonical
    /// name (and list the table spelling as an alias) to tell them apart.
    pub fn resolve(&self, region_name: &str, default: V) -> Resolved<V> {
        let raw = region_name.trim();
        let clean = strip_suffixes(raw, &self.suffixes);

        if let Some(entry) = self.entries.iter().find(|e| e.name == clean) {
            return self.found(entry, MatchKind::Exact);
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.aliases.iter().any(|a| *a == clean || a == raw))
        {
            return self.found(entry, MatchKind::Alias);
        }

        let contained: Vec<&Entry<V>> = self
            .entries
            .iter()
            .filter(|e| !e.name.is_empty() && clean.contains(e.name.as_str()))
            .collect();

        if let Some(entry) = contained.first() {
            if contained.len() > 1 {
                let names: Vec<&str> = contained.iter().map(|e| e.name.as_str()).collect();
                warn!(
                    region = region_name,
                    chosen = %entry.name,
                    "ambiguous substring match among {:?}; using first declared",
                    names
                );
            } else {
                warn!(
                    region = region_name,
                    matched = %entry.name,
                    "resolved by substring match; add an alias to make it explicit"
                );
            }
            return self.found(entry, MatchKind::Substring);
        }

        debug!(region = region_name, "no reference entry, using default");
        Resolved {
            value: default,
            kind: MatchKind::Default,
            matched: None,
        }
    }

    fn found(&self, entry: &Entry<V>, kind: MatchKind) -> Resolved<V> {
        Resolved {
            value: entry.value.clone(),
            kind,
            matched: Some(entry.name.clone()),
        }
    }
}

/// Remove administrative qualifiers such as ", Stadt" from a region name.
pub fn strip_suffixes(name: &str, suffixes: &[String]) -> String {
    let mut clean = name.to_string();
    for suffix in suffixes.iter().filter(|s| !s.is_empty()) {
        clean = clean.replace(suffix.as_str(), "");
    }
    clean.trim().to_string()
}
