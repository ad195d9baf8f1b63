use std::collections::{HashMap, HashSet};

/// Namespace a logical name is resolved in. The same user-facing name may
/// map to different output identifiers per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Variable,
    Procedure,
    Developer,
}

impl Category {
    fn tag(self) -> &'static str {
        match self {
            Category::Variable => "VARIABLE",
            Category::Procedure => "PROCEDURE",
            Category::Developer => "DEVELOPER",
        }
    }
}

/// Maps user-facing names to output identifiers that are legal in the
/// generated language and collide with neither reserved words nor each
/// other. State is scoped to one generation run.
#[derive(Debug)]
pub struct NameDb {
    reserved: HashSet<String>,
    /// normalized (lowercased name + category) -> resolved identifier.
    db: HashMap<String, String>,
    /// Every identifier handed out so far.
    used: HashSet<String>,
}

impl NameDb {
    pub fn new(reserved_words: &[&str]) -> Self {
        NameDb {
            reserved: reserved_words.iter().map(|w| w.to_string()).collect(),
            db: HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// Forget all resolved names, keeping the reserved-word set.
    pub fn reset(&mut self) {
        self.db.clear();
        self.used.clear();
    }

    /// Resolve a user-facing name to its output identifier. The first call
    /// for a (name, category) pair fixes the identifier; later calls return
    /// the same one. Lookup is case-insensitive on the user-facing name.
    pub fn get_name(&mut self, name: &str, category: Category) -> String {
        let normalized = format!("{}_{}", name.to_lowercase(), category.tag());
        if let Some(existing) = self.db.get(&normalized) {
            return existing.clone();
        }
        let resolved = self.get_distinct_name(name, category);
        self.db.insert(normalized, resolved.clone());
        resolved
    }

    /// Hand out an identifier guaranteed unused so far, without recording a
    /// name mapping. Used for generated temporaries.
    pub fn get_distinct_name(&mut self, name: &str, _category: Category) -> String {
        let base = safe_name(name);
        let mut candidate = base.clone();
        let mut suffix = 2u32;
        while self.used.contains(&candidate) || self.reserved.contains(&candidate) {
            candidate = format!("{}{}", base, suffix);
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Mangle a user-facing name into a legal identifier: whitespace and
/// punctuation become underscores, a leading digit gets a "my_" prefix.
pub fn safe_name(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "my_");
    }
    out
}
