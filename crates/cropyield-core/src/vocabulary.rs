//! Closed crop vocabulary and the synonym table that feeds it.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

pub const DEFAULT_CROPS: [&str; 4] = ["rice", "maize", "wheat", "groundnut"];

pub const DEFAULT_SYNONYMS: [(&str, &str); 3] =
    [("paddy", "rice"), ("corn", "maize"), ("ground nut", "groundnut")];

/// Ordered canonical crop names. A crop's code is its position and never
/// changes once the vocabulary is built.
#[derive(Debug, Clone)]
pub struct CropVocabulary {
    names: Vec<String>,
    codes: HashMap<String, usize>,
}

impl CropVocabulary {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut codes = HashMap::new();
        for raw in names {
            let name = raw.as_ref().trim().to_lowercase();
            if name.is_empty() {
                return Err(Error::InvalidConfig("crop names must not be blank".into()));
            }
            if codes.contains_key(&name) {
                return Err(Error::InvalidConfig(format!("duplicate crop '{name}'")));
            }
            codes.insert(name.clone(), ordered.len());
            ordered.push(name);
        }
        if ordered.is_empty() {
            return Err(Error::InvalidConfig("crop vocabulary is empty".into()));
        }
        Ok(Self { names: ordered, codes })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn code_of(&self, name: &str) -> Option<usize> {
        self.codes.get(name).copied()
    }

    pub fn name_of(&self, code: usize) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CropVocabulary {
    fn default() -> Self {
        let names: Vec<String> = DEFAULT_CROPS.iter().map(|s| s.to_string()).collect();
        let codes = names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect();
        Self { names, codes }
    }
}

/// Known alternate spellings, keyed by lowercased text.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<String, String>,
}

impl SynonymTable {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.as_ref().trim().to_lowercase()))
            .collect();
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(DEFAULT_SYNONYMS)
    }

    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.entries.get(text).map(String::as_str)
    }

    /// Replace `text` by its canonical spelling when it is a known synonym.
    pub fn substitute<'a>(&'a self, text: &'a str) -> &'a str {
        self.lookup(text).unwrap_or(text)
    }

    /// Every synonym must point at a crop the vocabulary actually knows.
    pub fn validate_against(&self, vocabulary: &CropVocabulary) -> Result<()> {
        let mut dangling: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, target)| !vocabulary.contains(target))
            .map(|(alias, target)| format!("{alias} -> {target}"))
            .collect();
        if dangling.is_empty() {
            return Ok(());
        }
        dangling.sort();
        Err(Error::InvalidConfig(format!(
            "synonyms point outside the crop vocabulary: {}",
            dangling.join(", ")
        )))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Vocabulary plus synonyms, checked against each other once at startup.
#[derive(Debug, Clone)]
pub struct CropCatalog {
    vocabulary: CropVocabulary,
    synonyms: SynonymTable,
}

impl CropCatalog {
    pub fn new(vocabulary: CropVocabulary, synonyms: SynonymTable) -> Result<Self> {
        synonyms.validate_against(&vocabulary)?;
        tracing::debug!(crops = vocabulary.len(), synonyms = synonyms.len(), "crop catalog ready");
        Ok(Self { vocabulary, synonyms })
    }

    pub fn from_lists(crops: &[String], synonyms: &BTreeMap<String, String>) -> Result<Self> {
        Self::new(CropVocabulary::new(crops)?, SynonymTable::new(synonyms))
    }

    pub fn vocabulary(&self) -> &CropVocabulary {
        &self.vocabulary
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self { vocabulary: CropVocabulary::default(), synonyms: SynonymTable::builtin() }
    }
}
