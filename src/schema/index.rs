//! Index definition metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index access method (`USING <method>`)
///
/// Methods PostgreSQL ships with get their own variant; anything else, such as an
/// extension's `ivfflat` or `bloom`, is kept as [`IndexMethod::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndexMethod {
    #[default]
    Btree,
    Hash,
    Gist,
    SpGist,
    Gin,
    Brin,
    /// Lowercased method name of an extension access method
    Other(String),
}

impl IndexMethod {
    pub fn as_sql(&self) -> &str {
        match self {
            IndexMethod::Btree => "btree",
            IndexMethod::Hash => "hash",
            IndexMethod::Gist => "gist",
            IndexMethod::SpGist => "spgist",
            IndexMethod::Gin => "gin",
            IndexMethod::Brin => "brin",
            IndexMethod::Other(name) => name,
        }
    }

    /// Whether the method name is a bare keyword that can be emitted unquoted
    pub fn is_keyword(&self) -> bool {
        let name = self.as_sql();
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }
}

impl From<String> for IndexMethod {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "btree" => IndexMethod::Btree,
            "hash" => IndexMethod::Hash,
            "gist" => IndexMethod::Gist,
            "spgist" => IndexMethod::SpGist,
            "gin" => IndexMethod::Gin,
            "brin" => IndexMethod::Brin,
            other => IndexMethod::Other(other.to_string()),
        }
    }
}

impl From<&str> for IndexMethod {
    fn from(name: &str) -> Self {
        IndexMethod::from(name.to_string())
    }
}

impl From<IndexMethod> for String {
    fn from(method: IndexMethod) -> Self {
        method.as_sql().to_string()
    }
}

impl fmt::Display for IndexMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Index definition metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexDefinition {
    /// Column names, in index key order
    pub columns: Vec<String>,
    /// Explicit index name; `idx_<table>_<columns…>` when absent
    pub name: Option<String>,
    pub method: IndexMethod,
    pub unique: bool,
}

impl IndexDefinition {
    /// B-tree index over `columns`
    pub fn on<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn using(mut self, method: IndexMethod) -> Self {
        self.method = method;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}
