//! Column definition metadata.
//!
//! A [`ColumnDefinition`] carries everything the column compiler needs to emit one
//! column clause: the SQL type with its sizing, nullability, default, key flags,
//! an optional foreign key and an optional `CHECK` expression.
//!
//! Sizing is a sum type ([`TypeSize`]), so a column can never carry both a length
//! and a precision/scale pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a SQL type is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeSize {
    /// Bare type keyword, e.g. `TEXT`
    #[default]
    Plain,
    /// `TYPE(length)`, e.g. `VARCHAR(255)`
    Length(u32),
    /// `TYPE(precision,scale)`, e.g. `DECIMAL(10,2)`
    Scaled { precision: u32, scale: u32 },
}

/// SQL column type: a type keyword plus its sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    /// Type keyword, emitted verbatim (e.g. `VARCHAR`, `TIMESTAMP WITH TIME ZONE`)
    pub name: String,
    pub size: TypeSize,
}

impl ColumnType {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: TypeSize::Plain,
        }
    }

    pub fn sized(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            size: TypeSize::Length(length),
        }
    }

    pub fn scaled(name: impl Into<String>, precision: u32, scale: u32) -> Self {
        Self {
            name: name.into(),
            size: TypeSize::Scaled { precision, scale },
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size {
            TypeSize::Plain => write!(f, "{}", self.name),
            TypeSize::Length(length) => write!(f, "{}({})", self.name, length),
            TypeSize::Scaled { precision, scale } => {
                write!(f, "{}({},{})", self.name, precision, scale)
            }
        }
    }
}

/// `ON DELETE` action of a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[serde(rename = "CASCADE", alias = "cascade")]
    Cascade,
    #[serde(rename = "SET NULL", alias = "set null")]
    SetNull,
    #[serde(rename = "SET DEFAULT", alias = "set default")]
    SetDefault,
    #[serde(rename = "RESTRICT", alias = "restrict")]
    Restrict,
    #[serde(rename = "NO ACTION", alias = "no action")]
    NoAction,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ReferentialAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "CASCADE" => Ok(ReferentialAction::Cascade),
            "SET NULL" => Ok(ReferentialAction::SetNull),
            "SET DEFAULT" => Ok(ReferentialAction::SetDefault),
            "RESTRICT" => Ok(ReferentialAction::Restrict),
            "NO ACTION" => Ok(ReferentialAction::NoAction),
            _ => Err(format!("unknown ON DELETE action '{}'", s)),
        }
    }
}

/// Foreign key target of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub on_delete: Option<ReferentialAction>,
}

/// Column definition metadata
///
/// `nullable` is tri-state on purpose: only an explicit `Some(false)` makes the
/// column `NOT NULL`, absence means nullable.
///
/// `default` and `check` are raw SQL and are emitted verbatim. Callers are
/// responsible for supplying safe literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub column_type: ColumnType,
    pub nullable: Option<bool>,
    pub default: Option<String>,
    pub primary_key: bool,
    pub unique: bool,
    pub references: Option<ForeignKey>,
    pub check: Option<String>,
}

impl ColumnDefinition {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            nullable: None,
            default: None,
            primary_key: false,
            unique: false,
            references: None,
            check: None,
        }
    }

    /// Column of a bare type keyword
    pub fn of_type(name: impl Into<String>) -> Self {
        Self::new(ColumnType::plain(name))
    }

    pub fn text() -> Self {
        Self::of_type("TEXT")
    }

    pub fn varchar(length: u32) -> Self {
        Self::new(ColumnType::sized("VARCHAR", length))
    }

    pub fn char(length: u32) -> Self {
        Self::new(ColumnType::sized("CHAR", length))
    }

    pub fn integer() -> Self {
        Self::of_type("INTEGER")
    }

    pub fn bigint() -> Self {
        Self::of_type("BIGINT")
    }

    pub fn serial() -> Self {
        Self::of_type("SERIAL")
    }

    pub fn bigserial() -> Self {
        Self::of_type("BIGSERIAL")
    }

    pub fn decimal(precision: u32, scale: u32) -> Self {
        Self::new(ColumnType::scaled("DECIMAL", precision, scale))
    }

    pub fn numeric(precision: u32, scale: u32) -> Self {
        Self::new(ColumnType::scaled("NUMERIC", precision, scale))
    }

    pub fn real() -> Self {
        Self::of_type("REAL")
    }

    pub fn double() -> Self {
        Self::of_type("DOUBLE PRECISION")
    }

    pub fn boolean() -> Self {
        Self::of_type("BOOLEAN")
    }

    pub fn date() -> Self {
        Self::of_type("DATE")
    }

    pub fn timestamp() -> Self {
        Self::of_type("TIMESTAMP")
    }

    pub fn timestamptz() -> Self {
        Self::of_type("TIMESTAMP WITH TIME ZONE")
    }

    pub fn time() -> Self {
        Self::of_type("TIME")
    }

    pub fn json() -> Self {
        Self::of_type("JSON")
    }

    pub fn jsonb() -> Self {
        Self::of_type("JSONB")
    }

    /// Array of an unsized item type, e.g. `TEXT[]`
    pub fn array_of(item: &ColumnType) -> Self {
        Self::of_type(format!("{}[]", item))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    /// Foreign key to `table(id)`
    pub fn references(self, table: impl Into<String>) -> Self {
        self.references_column(table, "id")
    }

    pub fn references_column(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
            on_delete: None,
        });
        self
    }

    /// Sets the `ON DELETE` action of the foreign key; no effect without one
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        if let Some(ref mut fk) = self.references {
            fk.on_delete = Some(action);
        }
        self
    }

    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.check = Some(expr.into());
        self
    }

    pub fn is_not_null(&self) -> bool {
        self.nullable == Some(false)
    }
}
