//! Static metadata about entity fields, and introspection of Sea-ORM entities
//! into that metadata.

use sea_orm::{
    ColumnTrait, ColumnType, EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn,
};

/// Primitive kind of a field, as far as filtering cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    String,
    Symbol,
    ObjectId,
    Array(Box<FieldKind>),
    Integer,
    Boolean,
    Float,
    Date,
    Time,
    DateTime,
    /// A column kind no operator applies to (JSON, binary, ...).
    Other,
}

impl FieldKind {
    /// Map a Sea-ORM column type onto a field kind.
    ///
    /// Primary keys are not detected here; see [`describe_entity`].
    #[must_use]
    pub fn from_column_type(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Self::String,
            ColumnType::Enum { .. } => Self::Symbol,
            ColumnType::Uuid => Self::ObjectId,
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => Self::Integer,
            ColumnType::Float
            | ColumnType::Double
            | ColumnType::Decimal(_)
            | ColumnType::Money(_) => Self::Float,
            ColumnType::Boolean => Self::Boolean,
            ColumnType::Date => Self::Date,
            ColumnType::Time => Self::Time,
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
                Self::DateTime
            }
            ColumnType::Array(element) => Self::Array(Box::new(Self::from_column_type(element))),
            _ => Self::Other,
        }
    }

    /// String-like kinds compared as text.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Symbol | Self::ObjectId)
    }

    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime)
    }
}

/// One entity field as seen by the filter compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub filterable: bool,
    /// Free-text fields only get the `_has` operator.
    pub is_text: bool,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            filterable: false,
            is_text: false,
        }
    }

    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    #[must_use]
    pub fn text(mut self) -> Self {
        self.is_text = true;
        self
    }
}

/// Describe every column of `E`, in declaration order.
///
/// Primary key columns become [`FieldKind::Id`]. A column is filterable when
/// its name is listed in `filterable`, and a text field when listed in `text`.
#[must_use]
pub fn describe_entity<E: EntityTrait>(filterable: &[&str], text: &[&str]) -> Vec<FieldDescriptor> {
    let primary_keys: Vec<String> = E::PrimaryKey::iter()
        .map(|key| key.into_column().as_str().to_string())
        .collect();

    E::Column::iter()
        .map(|column| {
            let name = column.as_str();
            let kind = if primary_keys.iter().any(|key| key == name) {
                FieldKind::Id
            } else {
                FieldKind::from_column_type(column.def().get_column_type())
            };
            FieldDescriptor {
                name: name.to_string(),
                kind,
                filterable: filterable.contains(&name),
                is_text: text.contains(&name),
            }
        })
        .collect()
}

/// Names of every column of `E`, in declaration order.
#[must_use]
pub fn entity_columns<E: EntityTrait>() -> Vec<String> {
    E::Column::iter()
        .map(|column| column.as_str().to_string())
        .collect()
}
