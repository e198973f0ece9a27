//! Whitelisted sort parameters for `GET /data`.
//!
//! Both enums parse case-insensitively and render a fixed SQL fragment, so
//! caller-supplied text is never interpolated into a query.

use std::fmt;
use std::str::FromStr;

use crate::error::ServiceError;

/// Column the character table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Primary key.
    Id,
    /// JSONB payload.
    Data,
}

impl SortField {
    /// Column name as used in SQL.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Data => "data",
        }
    }
}

impl FromStr for SortField {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("id") {
            Ok(Self::Id)
        } else if s.eq_ignore_ascii_case("data") {
            Ok(Self::Data)
        } else {
            Err(ServiceError::InvalidSortField)
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Keyword as used in SQL.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(ServiceError::InvalidSortOrder)
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A validated field/direction pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    /// Column to order by.
    pub field: SortField,
    /// Direction.
    pub order: SortOrder,
}

impl SortSpec {
    /// Validates raw query values. The order is checked before the field.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidSortOrder`] or
    /// [`ServiceError::InvalidSortField`] for values outside the whitelist.
    pub fn parse(sort_field: &str, sort_order: &str) -> Result<Self, ServiceError> {
        let order = sort_order.parse()?;
        let field = sort_field.parse()?;
        Ok(Self { field, order })
    }

    /// `ORDER BY` clause body, e.g. `id DESC`.
    #[must_use]
    pub fn order_by_clause(&self) -> String {
        format!("{} {}", self.field, self.order)
    }
}
