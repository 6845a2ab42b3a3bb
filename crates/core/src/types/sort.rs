//! Sorting for customer listings.
//!
//! The `sort` query parameter is a comma-separated list of field names, each
//! optionally prefixed with `-` for descending order (e.g. `-dob,last_name`).
//! Only the fields in [`SortField::ALL`] are accepted.

use core::fmt;

/// A customer column that listings may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    FirstName,
    LastName,
    Dob,
    Username,
}

impl SortField {
    /// Every sortable field, in the order they are advertised to clients.
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::Dob,
        Self::Username,
    ];

    /// Name used in the query string and as the database column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Dob => "dob",
            Self::Username => "username",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// The default listing order: `id` ascending.
    pub const DEFAULT: Self = Self {
        field: SortField::Id,
        direction: SortDirection::Asc,
    };

    /// Parse a `sort` query parameter.
    ///
    /// `None` or an empty value yields the default order.
    ///
    /// # Errors
    ///
    /// Returns [`SortError`] listing every requested name that is not a
    /// sortable field.
    pub fn parse_list(raw: Option<&str>) -> Result<Vec<Self>, SortError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(vec![Self::DEFAULT]);
        };

        let mut sorts = Vec::new();
        let mut rejected = Vec::new();

        for term in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (direction, name) = term
                .strip_prefix('-')
                .map_or((SortDirection::Asc, term), |rest| (SortDirection::Desc, rest));

            match SortField::from_name(name) {
                Some(field) => sorts.push(Self { field, direction }),
                None => rejected.push(name.to_owned()),
            }
        }

        if !rejected.is_empty() {
            return Err(SortError { rejected });
        }
        if sorts.is_empty() {
            sorts.push(Self::DEFAULT);
        }
        Ok(sorts)
    }

    /// Render back to query-string form (`-dob`, `username`).
    #[must_use]
    pub fn to_query_term(self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.as_str().to_owned(),
            SortDirection::Desc => format!("-{}", self.field.as_str()),
        }
    }
}

/// A `sort` parameter named fields that cannot be sorted by.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Requested sort(s) `{}` is not allowed. Allowed sort(s) are `{}`.",
    .rejected.join(", "),
    allowed_sorts()
)]
pub struct SortError {
    /// The offending names, as supplied.
    pub rejected: Vec<String>,
}

fn allowed_sorts() -> String {
    SortField::ALL
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
