/// Columns a job listing can be ordered by.
///
/// Anything not listed here falls back to ascending posted date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Company,
    Location,
    Salary,
    ClosingDate,
    IsActive,
}

impl SortField {
    /// Parses the wire name of a sort column. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "company" => Some(Self::Company),
            "location" => Some(Self::Location),
            "salary" => Some(Self::Salary),
            "closingDate" => Some(Self::ClosingDate),
            "isActive" => Some(Self::IsActive),
            _ => None,
        }
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` selects descending order; any other value, or none, is ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}

/// Filter and ordering applied to a job listing.
///
/// Filters are AND-combined; empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    /// Case-sensitive substring of the title.
    pub search_term: Option<String>,
    /// Exact name of the joined company.
    pub company: Option<String>,
    /// Exact location.
    pub location: Option<String>,
    pub sort: Option<SortField>,
    pub order: SortOrder,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a query from raw request parameters.
    pub fn from_params(
        search_term: Option<String>,
        company: Option<String>,
        location: Option<String>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Self {
        Self {
            search_term: non_empty(search_term),
            company: non_empty(company),
            location: non_empty(location),
            sort: sort_by.and_then(SortField::parse),
            order: SortOrder::from_param(sort_order),
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = non_empty(Some(term.into()));
        self
    }

    pub fn company(mut self, name: impl Into<String>) -> Self {
        self.company = non_empty(Some(name.into()));
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = non_empty(Some(location.into()));
        self
    }

    pub fn sort_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some(field);
        self.order = order;
        self
    }

    /// Direction actually applied. The default posted-date ordering is always ascending.
    pub fn effective_order(&self) -> SortOrder {
        match self.sort {
            Some(_) => self.order,
            None => SortOrder::Asc,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_sort_fields() {
        assert_eq!(SortField::parse("title"), Some(SortField::Title));
        assert_eq!(SortField::parse("closingDate"), Some(SortField::ClosingDate));
        assert_eq!(SortField::parse("isActive"), Some(SortField::IsActive));
        assert_eq!(SortField::parse("postedDate"), None);
        assert_eq!(SortField::parse("Title"), None);
    }

    #[test]
    fn only_desc_is_descending() {
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("DESC")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(None), SortOrder::Asc);
    }

    #[test]
    fn empty_params_are_ignored() {
        let query = JobQuery::from_params(
            Some(String::new()),
            Some("Tech Solutions Inc.".into()),
            None,
            Some("bogus"),
            Some("desc"),
        );
        assert_eq!(query.search_term, None);
        assert_eq!(query.company.as_deref(), Some("Tech Solutions Inc."));
        assert_eq!(query.sort, None);
        assert_eq!(query.effective_order(), SortOrder::Asc);
    }

    #[test]
    fn builder_sets_sort() {
        let query = JobQuery::new()
            .location("London")
            .sort_by(SortField::Salary, SortOrder::Desc);
        assert_eq!(query.location.as_deref(), Some("London"));
        assert_eq!(query.effective_order(), SortOrder::Desc);
    }
}
