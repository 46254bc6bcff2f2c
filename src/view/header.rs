use crate::foundation::models::GenderFilter;
use crate::foundation::utils::validate_search_term;
use crate::view::filter::FilterContext;
use url::form_urlencoded;

/// The search bar and gender buttons shown above every page.
pub struct Header {
    filter: FilterContext,
}

impl Header {
    pub fn new(filter: FilterContext) -> Self {
        Self { filter }
    }

    /// Validates the typed term and returns the search path to navigate to, or the
    /// message to show the user.
    pub fn submit_search(&self, input: &str) -> Result<String, String> {
        let term = validate_search_term(input)?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("query", &term)
            .append_pair("gender", self.filter.get().as_query_value())
            .finish();
        Ok(format!("/search?{}", query))
    }

    pub fn select_gender(&self, gender: GenderFilter) -> bool {
        self.filter.set(gender)
    }

    pub fn active_gender(&self) -> GenderFilter {
        self.filter.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::models::SearchParams;
    use crate::routes::Route;

    #[test]
    fn test_short_terms_are_rejected() {
        let header = Header::new(FilterContext::default());
        assert!(header.submit_search(" x ").is_err());
    }

    #[test]
    fn test_search_path_carries_filter() {
        let ctx = FilterContext::default();
        let header = Header::new(ctx.clone());
        assert!(header.select_gender(GenderFilter::Female));
        assert_eq!(ctx.get(), GenderFilter::Female);

        let path = header.submit_search("  pekora  ").unwrap();
        assert_eq!(path, "/search?query=pekora&gender=female");
        assert_eq!(
            Route::parse(&path),
            Route::Search(SearchParams::by_query("pekora"))
        );
    }
}
