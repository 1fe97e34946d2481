//! Typed search filters shared by the service and the repository.

use crate::products::{ProductCategory, Tier};
use crate::CoreError;

/// Optional narrowing for a product search. `None` means "not specified".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Substring matched case-insensitively against the product name.
    pub keyword: Option<String>,
    pub category: Option<ProductCategory>,
    pub tier: Option<Tier>,
}

impl SearchFilters {
    /// Parses raw request strings. Empty or blank strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCategory`] or [`CoreError::InvalidTier`]
    /// when a non-empty value is outside its enum.
    pub fn parse(
        keyword: Option<&str>,
        category: Option<&str>,
        tier: Option<&str>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            keyword: non_blank(keyword).map(str::to_owned),
            category: non_blank(category)
                .map(str::parse::<ProductCategory>)
                .transpose()?,
            tier: non_blank(tier).map(str::parse::<Tier>).transpose()?,
        })
    }

    /// True when no filter is set and the search returns every product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.category.is_none() && self.tier.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
