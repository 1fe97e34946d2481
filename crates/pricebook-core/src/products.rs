use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Closed set of product categories accepted by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Rokok,
    Obat,
    Lainnya,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::Rokok,
        ProductCategory::Obat,
        ProductCategory::Lainnya,
    ];

    /// Text stored in the `product_category` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Rokok => "Rokok",
            ProductCategory::Obat => "Obat",
            ProductCategory::Lainnya => "Lainnya",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::InvalidCategory(s.to_owned()))
    }
}

/// Pricing tier attached to a [`PriceDetail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Non Member")]
    NonMember,
    Basic,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::NonMember, Tier::Basic, Tier::Premium];

    /// Text stored in the `price_detail.tier` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::NonMember => "Non Member",
            Tier::Basic => "Basic",
            Tier::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::InvalidTier(s.to_owned()))
    }
}

/// A catalog product. `prices` is only populated by search; single-table
/// reads always leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub product_category: ProductCategory,
    pub description: String,
    #[serde(default)]
    pub prices: Vec<Price>,
}

impl Product {
    /// Builds a product without pricing from a validated draft and its store id.
    #[must_use]
    pub fn from_draft(id: i64, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            product_category: draft.product_category,
            description: draft.description,
            prices: Vec::new(),
        }
    }

    /// Returns `true` if any price detail under this product carries `tier`.
    #[must_use]
    pub fn has_tier(&self, tier: Tier) -> bool {
        self.prices
            .iter()
            .flat_map(|p| &p.price_details)
            .any(|d| d.tier == tier)
    }
}

/// A sale unit of a product (e.g. `"box"`, `"strip"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub id: i64,
    pub product_id: i64,
    pub unit: String,
    #[serde(default)]
    pub price_details: Vec<PriceDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceDetail {
    pub id: i64,
    pub price_id: i64,
    pub tier: Tier,
    /// Integer amount in the smallest currency unit.
    pub price: i64,
}

/// Unvalidated product payload as it arrives over HTTP.
///
/// Every field defaults so that a missing `name` or `product_category` is
/// reported as a validation failure rather than a decode failure. `id` is
/// ignored on create.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_category: String,
    #[serde(default)]
    pub description: String,
}

impl ProductInput {
    /// Checks the name and category rules and returns the typed draft.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingName`] for an empty name and
    /// [`CoreError::InvalidCategory`] for a category outside the enum.
    pub fn validate(self) -> Result<ProductDraft, CoreError> {
        if self.name.is_empty() {
            return Err(CoreError::MissingName);
        }
        let product_category = self.product_category.parse::<ProductCategory>()?;

        Ok(ProductDraft {
            name: self.name,
            product_category,
            description: self.description,
        })
    }
}

/// Product scalars that passed validation and are ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub product_category: ProductCategory,
    pub description: String,
}
