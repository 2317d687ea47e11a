use serde::{Deserialize, Serialize};

/// A navigable section of a news site found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub query: Option<String>,
}

/// One article card surfaced on a feed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleItem {
    pub id: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub datetime: Option<String>,
}

/// Request parameters echoed back in a result envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl ExtractionContext {
    pub fn for_page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Default::default()
        }
    }

    /// Context for a feed request, echoing the parameters as given.
    pub fn for_feed(source: &str, page: &str, category: &str, subcategory: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            page: page.to_string(),
            category: Some(category.to_string()),
            subcategory: Some(subcategory.to_string()),
        }
    }
}

/// Envelope returned by every extraction; `total` is always `items.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult<T> {
    total: usize,
    #[serde(flatten)]
    context: ExtractionContext,
    items: Vec<T>,
}

impl<T> ExtractionResult<T> {
    pub fn new(context: ExtractionContext, items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            context,
            items,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn context(&self) -> &ExtractionContext {
        &self.context
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

pub type CategoryListing = ExtractionResult<CategoryItem>;
pub type ArticleFeed = ExtractionResult<ArticleItem>;
