pub mod error;
pub mod identity;
pub mod types;

pub use error::{Error, Result};
pub use identity::IdentityGenerator;
pub use types::{
    ArticleFeed, ArticleItem, CategoryItem, CategoryListing, ExtractionContext, ExtractionResult,
};

pub mod prelude {
    pub use crate::identity::{IdentityGenerator, NO_LINK_FOUND};
    pub use crate::types::*;
    pub use crate::{Error, Result};
}
