//! storefront-core: catalog vocabulary shared by server and filter form
//!
//! The listing page is rendered from the URL alone, so the same types parse
//! query parameters on the server and write them from the filter form.

pub mod category_diff;
pub mod discount;
pub mod filter;
pub mod filter_form;
pub mod gender;
pub mod name;
pub mod pagination;
pub mod query_params;
pub mod sort;
pub mod validation;

pub use category_diff::CategoryDiff;
pub use discount::DiscountRange;
pub use filter::{keys, ListingQuery, ProductFilter, LISTING_PATH};
pub use filter_form::{FilterForm, FilterOptions, FilterState, Navigation, Navigator, SelectOption};
pub use gender::Gender;
pub use name::CatalogName;
pub use pagination::{last_page, Pagination, DEFAULT_PAGE_SIZE};
pub use query_params::QueryParams;
pub use sort::{SortBy, SortDirection, SortField};
pub use validation::ValidationError;
