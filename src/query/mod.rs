//! The list-query contract shared by every list endpoint: pagination,
//! filtering, sorting, empty-state detection.

pub mod filter;
pub mod page;
pub mod params;
pub mod sort;

pub use filter::{FilterBuilder, FilterExpr};
pub use page::{fetch_page, ListQuery, PageResult};
pub use params::{ListParams, QuerySpec, SortDirection};
pub use sort::SortMap;
