pub mod filter_service;
pub mod pagination_service;
pub mod sort_service;

pub use filter_service::{FilterOptions, FilterService, SearchMode};
pub use pagination_service::{PageWindow, PaginationService};
pub use sort_service::SortService;
