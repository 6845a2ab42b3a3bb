//! Core types for Customer Hub.
//!
//! Type-safe IDs, the customer wire shape, and the envelopes and pagination
//! types that both the API and its clients speak.

pub mod customer;
pub mod envelope;
pub mod id;
pub mod page;
pub mod sort;

pub use customer::{Customer, CustomerDraft, CustomerInput};
pub use envelope::{ApiResponse, MessageResponse, ValidationErrorBody};
pub use id::{CustomerId, ParseIdError};
pub use page::{DEFAULT_PER_PAGE, Page, PageLinks, PageMeta, PageRequest, Paginated};
pub use sort::{Sort, SortDirection, SortError, SortField};
