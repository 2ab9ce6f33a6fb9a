// Google Play search: candidate competitor apps for a brand keyword.
//
// `StoreSearch` is the seam; `GooglePlaySearch` scrapes the public search
// page, since there is no official search API. App ids come from details
// links in page order, titles from the link text.

pub mod search;

pub use search::{GooglePlaySearch, SearchQuery, StoreSearch};
