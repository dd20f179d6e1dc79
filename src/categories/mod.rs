//! User-defined categories
//!
//! Each category points at a meeting list descriptor; the whole collection
//! is stored as one document in the preferences area.

mod models;
mod store;

pub use models::{Category, MeetingList, MeetingListRef};
pub use store::{CategoryStore, CATEGORIES_KEY};
