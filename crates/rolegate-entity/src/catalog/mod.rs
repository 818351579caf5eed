//! Catalog reference data: departments and protected pages.

pub mod department;
pub mod page;
pub mod snapshot;

pub use department::Department;
pub use page::Page;
pub use snapshot::Catalog;
