//! `lotkeeper-locations` — location reference data and classification.
//!
//! Pure classification and set operations over warehouses/showrooms; no IO.

pub mod access;
pub mod directory;
pub mod location;

pub use access::AccessibleLocations;
pub use directory::LocationDirectory;
pub use location::{Location, LocationKind};
