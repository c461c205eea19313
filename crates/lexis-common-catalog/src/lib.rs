// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Translation catalogs for Lexis.
//!
//! A catalog is one language's nested tree of UI strings, stored as a JSON
//! document. This crate provides:
//!
//! - The [`Catalog`] tree model (string leaves, string-array leaves, nodes)
//! - Lossless conversion to and from a flat [`KeyPath`] map
//! - The [`CatalogStore`] persistence seam with file and in-memory stores
//!
//! # Example
//!
//! ```
//! use lexis_common_catalog::{flatten, unflatten, Catalog, FlatValue, KeyPath};
//!
//! let catalog = Catalog::from_json_str(r#"{"greeting":{"hello":"Hello"}}"#).unwrap();
//! let flat = flatten(&catalog);
//! assert_eq!(
//! 	flat.get(&KeyPath::from("greeting.hello")),
//! 	Some(&FlatValue::Text("Hello".to_string()))
//! );
//! assert_eq!(unflatten(&flat).unwrap(), catalog);
//! ```

mod error;
mod flatten;
mod path;
mod store;
mod value;

pub use error::CatalogError;
pub use flatten::{flatten, unflatten, FlatCatalog, FlatValue};
pub use path::KeyPath;
pub use store::{CatalogStore, FileCatalogStore, MemoryCatalogStore};
pub use value::{Catalog, CatalogValue};
