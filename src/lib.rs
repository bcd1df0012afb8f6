#![forbid(unsafe_code)]
//! A mutable ordered map backed by an AVL tree. See the map module for details.

pub(crate) mod avl;
pub mod error;
pub mod map;
pub mod ordered;

#[cfg(feature = "rayon")]
mod par;

pub use error::{Error, Result};
pub use map::AvlMap;
pub use ordered::OrderedMap;
