//! # Repository Implementations
//!
//! One repository per stored entity, each a thin typed layer over the
//! store's document access.

pub mod movement;
pub mod product;
pub mod session;
