//! Object and source capabilities
//!
//! External collaborators plug into the ranking core by implementing
//! [`Object`] for the things they offer and [`Source`] or [`TextSource`]
//! for the providers of those things.

mod traits;

pub use traits::*;
