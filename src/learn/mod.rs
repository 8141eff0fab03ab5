//! Usage learning
//!
//! Remembers which objects the user picks, under which search keys, and
//! which action they prefer for a given object. The learned scores are added
//! on top of text relevance so frequently used things float up.
//!
//! Memory is bounded by a probabilistic forgetting pass that runs on every
//! save once the register grows past its prune threshold.

mod error;
mod mnemonics;
mod persist;
mod register;

pub use error::RegisterError;
pub use mnemonics::Mnemonics;
pub use persist::{default_register_path, REGISTER_FILE_VERSION};
pub use register::*;
