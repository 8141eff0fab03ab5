//! Ranked results and the transforms that produce them
//!
//! [`Rankable`] pairs a candidate object with its display text and rank for
//! one query; the [`pipeline`] functions score, bonus and merge them.

pub mod pipeline;
mod types;

pub use pipeline::{
    add_fixed_rank, bonus_actions, bonus_objects, make_rankables, merge_best_first,
    score_actions, score_text,
};
pub use types::Rankable;
