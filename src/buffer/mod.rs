//! Append Buffer Module
//!
//! In-memory holding area for rows that have not been committed yet.
//!
//! ## Responsibilities
//! - Validate rows against the bound table before accepting them
//! - Keep rows in append order
//! - Hand the whole pending sequence to the writer on flush
//!
//! ## Data Structure Choice
//! A plain `Vec<Row>`: appends are amortized O(1) and `drain` swaps the
//! full vector out via `mem::replace`, leaving a fresh one that reserves the
//! buffer's configured capacity.
//! The buffer has a single owner (its writer), so it needs no locking.

mod append_buffer;

pub use append_buffer::AppendBuffer;
