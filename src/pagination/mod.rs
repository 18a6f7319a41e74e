//! Pagination module
//!
//! Supports: Range header offsets, opaque cursors, search `after` tokens
//!
//! # Overview
//!
//! Every protocol sits behind the `PageCursor` trait: given a
//! `PaginationState` it fetches one page and says where the next one
//! starts, or that the collection is exhausted. The drain loop in
//! `engine` only ever sees the trait and the protocol tag.

mod strategies;
mod types;

pub use strategies::{AfterCursor, RangeCursor, TokenCursor};
pub use types::{
    parse_body, records_from_array, records_from_envelope, NextPage, Page, PageCursor,
    PaginationState, Position, Protocol,
};
