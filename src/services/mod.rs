//! Supporting logic that is neither a query nor a handler.

pub mod html;
