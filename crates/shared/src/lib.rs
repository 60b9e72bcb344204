//! Types shared across the commission desk: commission values and member
//! identity, vi-VN number formatting, the REST wire rows, and the backend
//! error taxonomy.

pub mod domain;
pub mod error;
pub mod locale;
pub mod protocol;
