//! Wire codecs for [`crate::DepGraph`].
//!
//! JSON is the only format; see [`json`].

pub mod json;
