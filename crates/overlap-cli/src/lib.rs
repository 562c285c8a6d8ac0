//! Library components of the `drug-overlap` CLI.

#![deny(unsafe_code)]

pub mod logging;
pub mod shorthand;
