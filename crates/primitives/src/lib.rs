//! Collection of generic data types shared by the badge commitment pipeline.

pub mod badge;
pub mod buf;
pub mod constants;
pub mod errors;
pub mod hash;

pub mod prelude;
