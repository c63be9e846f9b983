//! Progress display while the experts run

pub mod reporter;
