pub mod connector;
pub mod internal;
pub mod pipeline;
pub mod types;
