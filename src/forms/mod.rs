pub mod fields;
pub mod parser;
pub mod pipeline;
pub mod schema;

pub use schema::{FormKind, FormSchema};
