/// Event log model and chain resolution

pub mod models;
pub mod resolver;

pub use models::*;
pub use resolver::{EventResolver, ResolverConfig};
