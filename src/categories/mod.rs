//! Category order loading and alias resolution.

pub mod order;
pub mod resolver;

pub use order::CategoryOrder;
pub use resolver::resolve;
