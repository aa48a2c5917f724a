//! Conversion engine.
//!
//! Drives a single pass over tokenized elements, resolving merge fields
//! through [`MappingResolver`] and balancing control tags through
//! [`BlockBalancer`].

mod balancer;
mod converter;
mod error;
mod resolver;

pub use balancer::{BlockBalancer, BlockOutcome, OpenBlock};
pub use converter::{convert, convert_text};
pub use error::ConvertError;
pub use resolver::{MappingResolver, Resolution};
