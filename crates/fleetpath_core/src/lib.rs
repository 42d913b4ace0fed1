pub mod coordinate;
pub mod error;
pub mod geodesy;
pub mod node;
mod newtype_index;
mod time;

pub use coordinate::Coordinate;
pub use error::InputValidationError;
pub use node::NodeIdx;

#[doc(hidden)]
pub mod __macro_support {
    pub use jiff;
    pub use tracing;
}
