//! Core types for work-order imports

mod value;
mod table;
mod draft;
mod errors;
mod batch;
mod operation;
mod result;

pub use value::*;
pub use table::*;
pub use draft::*;
pub use errors::*;
pub use batch::*;
pub use operation::*;
pub use result::*;
