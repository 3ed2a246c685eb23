//! Locating the part of a reference line that a clip actually covers.

mod boundary_repair;
mod windowed;
mod words;

pub use boundary_repair::search_boundary_repair;
pub use windowed::search_windowed;
pub use words::find_word;
