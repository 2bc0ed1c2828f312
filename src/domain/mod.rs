pub mod book;
pub mod errors;

pub use book::Book;
pub use errors::*;
