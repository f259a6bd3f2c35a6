pub mod buffer;
pub mod render;
pub mod theme;

pub use buffer::{
    CursorAddress, Document, Freshness, InvariantError, LineCursor, Operation, Options, Refresh,
    WordList,
};
