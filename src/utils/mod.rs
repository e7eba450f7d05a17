// Utils compartidos

pub mod constants;
pub mod merge;
pub mod storage;

pub use constants::*;
pub use merge::merge_patch;
pub use storage::*;
