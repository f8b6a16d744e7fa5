pub mod archive;
pub mod fetch;

pub use archive::archive;
pub use fetch::fetch;
