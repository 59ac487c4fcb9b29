//! Chat file storage.

pub mod dir;
pub mod file;
pub mod filename;
pub mod metadata;
mod record;

pub use dir::ensure_chat_directory;
pub use file::{ChatStore, load_chat};
pub use filename::{FilenameGenerator, generate_filename, slugify, unique_path};
pub use metadata::{ChatFileMetadata, FileStatus, read_metadata};
pub use record::{FORMAT_TAG, FORMAT_VERSION};
