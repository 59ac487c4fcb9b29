//! Core chat types.

pub mod attachment;
pub mod session;

pub use attachment::{Attachment, AttachmentKind, is_supported_upload};
pub use session::{ChatSession, Message, Role};
