pub mod contact;

pub use contact::{ContactReply, ContactSubmission, DEFAULT_SUBJECT};
