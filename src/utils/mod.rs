pub mod email;
pub mod error;
pub mod forms;
pub mod helpers;
pub mod slug;
