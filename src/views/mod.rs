pub mod chat;
pub mod result;
pub mod upload;

pub use chat::{ChatLauncher, ChatPanel};
pub use result::ResultPanel;
pub use upload::UploadView;
