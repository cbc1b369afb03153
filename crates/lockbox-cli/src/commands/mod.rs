pub mod init;
pub mod list;
pub mod misc;
pub mod save;
pub mod unlock;
