// Interactive shell: server-rendered pages for upload, navigation and results.

pub mod handlers;
pub mod markdown;
pub mod views;
