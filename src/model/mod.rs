pub mod chat;
pub mod document;
pub mod folder;
pub mod project;
pub mod session;
pub mod settings;
pub mod store;

pub use chat::*;
pub use document::*;
pub use folder::*;
pub use project::*;
pub use session::*;
pub use settings::*;
pub use store::*;
