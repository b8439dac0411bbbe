pub mod blob;
pub mod lock;
pub mod settings_io;
pub mod sync;
pub mod vault;
