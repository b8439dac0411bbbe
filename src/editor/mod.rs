pub mod duality;
pub mod overlay;
pub mod phrases;
pub mod stream;
pub mod surface;

pub use duality::*;
pub use overlay::*;
pub use phrases::*;
pub use stream::*;
pub use surface::*;
