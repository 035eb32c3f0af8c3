pub mod document;
pub mod identifier;
pub mod one_or_many;
pub mod resource;

pub use document::*;
pub use identifier::*;
pub use one_or_many::*;
pub use resource::*;
