//! The built-in catalogue of kinds and attributes.

pub mod block;
pub mod embed;
pub mod inline;

pub use block::{BlockTag, Header, List, ListType, Paragraph};
pub use embed::{Image, Video};
pub use inline::{AttrClass, AttrStyle, Link, Script, Toggle};
