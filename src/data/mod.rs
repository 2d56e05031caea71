pub mod frequency;
pub mod observation;
pub mod source;
pub mod store;
