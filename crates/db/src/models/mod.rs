pub mod design;
pub mod user;
