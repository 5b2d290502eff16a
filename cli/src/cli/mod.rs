pub mod about;
pub mod post;
