// handlers/public/mod.rs - Public handlers (no session required)
//
// Security Level: None. The record collections are shared by every caller,
// authenticated or not; login and logout live here as well.

pub mod analyses;
pub mod home;
pub mod items;
pub mod oauth;
pub mod resource;

pub use home::{health, root};
