// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session cookie required)

pub mod payload;
pub mod protected;
pub mod public;
