pub mod firebase;
pub mod session;
