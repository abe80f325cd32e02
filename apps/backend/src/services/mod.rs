pub mod review;
pub mod tokens;
