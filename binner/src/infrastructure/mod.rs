pub mod catalog;
pub mod dashing;
pub mod reporter;
