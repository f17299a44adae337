pub mod folders;
pub mod response;
