pub mod budget;
pub mod dimension;
pub mod phone;
pub mod requirement;
