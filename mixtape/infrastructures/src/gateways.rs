pub mod downloaders;
pub mod explorers;
pub mod repositories;
