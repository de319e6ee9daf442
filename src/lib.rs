pub mod config;
pub mod db;
pub mod hash;
pub mod library;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod render;
pub mod source;
