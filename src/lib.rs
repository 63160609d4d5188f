pub mod app_config;
pub mod db;
pub mod middleware;
pub mod orm;
pub mod votes;
pub mod web;
