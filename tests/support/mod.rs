#![allow(dead_code)]

pub mod architecture;
pub mod db;
pub mod feed;
pub mod fixtures;
pub mod http;
pub mod notifier;
