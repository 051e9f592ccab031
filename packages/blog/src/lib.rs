// Blog subsystem - content listing and publication workflow
//
// This crate answers paginated, filtered, capability-gated queries over blogs
// and blog posts, and promotes scheduled posts to published on a timer.
//
// Listing flow: caller -> access gate -> filter criteria -> query executor.
// Publication flow: cron tick -> scheduled publication engine -> store.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
