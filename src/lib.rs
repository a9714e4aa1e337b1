#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod bindings;
pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod keys;
pub mod remote;
pub mod session;
