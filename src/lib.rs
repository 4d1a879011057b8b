pub mod activity;
pub mod aws;
pub mod config;
pub mod ec2;
pub mod error;
pub mod event;
pub mod handler;
pub mod logging;
pub mod ssm;
pub mod trigger;
pub mod types;
