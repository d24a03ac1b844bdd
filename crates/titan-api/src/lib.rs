//! HTTP front-end for TrainingJob admission.

pub mod config;
pub mod server;
