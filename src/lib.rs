//! HealthyWell - Telemedicine Backend
//!
//! This crate implements authentication, a doctor directory, and AI-mediated
//! patient consultations over HTTP, backed by PostgreSQL.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
