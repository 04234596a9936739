//! Core coordinate utilities shared by the globe and marker systems.

pub mod coordinates;
