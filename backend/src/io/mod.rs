//! # IO Module
//!
//! The HTTP face of the service. Handlers translate JSON requests into domain
//! commands, resolve who is calling, and map domain results and failures back
//! into responses.

pub mod rest;
