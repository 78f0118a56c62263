//! Capacitated vehicle routing over geographic coordinates.
//!
//! Construction heuristics (greedy nearest-neighbour, farthest insertion,
//! Clarke-Wright savings, capacity-split giant tours) plus a seeded,
//! parallel multi-start search that keeps the best answer found.

pub mod api;
pub mod config;
pub mod database;
pub mod distance;
pub mod domain;
pub mod fixtures;
pub mod service;
pub mod solver;
