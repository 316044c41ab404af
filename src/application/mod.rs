// Application layer - Dashboard state, rendering and use cases
pub mod action;
pub mod chart_registry;
pub mod controller;
pub mod crosshair;
pub mod dashboard_api;
pub mod dashboard_service;
pub mod map_renderer;
pub mod report;
pub mod view_state;

#[cfg(test)]
pub mod testing;
