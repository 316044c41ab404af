// Domain layer - Plain data shared by every other layer
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod kpi;
pub mod map;
pub mod palette;
pub mod route;
pub mod view;
