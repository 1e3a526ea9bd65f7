pub mod data_service;
pub mod scale_service;
pub mod layout_service;
pub mod tooltip_service;
pub mod brush_service;
pub mod chart_service;
