pub mod browse_service;
pub mod export_service;
pub mod import_service;
pub mod view_service;
