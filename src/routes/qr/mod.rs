pub mod qr_handlers;
pub mod qr_models;
