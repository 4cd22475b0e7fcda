pub mod verses_handlers;
pub mod verses_models;
