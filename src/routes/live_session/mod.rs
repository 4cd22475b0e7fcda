pub mod live_session_handlers;
