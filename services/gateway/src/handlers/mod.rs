pub mod fallback;
pub mod ws;
