// Presentation layer - Terminal dashboard and user input
pub mod input;
pub mod terminal_surface;
