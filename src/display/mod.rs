pub mod line;
pub mod sections;
pub mod theme;
