pub mod features;
pub mod layout;
pub mod theme;
