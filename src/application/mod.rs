pub mod controller;

pub use controller::TraversalController;
