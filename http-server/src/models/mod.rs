mod visitor;

pub use visitor::{DEFAULT_MAX_VISITORS, DEFAULT_VISITOR_IDLE, VisitorController, VisitorRegistry};
