pub mod attendance;
pub mod backup;
pub mod log;
pub mod permissions;
pub mod resolver;
pub mod store;
pub mod visitor_rules;
