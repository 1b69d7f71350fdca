pub mod attendance;
pub mod brother;
pub mod identity;
pub mod lodge_position;
pub mod position_type;
pub mod session;
pub mod visitor;
