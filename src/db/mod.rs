pub mod certdb;
pub mod contentdb;
pub mod coursedb;
pub mod progressdb;
