pub mod citation;
pub mod evidence;
pub mod reference;
pub mod scenario;
pub mod sufficiency;
pub mod tags;
