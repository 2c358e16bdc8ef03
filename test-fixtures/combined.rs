//! Filter and messager diagnostics on one declaration are independent.

pub trait Component {}
pub trait Message {}
pub trait System {}

pub struct Hit;
impl Message for Hit {}

pub struct Position;
impl Component for Position {}

pub struct Plain;

// The messager list is fine; only the filter list is flagged, and the
// messager's valid argument never duplicates into a filter diagnostic.
#[messager(Hit)]
#[filter(read, Hit, Position, Plain)] //~ non_component: Hit, non_component: Plain
pub struct CombinedSystem;
impl System for CombinedSystem {}
