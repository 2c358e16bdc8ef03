//! Shapes the analyzer must tolerate without flagging or crashing.

pub trait Component {}
pub trait Message {}
pub trait System {}

pub struct Position;
impl Component for Position {}

// Unresolved argument types are skipped, not flagged.
#[filter(read, Ghost)]
pub struct HauntedSystem;
impl System for HauntedSystem {}

// Qualified paths resolve by their final segment.
#[filter(read, ecs::Position)]
pub struct QualifiedSystem;
impl System for QualifiedSystem {}

// An empty argument list has nothing to flag.
#[filter()]
pub struct IdleSystem;
impl System for IdleSystem {}

// Unrelated attributes are not the analyzer's business.
#[derive(Debug, Clone)]
pub struct Config;

// Components reached through a marker subtrait still count.
pub trait Tagged: Component {}

pub struct Beacon;
impl Tagged for Beacon {}

#[filter(read, Beacon)]
pub struct BeaconSystem;
impl System for BeaconSystem {}
