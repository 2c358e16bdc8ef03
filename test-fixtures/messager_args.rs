//! Messager arguments must be messages.

pub trait Component {}
pub trait Message {}
pub trait System {}

pub struct Hit;
impl Message for Hit {}

pub struct Healed;
impl Message for Healed {}

pub struct Position;
impl Component for Position {}

// Subscribing to actual messages stays silent.
#[messager(Hit, Healed)]
pub struct DamageSystem;
impl System for DamageSystem {}

// A component is not a message.
#[messager(Hit, Position)] //~ non_message: Position
pub struct ConfusedSystem;
impl System for ConfusedSystem {}
