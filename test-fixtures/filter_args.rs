//! Filter arguments must be components.
//!
//! Fixture sources are parsed, never compiled; the framework prelude is
//! declared inline so the marker traits resolve.

pub trait Component {}
pub trait Message {}
pub trait System {}

pub struct Position;
impl Component for Position {}

pub struct Velocity;
impl Component for Velocity {}

pub struct Hit;
impl Message for Hit {}

pub struct Plain;

// A correctly annotated system stays silent.
#[filter(read, Position, Velocity)]
pub struct MovementSystem;
impl System for MovementSystem {}

// One diagnostic per offending argument, left to right.
#[filter(read, Hit, Position, Plain)] //~ non_component: Hit, non_component: Plain
pub struct DamageSystem;
impl System for DamageSystem {}

// Write access modes are skipped just like read.
#[filter(write, Plain)] //~ non_component: Plain
pub struct CleanupSystem;
impl System for CleanupSystem {}
