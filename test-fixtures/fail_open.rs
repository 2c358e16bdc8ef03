//! Without the framework prelude every check stays silent.
//!
//! No marker traits are declared here, so nothing below can be proven
//! wrong — and nothing may be flagged.

pub struct Plain;

#[filter(read, Plain)]
pub struct MoveSystem;

#[messager(Plain)]
pub struct ListenSystem;

pub struct World;

impl MoveSystem {
    pub fn update(&self, world: &World) {
        let _plain = world.get_unique::<Plain>();
    }
}
