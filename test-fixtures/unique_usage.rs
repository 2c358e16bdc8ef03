//! Systems retrieving singletons must retrieve #[unique] components.

pub trait Component {}
pub trait System {}

pub struct World;

#[unique]
pub struct Camera;
impl Component for Camera {}

pub struct Settings;
impl Component for Settings {}

pub struct RenderSystem;
impl System for RenderSystem {}

impl RenderSystem {
    pub fn update(&self, world: &World) {
        let _camera = world.get_unique::<Camera>();
        let _settings = world.get_unique::<Settings>(); //~ unmarked_unique: world.get_unique::<Settings>()
    }
}

// Not a system: retrievals here are out of this rule's scope.
pub struct Helper;

impl Helper {
    pub fn peek(&self, world: &World) {
        let _settings = world.get_unique::<Settings>();
    }
}
