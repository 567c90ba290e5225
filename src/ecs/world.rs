//! World wrapper around hecs

use glam::Vec2;
use hecs::Entity;

use super::components::{Name, Player, Transform, Velocity};
use crate::ai::Enemy;

/// Game world containing all entities and components
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn the player at `position`
    pub fn spawn_player(&mut self, position: Vec2) -> Entity {
        self.inner.spawn((
            Name::new("player"),
            Player,
            Transform::from_position(position),
            Velocity::default(),
        ))
    }

    /// Spawn an enemy looking in `facing`
    pub fn spawn_enemy(
        &mut self,
        name: impl Into<String>,
        position: Vec2,
        facing: Vec2,
        enemy: Enemy,
    ) -> Entity {
        self.inner.spawn((
            Name::new(name),
            Transform::from_position_facing(position, facing),
            Velocity::default(),
            enemy,
        ))
    }

    /// Position of the first player entity, if any
    pub fn player_position(&self) -> Option<Vec2> {
        self.inner
            .query::<(&Player, &Transform)>()
            .iter()
            .next()
            .map(|(_, (_, transform))| transform.position)
    }

    /// Despawn an entity
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, T>, hecs::ComponentError> {
        self.inner.get::<&mut T>(entity)
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Query for entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query::<Q>()
    }

    /// Query for entities with specific components (mutable)
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut::<Q>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;

    #[test]
    fn test_player_position() {
        let mut world = World::new();
        assert_eq!(world.player_position(), None);

        let player = world.spawn_player(Vec2::new(3.0, 4.0));
        assert_eq!(world.player_position(), Some(Vec2::new(3.0, 4.0)));

        world.despawn(player).unwrap();
        assert_eq!(world.player_position(), None);
    }

    #[test]
    fn test_spawn_enemy_components() {
        let mut world = World::new();
        let config = AiConfig::default();
        let entity = world.spawn_enemy(
            "guard",
            Vec2::new(1.0, 2.0),
            Vec2::X,
            Enemy::sentry(&config, Vec2::new(1.0, 2.0)),
        );

        assert_eq!(world.get::<Name>(entity).unwrap().0, "guard");
        assert_eq!(world.get::<Transform>(entity).unwrap().facing, Vec2::X);
        assert!(world.get::<Enemy>(entity).unwrap().default_mode);
        assert_eq!(world.len(), 1);
        assert_eq!(world.player_position(), None);
    }
}
