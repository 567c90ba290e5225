//! Headless demo: a sentry and a patroller hunting a wandering player

use std::error::Error;

use enemy_nav::prelude::*;

/// Fixed simulation step
const DT: f32 = 1.0 / 60.0;

/// Number of ticks to simulate
const TICKS: u32 = 900;

/// Tick at which the sentry takes a hit
const HIT_TICK: u32 = 450;

/// Built-in level, first row is `ty = 0`
const LEVEL: &[&str] = &[
    "............",
    "............",
    "............",
    "............",
    "....####....",
    "....####....",
    "....####....",
    "....####....",
    "............",
    "............",
    "............",
    "............",
    "##########..",
    "##########..",
    "............",
    "............",
    "............",
    "............",
    "............",
    "............",
];

/// Half extents of the box standing in for one blocked diamond
const WALL_HALF_EXTENTS: Vec2 = Vec2::new(0.5, 0.25);

/// Actor footprint radius
const ACTOR_RADIUS: f32 = 0.3;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = AiConfig::load_ron(&path)?;
            log::info!("Loaded AI config from {path}");
            config
        }
        None => AiConfig::default(),
    };

    let grid = NavGrid::from_rows(Vec2::ZERO, LEVEL)?;
    log::info!(
        "Level {}x{} tiles, {} walkable",
        grid.width(),
        grid.height(),
        grid.walkable_tiles().count()
    );
    log::debug!("Navigation grid:\n{grid}");

    // Mirror blocked tiles into the physics world so they occlude sight
    let mut physics = PhysicsWorld::new();
    for ty in 0..grid.height() as i32 {
        for tx in 0..grid.width() as i32 {
            let tile = IVec2::new(tx, ty);
            if !grid.is_walkable(tile) {
                physics.add_wall(grid.tile_to_world(tile), WALL_HALF_EXTENTS);
            }
        }
    }

    let tile = |tx, ty| grid.tile_to_world(IVec2::new(tx, ty));
    let player_route = [tile(1, 9), tile(10, 9)];
    let sentry_post = tile(2, 17);
    let patrol_route = vec![tile(1, 1), tile(10, 1), tile(10, 10)];

    let mut world = World::new();
    let player = world.spawn_player(player_route[0]);
    let player_body = physics.add_actor(player_route[0], ACTOR_RADIUS, category::PLAYER);

    let sentry = world.spawn_enemy(
        "sentry",
        sentry_post,
        Vec2::NEG_Y,
        Enemy::sentry(&config, sentry_post),
    );
    world.spawn_enemy(
        "patroller",
        patrol_route[0],
        Vec2::X,
        Enemy::patrol(&config, patrol_route[0], patrol_route.clone()),
    );

    let mut controller = EnemyBehaviorController::new(grid, config);
    let mut event_count = 0usize;

    for tick in 0..TICKS {
        // The player strolls back and forth along a corridor
        let t = tick as f32 * DT;
        let sway = 0.5 - 0.5 * (t * 0.4).cos();
        let player_pos = player_route[0].lerp(player_route[1], sway);
        world.get_mut::<Transform>(player)?.position = player_pos;
        physics.set_actor_position(player_body, player_pos);
        physics.step(DT);

        if tick == HIT_TICK {
            world.get_mut::<Enemy>(sentry)?.on_hit();
        }

        controller.update(DT, &mut world, &physics);

        for (_, (transform, velocity, enemy)) in
            world.query_mut::<(&mut Transform, &Velocity, &mut Enemy)>()
        {
            velocity.integrate(transform, DT);
            enemy.update_counters();
        }

        for event in controller.events().iter() {
            log::debug!("tick {tick}: {event:?}");
            event_count += 1;
        }
    }

    log::info!("Simulated {TICKS} ticks, {event_count} AI events");
    for (_, (name, transform, enemy)) in world.query::<(&Name, &Transform, &Enemy)>().iter() {
        log::info!(
            "{}: at {}, facing {}, branch {}, player in sight: {}",
            name.0,
            transform.position,
            transform.facing,
            enemy.branch.map_or("none", |b| b.name()),
            enemy.player_in_sight
        );
    }

    Ok(())
}
