use crate::{
    ecs::{Entity, Requirements, Result, System, World},
    game::components::{Animation, Sprite},
};

/// Steps sprite-strip animations.
///
/// Time accumulates per entity; each time a frame's duration is reached the animation advances
/// and the sprite's source rectangle moves to that frame. Looping animations wrap back to frame
/// 1, the others stop on their last frame.
#[derive(Debug, Default)]
pub struct AnimationSystem;

impl System for AnimationSystem {
    fn require(&self, requires: &mut Requirements<'_>) {
        requires.component::<Sprite>().component::<Animation>();
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()> {
        for &entity in entities {
            let animation = world.get_component_mut::<Animation>(entity)?;
            if animation.is_finished() || animation.frame_rate == 0 {
                continue;
            }

            let seconds_per_frame = animation.seconds_per_frame();
            animation.elapsed += delta;
            let mut advanced = false;
            while animation.elapsed >= seconds_per_frame && !animation.is_finished() {
                animation.elapsed -= seconds_per_frame;
                animation.current_frame = if animation.current_frame < animation.frames {
                    animation.current_frame + 1
                } else {
                    1
                };
                advanced = true;
            }
            if !advanced {
                continue;
            }

            let frame = animation.current_frame;
            let sprite = world.get_component_mut::<Sprite>(entity)?;
            sprite.source.x = (sprite.width * (frame - 1)) as i32;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(world: &mut World, animation: Animation) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, Sprite::new("strip", 10, 10)).unwrap();
        world.add_component(entity, animation).unwrap();
        entity
    }

    fn frame(world: &World, entity: Entity) -> (u32, i32) {
        (
            world.get_component::<Animation>(entity).unwrap().current_frame,
            world.get_component::<Sprite>(entity).unwrap().source.x,
        )
    }

    #[test]
    fn advances_on_accumulated_time() {
        // Given
        let mut world = World::new();
        world.add_system(AnimationSystem);
        let entity = spawn(&mut world, Animation::new(3, 4, true));

        // When - half a frame
        world.update(0.125).unwrap();

        // Then
        assert_eq!(frame(&world, entity), (1, 0));

        // When - completes the frame
        world.update(0.125).unwrap();

        // Then
        assert_eq!(frame(&world, entity), (2, 10));
    }

    #[test]
    fn looping_wraps_to_first_frame() {
        // Given
        let mut world = World::new();
        world.add_system(AnimationSystem);
        let entity = spawn(&mut world, Animation::new(2, 1, true));

        // When
        world.update(1.0).unwrap();
        world.update(1.0).unwrap();

        // Then
        assert_eq!(frame(&world, entity), (1, 0));
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        // Given
        let mut world = World::new();
        world.add_system(AnimationSystem);
        let entity = spawn(&mut world, Animation::new(3, 1, false));

        // When - long enough for several cycles
        world.update(10.0).unwrap();
        world.update(10.0).unwrap();

        // Then
        assert_eq!(frame(&world, entity), (3, 20));
    }
}
