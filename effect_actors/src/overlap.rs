use {
    bevy::prelude::*,
    effect_actor_components::{OverlapBody, OverlapVolume, Overlapping},
    effect_actor_events::{OverlapBegan, OverlapEnded},
};

/// Circle test of every overlap volume against every body. Ends are reported
/// before begins so a volume never sees a body twice in one frame.
/// Despawned bodies drop out of the query and are reported as ended.
pub fn detect_overlaps(
    mut commands: Commands,
    mut volumes: Query<(Entity, &Transform, &OverlapVolume, &mut Overlapping)>,
    bodies: Query<(Entity, &Transform, &OverlapBody)>,
) {
    for (volume_entity, volume_transform, volume, mut overlapping) in &mut volumes {
        let center = volume_transform.translation.truncate();
        let inside: Vec<Entity> = bodies
            .iter()
            .filter(|(body_entity, transform, body)| {
                *body_entity != volume_entity
                    && transform.translation.truncate().distance(center)
                        <= volume.radius + body.radius
            })
            .map(|(body_entity, _, _)| body_entity)
            .collect();

        let ended: Vec<Entity> = overlapping
            .0
            .iter()
            .copied()
            .filter(|other| !inside.contains(other))
            .collect();
        let began: Vec<Entity> = inside
            .iter()
            .copied()
            .filter(|other| !overlapping.0.contains(other))
            .collect();

        if ended.is_empty() && began.is_empty() {
            continue;
        }

        for other in ended {
            trace!(volume = ?volume_entity, ?other, "overlap ended");
            commands.trigger(OverlapEnded {
                entity: volume_entity,
                other,
            });
        }
        for &other in &began {
            trace!(volume = ?volume_entity, ?other, "overlap began");
            commands.trigger(OverlapBegan {
                entity: volume_entity,
                other,
            });
        }

        overlapping.0.retain(|other| inside.contains(other));
        overlapping.0.extend(began);
    }
}
