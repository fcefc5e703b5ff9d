use {
    ability_components::{AbilitySystem, AbilitySystemLink, Attribute, AttributeSet},
    bevy::prelude::*,
    effect_actor_components::{
        EffectActor, EffectApplicationPolicy, EffectDescriptor, EffectRemovalPolicy, OverlapBody,
        OverlapVolume,
    },
    widget_controller::{AttributeText, MessageText, WidgetController},
};

const PLAYER_SPEED: f32 = 200.0;

/// Character the player moves around. Its ability system lives on the [`PlayerState`].
#[derive(Component)]
pub struct Player;

/// Holds the player's ability system, outliving the character.
#[derive(Component)]
pub struct PlayerState;

pub fn spawn_starting_scene(mut commands: Commands) {
    info!("spawning starting scene");

    let player_state = commands
        .spawn((
            Name::new("PlayerState"),
            PlayerState,
            AbilitySystem::default(),
            AttributeSet::new(60.0, 100.0, 10.0, 50.0),
        ))
        .id();

    let character = commands
        .spawn((
            Name::new("Character"),
            Player,
            AbilitySystemLink(player_state),
            OverlapBody { radius: 16.0 },
            Sprite::from_color(Color::srgb(0.3, 0.6, 1.0), Vec2::splat(32.0)),
            Transform::default(),
        ))
        .id();

    spawn_effect_actor(
        &mut commands,
        "HealthPotion",
        Vec2::new(-200.0, 120.0),
        Color::srgb(0.9, 0.2, 0.3),
        EffectActor {
            instant_effects: vec![EffectDescriptor::new(
                "health_potion",
                EffectApplicationPolicy::ApplyOnOverlapBegin,
                EffectRemovalPolicy::DoNotRemove,
            )],
            ..default()
        },
    );

    spawn_effect_actor(
        &mut commands,
        "ManaCrystal",
        Vec2::new(200.0, 120.0),
        Color::srgb(0.2, 0.4, 0.9),
        EffectActor {
            duration_effects: vec![EffectDescriptor::new(
                "mana_crystal",
                EffectApplicationPolicy::ApplyOnOverlapEnd,
                EffectRemovalPolicy::DoNotRemove,
            )],
            ..default()
        },
    );

    spawn_effect_actor(
        &mut commands,
        "FireArea",
        Vec2::new(-200.0, -120.0),
        Color::srgb(1.0, 0.5, 0.1),
        EffectActor {
            infinite_effects: vec![EffectDescriptor::new(
                "fire_area",
                EffectApplicationPolicy::ApplyOnOverlapBegin,
                EffectRemovalPolicy::RemoveOnOverlapEnd,
            )],
            actor_level: 2.0,
            ..default()
        },
    );

    spawn_effect_actor(
        &mut commands,
        "PoisonCloud",
        Vec2::new(200.0, -120.0),
        Color::srgb(0.4, 0.8, 0.2),
        EffectActor {
            infinite_effects: vec![EffectDescriptor::new(
                "poison_cloud",
                EffectApplicationPolicy::ApplyOnOverlapBegin,
                EffectRemovalPolicy::RemoveOnOverlapEnd,
            )],
            destroy_on_effect_removal: true,
            ..default()
        },
    );

    let controller = commands
        .spawn((
            Name::new("HudWidgetController"),
            WidgetController {
                player: character,
                ability_host: player_state,
            },
        ))
        .id();

    spawn_attribute_hud(&mut commands, controller);
}

fn spawn_effect_actor(
    commands: &mut Commands,
    name: &'static str,
    position: Vec2,
    color: Color,
    actor: EffectActor,
) {
    let radius = OverlapVolume::default().radius;
    commands.spawn((
        Name::new(name),
        actor,
        OverlapVolume { radius },
        Sprite::from_color(color.with_alpha(0.6), Vec2::splat(radius * 2.0)),
        Transform::from_translation(position.extend(-1.0)),
    ));
}

fn spawn_attribute_hud(commands: &mut Commands, controller: Entity) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|hud| {
            for attribute in Attribute::ALL {
                hud.spawn((
                    Text::new(attribute.name()),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    AttributeText {
                        controller,
                        attribute,
                    },
                ));
            }

            hud.spawn((
                Text::default(),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.4)),
                MessageText { controller },
            ));
        });
}

pub fn move_player(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut players: Query<&mut Transform, With<Player>>,
) {
    let mut direction = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction.x += 1.0;
    }

    let step = direction.normalize_or_zero() * PLAYER_SPEED * time.delta_secs();
    for mut transform in &mut players {
        transform.translation += step.extend(0.0);
    }
}
