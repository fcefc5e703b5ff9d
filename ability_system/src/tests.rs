use {
    crate::*,
    ability_components::{
        AbilitySystem, AbilitySystemLink, ActiveEffectHandle, Attribute, AttributeSet,
        DurationPolicy, EffectContext, GameplayTag, GameplayTagContainer, ListenerChannel,
        Listeners, ModifierOp,
    },
    ability_events::{AbilityActorInfoSet, AttributeChanged, EffectAssetTags},
    bevy::{ecs::system::RunSystemOnce, prelude::*},
    effects_assets::{EffectMap, GameplayEffectDefinition, ModifierDefinition, ScalableFloat},
    std::time::Duration,
};

#[derive(Resource, Default)]
struct Received {
    tags: Vec<(Entity, GameplayTagContainer)>,
    attributes: Vec<(Entity, Attribute, f32)>,
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .add_plugins(AbilitySystemPlugin)
        .init_resource::<Received>()
        .add_observer(|trigger: On<EffectAssetTags>, mut received: ResMut<Received>| {
            let event = trigger.event();
            received.tags.push((event.entity, event.tags.clone()));
        })
        .add_observer(|trigger: On<AttributeChanged>, mut received: ResMut<Received>| {
            let event = trigger.event();
            received
                .attributes
                .push((event.entity, event.attribute, event.value));
        });
    app
}

fn add_definition(app: &mut App, definition: GameplayEffectDefinition) {
    let id = definition.id.clone();
    let handle = app
        .world_mut()
        .resource_mut::<Assets<GameplayEffectDefinition>>()
        .add(definition);
    app.world_mut()
        .resource_mut::<EffectMap>()
        .handles
        .insert(id, handle);
}

fn definition(id: &str, duration: DurationPolicy, health: f32) -> GameplayEffectDefinition {
    GameplayEffectDefinition {
        id: id.to_string(),
        duration,
        period: None,
        modifiers: vec![ModifierDefinition {
            attribute: Attribute::Health,
            op: ModifierOp::Add,
            magnitude: ScalableFloat {
                value: health,
                per_level: 0.0,
            },
        }],
        asset_tags: [GameplayTag::new(format!("Message.{id}"))]
            .into_iter()
            .collect(),
    }
}

fn apply(app: &mut App, target: Entity, effect_id: &'static str) -> Option<ActiveEffectHandle> {
    app.world_mut()
        .run_system_once(move |mut hosts: AbilityHosts| {
            let ability_system = hosts.resolve(target)?;
            let spec = hosts.make_outgoing_spec(effect_id, 1.0, EffectContext::default())?;
            hosts.apply_spec_to_self(ability_system, spec)
        })
        .expect("system should run")
}

#[test]
fn test_resolve_follows_link() {
    let mut app = test_app();

    let player_state = app.world_mut().spawn(AbilitySystem::default()).id();
    let character = app
        .world_mut()
        .spawn(AbilitySystemLink(player_state))
        .id();
    let rock = app.world_mut().spawn(Transform::default()).id();
    let broken = app.world_mut().spawn(AbilitySystemLink(rock)).id();

    let resolved = app
        .world_mut()
        .run_system_once(move |hosts: AbilityHosts| {
            [player_state, character, rock, broken].map(|actor| hosts.resolve(actor))
        })
        .expect("system should run");

    assert_eq!(
        resolved,
        [Some(player_state), Some(player_state), None, None]
    );
}

#[test]
fn test_link_sets_avatar_actor() {
    let mut app = test_app();

    let player_state = app.world_mut().spawn(AbilitySystem::default()).id();
    let character = app
        .world_mut()
        .spawn(AbilitySystemLink(player_state))
        .id();
    app.update();

    let asc = app
        .world()
        .get::<AbilitySystem>(player_state)
        .expect("ability system should exist");
    assert_eq!(asc.owner_actor, Some(player_state));
    assert_eq!(asc.avatar_actor, Some(character));
    assert!(asc.effect_applied_bound);
}

#[test]
fn test_effect_applied_rebroadcasts_asset_tags_once() {
    let mut app = test_app();
    add_definition(&mut app, definition("potion", DurationPolicy::Instant, 10.0));

    let host = app.world_mut().spawn(AbilitySystem::default()).id();
    let listener = app.world_mut().spawn_empty().id();
    app.world_mut()
        .get_mut::<Listeners>(host)
        .expect("listeners are required by the ability system")
        .subscribe(ListenerChannel::EffectAssetTags, listener);

    // A second actor info hook must not bind a second listener
    app.world_mut().trigger(AbilityActorInfoSet {
        entity: host,
        owner_actor: host,
        avatar_actor: host,
    });
    app.update();

    let handle = apply(&mut app, host, "potion").expect("effect should apply");
    assert!(!handle.is_valid(), "instant effects are not stored");
    app.update();

    let received = app.world().resource::<Received>();
    assert_eq!(received.tags.len(), 1);
    assert_eq!(received.tags[0].0, listener);
    assert!(received.tags[0].1.has_tag("Message.potion"));
}

#[test]
fn test_tags_only_reach_tag_listeners() {
    let mut app = test_app();
    add_definition(&mut app, definition("potion", DurationPolicy::Instant, 10.0));

    let host = app.world_mut().spawn(AbilitySystem::default()).id();
    let listener = app.world_mut().spawn_empty().id();
    app.world_mut()
        .get_mut::<Listeners>(host)
        .expect("listeners are required by the ability system")
        .subscribe(ListenerChannel::AttributeChanged, listener);

    apply(&mut app, host, "potion").expect("effect should apply");
    app.update();

    // Subscribed to attributes only
    let received = app.world().resource::<Received>();
    assert!(received.tags.is_empty());
}

#[test]
fn test_attribute_changes_reach_listeners_in_order() {
    let mut app = test_app();
    add_definition(&mut app, definition("fireball", DurationPolicy::Instant, -10.0));

    let host = app
        .world_mut()
        .spawn((AbilitySystem::default(), AttributeSet::new(100.0, 100.0, 50.0, 50.0)))
        .id();
    // Initial values get reported before anyone listens
    app.update();

    let first = app.world_mut().spawn_empty().id();
    let second = app.world_mut().spawn_empty().id();
    {
        let mut listeners = app
            .world_mut()
            .get_mut::<Listeners>(host)
            .expect("listeners are required by the ability system");
        listeners.subscribe(ListenerChannel::AttributeChanged, second);
        listeners.subscribe(ListenerChannel::AttributeChanged, first);
    }

    apply(&mut app, host, "fireball").expect("effect should apply");
    app.update();

    let received = app.world().resource::<Received>();
    assert_eq!(
        received.attributes,
        vec![
            (second, Attribute::Health, 90.0),
            (first, Attribute::Health, 90.0),
        ]
    );
}

#[test]
fn test_timed_effect_expires() {
    let mut app = test_app();
    add_definition(
        &mut app,
        definition("shield", DurationPolicy::HasDuration { seconds: 2.0 }, 0.0),
    );

    let host = app.world_mut().spawn(AbilitySystem::default()).id();
    let handle = apply(&mut app, host, "shield").expect("effect should apply");
    assert!(handle.is_valid());

    // Advance time manually
    {
        let mut asc = app
            .world_mut()
            .get_mut::<AbilitySystem>(host)
            .expect("ability system should exist");
        let effect = asc
            .active_effect_mut(handle)
            .expect("effect should be active");
        effect
            .duration
            .as_mut()
            .expect("timed effects have a duration")
            .tick(Duration::from_millis(2100));
    }

    app.update();

    let asc = app
        .world()
        .get::<AbilitySystem>(host)
        .expect("ability system should exist");
    assert!(asc.active_effect(handle).is_none());
}

#[test]
fn test_remove_unknown_handle_is_tolerated() {
    let mut app = test_app();
    let host = app.world_mut().spawn(AbilitySystem::default()).id();
    let stray = app.world_mut().spawn_empty().id();

    let removed = app
        .world_mut()
        .run_system_once(move |mut hosts: AbilityHosts| {
            (
                hosts.remove_active_effect(host, ActiveEffectHandle::generate(), 1),
                hosts.remove_active_effect(stray, ActiveEffectHandle::generate(), 1),
            )
        })
        .expect("system should run");

    assert_eq!(removed, (false, false));
}

#[test]
fn test_missing_definition_builds_no_spec() {
    let mut app = test_app();

    let spec = app
        .world_mut()
        .run_system_once(|hosts: AbilityHosts| {
            hosts.make_outgoing_spec("does_not_exist", 1.0, EffectContext::default())
        })
        .expect("system should run");

    assert!(spec.is_none());
}
