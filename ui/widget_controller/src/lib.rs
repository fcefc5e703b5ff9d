use {
    ability_components::{
        Attribute, AttributeSet, GameplayTag, GameplayTagContainer, ListenerChannel, Listeners,
    },
    ability_events::{AttributeChanged, EffectAssetTags},
    bevy::{platform::collections::HashMap, prelude::*},
    system_schedule::GameSchedule,
};


// ============================================================================
// Plugin
// ============================================================================

pub struct WidgetControllerPlugin;

impl Plugin for WidgetControllerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<WidgetController>()
            .register_type::<AttributeText>()
            .register_type::<MessageText>()
            .add_systems(
                Update,
                (update_attribute_texts, update_message_texts).after(GameSchedule::Broadcast),
            )
            .add_observer(on_widget_controller_added)
            .add_observer(on_widget_controller_removed)
            .add_observer(on_attribute_changed)
            .add_observer(on_effect_asset_tags);
    }
}

// ============================================================================
// Components
// ============================================================================

/// Bridges one ability system to the HUD. Listens to attribute changes and
/// applied effect tags of `ability_host`.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
#[require(AttributeReadouts, MessageTags)]
pub struct WidgetController {
    pub player: Entity,
    pub ability_host: Entity,
}

/// Latest reported value per attribute
#[derive(Component, Default, Debug)]
pub struct AttributeReadouts(pub HashMap<Attribute, f32>);

/// Tags under [`MESSAGE_TAG_ROOT`] of the latest effect applied to the host that carried any
#[derive(Component, Default, Debug)]
pub struct MessageTags(pub Vec<GameplayTag>);

/// Text showing one attribute of a controller
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct AttributeText {
    pub controller: Entity,
    pub attribute: Attribute,
}

/// Text showing the latest effect message of a controller
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MessageText {
    pub controller: Entity,
}

pub const MESSAGE_TAG_ROOT: &str = "Message";

// ============================================================================
// Observers
// ============================================================================

/// Subscribes to the host and reports its current values to the new controller.
fn on_widget_controller_added(
    trigger: On<Add, WidgetController>,
    controllers: Query<&WidgetController>,
    mut hosts: Query<(&mut Listeners, &AttributeSet)>,
    mut commands: Commands,
) {
    let entity = trigger.event().entity;
    let Ok(controller) = controllers.get(entity) else {
        return;
    };
    let Ok((mut listeners, attributes)) = hosts.get_mut(controller.ability_host) else {
        warn!(ability_host = ?controller.ability_host, "widget controller host has no ability system");
        return;
    };

    listeners.subscribe(ListenerChannel::AttributeChanged, entity);
    listeners.subscribe(ListenerChannel::EffectAssetTags, entity);
    debug!(controller = ?entity, ability_host = ?controller.ability_host, "widget controller bound");

    for attribute in Attribute::ALL {
        commands.trigger(AttributeChanged {
            entity,
            ability_system: controller.ability_host,
            attribute,
            value: attributes.current(attribute),
        });
    }
}

fn on_widget_controller_removed(
    trigger: On<Remove, WidgetController>,
    controllers: Query<&WidgetController>,
    mut hosts: Query<&mut Listeners>,
) {
    let entity = trigger.event().entity;
    let Ok(controller) = controllers.get(entity) else {
        return;
    };
    let Ok(mut listeners) = hosts.get_mut(controller.ability_host) else {
        return;
    };

    listeners.unsubscribe(ListenerChannel::AttributeChanged, entity);
    listeners.unsubscribe(ListenerChannel::EffectAssetTags, entity);
}

fn on_attribute_changed(trigger: On<AttributeChanged>, mut readouts: Query<&mut AttributeReadouts>) {
    let event = trigger.event();
    if let Ok(mut readouts) = readouts.get_mut(event.entity) {
        readouts.0.insert(event.attribute, event.value);
    }
}

fn on_effect_asset_tags(trigger: On<EffectAssetTags>, mut messages: Query<&mut MessageTags>) {
    let event = trigger.event();
    let Ok(mut messages) = messages.get_mut(event.entity) else {
        return;
    };

    let received: GameplayTagContainer = event.tags.filtered(MESSAGE_TAG_ROOT);
    if received.is_empty() {
        return;
    }

    for tag in received.iter() {
        info!(message = %tag, "effect message");
    }
    messages.0 = received.0;
}

// ============================================================================
// Systems
// ============================================================================

fn update_attribute_texts(
    readouts: Query<&AttributeReadouts, Changed<AttributeReadouts>>,
    mut texts: Query<(&AttributeText, &mut Text)>,
) {
    for (attribute_text, mut text) in &mut texts {
        let Ok(readouts) = readouts.get(attribute_text.controller) else {
            continue;
        };
        let Some(value) = readouts.0.get(&attribute_text.attribute) else {
            continue;
        };

        text.0 = format!("{}: {value:.0}", attribute_text.attribute.name());
    }
}

fn update_message_texts(
    messages: Query<&MessageTags, Changed<MessageTags>>,
    mut texts: Query<(&MessageText, &mut Text)>,
) {
    for (message_text, mut text) in &mut texts {
        let Ok(messages) = messages.get(message_text.controller) else {
            continue;
        };

        text.0 = messages
            .0
            .iter()
            .map(GameplayTag::as_str)
            .collect::<Vec<_>>()
            .join(", ");
    }
}
