use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Attribute {
    Health,
    MaxHealth,
    Mana,
    MaxMana,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Health,
        Attribute::MaxHealth,
        Attribute::Mana,
        Attribute::MaxMana,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Health => "Health",
            Attribute::MaxHealth => "Max Health",
            Attribute::Mana => "Mana",
            Attribute::MaxMana => "Max Mana",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum ModifierOp {
    #[default]
    Add,
    Multiply,
    /// Replaces the value, wins over every other modifier.
    Override,
}

/// Modifier with its magnitude already evaluated at the spec level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct EvaluatedModifier {
    pub attribute: Attribute,
    pub op: ModifierOp,
    pub magnitude: f32,
}

impl EvaluatedModifier {
    pub fn apply_to(&self, value: f32) -> f32 {
        match self.op {
            ModifierOp::Add => value + self.magnitude,
            ModifierOp::Multiply => value * self.magnitude,
            ModifierOp::Override => self.magnitude,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct AttributeValue {
    pub base: f32,
    pub current: f32,
}

impl AttributeValue {
    fn new(value: f32) -> Self {
        Self {
            base: value,
            current: value,
        }
    }
}

/// Attribute values owned by an ability system.
///
/// `base` only changes through instant (or periodic) executions,
/// `current` is `base` with the modifiers of all active effects on top.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component, Default)]
pub struct AttributeSet {
    values: [AttributeValue; 4],
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::new(100.0, 100.0, 50.0, 50.0)
    }
}

impl AttributeSet {
    pub fn new(health: f32, max_health: f32, mana: f32, max_mana: f32) -> Self {
        let mut set = Self {
            values: [
                AttributeValue::new(health),
                AttributeValue::new(max_health),
                AttributeValue::new(mana),
                AttributeValue::new(max_mana),
            ],
        };
        set.clamp_base_vitals();
        set.clamp_current_vitals();
        set
    }

    pub fn base(&self, attribute: Attribute) -> f32 {
        self.values[attribute.index()].base
    }

    pub fn current(&self, attribute: Attribute) -> f32 {
        self.values[attribute.index()].current
    }

    /// Permanently changes the base value. Call [`AttributeSet::recompute`] afterwards.
    pub fn execute(&mut self, modifier: &EvaluatedModifier) {
        let value = &mut self.values[modifier.attribute.index()];
        value.base = modifier.apply_to(value.base);
        self.clamp_base_vitals();
    }

    /// Rebuilds current values from base values and the given active modifiers.
    /// Adds are summed, multipliers are multiplied, the last override wins.
    pub fn recompute<'a>(&mut self, modifiers: impl Iterator<Item = &'a EvaluatedModifier>) {
        let mut additive = [0.0; 4];
        let mut multiplier = [1.0; 4];
        let mut overrides = [None; 4];

        for modifier in modifiers {
            let index = modifier.attribute.index();
            match modifier.op {
                ModifierOp::Add => additive[index] += modifier.magnitude,
                ModifierOp::Multiply => multiplier[index] *= modifier.magnitude,
                ModifierOp::Override => overrides[index] = Some(modifier.magnitude),
            }
        }

        for (index, value) in self.values.iter_mut().enumerate() {
            value.current =
                overrides[index].unwrap_or((value.base + additive[index]) * multiplier[index]);
        }

        self.clamp_current_vitals();
    }

    const VITALS: [(Attribute, Attribute); 2] = [
        (Attribute::Health, Attribute::MaxHealth),
        (Attribute::Mana, Attribute::MaxMana),
    ];

    // Base Health and Mana stay within [0, base max]. Active effects never
    // touch base values, so removing them restores the previous state.
    fn clamp_base_vitals(&mut self) {
        for (vital, max) in Self::VITALS {
            let max_value = self.base(max).max(0.0);
            let value = &mut self.values[vital.index()];
            value.base = value.base.clamp(0.0, max_value);
        }
    }

    // Current Health and Mana stay within [0, current max].
    fn clamp_current_vitals(&mut self) {
        for (vital, max) in Self::VITALS {
            let max_value = self.current(max).max(0.0);
            let value = &mut self.values[vital.index()];
            value.current = value.current.clamp(0.0, max_value);
        }
    }
}
