//! Client-visible item and block components.
//!
//! Every component knows its network name, whether it is sent as an item
//! property, and how to express its value as a [`ComponentValue`] tree.

use smallvec::SmallVec;

/// A tagged value tree describing one component's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// Byte tag holding 0 or 1.
    Bool(bool),
    /// Int tag.
    Int(i32),
    /// Float tag.
    Float(f32),
    /// String tag.
    String(String),
    /// Lists must be homogeneous to be sent to clients.
    List(Vec<ComponentValue>),
    /// Ordered key/value pairs.
    Compound(Vec<(String, ComponentValue)>),
}

impl ComponentValue {
    /// Builds a compound from `(key, value)` pairs.
    pub fn compound<K: Into<String>>(pairs: impl IntoIterator<Item = (K, ComponentValue)>) -> Self {
        Self::Compound(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Looks up a key in a compound value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ComponentValue> {
        match self {
            Self::Compound(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Armor slot a wearable item goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WearableSlot {
    /// Head armor slot (helmet).
    Head,
    /// Chest armor slot (chestplate).
    Chest,
    /// Legs armor slot (leggings).
    Legs,
    /// Feet armor slot (boots).
    Feet,
    /// Any armor slot.
    Armor,
}

impl WearableSlot {
    /// Slot name as the client expects it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Head => "slot.armor.head",
            Self::Chest => "slot.armor.chest",
            Self::Legs => "slot.armor.legs",
            Self::Feet => "slot.armor.feet",
            Self::Armor => "slot.armor",
        }
    }
}

/// Animation played while an item is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseAnimation {
    /// Eating, for food.
    Eat = 1,
    /// Drinking, for potions and the like.
    Drink = 2,
}

/// One client-visible component.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Inventory icon.
    Icon {
        /// Texture short name from the resource pack.
        texture: String,
    },
    /// Whether creative players can break blocks while holding the item.
    CanDestroyInCreative(bool),
    /// Stack size limit.
    MaxStackSize(i32),
    /// Armor piece.
    Wearable {
        /// Slot the item is worn in.
        slot: WearableSlot,
        /// Armor points.
        protection: i32,
    },
    /// Edible item.
    Food {
        /// Edible with a full hunger bar.
        can_always_eat: bool,
    },
    /// Animation while in use.
    UseAnimation(UseAnimation),
    /// Use duration in ticks.
    UseDuration(i32),
    /// Breaks after a number of uses.
    Durability {
        /// Uses before breaking.
        max_durability: i32,
    },
    /// Fired as a projectile.
    Projectile {
        /// Power at which hits become critical.
        minimum_critical_power: f32,
        /// Entity spawned when fired.
        projectile_entity: String,
    },
    /// Can be thrown.
    Throwable {
        /// Play the swing animation when thrown.
        do_swing_animation: bool,
    },
    /// Name shown to players.
    DisplayName(String),
    /// Usable as furnace fuel.
    Fuel {
        /// Burn time in ticks.
        duration: f32,
    },
    /// Attack damage.
    Damage(i32),
    /// Held like a tool.
    HandEquipped(bool),
    /// Can be held in the off hand.
    AllowOffHand(bool),
    /// Block light level.
    LightEmission(i32),
    /// Block mining time.
    DestructibleByMining {
        /// Seconds to break by hand.
        seconds_to_destroy: f32,
    },
    /// Block geometry identifier.
    Geometry(String),
    /// Block texture for all faces.
    MaterialInstances {
        /// Texture short name.
        texture: String,
        /// Client render method, such as `opaque`.
        render_method: String,
    },
    /// Anything the built-in set does not cover.
    Custom {
        /// Wire name.
        name: String,
        /// Payload.
        value: ComponentValue,
        /// Sent under `item_properties`.
        property: bool,
    },
}

impl Component {
    /// The name the component is keyed under on the wire.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Icon { .. } => "minecraft:icon",
            Self::CanDestroyInCreative(_) => "can_destroy_in_creative",
            Self::MaxStackSize(_) => "max_stack_size",
            Self::Wearable { .. } => "minecraft:wearable",
            Self::Food { .. } => "minecraft:food",
            Self::UseAnimation(_) => "use_animation",
            Self::UseDuration(_) => "use_duration",
            Self::Durability { .. } => "minecraft:durability",
            Self::Projectile { .. } => "minecraft:projectile",
            Self::Throwable { .. } => "minecraft:throwable",
            Self::DisplayName(_) => "minecraft:display_name",
            Self::Fuel { .. } => "minecraft:fuel",
            Self::Damage(_) => "damage",
            Self::HandEquipped(_) => "hand_equipped",
            Self::AllowOffHand(_) => "allow_off_hand",
            Self::LightEmission(_) => "minecraft:light_emission",
            Self::DestructibleByMining { .. } => "minecraft:destructible_by_mining",
            Self::Geometry(_) => "minecraft:geometry",
            Self::MaterialInstances { .. } => "minecraft:material_instances",
            Self::Custom { name, .. } => name.as_str(),
        }
    }

    /// Properties go into `item_properties` instead of the component root.
    #[must_use]
    pub fn is_property(&self) -> bool {
        match self {
            Self::CanDestroyInCreative(_)
            | Self::MaxStackSize(_)
            | Self::UseAnimation(_)
            | Self::UseDuration(_)
            | Self::Damage(_)
            | Self::HandEquipped(_)
            | Self::AllowOffHand(_) => true,
            Self::Custom { property, .. } => *property,
            _ => false,
        }
    }

    /// The component's payload.
    #[must_use]
    pub fn value(&self) -> ComponentValue {
        use ComponentValue as V;
        match self {
            Self::Icon { texture } => V::compound([(
                "textures",
                V::compound([("default", V::String(texture.clone()))]),
            )]),
            Self::CanDestroyInCreative(b) | Self::HandEquipped(b) | Self::AllowOffHand(b) => {
                V::Bool(*b)
            }
            Self::MaxStackSize(n) | Self::UseDuration(n) | Self::Damage(n) => V::Int(*n),
            Self::Wearable { slot, protection } => V::compound([
                ("slot", V::String(slot.as_str().to_owned())),
                ("protection", V::Int(*protection)),
            ]),
            Self::Food { can_always_eat } => {
                V::compound([("can_always_eat", V::Bool(*can_always_eat))])
            }
            Self::UseAnimation(animation) => V::Int(*animation as i32),
            Self::Durability { max_durability } => {
                V::compound([("max_durability", V::Int(*max_durability))])
            }
            Self::Projectile {
                minimum_critical_power,
                projectile_entity,
            } => V::compound([
                ("minimum_critical_power", V::Float(*minimum_critical_power)),
                ("projectile_entity", V::String(projectile_entity.clone())),
            ]),
            Self::Throwable { do_swing_animation } => {
                V::compound([("do_swing_animation", V::Bool(*do_swing_animation))])
            }
            Self::DisplayName(name) => V::compound([("value", V::String(name.clone()))]),
            Self::Fuel { duration } => V::compound([("duration", V::Float(*duration))]),
            Self::LightEmission(level) => V::compound([("emission", V::Int(*level))]),
            Self::DestructibleByMining { seconds_to_destroy } => {
                V::compound([("value", V::Float(*seconds_to_destroy))])
            }
            Self::Geometry(geometry) => V::compound([("identifier", V::String(geometry.clone()))]),
            Self::MaterialInstances {
                texture,
                render_method,
            } => V::compound([
                ("mappings", V::Compound(Vec::new())),
                (
                    "materials",
                    V::compound([(
                        "*",
                        V::compound([
                            ("texture", V::String(texture.clone())),
                            ("render_method", V::String(render_method.clone())),
                        ]),
                    )]),
                ),
            ]),
            Self::Custom { value, .. } => value.clone(),
        }
    }
}

/// Components keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentList {
    components: SmallVec<[Component; 8]>,
}

impl ComponentList {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component, replacing any existing one with the same name.
    pub fn add(&mut self, component: Component) {
        if let Some(slot) = self
            .components
            .iter_mut()
            .find(|c| c.name() == component.name())
        {
            *slot = component;
        } else {
            self.components.push(component);
        }
    }

    /// Whether a component named `name` is present.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The component named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    /// Components in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<Component> for ComponentList {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut list = Self::new();
        for component in iter {
            list.add(component);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_same_name_replaces() {
        let mut list = ComponentList::new();
        list.add(Component::CanDestroyInCreative(true));
        list.add(Component::MaxStackSize(16));
        list.add(Component::CanDestroyInCreative(false));

        assert_eq!(list.len(), 2);
        assert_eq!(
            list.get("can_destroy_in_creative"),
            Some(&Component::CanDestroyInCreative(false))
        );
        // replacement keeps the first position
        assert_eq!(list.iter().next().map(Component::name), Some("can_destroy_in_creative"));
    }

    #[test]
    fn property_split() {
        assert!(Component::MaxStackSize(64).is_property());
        assert!(!Component::Durability { max_durability: 100 }.is_property());
        let custom = Component::Custom {
            name: "example:glint".to_owned(),
            value: ComponentValue::Bool(true),
            property: true,
        };
        assert!(custom.is_property());
        assert_eq!(custom.name(), "example:glint");
    }

    #[test]
    fn values_follow_wire_layout() {
        let icon = Component::Icon {
            texture: "ruby".to_owned(),
        }
        .value();
        assert_eq!(
            icon.get("textures").and_then(|t| t.get("default")),
            Some(&ComponentValue::String("ruby".to_owned()))
        );

        let wearable = Component::Wearable {
            slot: WearableSlot::Head,
            protection: 3,
        }
        .value();
        assert_eq!(
            wearable.get("slot"),
            Some(&ComponentValue::String("slot.armor.head".to_owned()))
        );
        assert_eq!(Component::UseAnimation(UseAnimation::Drink).value(), ComponentValue::Int(2));
    }
}
