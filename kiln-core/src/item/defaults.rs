use kiln_registry::{Component, ComponentList, Item, components::UseAnimation, item::ToolKind};

/// Use duration given to every consumable, in ticks.
const CONSUMABLE_USE_DURATION: i32 = 20;

/// Builds the components an item needs to behave on the client.
///
/// The result only depends on the item's stack size, display name and
/// [`ItemCapabilities`](kiln_registry::ItemCapabilities). Extra components
/// can be added to the returned list afterwards.
#[must_use]
pub fn init_components(item: &Item, texture: &str) -> ComponentList {
    let caps = &item.capabilities;
    let mut components = ComponentList::new();

    components.add(Component::Icon {
        texture: texture.to_owned(),
    });
    components.add(Component::CanDestroyInCreative(true));
    components.add(Component::MaxStackSize(item.max_stack_size));

    if let Some(armor) = caps.armor {
        components.add(Component::Wearable {
            slot: armor.slot,
            protection: armor.defense_points,
        });
    }

    if let Some(consumable) = caps.consumable {
        let animation = match consumable.food {
            Some(food) => {
                components.add(Component::Food {
                    can_always_eat: !food.requires_hunger,
                });
                UseAnimation::Eat
            }
            None => UseAnimation::Drink,
        };
        components.add(Component::UseAnimation(animation));
        components.add(Component::UseDuration(CONSUMABLE_USE_DURATION));
    }

    if let Some(max_durability) = caps.max_durability {
        components.add(Component::Durability { max_durability });
    }

    if caps.projectile {
        components.add(Component::Projectile {
            minimum_critical_power: 1.25,
            projectile_entity: "projectile".to_owned(),
        });
        components.add(Component::Throwable {
            do_swing_animation: true,
        });
    }

    if item.display_name != Item::UNKNOWN_NAME {
        components.add(Component::DisplayName(item.display_name.clone()));
    }

    if caps.fuel_time > 0 {
        components.add(Component::Fuel {
            duration: caps.fuel_time as f32,
        });
    }

    if caps.attack_points > 0 {
        components.add(Component::Damage(caps.attack_points));
    }

    if let Some(tool) = caps.tool {
        components.add(Component::HandEquipped(true));
        if tool == ToolKind::Sword {
            components.add(Component::CanDestroyInCreative(false));
        }
    }

    components
}
