//! Client metadata trees built from component lists.
//!
//! Component based items produce
//! `{components: {..., item_properties: {...}}, id, name}`; blocks produce
//! their palette entry. Anything else gets an empty compound.

use kiln_registry::{Block, Component, ComponentList, ComponentValue, Item};
use simdnbt::{
    Mutf8String,
    owned::{NbtCompound, NbtList, NbtTag},
};

use crate::{error::RegistrationError, item::CreativeInventoryInfo};

/// Molang version sent with custom block palette entries.
const MOLANG_VERSION: i32 = 1;

/// Metadata for a custom item.
pub fn item_metadata(
    item: &Item,
    id: i32,
    creative: Option<&CreativeInventoryInfo>,
) -> Result<NbtCompound, RegistrationError> {
    let Some(list) = &item.components else {
        return Ok(NbtCompound::new());
    };

    let mut properties = NbtCompound::new();
    let mut components = components_compound(list, Some(&mut properties))?;
    if let Some(info) = creative {
        set_tag(
            &mut properties,
            "creative_category",
            NbtTag::Int(info.numeric_category()),
        );
        set_tag(
            &mut properties,
            "creative_group",
            NbtTag::String(info.group().into()),
        );
    }
    set_tag(&mut components, "item_properties", NbtTag::Compound(properties));

    let mut root = NbtCompound::new();
    root.insert("components", NbtTag::Compound(components));
    root.insert("id", NbtTag::Int(id));
    root.insert("name", NbtTag::String(item.identifier.to_string().into()));
    Ok(root)
}

/// Palette metadata for a custom block.
pub fn block_metadata(
    block: &Block,
    id: i32,
    creative: Option<&CreativeInventoryInfo>,
) -> Result<NbtCompound, RegistrationError> {
    let mut menu_category = NbtCompound::new();
    let (category, group) = creative.map_or(("none", ""), |info| (info.category(), info.group()));
    menu_category.insert("category", NbtTag::String(category.into()));
    menu_category.insert("group", NbtTag::String(group.into()));

    let mut vanilla_block_data = NbtCompound::new();
    vanilla_block_data.insert("block_id", NbtTag::Int(id));

    let mut root = NbtCompound::new();
    root.insert(
        "components",
        NbtTag::Compound(components_compound(&block.components, None)?),
    );
    root.insert("menu_category", NbtTag::Compound(menu_category));
    root.insert("molangVersion", NbtTag::Int(MOLANG_VERSION));
    root.insert("properties", NbtTag::List(NbtList::Empty));
    root.insert("vanilla_block_data", NbtTag::Compound(vanilla_block_data));
    Ok(root)
}

/// Splits `list` into behavioural components and properties.
///
/// Without a property sink every component lands in the returned compound.
fn components_compound(
    list: &ComponentList,
    mut properties: Option<&mut NbtCompound>,
) -> Result<NbtCompound, RegistrationError> {
    let mut components = NbtCompound::new();
    for component in list.iter() {
        let tag = component_tag(component)?;
        match properties.as_deref_mut() {
            Some(properties) if component.is_property() => {
                properties.insert(component.name(), tag);
            }
            _ => {
                components.insert(component.name(), tag);
            }
        }
    }
    Ok(components)
}

/// Inserts `tag` under `name`, dropping any tag already stored there.
fn set_tag(compound: &mut NbtCompound, name: &str, tag: NbtTag) {
    compound.take(name);
    compound.insert(name, tag);
}

/// Converts one component's value into a tag.
pub fn component_tag(component: &Component) -> Result<NbtTag, RegistrationError> {
    value_tag(component.name(), &component.value())
}

fn value_tag(component: &str, value: &ComponentValue) -> Result<NbtTag, RegistrationError> {
    Ok(match value {
        ComponentValue::Bool(b) => NbtTag::Byte(i8::from(*b)),
        ComponentValue::Int(i) => NbtTag::Int(*i),
        ComponentValue::Float(f) => NbtTag::Float(finite(component, *f)?),
        ComponentValue::String(s) => NbtTag::String(s.as_str().into()),
        ComponentValue::List(values) => NbtTag::List(list_tag(component, values)?),
        ComponentValue::Compound(pairs) => NbtTag::Compound(compound_tag(component, pairs)?),
    })
}

fn compound_tag(
    component: &str,
    pairs: &[(String, ComponentValue)],
) -> Result<NbtCompound, RegistrationError> {
    let mut compound = NbtCompound::new();
    for (key, value) in pairs {
        compound.insert(key.as_str(), value_tag(component, value)?);
    }
    Ok(compound)
}

fn list_tag(component: &str, values: &[ComponentValue]) -> Result<NbtList, RegistrationError> {
    let mixed = || build_error(component, "list mixes value types");
    let Some(first) = values.first() else {
        return Ok(NbtList::Empty);
    };

    Ok(match first {
        ComponentValue::Bool(_) => NbtList::Byte(
            values
                .iter()
                .map(|v| match v {
                    ComponentValue::Bool(b) => Ok(i8::from(*b)),
                    _ => Err(mixed()),
                })
                .collect::<Result<_, _>>()?,
        ),
        ComponentValue::Int(_) => NbtList::Int(
            values
                .iter()
                .map(|v| match v {
                    ComponentValue::Int(i) => Ok(*i),
                    _ => Err(mixed()),
                })
                .collect::<Result<_, _>>()?,
        ),
        ComponentValue::Float(_) => NbtList::Float(
            values
                .iter()
                .map(|v| match v {
                    ComponentValue::Float(f) => finite(component, *f),
                    _ => Err(mixed()),
                })
                .collect::<Result<_, _>>()?,
        ),
        ComponentValue::String(_) => NbtList::String(
            values
                .iter()
                .map(|v| match v {
                    ComponentValue::String(s) => Ok(Mutf8String::from(s.as_str())),
                    _ => Err(mixed()),
                })
                .collect::<Result<_, _>>()?,
        ),
        ComponentValue::List(_) => NbtList::List(
            values
                .iter()
                .map(|v| match v {
                    ComponentValue::List(inner) => list_tag(component, inner),
                    _ => Err(mixed()),
                })
                .collect::<Result<_, _>>()?,
        ),
        ComponentValue::Compound(_) => NbtList::Compound(
            values
                .iter()
                .map(|v| match v {
                    ComponentValue::Compound(pairs) => compound_tag(component, pairs),
                    _ => Err(mixed()),
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn finite(component: &str, value: f32) -> Result<f32, RegistrationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(build_error(component, &format!("{value} is not a finite float")))
    }
}

fn build_error(component: &str, reason: &str) -> RegistrationError {
    RegistrationError::MetadataBuild {
        component: component.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use kiln_utils::Identifier;

    use super::*;

    fn ruby() -> Item {
        Item::new("example:ruby".parse::<Identifier>().unwrap())
    }

    #[test]
    fn plain_items_get_an_empty_tree() {
        let metadata = item_metadata(&ruby(), 10_000, None).unwrap();
        assert_eq!(metadata, NbtCompound::new());
    }

    #[test]
    fn stack_size_and_durability_without_creative_info() {
        let item = ruby().with_components(
            [
                Component::MaxStackSize(64),
                Component::Durability {
                    max_durability: 100,
                },
            ]
            .into_iter()
            .collect(),
        );
        let metadata = item_metadata(&item, 10_000, None).unwrap();

        let components = metadata.compound("components").unwrap();
        let properties = components.compound("item_properties").unwrap();
        assert_eq!(properties.int("max_stack_size"), Some(64));
        assert!(properties.get("creative_category").is_none());
        assert!(properties.get("creative_group").is_none());
        assert_eq!(
            components
                .compound("minecraft:durability")
                .and_then(|d| d.int("max_durability")),
            Some(100)
        );
        assert_eq!(metadata.int("id"), Some(10_000));
        assert_eq!(
            metadata.string("name").map(|s| s.to_str().into_owned()),
            Some("example:ruby".to_owned())
        );
    }

    #[test]
    fn creative_info_lands_in_item_properties() {
        let item = ruby().with_components([Component::MaxStackSize(16)].into_iter().collect());
        let info = CreativeInventoryInfo::new(
            CreativeInventoryInfo::CATEGORY_ITEMS,
            CreativeInventoryInfo::GROUP_MINERAL,
        );
        let metadata = item_metadata(&item, 10_000, Some(&info)).unwrap();
        let properties = metadata
            .compound("components")
            .and_then(|c| c.compound("item_properties"))
            .unwrap();

        assert_eq!(properties.int("creative_category"), Some(4));
        assert_eq!(
            properties.string("creative_group").map(|s| s.to_str().into_owned()),
            Some("itemGroup.name.mineral".to_owned())
        );
    }

    #[test]
    fn creative_info_overrides_same_named_property() {
        let item = ruby().with_components(
            [Component::Custom {
                name: "creative_category".to_owned(),
                value: ComponentValue::Int(99),
                property: true,
            }]
            .into_iter()
            .collect(),
        );
        let info = CreativeInventoryInfo::ungrouped(CreativeInventoryInfo::CATEGORY_ITEMS);
        let metadata = item_metadata(&item, 10_000, Some(&info)).unwrap();
        let properties = metadata
            .compound("components")
            .and_then(|c| c.compound("item_properties"))
            .unwrap();

        let keys = properties
            .keys()
            .filter(|k| k.to_str() == "creative_category")
            .count();
        assert_eq!(keys, 1);
        assert_eq!(properties.int("creative_category"), Some(4));
    }

    #[test]
    fn block_palette_entry() {
        let block = Block::new("example:ruby_block".parse().unwrap(), "Ruby Block")
            .with_components([Component::LightEmission(7)].into_iter().collect());
        let metadata = block_metadata(&block, 5000, None).unwrap();

        assert_eq!(metadata.int("molangVersion"), Some(1));
        assert!(
            metadata
                .compound("components")
                .and_then(|c| c.compound("minecraft:light_emission"))
                .is_some()
        );
        assert_eq!(
            metadata
                .compound("vanilla_block_data")
                .and_then(|d| d.int("block_id")),
            Some(5000)
        );
    }

    #[test]
    fn mixed_lists_are_rejected() {
        let component = Component::Custom {
            name: "example:tags".to_owned(),
            value: ComponentValue::List(vec![
                ComponentValue::Int(1),
                ComponentValue::String("two".to_owned()),
            ]),
            property: false,
        };
        assert_eq!(
            component_tag(&component),
            Err(RegistrationError::MetadataBuild {
                component: "example:tags".to_owned(),
                reason: "list mixes value types".to_owned(),
            })
        );
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let component = Component::Fuel {
            duration: f32::NAN,
        };
        assert!(matches!(
            component_tag(&component),
            Err(RegistrationError::MetadataBuild { .. })
        ));
    }

    #[test]
    fn homogeneous_lists_convert() {
        let component = Component::Custom {
            name: "example:layers".to_owned(),
            value: ComponentValue::List(vec![
                ComponentValue::String("a".to_owned()),
                ComponentValue::String("b".to_owned()),
            ]),
            property: false,
        };
        let NbtTag::List(NbtList::String(strings)) = component_tag(&component).unwrap() else {
            panic!("expected a string list");
        };
        assert_eq!(strings.len(), 2);
    }
}
