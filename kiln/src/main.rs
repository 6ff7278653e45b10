//! Registers a few custom types against the vanilla registries and resolves
//! them on a world worker.

use std::{env, path::PathBuf};

use anyhow::Context;
use kiln::{CreativeInventoryInfo, Kiln, config::KilnConfig, logger};
use kiln_core::item::init_components;
use kiln_registry::{
    Block, Component, ComponentList, HostRegistries, Item, ItemCapabilities, Prototype,
    item::ToolKind,
};
use kiln_utils::Identifier;

fn ruby_block(identifier: &Identifier) -> Prototype {
    let components: ComponentList = [
        Component::LightEmission(3),
        Component::DestructibleByMining {
            seconds_to_destroy: 2.5,
        },
        Component::Geometry("geometry.ruby_block".to_owned()),
        Component::MaterialInstances {
            texture: "ruby_block".to_owned(),
            render_method: "opaque".to_owned(),
        },
    ]
    .into_iter()
    .collect();
    Block::new(identifier.clone(), "Ruby Block")
        .with_components(components)
        .into()
}

fn ruby(identifier: &Identifier) -> Prototype {
    let item = Item::new(identifier.clone()).with_display_name("Ruby");
    let components = init_components(&item, "ruby");
    item.with_components(components).into()
}

fn ruby_sword(identifier: &Identifier) -> Prototype {
    let item = Item::new(identifier.clone())
        .with_display_name("Ruby Sword")
        .with_max_stack_size(1)
        .with_capabilities(ItemCapabilities {
            max_durability: Some(781),
            attack_points: 7,
            tool: Some(ToolKind::Sword),
            ..ItemCapabilities::default()
        });
    let components = init_components(&item, "ruby_sword");
    item.with_components(components).into()
}

fn main() -> anyhow::Result<()> {
    let data_folder = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("plugin_data/kiln"), PathBuf::from);
    let config = KilnConfig::load_or_create(&data_folder)
        .with_context(|| format!("loading config from {}", data_folder.display()))?;
    logger::init(&config.log);

    let mut kiln = Kiln::with_config(data_folder, config);
    let mut host = HostRegistries::vanilla();

    let types = kiln.types_mut();
    types.register_block(
        &mut host,
        ruby_block,
        "example:ruby_block",
        Some(CreativeInventoryInfo::ungrouped(
            CreativeInventoryInfo::CATEGORY_CONSTRUCTION,
        )),
    )?;
    types.register_item(
        &mut host,
        ruby,
        "example:ruby",
        Some(CreativeInventoryInfo::new(
            CreativeInventoryInfo::CATEGORY_ITEMS,
            CreativeInventoryInfo::GROUP_MINERAL,
        )),
    )?;
    types.register_item(
        &mut host,
        ruby_sword,
        "example:ruby_sword",
        Some(CreativeInventoryInfo::new(
            CreativeInventoryInfo::CATEGORY_EQUIPMENT,
            CreativeInventoryInfo::GROUP_SWORD,
        )),
    )?;

    let stack = kiln.types().get(&host, "example:ruby", 16)?;
    log::info!(
        "Main context: {} x{} has id {}",
        stack.identifier,
        stack.count,
        stack.type_id
    );

    let pool = kiln.start_workers()?;
    let ids = pool.run(|context| {
        ["example:ruby_block", "example:ruby", "example:ruby_sword"].map(|name| {
            let id = context
                .types
                .get(&context.host, name, 1)
                .map(|item| item.type_id)
                .ok();
            (name, id)
        })
    })?;
    for (name, id) in ids {
        log::info!("Worker context: {name} has id {id:?}");
    }
    Ok(())
}
