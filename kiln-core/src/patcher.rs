//! The only code that writes custom entries into frozen host registries.
//!
//! Each append is bracketed by a shape check. A failed check is fatal: it
//! means the host registries are not laid out the way this crate expects,
//! and continuing would leave them half patched.

use kiln_registry::{
    AppendEntry, HostRegistries, PatchError, TypeDictionary, TypeEntry, dictionary::SHAPE_VERSION,
};
use kiln_utils::Identifier;

use crate::error::RegistrationError;

/// Appends a custom item type to the item dictionary.
pub fn patch_item(host: &mut HostRegistries, entry: TypeEntry) -> Result<(), RegistrationError> {
    append_checked(&mut host.item_types, "item type dictionary", entry)
}

/// Appends a custom block to the block palette.
pub fn patch_block(host: &mut HostRegistries, entry: TypeEntry) -> Result<(), RegistrationError> {
    append_checked(&mut host.block_palette, "block palette", entry)
}

/// Appends the item form of a block and links it to the block.
pub fn patch_block_item(
    host: &mut HostRegistries,
    block: &Identifier,
    entry: TypeEntry,
) -> Result<(), RegistrationError> {
    let item = entry.identifier.clone();
    append_checked(&mut host.item_types, "item type dictionary", entry)?;
    host.block_item_ids
        .append_mapping(item, block.clone())
        .map_err(RegistrationError::from)
}

fn append_checked(
    dictionary: &mut TypeDictionary,
    table: &str,
    entry: TypeEntry,
) -> Result<(), RegistrationError> {
    check(dictionary, table)?;
    let id = entry.numeric_id;
    let name = entry.identifier.clone();
    dictionary
        .append_entry(id, name.clone(), entry)
        .map_err(|err| fatal_if_shape(dictionary.shape_version(), table, err))?;
    check(dictionary, table)?;
    log::debug!("Patched `{name}` ({id}) into the {table}");
    Ok(())
}

fn check(dictionary: &TypeDictionary, table: &str) -> Result<(), RegistrationError> {
    dictionary
        .check_shape()
        .map_err(|err| fatal_if_shape(dictionary.shape_version(), table, err))
}

fn fatal_if_shape(found: u32, table: &str, err: PatchError) -> RegistrationError {
    if let PatchError::Shape(reason) = &err {
        log::error!(
            "The host {table} (layout {found}, expected {SHAPE_VERSION}) does not have the expected layout: {reason}"
        );
    }
    err.into()
}
