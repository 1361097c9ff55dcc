//! Catalog loader: unit templates, equipment, abilities and bonus sources.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tactics_core::{Ability, BonusSource, CatalogSnapshot, EquipmentItem, UnitTemplate};

use crate::loaders::{LoadResult, read_file};

/// Catalog file layout. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    templates: Vec<UnitTemplate>,
    items: Vec<EquipmentItem>,
    abilities: Vec<Ability>,
    bonus_sources: Vec<BonusSource>,
}

/// Loader for the content catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<CatalogSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a catalog from RON text.
    ///
    /// Duplicate ids are rejected. References to entries the file does not
    /// define are logged and left for the engine's fallbacks to absorb.
    pub fn parse(content: &str) -> LoadResult<CatalogSnapshot> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        ensure_unique("template", file.templates.iter().map(|t| t.id.to_string()))?;
        ensure_unique("item", file.items.iter().map(|i| i.id.to_string()))?;
        ensure_unique("ability", file.abilities.iter().map(|a| a.id.to_string()))?;
        ensure_unique(
            "bonus source",
            file.bonus_sources.iter().map(|s| s.id.to_string()),
        )?;
        warn_dangling(&file);

        let mut catalog = CatalogSnapshot::new();
        for template in file.templates {
            catalog.insert_template(template);
        }
        for item in file.items {
            catalog.insert_item(item);
        }
        for ability in file.abilities {
            catalog.insert_ability(ability);
        }
        for source in file.bonus_sources {
            catalog.insert_bonus_source(source);
        }

        tracing::debug!(
            templates = catalog.template_count(),
            items = catalog.item_count(),
            abilities = catalog.ability_count(),
            bonus_sources = catalog.bonus_source_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

fn ensure_unique(kind: &str, ids: impl Iterator<Item = String>) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            anyhow::bail!("Duplicate {} id in catalog: {}", kind, id);
        }
    }
    Ok(())
}

fn warn_dangling(file: &CatalogFile) {
    let templates: HashSet<_> = file.templates.iter().map(|t| &t.id).collect();
    let items: HashSet<_> = file.items.iter().map(|i| &i.id).collect();
    let abilities: HashSet<_> = file.abilities.iter().map(|a| &a.id).collect();

    for template in &file.templates {
        for (_, item) in &template.starting_equipment {
            if !items.contains(item) {
                tracing::warn!(template = %template.id, item = %item, "starting item not in catalog");
            }
        }
        for unlock in &template.ability_unlocks {
            if !abilities.contains(&unlock.ability) {
                tracing::warn!(template = %template.id, ability = %unlock.ability, "unlocked ability not in catalog");
            }
        }
    }
    for source in &file.bonus_sources {
        for bonus in &source.unit_bonuses {
            if !templates.contains(&bonus.template) {
                tracing::warn!(source = %source.id, template = %bonus.template, "bonus targets unknown template");
            }
        }
        for bonus in &source.equipment_bonuses {
            if !items.contains(&bonus.item) {
                tracing::warn!(source = %source.id, item = %bonus.item, "bonus targets unknown item");
            }
        }
    }
}
