//! Static asset paths for champions, spells, runes, items and profile icons.
//!
//! Identifiers map to predictable paths under a URL prefix. Anything that
//! cannot be resolved falls back to a fixed placeholder image.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::AssetConfig;
use crate::models::{PlayerMatchView, Runes, TeamMember, NOT_AVAILABLE};

/// An icon to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset<'a> {
    ChampionTile(&'a str),
    SummonerSpell(&'a str),
    Keystone { tree: &'a str, keystone: &'a str },
    SecondaryTree(&'a str),
    Item(u32),
    ProfileIcon(u32),
}

impl Asset<'_> {
    /// Path relative to the asset prefix, or `None` if the identifier is unusable.
    pub fn relative_path(&self) -> Option<String> {
        match *self {
            Asset::ChampionTile(c) => usable(c).map(|c| format!("champion/tiles/{}_0.jpg", c)),
            Asset::SummonerSpell(s) => usable(s).map(|s| format!("summonerSpellIcon/{}.jpg", s)),
            Asset::Keystone { tree, keystone } => {
                let tree = usable(tree)?;
                let keystone = usable(keystone)?;
                Some(format!("runeIcon/{}/{}.png", tree, keystone))
            }
            Asset::SecondaryTree(t) => usable(t).map(|t| format!("runeIcon/{}/_{}.png", t, t)),
            Asset::Item(0) => None,
            Asset::Item(id) => Some(format!("item/{}.png", id)),
            Asset::ProfileIcon(id) => Some(format!("profileicon/{}.png", id)),
        }
    }
}

fn usable(id: &str) -> Option<&str> {
    let id = id.trim();
    let bad = id.is_empty()
        || id == NOT_AVAILABLE
        || id.contains('/')
        || id.contains('\\')
        || id.contains("..");
    (!bad).then_some(id)
}

/// Icon URLs for one match card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardIcons {
    pub champion: String,
    pub spells: Vec<String>,
    pub keystone: String,
    pub secondary_tree: String,
    pub items: Vec<String>,
    pub team_1: Vec<String>,
    pub team_2: Vec<String>,
}

/// Maps assets to URLs, checking an on-disk copy when one is configured.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    url_prefix: String,
    root: Option<PathBuf>,
    placeholder: String,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::from_config(&AssetConfig::default())
    }
}

impl AssetResolver {
    pub fn from_config(config: &AssetConfig) -> Self {
        Self {
            url_prefix: config.url_prefix.trim_end_matches('/').to_string(),
            root: config.root.clone(),
            placeholder: config.placeholder.clone(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// URL for `asset`, or the fallback image.
    pub fn resolve(&self, asset: Asset<'_>) -> String {
        let Some(relative) = asset.relative_path() else {
            return self.fallback(asset);
        };
        if let Some(root) = &self.root {
            if !root.join(&relative).is_file() {
                return self.fallback(asset);
            }
        }
        format!("{}/{}", self.url_prefix, relative)
    }

    fn fallback(&self, asset: Asset<'_>) -> String {
        match asset {
            Asset::ProfileIcon(_) => format!("{}/profileicon/1.png", self.url_prefix),
            _ => self.placeholder.clone(),
        }
    }

    pub fn profile_icon(&self, icon_id: Option<u32>) -> String {
        match icon_id {
            Some(id) => self.resolve(Asset::ProfileIcon(id)),
            None => self.fallback(Asset::ProfileIcon(1)),
        }
    }

    pub fn keystone(&self, runes: &Runes) -> String {
        self.resolve(Asset::Keystone {
            tree: runes.primary.as_deref().unwrap_or(NOT_AVAILABLE),
            keystone: runes.keystone.as_deref().unwrap_or(NOT_AVAILABLE),
        })
    }

    pub fn secondary_tree(&self, runes: &Runes) -> String {
        self.resolve(Asset::SecondaryTree(
            runes.secondary.as_deref().unwrap_or(NOT_AVAILABLE),
        ))
    }

    /// Every icon needed to draw `view`. Spells and items always have two and seven entries.
    pub fn card_icons(&self, view: &PlayerMatchView) -> CardIcons {
        let team = |members: &[TeamMember]| -> Vec<String> {
            members
                .iter()
                .map(|m| self.resolve(Asset::ChampionTile(&m.champion)))
                .collect()
        };

        CardIcons {
            champion: self.resolve(Asset::ChampionTile(&view.champion)),
            spells: view
                .spells
                .iter()
                .map(|slot| match slot {
                    Some(s) => self.resolve(Asset::SummonerSpell(s)),
                    None => self.placeholder.clone(),
                })
                .collect(),
            keystone: self.keystone(&view.runes),
            secondary_tree: self.secondary_tree(&view.runes),
            items: view
                .items
                .slots()
                .iter()
                .map(|slot| self.resolve(Asset::Item(slot.unwrap_or(0))))
                .collect(),
            team_1: team(&view.teams.team_1),
            team_2: team(&view.teams.team_2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Items, RawMatch};
    use crate::projector::project_for_player;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            Asset::ChampionTile("Ahri").relative_path().as_deref(),
            Some("champion/tiles/Ahri_0.jpg")
        );
        assert_eq!(
            Asset::SummonerSpell("Flash").relative_path().as_deref(),
            Some("summonerSpellIcon/Flash.jpg")
        );
        assert_eq!(
            Asset::Keystone { tree: "Domination", keystone: "Electrocute" }
                .relative_path()
                .as_deref(),
            Some("runeIcon/Domination/Electrocute.png")
        );
        assert_eq!(
            Asset::SecondaryTree("Sorcery").relative_path().as_deref(),
            Some("runeIcon/Sorcery/_Sorcery.png")
        );
        assert_eq!(Asset::Item(3089).relative_path().as_deref(), Some("item/3089.png"));
        assert_eq!(
            Asset::ProfileIcon(4568).relative_path().as_deref(),
            Some("profileicon/4568.png")
        );
    }

    #[test]
    fn test_unusable_identifiers() {
        assert_eq!(Asset::ChampionTile("N/A").relative_path(), None);
        assert_eq!(Asset::ChampionTile("  ").relative_path(), None);
        assert_eq!(Asset::ChampionTile("../etc").relative_path(), None);
        assert_eq!(Asset::Item(0).relative_path(), None);
        assert_eq!(
            Asset::Keystone { tree: "Domination", keystone: "N/A" }.relative_path(),
            None
        );
    }

    #[test]
    fn test_resolve_without_root() {
        let resolver = AssetResolver::default();
        assert_eq!(
            resolver.resolve(Asset::ChampionTile("Ahri")),
            "/assets/champion/tiles/Ahri_0.jpg"
        );
        assert_eq!(resolver.resolve(Asset::Item(0)), "/player.png");
        assert_eq!(resolver.profile_icon(None), "/assets/profileicon/1.png");
        assert_eq!(resolver.profile_icon(Some(7)), "/assets/profileicon/7.png");
    }

    #[test]
    fn test_resolve_checks_root() {
        let tmp = tempfile::tempdir().unwrap();
        let tiles = tmp.path().join("champion").join("tiles");
        std::fs::create_dir_all(&tiles).unwrap();
        std::fs::write(tiles.join("Ahri_0.jpg"), b"jpg").unwrap();

        let resolver = AssetResolver::from_config(&AssetConfig {
            url_prefix: "https://cdn.example.com/lol/".to_string(),
            root: Some(tmp.path().to_path_buf()),
            placeholder: "/player.png".to_string(),
        });

        assert_eq!(
            resolver.resolve(Asset::ChampionTile("Ahri")),
            "https://cdn.example.com/lol/champion/tiles/Ahri_0.jpg"
        );
        assert_eq!(resolver.resolve(Asset::ChampionTile("Zed")), "/player.png");
        assert_eq!(
            resolver.profile_icon(Some(99)),
            "https://cdn.example.com/lol/profileicon/1.png"
        );
    }

    #[test]
    fn test_card_icons_for_missing_player() {
        let raw: RawMatch = serde_json::from_value(serde_json::json!({
            "participants": [{"player": "other", "teamId": 200, "champion": "Zed"}]
        }))
        .unwrap();
        let view = project_for_player(&raw, "melon");
        let icons = AssetResolver::default().card_icons(&view);

        assert_eq!(icons.champion, "/player.png");
        assert_eq!(icons.spells, vec!["/player.png".to_string(); 2]);
        assert_eq!(icons.keystone, "/player.png");
        assert_eq!(icons.items.len(), Items::SLOTS);
        assert!(icons.items.iter().all(|i| i == "/player.png"));
        assert!(icons.team_1.is_empty());
        assert_eq!(icons.team_2, vec!["/assets/champion/tiles/Zed_0.jpg".to_string()]);
    }

    #[test]
    fn test_card_icons_keep_spell_slots() {
        let raw: RawMatch = serde_json::from_value(serde_json::json!({
            "participants": [{"player": "melon", "summonerSpells": [{"1": "SummonerFlash"}]}]
        }))
        .unwrap();
        let view = project_for_player(&raw, "melon");
        let icons = AssetResolver::default().card_icons(&view);

        assert_eq!(
            icons.spells,
            vec![
                "/player.png".to_string(),
                "/assets/summonerSpellIcon/SummonerFlash.jpg".to_string(),
            ]
        );
    }
}
