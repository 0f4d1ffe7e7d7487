//! Entity construction from stat templates.
//!
//! Templates are externally supplied structured data (typically JSON, one
//! document each for the player, enemies, and items). The factory is handed
//! an explicit template set at construction; there is no process-wide stat
//! table. Template sets are `BTreeMap`s so that seeded random choices are
//! deterministic.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, GameResult};
use crate::game::entity::{Creature, Item};
use crate::game::grid::Position;
use crate::game::player::Player;

/// A `{base, scale}` stat pair for creature templates.
///
/// `base` is the stat at score 0; `scale` is the per-point-of-score growth
/// applied once at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatTemplate {
    /// Stat value at score 0.
    pub base: i32,
    /// Per-point-of-score growth coefficient.
    #[serde(default)]
    pub scale: f64,
}

/// A `{boost, decay}` stat pair for item templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostTemplate {
    /// Added to the stat when the item is consumed.
    pub boost: i32,
    /// Removed from the stat each turn while the effect lasts.
    #[serde(default)]
    pub decay: i32,
}

/// Template for the player or one enemy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    /// Sprite identifier handed through to the presentation layer.
    pub sprite: String,
    /// Health stat pair.
    pub health: StatTemplate,
    /// Attack stat pair.
    pub attack: StatTemplate,
    /// Speed stat pair.
    pub speed: StatTemplate,
}

/// Template for one item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Sprite identifier handed through to the presentation layer.
    pub sprite: String,
    /// Max-health boost/decay pair.
    pub max_health: BoostTemplate,
    /// Speed boost/decay pair.
    pub speed: BoostTemplate,
    /// Attack boost/decay pair.
    pub attack: BoostTemplate,
    /// Added to the score on consumption.
    #[serde(default)]
    pub score_boost: u32,
    /// Healing applied on consumption.
    #[serde(default)]
    pub curr_health_boost: i32,
    /// Number of turns the decays stay active.
    pub decay_duration: i32,
}

/// Full configuration for one game session.
///
/// Passed into [`crate::game::GameState`] at construction; the engine does
/// not define how this data is loaded, only its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid width in tiles.
    pub width: i32,
    /// Grid height in tiles.
    pub height: i32,
    /// The player's stat template.
    pub player: CreatureTemplate,
    /// Enemy templates by name.
    pub enemies: BTreeMap<String, CreatureTemplate>,
    /// Item templates by name.
    pub items: BTreeMap<String, ItemTemplate>,
}

impl GameConfig {
    /// Parse a full configuration from one JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the document does not match the schema.
    pub fn from_json_str(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds entities from the configured template sets.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    player: CreatureTemplate,
    enemies: BTreeMap<String, CreatureTemplate>,
    items: BTreeMap<String, ItemTemplate>,
}

impl EntityFactory {
    /// Create a factory from explicit template sets.
    #[must_use]
    pub fn new(
        player: CreatureTemplate,
        enemies: BTreeMap<String, CreatureTemplate>,
        items: BTreeMap<String, ItemTemplate>,
    ) -> Self {
        Self {
            player,
            enemies,
            items,
        }
    }

    /// Create a factory from the three template JSON documents.
    ///
    /// `player_json` maps names to creature templates and must contain a
    /// `"player"` entry; `enemies_json` and `items_json` map names to their
    /// template kinds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed JSON and
    /// [`Error::UnknownEntityKind`] if the player document has no `"player"`
    /// entry.
    pub fn from_json(
        player_json: &str,
        enemies_json: &str,
        items_json: &str,
    ) -> GameResult<Self> {
        let mut players: BTreeMap<String, CreatureTemplate> = serde_json::from_str(player_json)?;
        let enemies: BTreeMap<String, CreatureTemplate> = serde_json::from_str(enemies_json)?;
        let items: BTreeMap<String, ItemTemplate> = serde_json::from_str(items_json)?;

        let player = players
            .remove("player")
            .ok_or_else(|| Error::UnknownEntityKind {
                category: "player",
                name: "player".to_string(),
            })?;

        Ok(Self::new(player, enemies, items))
    }

    /// Names of all known enemy templates, in deterministic order.
    pub fn enemy_names(&self) -> impl Iterator<Item = &str> {
        self.enemies.keys().map(String::as_str)
    }

    /// Names of all known item templates, in deterministic order.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Create the player at the given position.
    #[must_use]
    pub fn create_player(&self, position: Position) -> Player {
        Player::new(Creature::from_template(&self.player, position))
    }

    /// Create a specific enemy kind at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntityKind`] if `name` is not a configured
    /// enemy template.
    pub fn create_enemy(&self, position: Position, name: &str) -> GameResult<Creature> {
        let template = self
            .enemies
            .get(name)
            .ok_or_else(|| Error::UnknownEntityKind {
                category: "enemy",
                name: name.to_string(),
            })?;
        Ok(Creature::from_template(template, position))
    }

    /// Create a uniformly random enemy kind at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTemplateSet`] if no enemy templates are
    /// configured.
    pub fn create_random_enemy<R: Rng>(
        &self,
        position: Position,
        rng: &mut R,
    ) -> GameResult<Creature> {
        let template = pick(&self.enemies, rng).ok_or(Error::EmptyTemplateSet {
            category: "enemy",
        })?;
        Ok(Creature::from_template(template, position))
    }

    /// Create a specific item kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntityKind`] if `name` is not a configured
    /// item template.
    pub fn create_item(&self, name: &str) -> GameResult<Item> {
        let template = self
            .items
            .get(name)
            .ok_or_else(|| Error::UnknownEntityKind {
                category: "item",
                name: name.to_string(),
            })?;
        Ok(build_item(template))
    }

    /// Create a uniformly random item kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTemplateSet`] if no item templates are
    /// configured.
    pub fn create_random_item<R: Rng>(&self, rng: &mut R) -> GameResult<Item> {
        let template = pick(&self.items, rng).ok_or(Error::EmptyTemplateSet {
            category: "item",
        })?;
        Ok(build_item(template))
    }
}

fn pick<'a, T, R: Rng>(templates: &'a BTreeMap<String, T>, rng: &mut R) -> Option<&'a T> {
    if templates.is_empty() {
        return None;
    }
    templates.values().nth(rng.gen_range(0..templates.len()))
}

fn build_item(template: &ItemTemplate) -> Item {
    Item {
        sprite: template.sprite.clone(),
        max_health_boost: template.max_health.boost,
        max_health_decay: template.max_health.decay,
        speed_boost: template.speed.boost,
        speed_decay: template.speed.decay,
        attack_boost: template.attack.boost,
        attack_decay: template.attack.decay,
        score_boost: template.score_boost,
        curr_health_boost: template.curr_health_boost,
        decay_duration: template.decay_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const PLAYER_JSON: &str = include_str!("../../data/player.json");
    const ENEMIES_JSON: &str = include_str!("../../data/enemies.json");
    const ITEMS_JSON: &str = include_str!("../../data/items.json");

    fn test_factory() -> EntityFactory {
        EntityFactory::from_json(PLAYER_JSON, ENEMIES_JSON, ITEMS_JSON).unwrap()
    }

    #[test]
    fn test_from_json_loads_sample_data() {
        let factory = test_factory();
        assert!(factory.enemy_names().count() >= 2);
        assert!(factory.item_names().count() >= 2);
    }

    #[test]
    fn test_from_json_rejects_missing_player_entry() {
        let result = EntityFactory::from_json("{}", ENEMIES_JSON, ITEMS_JSON);
        assert!(matches!(
            result,
            Err(Error::UnknownEntityKind {
                category: "player",
                ..
            })
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        let result = EntityFactory::from_json(PLAYER_JSON, "[1, 2, 3]", ITEMS_JSON);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_create_player() {
        let factory = test_factory();
        let player = factory.create_player(Position::new(0, 0));
        assert!(player.is_alive());
        assert_eq!(player.creature.position, Position::new(0, 0));
        assert!(player.creature.speed > 0);
    }

    #[test]
    fn test_create_enemy_known_name() {
        let factory = test_factory();
        let name = factory.enemy_names().next().unwrap().to_string();
        let enemy = factory.create_enemy(Position::new(2, 2), &name).unwrap();
        assert!(enemy.is_alive());
        assert_eq!(enemy.position, Position::new(2, 2));
    }

    #[test]
    fn test_create_enemy_unknown_name() {
        let factory = test_factory();
        let result = factory.create_enemy(Position::new(0, 0), "no-such-enemy");
        assert!(matches!(
            result,
            Err(Error::UnknownEntityKind {
                category: "enemy",
                ..
            })
        ));
    }

    #[test]
    fn test_create_item_unknown_name() {
        let factory = test_factory();
        assert!(matches!(
            factory.create_item("no-such-item"),
            Err(Error::UnknownEntityKind {
                category: "item",
                ..
            })
        ));
    }

    #[test]
    fn test_random_choice_is_seed_deterministic() {
        let factory = test_factory();

        let mut rng1 = SmallRng::seed_from_u64(99);
        let mut rng2 = SmallRng::seed_from_u64(99);
        let a = factory
            .create_random_enemy(Position::new(0, 0), &mut rng1)
            .unwrap();
        let b = factory
            .create_random_enemy(Position::new(0, 0), &mut rng2)
            .unwrap();
        assert_eq!(a.sprite, b.sprite);
        assert_eq!(a.max_health, b.max_health);
    }

    #[test]
    fn test_random_from_empty_set_errors() {
        let factory = EntityFactory::new(
            test_factory().player.clone(),
            BTreeMap::new(),
            BTreeMap::new(),
        );
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            factory.create_random_enemy(Position::new(0, 0), &mut rng),
            Err(Error::EmptyTemplateSet { category: "enemy" })
        ));
        assert!(matches!(
            factory.create_random_item(&mut rng),
            Err(Error::EmptyTemplateSet { category: "item" })
        ));
    }

    #[test]
    fn test_config_roundtrip() {
        let factory = test_factory();
        let config = GameConfig {
            width: 5,
            height: 5,
            player: factory.player.clone(),
            enemies: factory.enemies.clone(),
            items: factory.items.clone(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed = GameConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
