//! Read-only reference data: moves, species types, items, abilities and the type chart

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tactician_battle::{TYPE_CHART, Type};
use tactician_protocol::to_id;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Invalid knowledge json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown type: {0}")]
    UnknownType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    #[default]
    Status,
}

/// What the evaluator needs to know about a move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: Type,
    pub category: MoveCategory,
    /// `None` for moves without a fixed base power
    pub base_power: Option<u32>,
    /// `None` for moves that never miss
    pub accuracy: Option<u32>,
    pub priority: i8,
    pub is_status: bool,
}

impl MoveData {
    pub fn new(
        name: impl Into<String>,
        move_type: Type,
        category: MoveCategory,
        base_power: Option<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            move_type,
            category,
            base_power,
            accuracy: Some(100),
            priority: 0,
            is_status: category == MoveCategory::Status,
        }
    }

    pub fn with_accuracy(mut self, accuracy: Option<u32>) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    /// Base power if the move deals fixed-power damage
    pub fn damaging_power(&self) -> Option<u32> {
        self.base_power.filter(|bp| *bp > 0 && !self.is_status)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemData {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityData {
    pub name: String,
    pub description: Option<String>,
}

/// Attacking type x defending type multipliers
#[derive(Debug, Clone, PartialEq)]
pub struct TypeChart {
    table: [[f64; 18]; 18],
}

impl TypeChart {
    pub fn canonical() -> Self {
        Self { table: TYPE_CHART }
    }

    /// Every matchup at 1.0
    pub fn neutral() -> Self {
        Self {
            table: [[1.0; 18]; 18],
        }
    }

    pub fn with(mut self, attacking: Type, defending: Type, multiplier: f64) -> Self {
        self.set(attacking, defending, multiplier);
        self
    }

    pub fn set(&mut self, attacking: Type, defending: Type, multiplier: f64) {
        self.table[attacking as usize][defending as usize] = multiplier;
    }

    pub fn get(&self, attacking: Type, defending: Type) -> f64 {
        self.table[attacking as usize][defending as usize]
    }

    /// Product over all defending types; 1.0 against an unknown (empty) typing
    pub fn against(&self, attacking: Type, defenders: &[Type]) -> f64 {
        defenders.iter().map(|d| self.get(attacking, *d)).product()
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Lookup interface the evaluator reads reference data through.
///
/// Lookups take display names or ids; implementations normalize them.
/// Missing entries are `None`, never an error.
pub trait KnowledgeBase: Send + Sync {
    fn move_data(&self, name: &str) -> Option<&MoveData>;

    fn effectiveness(&self, attacking: Type, defending: Type) -> f64;

    fn species_types(&self, species: &str) -> Option<&[Type]>;

    fn item(&self, name: &str) -> Option<&ItemData>;

    fn ability(&self, name: &str) -> Option<&AbilityData>;

    /// Product of [`KnowledgeBase::effectiveness`] over every defending type
    fn effectiveness_against(&self, attacking: Type, defenders: &[Type]) -> f64 {
        defenders
            .iter()
            .map(|d| self.effectiveness(attacking, *d))
            .product()
    }
}

/// In-memory knowledge base keyed by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dex {
    moves: BTreeMap<String, MoveData>,
    species: BTreeMap<String, Vec<Type>>,
    items: BTreeMap<String, ItemData>,
    abilities: BTreeMap<String, AbilityData>,
    type_chart: TypeChart,
}

impl Dex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_chart(mut self, chart: TypeChart) -> Self {
        self.type_chart = chart;
        self
    }

    pub fn with_move(mut self, data: MoveData) -> Self {
        self.insert_move(data);
        self
    }

    pub fn with_species(mut self, species: &str, types: &[Type]) -> Self {
        self.species.insert(to_id(species), types.to_vec());
        self
    }

    pub fn with_item(mut self, data: ItemData) -> Self {
        self.items.insert(to_id(&data.name), data);
        self
    }

    pub fn with_ability(mut self, data: AbilityData) -> Self {
        self.abilities.insert(to_id(&data.name), data);
        self
    }

    pub fn insert_move(&mut self, mut data: MoveData) {
        data.is_status |= data.category == MoveCategory::Status;
        self.moves.insert(to_id(&data.name), data);
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Load from JSON.
    ///
    /// ```json
    /// {
    ///   "moves": {"flamethrower": {"name": "Flamethrower", "type": "Fire",
    ///             "category": "Special", "basePower": 90, "accuracy": 100}},
    ///   "species": {"charizard": ["Fire", "Flying"]},
    ///   "items": {"leftovers": {"name": "Leftovers"}},
    ///   "abilities": {"blaze": {"name": "Blaze"}},
    ///   "typeChart": {"Fire": {"Grass": 2.0}}
    /// }
    /// ```
    ///
    /// Type names are case-insensitive. `typeChart` entries override the
    /// canonical chart.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let file: DexFile = serde_json::from_str(json)?;
        let mut dex = Dex::new();

        for (key, raw) in file.moves {
            let name = raw.name.unwrap_or(key);
            let move_type = parse_type(&raw.move_type)?;
            let mut data = MoveData::new(
                name,
                move_type,
                parse_category(&raw.category),
                raw.base_power.filter(|bp| *bp > 0),
            )
            .with_accuracy(raw.accuracy.and_then(|a| a.as_u64()).map(|a| a as u32))
            .with_priority(raw.priority);
            data.is_status |= raw.is_status;
            dex.insert_move(data);
        }

        for (species, types) in file.species {
            let types = types
                .iter()
                .map(|t| parse_type(t))
                .collect::<Result<Vec<_>, _>>()?;
            dex.species.insert(to_id(&species), types);
        }

        for (key, mut item) in file.items {
            if item.name.is_empty() {
                item.name = key;
            }
            dex.items.insert(to_id(&item.name), item);
        }

        for (key, mut ability) in file.abilities {
            if ability.name.is_empty() {
                ability.name = key;
            }
            dex.abilities.insert(to_id(&ability.name), ability);
        }

        for (attacking, row) in file.type_chart {
            let attacking = parse_type(&attacking)?;
            for (defending, multiplier) in row {
                dex.type_chart
                    .set(attacking, parse_type(&defending)?, multiplier);
            }
        }

        tracing::debug!(
            moves = dex.moves.len(),
            species = dex.species.len(),
            "loaded dex"
        );
        Ok(dex)
    }
}

impl KnowledgeBase for Dex {
    fn move_data(&self, name: &str) -> Option<&MoveData> {
        self.moves.get(&to_id(name))
    }

    fn effectiveness(&self, attacking: Type, defending: Type) -> f64 {
        self.type_chart.get(attacking, defending)
    }

    fn species_types(&self, species: &str) -> Option<&[Type]> {
        self.species.get(&to_id(species)).map(Vec::as_slice)
    }

    fn item(&self, name: &str) -> Option<&ItemData> {
        self.items.get(&to_id(name))
    }

    fn ability(&self, name: &str) -> Option<&AbilityData> {
        self.abilities.get(&to_id(name))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DexFile {
    #[serde(default)]
    moves: BTreeMap<String, RawMove>,
    #[serde(default)]
    species: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    items: BTreeMap<String, ItemData>,
    #[serde(default)]
    abilities: BTreeMap<String, AbilityData>,
    #[serde(default)]
    type_chart: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMove {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    move_type: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    base_power: Option<u32>,
    /// A number, or `true` for moves that never miss
    #[serde(default)]
    accuracy: Option<serde_json::Value>,
    #[serde(default)]
    priority: i8,
    #[serde(default)]
    is_status: bool,
}

fn parse_type(name: &str) -> Result<Type, KnowledgeError> {
    Type::from_protocol(name).ok_or_else(|| KnowledgeError::UnknownType(name.to_string()))
}

fn parse_category(category: &str) -> MoveCategory {
    match category.trim().to_ascii_lowercase().as_str() {
        "physical" => MoveCategory::Physical,
        "special" => MoveCategory::Special,
        _ => MoveCategory::Status,
    }
}
