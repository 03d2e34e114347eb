//! Per-match rule settings.
//!
//! Each game type has a small typed set of known keys. Anything else the
//! client sends is kept as an opaque, validated scalar map so it survives a
//! round-trip without the engine ever reading it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::entities::matches::GameType;
use crate::errors::domain::{DomainError, ValidationKind};

pub const MAX_EXTRA_KEYS: usize = 32;
pub const MAX_EXTRA_STRING_LEN: usize = 256;
pub const DEFAULT_LONE_WOLF_MULTIPLIER: u8 = 2;
const MAX_LONE_WOLF_MULTIPLIER: u64 = 10;

static EXTRA_KEY: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z0-9_]{1,64}$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRules {
    Standard { carryover: bool },
    Nassau { carryover: bool, auto_press: bool },
    Wolf { lone_wolf_multiplier: u8 },
    Vegas { flip_on_birdie: bool },
}

impl GameRules {
    pub fn defaults(game_type: GameType) -> Self {
        match game_type {
            GameType::Standard => GameRules::Standard { carryover: true },
            GameType::Nassau => GameRules::Nassau {
                carryover: true,
                auto_press: false,
            },
            GameType::Wolf => GameRules::Wolf {
                lone_wolf_multiplier: DEFAULT_LONE_WOLF_MULTIPLIER,
            },
            GameType::Vegas => GameRules::Vegas {
                flip_on_birdie: false,
            },
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            GameRules::Standard { .. } => GameType::Standard,
            GameRules::Nassau { .. } => GameType::Nassau,
            GameRules::Wolf { .. } => GameType::Wolf,
            GameRules::Vegas { .. } => GameType::Vegas,
        }
    }

    /// Whether a tied hole pushes its stake onto the next hole.
    pub fn carryover_enabled(&self) -> bool {
        match self {
            GameRules::Standard { carryover } | GameRules::Nassau { carryover, .. } => *carryover,
            GameRules::Wolf { .. } | GameRules::Vegas { .. } => false,
        }
    }

    fn known_keys(game_type: GameType) -> &'static [&'static str] {
        match game_type {
            GameType::Standard => &["carryover"],
            GameType::Nassau => &["carryover", "auto_press"],
            GameType::Wolf => &["lone_wolf_multiplier"],
            GameType::Vegas => &["flip_on_birdie"],
        }
    }

    fn write_into(&self, out: &mut Map<String, Value>) {
        match *self {
            GameRules::Standard { carryover } => {
                out.insert("carryover".into(), Value::Bool(carryover));
            }
            GameRules::Nassau {
                carryover,
                auto_press,
            } => {
                out.insert("carryover".into(), Value::Bool(carryover));
                out.insert("auto_press".into(), Value::Bool(auto_press));
            }
            GameRules::Wolf {
                lone_wolf_multiplier,
            } => {
                out.insert(
                    "lone_wolf_multiplier".into(),
                    Value::from(lone_wolf_multiplier),
                );
            }
            GameRules::Vegas { flip_on_birdie } => {
                out.insert("flip_on_birdie".into(), Value::Bool(flip_on_birdie));
            }
        }
    }
}

/// Typed rules for the match's game type plus untouched extra settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRules {
    pub game: GameRules,
    pub extras: BTreeMap<String, Value>,
}

impl MatchRules {
    pub fn defaults(game_type: GameType) -> Self {
        Self {
            game: GameRules::defaults(game_type),
            extras: BTreeMap::new(),
        }
    }

    /// Parse a stored or submitted rules object for `game_type`.
    ///
    /// `None` and JSON `null` yield the defaults. Keys that belong to another
    /// game type are treated as extras.
    pub fn parse(game_type: GameType, raw: Option<&Value>) -> Result<Self, DomainError> {
        let obj = match raw {
            None | Some(Value::Null) => return Ok(Self::defaults(game_type)),
            Some(Value::Object(obj)) => obj,
            Some(_) => return Err(invalid("rules must be a JSON object")),
        };

        let known = GameRules::known_keys(game_type);
        let game = match GameRules::defaults(game_type) {
            GameRules::Standard { carryover } => GameRules::Standard {
                carryover: bool_key(obj, "carryover", carryover)?,
            },
            GameRules::Nassau {
                carryover,
                auto_press,
            } => GameRules::Nassau {
                carryover: bool_key(obj, "carryover", carryover)?,
                auto_press: bool_key(obj, "auto_press", auto_press)?,
            },
            GameRules::Wolf {
                lone_wolf_multiplier,
            } => GameRules::Wolf {
                lone_wolf_multiplier: multiplier_key(obj, lone_wolf_multiplier)?,
            },
            GameRules::Vegas { flip_on_birdie } => GameRules::Vegas {
                flip_on_birdie: bool_key(obj, "flip_on_birdie", flip_on_birdie)?,
            },
        };

        let mut extras = BTreeMap::new();
        for (key, value) in obj.iter().filter(|(k, _)| !known.contains(&k.as_str())) {
            validate_extra(key, value)?;
            extras.insert(key.clone(), value.clone());
        }
        if extras.len() > MAX_EXTRA_KEYS {
            return Err(invalid(format!(
                "at most {MAX_EXTRA_KEYS} extra rule keys are allowed"
            )));
        }

        Ok(Self { game, extras })
    }

    pub fn carryover_enabled(&self) -> bool {
        self.game.carryover_enabled()
    }

    /// Flattened JSON object as stored in `matches.rules`.
    pub fn to_value(&self) -> Value {
        let mut out: Map<String, Value> = self
            .extras
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.game.write_into(&mut out);
        Value::Object(out)
    }
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::Rules, detail)
}

fn bool_key(obj: &Map<String, Value>, key: &str, default: bool) -> Result<bool, DomainError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(invalid(format!("rule '{key}' must be a boolean"))),
    }
}

fn multiplier_key(obj: &Map<String, Value>, default: u8) -> Result<u8, DomainError> {
    match obj.get("lone_wolf_multiplier") {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .filter(|n| (1..=MAX_LONE_WOLF_MULTIPLIER).contains(n))
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| {
                invalid(format!(
                    "rule 'lone_wolf_multiplier' must be an integer between 1 and {MAX_LONE_WOLF_MULTIPLIER}"
                ))
            }),
    }
}

fn validate_extra(key: &str, value: &Value) -> Result<(), DomainError> {
    if !EXTRA_KEY.is_match(key) {
        return Err(invalid(format!(
            "rule key '{key}' must be 1-64 characters of letters, digits or underscore"
        )));
    }
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(()),
        Value::String(s) if s.chars().count() <= MAX_EXTRA_STRING_LEN => Ok(()),
        Value::String(_) => Err(invalid(format!(
            "rule '{key}' exceeds {MAX_EXTRA_STRING_LEN} characters"
        ))),
        Value::Array(_) | Value::Object(_) => {
            Err(invalid(format!("rule '{key}' must be a scalar value")))
        }
    }
}
