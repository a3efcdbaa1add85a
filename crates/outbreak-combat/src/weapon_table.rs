//! Weapon data table.
//!
//! Static stat rows keyed by weapon kind, loaded once and consulted whenever a
//! weapon entity is constructed. Tables are written in RON:
//!
//! ```ron
//! (
//!     version: (major: 1, minor: 0, patch: 0),
//!     rows: {
//!         Ak47: (
//!             ammo_type: NineMm,
//!             starting_ammo: 30,
//!             magazine_capacity: 30,
//!             name: "AK47",
//!             reload_montage_section: "Reload AK47",
//!             auto_fire_rate: 0.1,
//!             damage: 20.0,
//!             headshot_damage: 50.0,
//!         ),
//!     },
//! )
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use outbreak_common::{EntityId, OutbreakError, SchemaVersion};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::ammo::AmmoType;
use crate::weapon::{Weapon, WeaponKind, WeaponStats};

/// Errors that can occur while loading or using the weapon table.
#[derive(Debug, Error)]
pub enum WeaponTableError {
    /// Failed to read the table file.
    #[error("Failed to read weapon table {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse RON.
    #[error("Failed to parse weapon table: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Table written by an incompatible format version.
    #[error("Unsupported weapon table version {found} (reader is {supported})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: SchemaVersion,
        /// Version this reader understands.
        supported: SchemaVersion,
    },

    /// A row failed validation.
    #[error("Weapon {kind:?}: {reason}")]
    Invalid {
        /// Offending row.
        kind: WeaponKind,
        /// What is wrong with it.
        reason: String,
    },

    /// No row for the requested kind.
    #[error("No weapon table row {}", .0.row_name())]
    MissingRow(WeaponKind),
}

/// Result type for weapon table operations.
pub type WeaponTableResult<T> = Result<T, WeaponTableError>;

impl From<WeaponTableError> for OutbreakError {
    fn from(err: WeaponTableError) -> Self {
        match err {
            WeaponTableError::Read { source, .. } => Self::Io(source),
            WeaponTableError::Parse(e) => Self::Serialization(e.to_string()),
            WeaponTableError::UnsupportedVersion { found, supported } => Self::VersionMismatch {
                expected: supported,
                actual: found,
            },
            other => Self::InvalidData(other.to_string()),
        }
    }
}

/// Weapon stat rows keyed by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    /// Format version.
    #[serde(default)]
    pub version: SchemaVersion,
    rows: BTreeMap<WeaponKind, WeaponStats>,
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WeaponTable {
    /// Table with the game's stock rows.
    #[must_use]
    pub fn builtin() -> Self {
        let mut rows = BTreeMap::new();
        rows.insert(WeaponKind::Ak47, WeaponStats::default());
        rows.insert(
            WeaponKind::AssaultRifle,
            WeaponStats {
                ammo_type: AmmoType::AssaultRifle,
                starting_ammo: 30,
                magazine_capacity: 30,
                name: "Assault Rifle".to_string(),
                inventory_icon: None,
                ammo_icon: None,
                reload_montage_section: "Reload AR".to_string(),
                auto_fire_rate: 0.12,
                damage: 25.0,
                headshot_damage: 60.0,
            },
        );
        Self {
            version: SchemaVersion::WEAPON_TABLE,
            rows,
        }
    }

    /// Parse and validate a RON table.
    pub fn from_ron_str(source: &str) -> WeaponTableResult<Self> {
        let table: Self = ron::from_str(source)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a RON table from disk.
    pub fn load_from(path: impl AsRef<Path>) -> WeaponTableResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| WeaponTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_ron_str(&source)?;
        info!("Loaded {} weapon rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Check version and every row.
    pub fn validate(&self) -> WeaponTableResult<()> {
        if !SchemaVersion::WEAPON_TABLE.can_read(&self.version) {
            return Err(WeaponTableError::UnsupportedVersion {
                found: self.version,
                supported: SchemaVersion::WEAPON_TABLE,
            });
        }

        for (&kind, row) in &self.rows {
            let invalid = |reason: String| WeaponTableError::Invalid { kind, reason };

            if row.name.trim().is_empty() {
                return Err(invalid("empty name".to_string()));
            }
            if row.magazine_capacity == 0 {
                return Err(invalid("magazine capacity must be positive".to_string()));
            }
            if row.starting_ammo > row.magazine_capacity {
                return Err(invalid(format!(
                    "starting ammo {} exceeds capacity {}",
                    row.starting_ammo, row.magazine_capacity
                )));
            }
            for damage in [row.damage, row.headshot_damage] {
                if !damage.is_finite() || damage < 0.0 {
                    return Err(invalid(format!("invalid damage {damage}")));
                }
            }
            if row.auto_fire_rate < 0.0 || !row.auto_fire_rate.is_finite() {
                return Err(invalid(format!("invalid fire rate {}", row.auto_fire_rate)));
            }
        }

        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a kind.
    #[must_use]
    pub fn get(&self, kind: WeaponKind) -> Option<&WeaponStats> {
        self.rows.get(&kind)
    }

    /// Construct a weapon entity from its row.
    pub fn spawn(&self, kind: WeaponKind) -> WeaponTableResult<Weapon> {
        let stats = self
            .get(kind)
            .cloned()
            .ok_or(WeaponTableError::MissingRow(kind))?;
        let weapon = Weapon::new(EntityId::new(), kind, stats);
        debug!(weapon = %weapon.id(), ?kind, "spawned weapon");
        Ok(weapon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::ItemState;
    use std::io::Write;

    const TABLE: &str = r#"(
        version: (major: 1, minor: 0, patch: 0),
        rows: {
            Ak47: (
                ammo_type: NineMm,
                starting_ammo: 12,
                magazine_capacity: 30,
                name: "AK47",
                reload_montage_section: "Reload AK47",
                auto_fire_rate: 0.1,
                damage: 20.0,
                headshot_damage: 50.0,
            ),
        },
    )"#;

    #[test]
    fn test_builtin_rows_are_valid() {
        let table = WeaponTable::builtin();
        assert!(table.validate().is_ok());
        assert_eq!(table.len(), 2);
        let ak = table.get(WeaponKind::Ak47).expect("ak row");
        assert_eq!(ak.ammo_type, AmmoType::NineMm);
        assert_eq!(ak.magazine_capacity, 30);
        assert_eq!(ak.reload_montage_section, "Reload AK47");
    }

    #[test]
    fn test_parse_ron() {
        let table = WeaponTable::from_ron_str(TABLE).expect("parse");
        assert_eq!(table.len(), 1);
        let weapon = table.spawn(WeaponKind::Ak47).expect("spawn");
        assert_eq!(weapon.ammo(), 12);
        assert_eq!(weapon.state(), ItemState::Pickup);
        assert!(matches!(
            table.spawn(WeaponKind::AssaultRifle),
            Err(WeaponTableError::MissingRow(WeaponKind::AssaultRifle))
        ));
    }

    #[test]
    fn test_rejects_starting_ammo_over_capacity() {
        let source = TABLE.replace("starting_ammo: 12", "starting_ammo: 31");
        let err = WeaponTable::from_ron_str(&source).expect_err("must fail");
        assert!(matches!(err, WeaponTableError::Invalid { kind: WeaponKind::Ak47, .. }));
    }

    #[test]
    fn test_rejects_non_finite_stats() {
        let cases: [fn(&mut WeaponStats); 3] = [
            |row| row.damage = f32::NAN,
            |row| row.headshot_damage = f32::INFINITY,
            |row| row.auto_fire_rate = f32::NAN,
        ];
        for corrupt in cases {
            let mut table = WeaponTable::builtin();
            if let Some(row) = table.rows.get_mut(&WeaponKind::AssaultRifle) {
                corrupt(row);
            }
            assert!(matches!(
                table.validate(),
                Err(WeaponTableError::Invalid {
                    kind: WeaponKind::AssaultRifle,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_missing_row_names_table_row() {
        let err = WeaponTableError::MissingRow(WeaponKind::Ak47);
        assert_eq!(err.to_string(), "No weapon table row AK47");
    }

    #[test]
    fn test_rejects_newer_major_version() {
        let source = TABLE.replace("major: 1", "major: 2");
        let err = WeaponTable::from_ron_str(&source).expect_err("must fail");
        assert!(matches!(err, WeaponTableError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_rejects_malformed_ron() {
        assert!(matches!(
            WeaponTable::from_ron_str("(rows: {"),
            Err(WeaponTableError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(TABLE.as_bytes()).expect("write");
        let table = WeaponTable::load_from(file.path()).expect("load");
        assert!(table.get(WeaponKind::Ak47).is_some());

        let missing = WeaponTable::load_from("/nonexistent/weapons.ron");
        assert!(matches!(missing, Err(WeaponTableError::Read { .. })));
    }

    #[test]
    fn test_converts_into_top_level_error() {
        let err: OutbreakError = WeaponTableError::MissingRow(WeaponKind::Ak47).into();
        assert!(matches!(err, OutbreakError::InvalidData(_)));
    }
}
