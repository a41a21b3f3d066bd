//! Dataset schemas and loaders.
//!
//! One [`Schema`] per upstream file, mirroring the pre-computed, pre-cleaned
//! inputs the dashboard consumes as-is: the FINESS facility registry, the
//! pathology-prevalence table, the commune registry, and the pre-computed
//! commune-to-emergency-service distance table. Loaders are thin wrappers
//! over the CSV parser; a load failure aborts initialization of that
//! dataset and propagates to the caller for user-visible surfacing.

use once_cell::sync::Lazy;
use std::path::Path;

use crate::data::csv_parser::{Schema, parse_csv_file};
use crate::data::error::DataResult;
use crate::types::{ColumnType, Table};

/// Column names shared between schemas and pipeline configurations.
pub mod columns {
    // Facility registry
    pub const FINESS_NUMBER: &str = "numero finess etablissement";
    pub const FACILITY_NAME: &str = "raison_sociale";
    pub const FACILITY_TYPE: &str = "type d etablissements";
    pub const DEPARTMENT: &str = "departement";
    pub const ACTIVITY: &str = "libelle activite";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";

    // Prevalence table
    pub const PATHOLOGY: &str = "patho_niv1";
    pub const PREVALENCE_DEPT: &str = "dept";
    pub const YEAR: &str = "annee";
    pub const AGE_BAND: &str = "libelle_classe_age";
    pub const PREVALENCE: &str = "prev_calculee";

    // Commune registry
    pub const INSEE_CODE: &str = "code_insee";
    pub const COMMUNE_NAME: &str = "nom_standard";
    pub const DEPARTMENT_NAME: &str = "dep_nom";
    pub const CANTON_NAME: &str = "canton_nom";
    pub const EPCI_NAME: &str = "epci_nom";
    pub const REGION: &str = "reg_nom";
    pub const POPULATION: &str = "population";
    pub const CENTER_LATITUDE: &str = "latitude_centre";
    pub const CENTER_LONGITUDE: &str = "longitude_centre";

    // Distance table
    pub const DENSITY_BAND: &str = "grille_densite_texte";
    pub const EMERGENCY_DISTANCE_KM: &str = "distance_urgence_km";
}

use columns::*;

/// FINESS facility registry (one row per registered establishment).
pub static FACILITY_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(&[
        (FINESS_NUMBER, ColumnType::Text),
        (FACILITY_NAME, ColumnType::Text),
        (FACILITY_TYPE, ColumnType::Text),
        // Kept textual: department codes like "09" must not lose their
        // leading zero.
        (DEPARTMENT, ColumnType::Text),
        (ACTIVITY, ColumnType::Text),
        (LATITUDE, ColumnType::Number),
        (LONGITUDE, ColumnType::Number),
    ])
});

/// Pathology-prevalence statistics (pre-computed upstream).
pub static PREVALENCE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(&[
        (PATHOLOGY, ColumnType::Text),
        (PREVALENCE_DEPT, ColumnType::Number),
        (YEAR, ColumnType::Number),
        (AGE_BAND, ColumnType::Text),
        (PREVALENCE, ColumnType::Number),
    ])
});

/// Commune registry with population and EPCI membership.
pub static COMMUNE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(&[
        (INSEE_CODE, ColumnType::Text),
        (COMMUNE_NAME, ColumnType::Text),
        (DEPARTMENT_NAME, ColumnType::Text),
        (EPCI_NAME, ColumnType::Text),
        (REGION, ColumnType::Text),
        (POPULATION, ColumnType::Number),
    ])
});

/// Pre-computed commune-to-nearest-emergency-service distances.
pub static DISTANCE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(&[
        (INSEE_CODE, ColumnType::Text),
        (COMMUNE_NAME, ColumnType::Text),
        (DEPARTMENT_NAME, ColumnType::Text),
        (CANTON_NAME, ColumnType::Text),
        (EPCI_NAME, ColumnType::Text),
        (DENSITY_BAND, ColumnType::Text),
        (EMERGENCY_DISTANCE_KM, ColumnType::Number),
        (CENTER_LATITUDE, ColumnType::Number),
        (CENTER_LONGITUDE, ColumnType::Number),
    ])
});

pub fn load_facilities(path: &Path) -> DataResult<Table> {
    parse_csv_file(path, &FACILITY_SCHEMA)
}

pub fn load_prevalence(path: &Path) -> DataResult<Table> {
    parse_csv_file(path, &PREVALENCE_SCHEMA)
}

pub fn load_communes(path: &Path) -> DataResult<Table> {
    parse_csv_file(path, &COMMUNE_SCHEMA)
}

pub fn load_distances(path: &Path) -> DataResult<Table> {
    parse_csv_file(path, &DISTANCE_SCHEMA)
}
