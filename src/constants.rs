//! Domain constants for the Occitanie health dashboard.
//!
//! Centralizes data labels and reference figures so the pipeline
//! configurations stay free of magic strings.

// ============================================================================
// Prevalence data labels
// ============================================================================

/// Label of the aggregate age band present *in the data*. This is a data
/// row whose category literally means "all ages" and is distinct from the
/// UI-level "select all" sentinel (`FacetSelection::All`); the comparison
/// charts exclude it so it does not dwarf the specific age bands.
pub const ALL_AGES_LABEL: &str = "tous âges";

/// Pathology groups excluded from prevalence rankings. These are catch-all
/// or treatment categories, not diseases, and they crowd out the actual
/// pathologies in any top-N view.
pub const EXCLUDED_PATHOLOGY_GROUPS: [&str; 7] = [
    "Affections de longue durée (dont 31 et 32) pour d'autres causes",
    "Hospitalisations hors pathologies repérées (avec ou sans pathologies, traitements ou maternité)",
    "Traitements antalgiques ou anti-inflammatoires (hors pathologies, traitements, maternité ou hospitalisations)",
    "Traitements psychotropes (hors pathologies)",
    "Traitements du risque vasculaire (hors pathologies)",
    "Hospitalisation pour Covid-19",
    "Maternité (avec ou sans pathologies)",
];

/// How many pathologies the ranked prevalence views keep.
pub const TOP_PATHOLOGY_COUNT: usize = 5;

// ============================================================================
// Facility data labels
// ============================================================================

/// Substring identifying emergency services in the activity column.
pub const EMERGENCY_ACTIVITY_NEEDLE: &str = "urgence";

/// Region scoped by the commune dataset.
pub const REGION_NAME: &str = "Occitanie";

// ============================================================================
// Map defaults
// ============================================================================

/// Fallback map center (metropolitan France) when a filter selection
/// matches no facility at all.
pub const DEFAULT_MAP_CENTER: (f64, f64) = (46.5, 2.5);

// ============================================================================
// National reference figures (KPI baselines)
// ============================================================================

/// Facilities registered nationwide, for the share-of-France KPI.
pub const FRANCE_FACILITY_COUNT: f64 = 102_553.0;

/// Departments covered nationwide.
pub const FRANCE_DEPARTMENT_COUNT: u64 = 106;

/// Inhabitants per facility nationwide.
pub const FRANCE_INHABITANTS_PER_FACILITY: u64 = 673;
