//! Pre-built pipeline configurations for the dashboard pages.
//!
//! Each chart or table of the prevalence and facility pages is one
//! [`Pipeline`] value built here, replacing per-tab copy-pasted
//! filter/groupby/sort wiring with configuration. The hosting app owns the
//! widget state; it passes the current [`SelectionSet`] in and re-runs the
//! returned pipeline on every interaction.

use serde::{Deserialize, Serialize};

use crate::chart::{MapBinding, MapFrame, bind_map};
use crate::constants::{
    ALL_AGES_LABEL, EMERGENCY_ACTIVITY_NEEDLE, EXCLUDED_PATHOLOGY_GROUPS, FRANCE_FACILITY_COUNT,
    REGION_NAME, TOP_PATHOLOGY_COUNT,
};
use crate::data::datasets::columns::*;
use crate::data::error::DataResult;
use crate::query::{AggregateSpec, Filter, Pipeline, Reduce, SelectionSet, SortSpec};
use crate::types::{ColumnType, Table, Value};

// ============================================================================
// Prevalence page
// ============================================================================

/// Drop the catch-all pathology groups from prevalence views.
pub fn excluded_pathology_filter() -> Filter {
    Filter::not(Filter::contains_any(PATHOLOGY, EXCLUDED_PATHOLOGY_GROUPS))
}

/// Keep only the specific age bands, dropping the aggregate `tous âges`
/// rows that would dwarf them. This is a *data* filter, unrelated to the
/// `FacetSelection::All` widget sentinel.
pub fn specific_age_bands_filter() -> Filter {
    Filter::not_equals(AGE_BAND, ALL_AGES_LABEL)
}

/// Pathology prevalence ranking for one department and year, highest
/// prevalence first.
pub fn pathology_prevalence_ranking(dept: &str, year: &str) -> Pipeline {
    Pipeline::new()
        .with_filter(excluded_pathology_filter())
        .with_filter(Filter::equals(PREVALENCE_DEPT, dept))
        .with_filter(Filter::equals(YEAR, year))
        .with_filter(specific_age_bands_filter())
        .with_sort(SortSpec::descending(PREVALENCE))
}

/// Which age bands are most affected by one pathology (matched by
/// substring, as the source data uses long composite labels).
pub fn age_vulnerability(dept: &str, year: &str, pathology_needle: &str) -> Pipeline {
    Pipeline::new()
        .with_filter(Filter::equals(PREVALENCE_DEPT, dept))
        .with_filter(Filter::equals(YEAR, year))
        .with_filter(Filter::contains(PATHOLOGY, pathology_needle))
        .with_filter(specific_age_bands_filter())
        .with_sort(SortSpec::descending(PREVALENCE))
}

/// The N most prevalent pathology groups for one year, ranked by mean
/// prevalence across age bands and departments.
pub fn top_pathologies_by_mean(year: &str) -> Pipeline {
    Pipeline::new()
        .with_filter(excluded_pathology_filter())
        .with_filter(Filter::equals(YEAR, year))
        .with_filter(specific_age_bands_filter())
        .with_aggregate(AggregateSpec::new([PATHOLOGY], PREVALENCE, Reduce::Mean))
        .with_sort(SortSpec::descending("mean_prev_calculee").with_top_n(TOP_PATHOLOGY_COUNT))
}

/// Names of the top pathologies for a year, for feeding the evolution view.
pub fn top_pathology_names(prevalence: &Table, year: &str) -> DataResult<Vec<String>> {
    let ranked = top_pathologies_by_mean(year).run(prevalence)?;
    Ok(ranked
        .column(PATHOLOGY)?
        .values
        .iter()
        .map(Value::display)
        .collect())
}

/// Mean prevalence per year for a fixed set of pathologies, optionally
/// scoped to one department. Feeds the multi-year line chart; the series
/// column is the pathology name.
pub fn prevalence_evolution<I, S>(pathologies: I, dept: Option<&str>) -> Pipeline
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut pipeline = Pipeline::new().with_filter(Filter::is_in(PATHOLOGY, pathologies));
    if let Some(dept) = dept {
        pipeline = pipeline.with_filter(Filter::equals(PREVALENCE_DEPT, dept));
    }
    pipeline
        .with_aggregate(AggregateSpec::new([YEAR, PATHOLOGY], PREVALENCE, Reduce::Mean))
        .with_sort(SortSpec::ascending(YEAR))
}

// ============================================================================
// Facility page
// ============================================================================

/// Number of distinct facilities per facility type, largest first.
pub fn facility_typology() -> Pipeline {
    Pipeline::new()
        .with_aggregate(
            AggregateSpec::new([FACILITY_TYPE], FINESS_NUMBER, Reduce::CountDistinct)
                .with_alias("nb_etablissements"),
        )
        .with_sort(SortSpec::descending("nb_etablissements"))
}

/// The typology table with a share-of-total percentage column appended,
/// rounded to two decimals as displayed.
pub fn typology_with_share(facilities: &Table) -> DataResult<Table> {
    let typology = facility_typology().run(facilities)?;
    let total = facilities.column(FINESS_NUMBER)?.distinct_count();

    let shares: Vec<Value> = typology
        .column("nb_etablissements")?
        .values
        .iter()
        .map(|count| match (count.as_f64(), total) {
            (Some(n), total) if total > 0 => {
                Value::Number((n / total as f64 * 10_000.0).round() / 100.0)
            }
            _ => Value::Null,
        })
        .collect();

    typology.with_column("pourcentage", ColumnType::Number, shares)
}

/// Facet-filtered facility map: markers colored by facility type, named on
/// hover, centered on the mean of the surviving coordinates.
pub fn facility_map_view(facilities: &Table, selection: &SelectionSet) -> DataResult<MapFrame> {
    let filtered = Pipeline::new()
        .with_selection(selection.clone())
        .run(facilities)?;
    let binding = MapBinding::new(LATITUDE, LONGITUDE)
        .with_hover(FACILITY_NAME)
        .with_color(FACILITY_TYPE);
    bind_map(&filtered, &binding)
}

/// Facilities whose activity label marks an emergency service.
pub fn emergency_services_filter() -> Filter {
    Filter::contains(ACTIVITY, EMERGENCY_ACTIVITY_NEEDLE)
}

// ============================================================================
// Emergency-distance page
// ============================================================================

/// Communes ranked by distance to the nearest emergency service,
/// farthest first.
pub fn commune_distance_ranking() -> Pipeline {
    Pipeline::new().with_sort(SortSpec::descending(EMERGENCY_DISTANCE_KM))
}

/// Mean emergency distance per department, best-served first.
pub fn distance_by_department() -> Pipeline {
    Pipeline::new()
        .with_aggregate(
            AggregateSpec::new([DEPARTMENT_NAME], EMERGENCY_DISTANCE_KM, Reduce::Mean)
                .with_alias(EMERGENCY_DISTANCE_KM),
        )
        .with_sort(SortSpec::ascending(EMERGENCY_DISTANCE_KM))
}

/// Mean emergency distance per population-density band.
pub fn distance_by_density() -> Pipeline {
    Pipeline::new()
        .with_aggregate(
            AggregateSpec::new([DENSITY_BAND], EMERGENCY_DISTANCE_KM, Reduce::Mean)
                .with_alias(EMERGENCY_DISTANCE_KM),
        )
        .with_sort(SortSpec::ascending(EMERGENCY_DISTANCE_KM))
}

/// Region-wide mean distance KPI. `None` when the column is all null.
pub fn mean_emergency_distance(distances: &Table) -> DataResult<Option<f64>> {
    Ok(distances.column(EMERGENCY_DISTANCE_KM)?.mean())
}

// ============================================================================
// Territory scoping
// ============================================================================

/// Communes of the dashboard's region.
pub fn region_communes_filter() -> Filter {
    Filter::equals(REGION, REGION_NAME)
}

/// Scope a commune-joined table to one EPCI (Toulouse Métropole,
/// CC Pyrénées Audoises, ...).
pub fn epci_filter(epci_name: &str) -> Filter {
    Filter::equals(EPCI_NAME, epci_name)
}

// ============================================================================
// KPIs
// ============================================================================

/// Headline figures of the facility overview tab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionKpis {
    /// Distinct registered facilities.
    pub facility_count: usize,
    /// Distinct facility types.
    pub facility_type_count: usize,
    /// Distinct departments covered.
    pub department_count: usize,
    /// Total population of the scoped communes.
    pub population: Option<f64>,
    /// Population divided by facility count.
    pub inhabitants_per_facility: Option<f64>,
    /// Share of the national facility count, in percent.
    pub national_share_pct: Option<f64>,
}

/// Compute the overview KPIs from a facility table and the commune table
/// scoped to the same territory.
pub fn region_kpis(facilities: &Table, communes: &Table) -> DataResult<RegionKpis> {
    let facility_count = facilities.column(FINESS_NUMBER)?.distinct_count();
    let facility_type_count = facilities.column(FACILITY_TYPE)?.distinct_count();
    let department_count = facilities.column(DEPARTMENT)?.distinct_count();
    let population = communes.column(POPULATION)?.sum();

    let inhabitants_per_facility = match (population, facility_count) {
        (Some(pop), count) if count > 0 => Some(pop / count as f64),
        _ => None,
    };
    let national_share_pct = (facility_count > 0)
        .then(|| (facility_count as f64 / FRANCE_FACILITY_COUNT * 10_000.0).round() / 100.0);

    Ok(RegionKpis {
        facility_count,
        facility_type_count,
        department_count,
        population,
        inhabitants_per_facility,
        national_share_pct,
    })
}
