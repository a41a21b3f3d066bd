//! Full dashboard pipelines over the miniature dataset fixtures.

use crate::helpers::{
    COVID_HOSPITALIZATION, DIABETES, RESPIRATORY, commune_fixture, display_column,
    distance_fixture, facility_fixture, number_column_values, prevalence_fixture,
};
use santeboard::chart::{ChartBinding, bind_chart};
use santeboard::dashboard::{
    age_vulnerability, commune_distance_ranking, distance_by_density, distance_by_department,
    emergency_services_filter, epci_filter, facility_map_view, mean_emergency_distance,
    pathology_prevalence_ranking, prevalence_evolution, region_communes_filter, region_kpis,
    top_pathologies_by_mean, top_pathology_names, typology_with_share,
};
use santeboard::data::datasets::columns;
use santeboard::query::{Pipeline, SelectionSet};

fn assert_approx(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("expected a numeric value");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Prevalence page
// ============================================================================

#[test]
fn test_pathology_ranking_excludes_aggregates_and_sorts() {
    let prevalence = prevalence_fixture();
    let ranked = pathology_prevalence_ranking("31", "2023")
        .run(&prevalence)
        .unwrap();

    // Covid hospitalizations and the `tous âges` aggregate row are gone.
    let pathologies = display_column(&ranked, columns::PATHOLOGY);
    assert!(!pathologies.iter().any(|p| p == COVID_HOSPITALIZATION));
    let ages = display_column(&ranked, columns::AGE_BAND);
    assert!(!ages.iter().any(|a| a == "tous âges"));

    assert_eq!(
        number_column_values(&ranked, columns::PREVALENCE),
        vec![Some(5.0), Some(3.0), Some(2.0), Some(1.0)]
    );
}

#[test]
fn test_age_vulnerability_matches_by_substring() {
    let prevalence = prevalence_fixture();
    let result = age_vulnerability("31", "2023", "diab")
        .run(&prevalence)
        .unwrap();

    assert_eq!(
        display_column(&result, columns::AGE_BAND),
        vec!["18-64", "0-17"]
    );
    assert_eq!(
        number_column_values(&result, columns::PREVALENCE),
        vec![Some(3.0), Some(1.0)]
    );
}

#[test]
fn test_top_pathologies_ranked_by_mean_prevalence() {
    let prevalence = prevalence_fixture();
    let top = top_pathologies_by_mean("2023").run(&prevalence).unwrap();

    // Diabetes: (1 + 3 + 7) / 3 across both departments beats the
    // respiratory mean of (2 + 5) / 2.
    assert_eq!(
        display_column(&top, columns::PATHOLOGY),
        vec![DIABETES, RESPIRATORY]
    );
    let means = number_column_values(&top, "mean_prev_calculee");
    assert_approx(means[0], 11.0 / 3.0);
    assert_approx(means[1], 3.5);

    let names = top_pathology_names(&prevalence, "2023").unwrap();
    assert_eq!(names, vec![DIABETES, RESPIRATORY]);
}

#[test]
fn test_prevalence_evolution_feeds_the_line_chart() {
    let prevalence = prevalence_fixture();
    let evolution = prevalence_evolution([DIABETES], Some("31"))
        .run(&prevalence)
        .unwrap();

    assert_eq!(display_column(&evolution, columns::YEAR), vec!["2022", "2023"]);
    assert_eq!(
        number_column_values(&evolution, "mean_prev_calculee"),
        vec![Some(2.5), Some(2.0)]
    );

    let binding = ChartBinding::new(columns::YEAR, "mean_prev_calculee")
        .with_series(columns::PATHOLOGY);
    let frame = bind_chart(&evolution, &binding).unwrap();
    assert_eq!(frame.points.len(), 2);
    assert_eq!(frame.points[0].series.as_deref(), Some(DIABETES));
    assert_eq!(frame.max_value, Some(2.5));
}

// ============================================================================
// Facility page
// ============================================================================

#[test]
fn test_typology_with_share_percentages() {
    let facilities = facility_fixture();
    let typology = typology_with_share(&facilities).unwrap();

    let rows: Vec<(String, f64, f64)> = (0..typology.row_count())
        .map(|i| {
            (
                display_column(&typology, columns::FACILITY_TYPE)[i].clone(),
                number_column_values(&typology, "nb_etablissements")[i].unwrap(),
                number_column_values(&typology, "pourcentage")[i].unwrap(),
            )
        })
        .collect();

    insta::assert_json_snapshot!(rows, @r#"
    [
      [
        "Centre Hospitalier",
        2.0,
        40.0
      ],
      [
        "Clinique",
        1.0,
        20.0
      ],
      [
        "EHPAD",
        1.0,
        20.0
      ],
      [
        "Cabinet",
        1.0,
        20.0
      ]
    ]
    "#);
}

#[test]
fn test_facility_map_follows_the_facet_selection() {
    let facilities = facility_fixture();

    let selection =
        SelectionSet::new().with_values(columns::FACILITY_TYPE, ["Centre Hospitalier"]);
    let frame = facility_map_view(&facilities, &selection).unwrap();
    assert_eq!(frame.markers.len(), 2);
    assert_approx(Some(frame.center.0), 43.145);
    assert_approx(Some(frame.center.1), 2.16);
    assert_eq!(frame.markers[0].hover.as_deref(), Some("CHU Toulouse"));
    assert_eq!(
        frame.markers[0].color_value.as_deref(),
        Some("Centre Hospitalier")
    );

    // ALL selection: every located facility appears; the one without
    // coordinates is skipped, not errored on.
    let frame = facility_map_view(&facilities, &SelectionSet::new()).unwrap();
    assert_eq!(frame.markers.len(), 4);
}

#[test]
fn test_emergency_services_match_case_insensitively() {
    let facilities = facility_fixture();
    let emergency = Pipeline::new()
        .with_filter(emergency_services_filter())
        .run(&facilities)
        .unwrap();

    assert_eq!(
        display_column(&emergency, columns::FACILITY_NAME),
        vec!["CHU Toulouse", "CH Perpignan"]
    );
}

#[test]
fn test_territory_scoping_filters() {
    let communes = commune_fixture();

    let region = Pipeline::new()
        .with_filter(region_communes_filter())
        .run(&communes)
        .unwrap();
    assert_eq!(region.row_count(), 2);

    let metropole = Pipeline::new()
        .with_filter(epci_filter("Toulouse Métropole"))
        .run(&communes)
        .unwrap();
    assert_eq!(
        display_column(&metropole, columns::COMMUNE_NAME),
        vec!["Toulouse"]
    );
}

#[test]
fn test_region_kpis() {
    let kpis = region_kpis(&facility_fixture(), &commune_fixture()).unwrap();

    assert_eq!(kpis.facility_count, 5);
    assert_eq!(kpis.facility_type_count, 4);
    assert_eq!(kpis.department_count, 3);
    assert_eq!(kpis.population, Some(1500.0));
    assert_eq!(kpis.inhabitants_per_facility, Some(300.0));
    // Five facilities against the national count round below one hundredth
    // of a percent.
    assert_eq!(kpis.national_share_pct, Some(0.0));
}

// ============================================================================
// Emergency-distance page
// ============================================================================

#[test]
fn test_commune_distance_ranking_farthest_first() {
    let distances = distance_fixture();
    let ranked = commune_distance_ranking().run(&distances).unwrap();
    assert_eq!(
        display_column(&ranked, columns::COMMUNE_NAME),
        vec!["Foix", "Tournefeuille", "Perpignan", "Toulouse"]
    );
}

#[test]
fn test_distance_by_department_best_served_first() {
    let distances = distance_fixture();
    let result = distance_by_department().run(&distances).unwrap();

    assert_eq!(
        display_column(&result, columns::DEPARTMENT_NAME),
        vec!["Pyrénées-Orientales", "Haute-Garonne", "Ariège"]
    );
    let means = number_column_values(&result, columns::EMERGENCY_DISTANCE_KM);
    assert_approx(means[0], 2.0);
    assert_approx(means[1], 4.0);
    assert_approx(means[2], 24.0);
}

#[test]
fn test_distance_by_density_band() {
    let distances = distance_fixture();
    let result = distance_by_density().run(&distances).unwrap();

    assert_eq!(
        display_column(&result, columns::DENSITY_BAND),
        vec!["Urbain dense", "Urbain", "Rural"]
    );
    let means = number_column_values(&result, columns::EMERGENCY_DISTANCE_KM);
    assert_approx(means[0], 1.6);
    assert_approx(means[1], 6.8);
    assert_approx(means[2], 24.0);
}

#[test]
fn test_mean_emergency_distance_kpi() {
    let distances = distance_fixture();
    let mean = mean_emergency_distance(&distances).unwrap();
    assert_approx(mean, 8.5);
}
