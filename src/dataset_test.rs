use crate::dataset::*;

fn record(country: &str, capital: &str) -> CountryRecord {
    CountryRecord {
        country: country.into(),
        capital: capital.into(),
        lat: 0.0,
        lon: 0.0,
        image: String::new(),
        colored_image: String::new(),
    }
}

#[test]
fn normalize_strips_diacritics_case_and_whitespace() {
    assert_eq!(normalize("  bogotá "), "BOGOTA");
    assert_eq!(normalize("São Tomé"), "SAO TOME");
    assert_eq!(normalize("ASUNCIÓN"), "ASUNCION");
    assert_eq!(normalize("Reykjavík"), "REYKJAVIK");
    assert_eq!(normalize("paris"), "PARIS");
}

#[test]
fn from_json_reads_the_original_field_names() {
    let data = r#"[
        {
            "country": "France",
            "capital": "Paris",
            "lat": 48.9,
            "lon": 2.4,
            "image": "images/fr.png",
            "coloredImage": "images/fr_colored.png"
        }
    ]"#;

    let ds = Dataset::from_json(data).unwrap();
    assert_eq!(ds.len(), 1);

    let france = &ds.records()[0];
    assert_eq!(france.capital, "Paris");
    assert_eq!(france.colored_image, "images/fr_colored.png");
}

#[test]
fn empty_dataset_is_rejected() {
    let err = Dataset::new(vec![]).unwrap_err();
    assert!(err.to_string().contains("empty"));
}

#[test]
fn empty_capital_is_rejected() {
    let err = Dataset::new(vec![record("Atlantis", "  ")]).unwrap_err();
    assert!(err.to_string().contains("empty capital"));
}

#[test]
fn colliding_normalized_capitals_are_rejected() {
    let err = Dataset::new(vec![
        record("Colombia", "Bogotá"),
        record("Notlombia", "bogota"),
    ])
    .unwrap_err();

    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn find_capital_matches_normalized_names() {
    let ds = Dataset::new(vec![record("Colombia", "Bogotá"), record("Peru", "Lima")]).unwrap();

    let hit = ds.find_capital(&normalize("bogota")).unwrap();
    assert_eq!(hit.country, "Colombia");

    assert!(ds.find_capital("ATLANTIS").is_none());
    // Lookups take normalized input; raw accented text misses.
    assert!(ds.find_capital("Bogotá").is_none());
}

#[test]
fn embedded_dataset_loads() {
    let ds = Dataset::from_json(EMBEDDED_COUNTRIES).unwrap();
    assert!(ds.len() > 20);
    assert!(ds.find_capital("PARIS").is_some());
    assert!(ds.find_capital(&normalize("Brasília")).is_some());
}
