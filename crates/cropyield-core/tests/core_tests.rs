use std::collections::BTreeMap;
use std::path::Path;

use cropyield_core::config::{expand_path, resolve_with_base, CatalogSettings, Config};
use cropyield_core::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use cropyield_core::{CropCatalog, CropVocabulary, Error, PredictionRequest, RawPrediction, SynonymTable};

#[test]
fn vocabulary_codes_follow_declaration_order() {
    let vocab = CropVocabulary::default();
    assert_eq!(vocab.names(), ["rice", "maize", "wheat", "groundnut"]);
    assert_eq!(vocab.code_of("rice"), Some(0));
    assert_eq!(vocab.code_of("groundnut"), Some(3));
    assert_eq!(vocab.name_of(2), Some("wheat"));
    assert_eq!(vocab.code_of("barley"), None);
}

#[test]
fn vocabulary_rejects_duplicates_and_blanks() {
    assert!(matches!(CropVocabulary::new(["rice", "Rice"]), Err(Error::InvalidConfig(_))));
    assert!(matches!(CropVocabulary::new(["rice", "  "]), Err(Error::InvalidConfig(_))));
    assert!(matches!(CropVocabulary::new(Vec::<String>::new()), Err(Error::InvalidConfig(_))));
}

#[test]
fn synonyms_substitute_known_aliases_only() {
    let table = SynonymTable::builtin();
    assert_eq!(table.substitute("paddy"), "rice");
    assert_eq!(table.substitute("corn"), "maize");
    assert_eq!(table.substitute("ground nut"), "groundnut");
    assert_eq!(table.substitute("wheat"), "wheat");
    assert_eq!(table.substitute("PADDY"), "PADDY", "lookup expects lowercased text");
}

#[test]
fn catalog_refuses_synonyms_outside_vocabulary() {
    let synonyms = SynonymTable::new([("paddy", "rice"), ("jowar", "sorghum")]);
    let err = CropCatalog::new(CropVocabulary::default(), synonyms).unwrap_err();
    assert!(err.to_string().contains("jowar -> sorghum"), "got: {err}");
}

#[test]
fn default_catalog_settings_build() {
    let catalog = CatalogSettings::default().build().expect("catalog");
    assert_eq!(catalog.vocabulary().len(), 4);
    assert_eq!(catalog.synonyms().len(), 3);
}

#[test]
fn feature_vector_defaults_for_empty_request() {
    let v = FeatureVector::build(&PredictionRequest::default(), 2);
    assert_eq!(
        v.into_array(),
        [2025.0, 1.0, 2.0, 1.0, 1.0, 28.0, 60.0, 2.0, 200.0, 10.0, 0.5, 50.0]
    );
}

#[test]
fn feature_vector_uses_request_values_in_position() {
    let req = PredictionRequest {
        crop_tamil: Some("rice".into()),
        year: Some(2019.0),
        district_encoded: Some(3.0),
        season_encoded: Some(2.0),
        area: Some(1.5),
        temp: Some(28.5),
        humidity: Some(65.0),
        wind: Some(3.5),
        ..Default::default()
    };
    let v = FeatureVector::build(&req, 0);
    assert_eq!(&v.as_slice()[..8], &[2019.0, 3.0, 0.0, 2.0, 1.5, 28.5, 65.0, 3.5]);
    assert_eq!(v.as_slice().len(), FEATURE_COUNT);
    assert_eq!(FEATURE_NAMES[2], "Crop_Encoded");
}

// The request can carry PAR/SW_DWN/SoilWetness/Rainfall, but the model
// always receives the fixed constants. Pinned until the feature pipeline
// is reworked to use them.
#[test]
fn climate_constants_ignore_request_values() {
    let req = PredictionRequest {
        par: Some(999.0),
        sw_dwn: Some(-1.0),
        soil_wetness: Some(0.9),
        rainfall: Some(1200.0),
        ..Default::default()
    };
    let v = FeatureVector::build(&req, 1);
    assert_eq!(&v.as_slice()[8..], &[200.0, 10.0, 0.5, 50.0]);
}

#[test]
fn request_deserializes_wire_names_and_nulls() {
    let req: PredictionRequest = serde_json::from_str(
        r#"{"Crop_Tamil":"  நெல் ","Year":2024,"Area":null,"Humidity":65,"Rainfall":50}"#,
    )
    .expect("parse");
    assert_eq!(req.crop_text(), "நெல்");
    assert_eq!(req.year, Some(2024.0));
    assert_eq!(req.area, None);
    assert_eq!(req.humidity, Some(65.0));
    assert_eq!(req.rainfall, Some(50.0));
    assert_eq!(PredictionRequest::default().crop_text(), "");
}

#[test]
fn request_accepts_float_valued_codes() {
    let req: PredictionRequest = serde_json::from_str(
        r#"{"Crop_Tamil":"rice","Year":2025.0,"District_Encoded":3.0,"Season_Encoded":2}"#,
    )
    .expect("parse");
    assert_eq!(req.year, Some(2025.0));
    assert_eq!(req.district_encoded, Some(3.0));
    assert_eq!(req.season_encoded, Some(2.0));
    let v = FeatureVector::build(&req, 0);
    assert_eq!(&v.as_slice()[..4], &[2025.0, 3.0, 0.0, 2.0]);
}

#[test]
fn request_rejects_non_numeric_fields() {
    let parsed = serde_json::from_str::<PredictionRequest>(r#"{"Year":"twenty"}"#);
    assert!(parsed.is_err());
}

#[test]
fn raw_prediction_unwraps_single_row_batches() {
    assert_eq!(RawPrediction::Scalar(1.5).into_scalar().unwrap(), 1.5);
    assert_eq!(RawPrediction::Batch(vec![2.5]).into_scalar().unwrap(), 2.5);
    assert!(RawPrediction::Batch(vec![]).into_scalar().is_err());
}

#[test]
fn error_messages_match_wire_format() {
    assert_eq!(Error::ModelUnavailable.to_string(), "Model not loaded");
    assert_eq!(Error::UnknownCrop("xyzzy".into()).to_string(), "Unknown crop: xyzzy");
    assert!(Error::UnknownCrop(String::new()).is_client_error());
    assert!(!Error::ModelUnavailable.is_client_error());
}

#[test]
fn config_layers_files_and_env() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [server]
            bind = "127.0.0.1:6000"

            [resolver]
            cutoff = 0.7
            "#,
        )?;
        jail.create_file("config.test.toml", "[model]\npath = \"models/test.json\"\n")?;
        jail.set_env("APP_SERVER__BIND", "127.0.0.1:7000");

        let config = Config::load_for_env("test").map_err(|e| e.to_string())?;
        let settings = config.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.server.bind, "127.0.0.1:7000");
        assert_eq!(settings.model.path, "models/test.json");
        assert!((settings.resolver.cutoff - 0.7).abs() < 1e-12);
        assert_eq!(settings.translate.source, "ta");
        assert_eq!(settings.catalog.crops.len(), 4);

        let bind: String = config.get("server.bind").map_err(|e| e.to_string())?;
        assert_eq!(bind, "127.0.0.1:7000");
        Ok(())
    });
}

#[test]
fn config_rejects_out_of_range_cutoff() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[resolver]\ncutoff = 1.5\n")?;
        assert!(Config::load_for_env("dev").is_err());
        Ok(())
    });
}

#[test]
fn config_rejects_dangling_synonym() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[catalog.synonyms]\njowar = \"sorghum\"\n")?;
        let err = Config::load_for_env("dev").err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("sorghum"), "got: {err}");
        Ok(())
    });
}

#[test]
fn configured_catalog_replaces_builtin_one() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [catalog]
            crops = ["rice", "wheat"]

            [catalog.synonyms]
            paddy = "rice"
            "#,
        )?;
        let config = Config::load_for_env("dev").map_err(|e| e.to_string())?;
        let settings = config.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.catalog.crops, ["rice", "wheat"]);
        assert_eq!(settings.catalog.synonyms.len(), 1);
        let catalog = settings.catalog.build().map_err(|e| e.to_string())?;
        assert_eq!(catalog.vocabulary().code_of("wheat"), Some(1));
        assert_eq!(catalog.synonyms().lookup("corn"), None);
        Ok(())
    });
}

#[test]
fn catalog_synonyms_default_when_only_crops_are_configured() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [catalog]
            crops = ["rice", "maize", "wheat", "groundnut", "millet"]
            "#,
        )?;
        let settings = Config::load_for_env("dev").and_then(|c| c.settings()).map_err(|e| e.to_string())?;
        assert_eq!(settings.catalog.crops.len(), 5);
        assert_eq!(settings.catalog.synonyms.len(), 3);
        Ok(())
    });
}

#[test]
fn paths_resolve_against_base() {
    let mut synonyms = BTreeMap::new();
    synonyms.insert("corn".to_string(), "maize".to_string());
    assert!(CropCatalog::from_lists(&["maize".to_string()], &synonyms).is_ok());

    let base = Path::new("/srv/cropyield");
    assert_eq!(resolve_with_base(base, "model.json"), base.join("model.json"));
    assert_eq!(resolve_with_base(base, "/opt/model.json"), Path::new("/opt/model.json"));
    assert_eq!(expand_path("plain/path"), Path::new("plain/path"));
}
