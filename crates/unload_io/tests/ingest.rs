use pretty_assertions::assert_eq;
use tempfile::TempDir;
use unload_core::{ManifestError, ManifestLine};
use unload_io::{
    decode_manifest_bytes, load_manifest_file, parse_manifest_csv, IngestError, ManifestColumns,
};

fn parse(text: &str) -> Result<unload_core::Manifest, IngestError> {
    parse_manifest_csv(text, &ManifestColumns::default())
}

#[test]
fn parses_required_and_alias_columns() {
    let csv = "\
codigo_barra,cantidad,ciudad,codigos_adicionales
 A1 , 3 , Lima ,
B2,1,Cusco,\"B2ALT, B2OLD ,\"
";
    let manifest = parse(csv).unwrap();
    assert_eq!(
        manifest.lines(),
        &[
            ManifestLine::new("A1", 3, "Lima"),
            ManifestLine::new("B2", 1, "Cusco").with_aliases(["B2ALT", "B2OLD"]),
        ]
    );
    assert_eq!(manifest.total_expected(), 4);
}

#[test]
fn alias_column_is_optional_and_blank_rows_are_skipped() {
    let csv = "codigo_barra,cantidad,ciudad\nA1,2,Lima\n\n,,\nC3,1,Puno\n";
    let manifest = parse(csv).unwrap();
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.lines()[1].primary_code(), "C3");
}

#[test]
fn headers_match_case_insensitively_in_any_order() {
    let csv = "CIUDAD,Codigo_Barra,Cantidad\nLima,A1,2\n";
    let manifest = parse(csv).unwrap();
    assert_eq!(manifest.lines()[0], ManifestLine::new("A1", 2, "Lima"));
}

#[test]
fn non_numeric_quantity_reports_line() {
    let err = parse("codigo_barra,cantidad,ciudad\nA1,2,Lima\nB2,dos,Cusco\n").unwrap_err();
    match err {
        IngestError::InvalidQuantity { line, value } => {
            assert_eq!(line, 3);
            assert_eq!(value, "dos");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn zero_quantity_is_invalid() {
    let err = parse("codigo_barra,cantidad,ciudad\nA1,0,Lima\n").unwrap_err();
    assert!(matches!(err, IngestError::InvalidQuantity { line: 2, .. }));
}

#[test]
fn missing_column_and_field_are_reported() {
    let err = parse("codigo_barra,ciudad\nA1,Lima\n").unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { ref column } if column == "cantidad"));

    let err = parse("codigo_barra,cantidad,ciudad\n,2,Lima\n").unwrap_err();
    assert!(matches!(err, IngestError::MissingField { line: 2, ref column } if column == "codigo_barra"));

    // Short rows are allowed by the reader but still need their required fields.
    let err = parse("codigo_barra,cantidad,ciudad\nA1\n").unwrap_err();
    assert!(matches!(err, IngestError::MissingField { ref column, .. } if column == "cantidad"));
}

#[test]
fn structural_violations_surface_as_manifest_errors() {
    let err = parse("codigo_barra,cantidad,ciudad\nA1,1,Lima\nA1,2,Lima\n").unwrap_err();
    assert!(matches!(
        err,
        IngestError::Manifest(ManifestError::DuplicateCode { .. })
    ));

    let err = parse("codigo_barra,cantidad,ciudad\n").unwrap_err();
    assert!(matches!(err, IngestError::Manifest(ManifestError::Empty)));
}

#[test]
fn custom_column_names() {
    let columns = ManifestColumns {
        code: "sku".into(),
        quantity: "qty".into(),
        destination: "city".into(),
        aliases: "alt".into(),
    };
    let manifest = parse_manifest_csv("sku,qty,city,alt\nA1,2,Lima,A1X\n", &columns).unwrap();
    assert!(manifest.find("A1X").is_some());
}

#[test]
fn decode_handles_bom_and_windows_1252() {
    let decoded = decode_manifest_bytes(b"\xEF\xBB\xBFcodigo_barra").unwrap();
    assert_eq!(decoded.text, "codigo_barra");
    assert_eq!(decoded.encoding_label, "UTF-8");

    let latin = b"codigo_barra,cantidad,ciudad\nA1,1,Bogot\xe1\n";
    let decoded = decode_manifest_bytes(latin).unwrap();
    assert_ne!(decoded.encoding_label, "UTF-8");
    assert!(decoded.text.starts_with("codigo_barra,cantidad,ciudad\nA1,1,Bogot"));
    assert!(!decoded.text.contains('\u{FFFD}'));
}

#[test]
fn load_from_file_decodes_and_parses() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("manifest.csv");
    std::fs::write(&path, b"\xEF\xBB\xBFcodigo_barra,cantidad,ciudad\nA1,2,Lima\n").unwrap();

    let manifest = load_manifest_file(&path, &ManifestColumns::default()).unwrap();
    assert_eq!(manifest.lines()[0].primary_code(), "A1");

    let err = load_manifest_file(&temp.path().join("absent.csv"), &ManifestColumns::default())
        .unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}
