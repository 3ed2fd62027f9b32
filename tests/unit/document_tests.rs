use sword_xml::dom::parse_document;
use sword_xml::leaf::SwordVerbose;
use sword_xml::report::ChildGroup;
use sword_xml::{
    Collection, Document, Entry, Severity, SwordElement, SwordEntry, SwordError,
    ValidationConfig,
};

use crate::common::test_helpers::{TestFixtures, findings, findings_for, worst_for};

fn parse(xml: &str) -> (Document, sword_xml::ValidationReport) {
    Document::parse(xml, &ValidationConfig::default()).unwrap()
}

fn parse_fixture(path: &std::path::Path) -> (Document, sword_xml::ValidationReport) {
    let fixtures = TestFixtures::new();
    parse(&fixtures.read(path))
}

#[test]
fn test_valid_fixtures() {
    let fixtures = TestFixtures::new();
    for path in [
        fixtures.service(),
        fixtures.deposit_receipt(),
        fixtures.error_document(),
    ] {
        let (_, report) = parse_fixture(&path);
        assert!(
            report.is_valid(),
            "{} should be valid: {:#?}",
            path.display(),
            findings(&report)
                .into_iter()
                .filter(|f| f.severity > Severity::Valid)
                .collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_service_fixture_content() {
    let (document, _) = parse_fixture(&TestFixtures::new().service());
    let Document::Service(service) = document else {
        panic!("expected a service document");
    };

    assert_eq!(service.version.as_deref(), Some("1.3"));
    assert_eq!(service.verbose, Some(true));
    assert_eq!(service.no_op, Some(true));
    assert_eq!(service.max_upload_size, Some(4096));
    assert_eq!(service.workspaces.len(), 1);

    let collection = &service.workspaces[0].collections[0];
    assert_eq!(
        collection.location.as_deref(),
        Some("http://www.myrepository.ac.uk/atom/geography-collection")
    );
    assert_eq!(collection.accepts, vec!["application/zip", "application/xml"]);
    assert_eq!(collection.accept_packaging.len(), 2);
    assert_eq!(
        collection.accept_packaging["http://purl.org/net/sword-types/bagit"].value(),
        0.8
    );
    assert_eq!(collection.mediation, Some(true));
}

#[test]
fn test_collection_missing_recommended_fields_is_warning() {
    let (_, report) = parse_fixture(&TestFixtures::new().incomplete_collection());
    assert_eq!(report.severity(), Severity::Warning);
    assert_eq!(worst_for(&report, "href"), Some(Severity::Warning));
    assert_eq!(worst_for(&report, "accept"), Some(Severity::Warning));
    assert_eq!(worst_for(&report, "sword:mediation"), Some(Severity::Warning));
}

#[test]
fn test_collection_with_location_accept_and_mediation_is_valid() {
    let (document, report) = parse(
        r#"<collection xmlns="http://www.w3.org/2007/app"
                       xmlns:sword="http://purl.org/net/sword/"
                       href="location example">
             <accept>application/zip</accept>
             <sword:mediation>true</sword:mediation>
           </collection>"#,
    );
    assert!(matches!(document, Document::Collection(_)));
    assert_eq!(report.severity(), Severity::Valid);
}

#[test]
fn test_entry_missing_recommended_fields_is_warning() {
    let (_, report) = parse(
        r#"<entry xmlns="http://www.w3.org/2005/Atom">
             <title>A deposit</title>
             <updated>2008-08-18T14:27:08Z</updated>
             <generator uri="http://example.org/sword" version="1.3"/>
             <author><name>jbloggs</name></author>
             <contributor><name>jdoe</name></contributor>
             <category>deposit</category>
             <link rel="edit" href="http://example.org/deposit/1"/>
           </entry>"#,
    );
    assert_eq!(report.severity(), Severity::Warning);
    assert_eq!(worst_for(&report, "atom:id"), Some(Severity::Warning));
    assert_eq!(worst_for(&report, "atom:published"), Some(Severity::Warning));
    assert_eq!(worst_for(&report, "atom:author"), Some(Severity::Valid));
    assert_eq!(worst_for(&report, "atom:link"), Some(Severity::Valid));
}

#[test]
fn test_generator_without_attributes_is_warning() {
    let (_, report) = parse(
        r#"<entry xmlns="http://www.w3.org/2005/Atom">
             <id>info:deposit/1</id>
             <title>A deposit</title>
             <published>2008-08-18T14:27:08Z</published>
             <updated>2008-08-18T14:27:08Z</updated>
             <category>deposit</category>
             <generator/>
           </entry>"#,
    );
    assert_eq!(report.severity(), Severity::Warning);
    assert_eq!(worst_for(&report, "atom:generator"), Some(Severity::Warning));
}

#[test]
fn test_author_without_name_is_error() {
    let (document, report) = parse_fixture(&TestFixtures::new().author_without_name());
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(worst_for(&report, "atom:name"), Some(Severity::Error));

    let Document::Entry(entry) = document else {
        panic!("expected an entry");
    };
    assert_eq!(entry.authors.len(), 1);
    assert_eq!(entry.authors[0].email.as_deref(), Some("nobody@example.org"));
}

#[test]
fn test_verbose_leaf_findings() {
    let config = ValidationConfig::default();
    let unmarshal = |xml: &str| {
        let element = parse_document(xml).unwrap();
        let mut leaf = SwordVerbose::new();
        let report = leaf.unmarshal(&element, &config).unwrap();
        (leaf, report)
    };
    const NS: &str = r#"xmlns:sword="http://purl.org/net/sword/""#;

    let (_, report) = unmarshal(&format!("<sword:verbose {NS}>other</sword:verbose>"));
    assert_eq!(report.severity(), Severity::Error);

    let (leaf, report) = unmarshal(&format!("<sword:verbose {NS}/>"));
    assert_eq!(report.severity(), Severity::Warning);
    assert_eq!(leaf.content(), None);

    let (leaf, report) = unmarshal(&format!(
        r#"<sword:verbose {NS} extra="yes">true</sword:verbose>"#
    ));
    assert_eq!(report.severity(), Severity::Info);
    assert_eq!(leaf.content(), Some(&true));
    assert_eq!(report.children(ChildGroup::AttributeValidation).len(), 1);
}

#[test]
fn test_bad_child_does_not_stop_the_rest() {
    let (document, report) = parse_fixture(&TestFixtures::new().bad_service());
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(worst_for(&report, "sword:level"), Some(Severity::Error));
    assert_eq!(worst_for(&report, "sword:verbose"), Some(Severity::Error));

    let Document::Service(service) = document else {
        panic!("expected a service document");
    };
    assert_eq!(service.level, None);
    assert_eq!(service.verbose, None);
    assert_eq!(service.version.as_deref(), Some("1.3"));
    assert_eq!(service.no_op, Some(true));
}

#[test]
fn test_unknown_children_are_skipped_quietly() {
    let xml = r#"<collection xmlns="http://www.w3.org/2007/app"
                   xmlns:sword="http://purl.org/net/sword/"
                   xmlns:x="urn:example:extension"
                   href="http://example.org/collection">
                   <x:rating>5</x:rating>
                   <accept>application/zip</accept>
                   <sword:mediation>false</sword:mediation>
                 </collection>"#;

    let (_, report) = parse(xml);
    assert!(report.is_valid());
    assert!(findings_for(&report, "x:rating").is_empty());

    let config = ValidationConfig {
        report_unknown_elements: true,
        ..ValidationConfig::default()
    };
    let (_, report) = Document::parse(xml, &config).unwrap();
    assert_eq!(report.severity(), Severity::Info);
    assert_eq!(worst_for(&report, "x:rating"), Some(Severity::Info));
}

#[test]
fn test_bad_quality_value_is_error() {
    let (document, report) = parse(
        r#"<collection xmlns="http://www.w3.org/2007/app"
                       xmlns:sword="http://purl.org/net/sword/"
                       href="http://example.org/collection">
             <accept>application/zip</accept>
             <sword:acceptPackaging q="2.5">http://purl.org/net/sword-types/bagit</sword:acceptPackaging>
             <sword:mediation>false</sword:mediation>
           </collection>"#,
    );
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(worst_for(&report, "q"), Some(Severity::Error));

    // The format is still recorded, with the default quality.
    let Document::Collection(collection) = document else {
        panic!("expected a collection");
    };
    assert_eq!(
        collection.accept_packaging["http://purl.org/net/sword-types/bagit"].value(),
        1.0
    );
}

#[test]
fn test_relative_packaging_uri_depends_on_config() {
    let xml = r#"<collection xmlns="http://www.w3.org/2007/app"
                   xmlns:sword="http://purl.org/net/sword/"
                   href="http://example.org/collection">
                   <accept>application/zip</accept>
                   <sword:acceptPackaging>bagit</sword:acceptPackaging>
                   <sword:mediation>false</sword:mediation>
                 </collection>"#;

    let (_, report) = parse(xml);
    assert_eq!(report.severity(), Severity::Warning);
    assert_eq!(worst_for(&report, "sword:acceptPackaging"), Some(Severity::Warning));

    let relaxed = ValidationConfig {
        require_absolute_uris: false,
        ..ValidationConfig::default()
    };
    let (_, report) = Document::parse(xml, &relaxed).unwrap();
    assert!(report.is_valid());
}

#[test]
fn test_unknown_error_code_is_error() {
    let (_, report) = parse(
        r#"<sword:error xmlns:sword="http://purl.org/net/sword/"
                        href="http://purl.org/net/sword/error/NoSuchError"/>"#,
    );
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(worst_for(&report, "href"), Some(Severity::Error));
}

#[test]
fn test_typed_unmarshal_rejects_wrong_root() {
    let element = parse_document(r#"<entry xmlns="http://www.w3.org/2005/Atom"/>"#).unwrap();
    let mut collection = Collection::new();
    let result = collection.unmarshal(&element, &ValidationConfig::default());
    assert!(matches!(result, Err(SwordError::WrongElement { .. })));
}

#[test]
fn test_malformed_documents_are_errors() {
    let fixtures = TestFixtures::new();
    let xml = fixtures.read(&fixtures.not_well_formed());
    assert!(matches!(
        Document::parse(&xml, &ValidationConfig::default()),
        Err(SwordError::Xml { .. })
    ));

    let xml = fixtures.read(&fixtures.xml_malformed_dir().join("unsupported_root.xml"));
    assert!(matches!(
        Document::parse(&xml, &ValidationConfig::default()),
        Err(SwordError::UnsupportedDocument { .. })
    ));
}

#[test]
fn test_validate_matches_unmarshal_for_clean_documents() {
    let (document, report) = parse_fixture(&TestFixtures::new().deposit_receipt());
    let revalidated = document.validate(&ValidationConfig::default());
    assert_eq!(revalidated.severity(), report.severity());

    let Document::Entry(entry) = document else {
        panic!("expected an entry");
    };
    assert_eq!(entry.element_name(), Entry::name());
    assert_eq!(entry.categories().to_vec(), vec!["deposit".to_string()]);
}

#[test]
fn test_sword_entry_revalidates_after_edit() {
    let (document, _) = parse_fixture(&TestFixtures::new().deposit_receipt());
    let Document::Entry(mut entry) = document else {
        panic!("expected an entry");
    };
    entry.title = None;

    let report: sword_xml::ValidationReport =
        SwordEntry::validate(&entry, &ValidationConfig::default());
    assert_eq!(report.severity(), Severity::Error);
    assert_eq!(worst_for(&report, "atom:title"), Some(Severity::Error));
}
