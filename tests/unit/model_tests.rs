use chrono::{TimeZone, Utc};

use sword_xml::namespaces::error_codes::{ERROR_CHECKSUM_MISMATCH, TARGET_OWNER_UNKNOWN};
use sword_xml::{
    Collection, Document, Entry, ErrorDocument, Generator, Link, Person, Service, ServiceLevel,
    Severity, SwordElement, SwordEntry, TextConstruct, ValidationConfig, Workspace,
};
use sword_xml::atom::{ContentType, PersonRole, TextRole};

fn geography_collection() -> Collection {
    let mut collection = Collection::new();
    collection.location = Some("http://example.org/sword/deposit/geography".to_string());
    collection.set_title("Geography");
    collection.add_accept("application/zip");
    collection
        .add_accept_packaging("http://purl.org/net/sword-types/METSDSpaceSIP", 1.0)
        .unwrap();
    collection.add_default_accept_packaging("http://purl.org/net/sword-types/bagit");
    collection.collection_policy = Some("Open to all staff".to_string());
    collection.dc_abstract = Some("Deposits from the geography department".to_string());
    collection.mediation = Some(false);
    collection
}

fn service() -> Service {
    let mut service = Service::with_capabilities("1.3", true, true);
    service.level = Some(ServiceLevel::One);
    service.max_upload_size = Some(16384);

    let mut workspace = Workspace::titled("Main Site");
    workspace.add_collection(geography_collection());
    service.add_workspace(workspace);
    service
}

fn receipt() -> SwordEntry {
    let at = Utc.with_ymd_and_hms(2008, 8, 18, 14, 27, 8).unwrap();
    let mut entry = SwordEntry::new();
    entry.id = Some(Entry::generated_id());
    entry.title = Some(TextConstruct::text(TextRole::Title, "Geography field notes"));
    entry.set_published_at(at);
    entry.set_updated_at(at);
    entry.add_category("deposit");
    entry.authors.push(Person::named(PersonRole::Author, "jbloggs"));
    entry.links.push(Link::to("http://example.org/sword/media/1"));
    entry.generator = Some(Generator {
        uri: Some("http://example.org/sword".to_string()),
        version: Some("1.3".to_string()),
        content: None,
    });
    entry.packaging = Some("http://purl.org/net/sword-types/bagit".to_string());
    entry.no_op = Some(true);
    entry
}

fn round_trip(document: Document) -> (Document, Severity) {
    let xml = document.to_xml(true).unwrap();
    let (parsed, report) = Document::parse(&xml, &ValidationConfig::default()).unwrap();
    assert_eq!(parsed, document, "round trip changed the document:\n{}", xml);
    (parsed, report.severity())
}

#[test]
fn test_service_round_trip() {
    let (_, severity) = round_trip(service().into());
    assert_eq!(severity, Severity::Valid);
}

#[test]
fn test_receipt_round_trip() {
    let (_, severity) = round_trip(receipt().into());
    assert_eq!(severity, Severity::Valid);
}

#[test]
fn test_error_document_round_trip() {
    let mut error = ErrorDocument::with_code(ERROR_CHECKSUM_MISMATCH);
    error.summary = Some(TextConstruct::text(
        TextRole::Summary,
        "The checksum of the received file does not match",
    ));
    let (_, severity) = round_trip(error.into());
    assert_eq!(severity, Severity::Valid);
}

#[test]
fn test_partially_set_service_round_trip() {
    let mut collection = Collection::new();
    collection.location = Some("http://example.org/sword/deposit/empty".to_string());
    collection.title = Some(TextConstruct::title());
    collection.add_accept("   ");

    let mut workspace = Workspace::new();
    workspace.title = Some(TextConstruct::title());
    workspace.add_collection(collection);

    let mut service = Service::new();
    service.version = Some("1.3".to_string());
    service.generator = Some(Generator::new());
    service.add_workspace(workspace);

    let (_, severity) = round_trip(service.into());
    assert_eq!(severity, Severity::Warning);
}

#[test]
fn test_partially_set_receipt_round_trip() {
    let mut entry = SwordEntry::new();
    entry.title = Some(TextConstruct::text(TextRole::Title, "Untitled deposit"));
    let mut summary = TextConstruct::summary();
    summary.content_type = Some(ContentType::Html);
    entry.summary = Some(summary);
    entry.rights = Some(TextConstruct::rights());
    entry.authors.push(Person::author());
    entry.generator = Some(Generator::new());

    let (parsed, _) = round_trip(entry.into());
    let Document::Entry(parsed) = parsed else {
        panic!("expected an entry");
    };
    assert_eq!(parsed.summary.as_ref().and_then(|s| s.content.as_ref()), None);
    assert_eq!(parsed.authors[0].name, None);
}

#[test]
fn test_unset_flags_are_not_written() {
    let mut collection = geography_collection();
    collection.mediation = None;
    let xml = Document::from(collection).to_xml(false).unwrap();
    assert!(!xml.contains("mediation"));

    let mut collection = geography_collection();
    collection.mediation = Some(false);
    let xml = Document::from(collection).to_xml(false).unwrap();
    assert!(xml.contains("<sword:mediation>false</sword:mediation>"));
}

#[test]
fn test_service_children_in_fixed_order() {
    let xml = Document::from(service()).to_xml(false).unwrap();
    let position = |needle: &str| {
        xml.find(needle)
            .unwrap_or_else(|| panic!("{} missing from {}", needle, xml))
    };
    assert!(position("<sword:level>") < position("<sword:version>"));
    assert!(position("<sword:version>") < position("<sword:verbose>"));
    assert!(position("<sword:verbose>") < position("<sword:noOp>"));
    assert!(position("<sword:noOp>") < position("<sword:maxUploadSize>"));
    assert!(position("<sword:maxUploadSize>") < position("<workspace>"));
}

#[test]
fn test_validate_reflects_current_state() {
    let config = ValidationConfig::default();
    let mut service = service();
    assert!(service.validate(&config).is_valid());

    service.version = None;
    assert_eq!(service.validate(&config).severity(), Severity::Error);

    service.version = Some("1.3".to_string());
    service.workspaces.clear();
    assert_eq!(service.validate(&config).severity(), Severity::Warning);
}

#[test]
fn test_invalid_child_raises_parent() {
    let config = ValidationConfig::default();
    let mut blank_accept = service();
    blank_accept.workspaces[0].collections[0].add_accept("  ");
    assert_eq!(blank_accept.validate(&config).severity(), Severity::Warning);

    let mut relative_packaging = service();
    relative_packaging.workspaces[0].collections[0].add_default_accept_packaging("not a uri");
    assert_eq!(
        relative_packaging.validate(&config).severity(),
        Severity::Warning
    );
}

#[test]
fn test_quality_out_of_range_is_rejected() {
    let mut collection = Collection::new();
    assert!(collection.add_accept_packaging("http://example.org/pkg", 1.2).is_err());
    assert!(collection.accept_packaging.is_empty());
}

#[test]
fn test_duplicate_packaging_keeps_last_quality() {
    let mut collection = Collection::new();
    collection.add_accept_packaging("http://example.org/pkg", 0.5).unwrap();
    collection.add_accept_packaging("http://example.org/pkg", 0.7).unwrap();
    assert_eq!(collection.accept_packaging.len(), 1);
    assert_eq!(collection.accept_packaging["http://example.org/pkg"].value(), 0.7);
}

#[test]
fn test_error_body_fields_are_optional() {
    let config = ValidationConfig::default();
    let error = ErrorDocument::with_code(TARGET_OWNER_UNKNOWN);
    assert!(error.validate(&config).is_valid());

    // The same empty body as a receipt misses its title and generator.
    assert_eq!(error.body.validate(&config).severity(), Severity::Error);
}

#[test]
fn test_person_roles() {
    assert_eq!(Person::author().element_name().local_name(), "author");
    assert_eq!(Person::contributor().element_name().local_name(), "contributor");
}
